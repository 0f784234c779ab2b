use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Flat field map representing the authenticated principal.
///
/// Merged from a primary user entity and any contained entities; built fresh
/// per successful lookup and returned by value to the caller.
pub type UserRecord = HashMap<String, Value>;

/// Equality condition set for a store lookup. All entries are ANDed.
pub type Conditions = HashMap<String, Value>;

/// Error for user store query failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("User store query failed: {0}")]
    QueryFailed(String),
}

/// Raw result of a store lookup: the primary entity's fields plus any
/// contained entities, keyed by entity name in expansion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreRecord {
    pub fields: HashMap<String, Value>,
    pub related: Vec<(String, HashMap<String, Value>)>,
}

impl StoreRecord {
    /// Create a record from the primary entity's fields.
    pub fn new(fields: HashMap<String, Value>) -> Self {
        Self {
            fields,
            related: Vec::new(),
        }
    }

    /// Attach a contained entity's fields.
    pub fn with_related(mut self, name: impl ToString, fields: HashMap<String, Value>) -> Self {
        self.related.push((name.to_string(), fields));
        self
    }
}

/// Port for the external user store.
///
/// The adapter issues exactly one read query per authentication attempt and
/// never writes. Consistency guarantees of the backing store are the
/// implementor's concern.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find the first record of `model` matching all `conditions`, expanding
    /// the contained entities named in `contain`.
    ///
    /// # Returns
    /// The matching record, or `None` when nothing matches.
    ///
    /// # Errors
    /// * `StoreError` - the query could not be executed
    async fn find_first(
        &self,
        model: &str,
        conditions: &Conditions,
        contain: &[String],
    ) -> Result<Option<StoreRecord>, StoreError>;
}

/// In-memory [`UserStore`] over seeded records.
///
/// Intended for tests and for hosts that materialize their user set up
/// front. Counts executed queries so callers can assert that the
/// trust-the-payload path never touches the store.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    records: HashMap<String, Vec<StoreRecord>>,
    queries: AtomicUsize,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record under a model name.
    pub fn insert(&mut self, model: impl ToString, record: StoreRecord) {
        self.records.entry(model.to_string()).or_default().push(record);
    }

    /// Number of queries executed so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

// SQL backends compare a string subject against numeric key columns without
// fuss; mirror that by treating "7" and 7 as equal.
fn value_eq(condition: &Value, field: &Value) -> bool {
    if condition == field {
        return true;
    }
    match (condition, field) {
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            *s == n.to_string()
        }
        _ => false,
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_first(
        &self,
        model: &str,
        conditions: &Conditions,
        contain: &[String],
    ) -> Result<Option<StoreRecord>, StoreError> {
        self.queries.fetch_add(1, Ordering::Relaxed);

        let found = self.records.get(model).and_then(|rows| {
            rows.iter().find(|row| {
                conditions.iter().all(|(name, wanted)| {
                    row.fields
                        .get(name)
                        .map_or(false, |actual| value_eq(wanted, actual))
                })
            })
        });

        Ok(found.map(|row| {
            let mut record = StoreRecord::new(row.fields.clone());
            record.related = row
                .related
                .iter()
                .filter(|(name, _)| contain.contains(name))
                .cloned()
                .collect();
            record
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_find_first_matches_all_conditions() {
        let mut store = MemoryUserStore::new();
        store.insert(
            "User",
            StoreRecord::new(fields(&[("id", json!(7)), ("active", json!(1))])),
        );

        let conditions = fields(&[("id", json!("7")), ("active", json!(1))]);
        let found = store
            .find_first("User", &conditions, &[])
            .await
            .expect("query failed");
        assert!(found.is_some());

        let conditions = fields(&[("id", json!("7")), ("active", json!(0))]);
        let found = store
            .find_first("User", &conditions, &[])
            .await
            .expect("query failed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_contain_filters_related_entities() {
        let mut store = MemoryUserStore::new();
        store.insert(
            "User",
            StoreRecord::new(fields(&[("id", json!(7))]))
                .with_related("Profile", fields(&[("bio", json!("hi"))]))
                .with_related("Settings", fields(&[("theme", json!("dark"))])),
        );

        let conditions = fields(&[("id", json!("7"))]);
        let found = store
            .find_first("User", &conditions, &["Profile".to_string()])
            .await
            .expect("query failed")
            .expect("record missing");

        assert_eq!(found.related.len(), 1);
        assert_eq!(found.related[0].0, "Profile");
    }

    #[tokio::test]
    async fn test_query_count_tracks_lookups() {
        let store = MemoryUserStore::new();
        assert_eq!(store.query_count(), 0);

        let _ = store.find_first("User", &Conditions::new(), &[]).await;
        assert_eq!(store.query_count(), 1);
    }
}
