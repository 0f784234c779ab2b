use serde_json::Value;

use crate::config::AuthConfig;
use crate::store::Conditions;
use crate::store::StoreError;
use crate::store::UserRecord;
use crate::store::UserStore;

/// Resolve a token subject into a user record.
///
/// Builds the condition set (subject equality merged with the configured
/// scope), runs a single first-match query with any contain expansion, and
/// flattens the result into one field map.
///
/// Merge semantics, both deliberate and covered by tests:
/// - a scope key colliding with the subject condition overwrites it;
/// - contained-entity fields overwrite primary-entity fields, since related
///   data is merged in after the primary fields are taken.
///
/// # Returns
/// The flattened user record, or `None` when no record matches or the
/// primary portion of the match is empty.
///
/// # Errors
/// * `StoreError` - the store query failed
pub async fn resolve_user(
    store: &dyn UserStore,
    config: &AuthConfig,
    subject: &str,
) -> Result<Option<UserRecord>, StoreError> {
    let mut conditions = Conditions::new();
    conditions.insert(
        config.username_field.clone(),
        Value::String(subject.to_string()),
    );
    for (field, value) in &config.scope {
        conditions.insert(field.clone(), value.clone());
    }

    let found = store
        .find_first(&config.user_model, &conditions, &config.contain)
        .await?;

    let Some(record) = found else {
        return Ok(None);
    };
    if record.fields.is_empty() {
        return Ok(None);
    }

    let mut user: UserRecord = record.fields;
    for (_, related) in record.related {
        user.extend(related);
    }
    Ok(Some(user))
}
