use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::store::UserRecord;

/// Decoded token payload.
///
/// Supports standard RFC 7519 claims plus arbitrary custom claims via the
/// flattened `extra` map. All standard fields are optional; a payload is
/// only required to carry `sub` when the datastore lookup path is active.
///
/// Transient by design: a payload lives for the duration of one request and
/// is never persisted or cached.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user/entity identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// JWT ID (unique token identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Additional custom claims (flattened into the payload)
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set not-before (Unix timestamp).
    pub fn with_not_before(mut self, nbf: i64) -> Self {
        self.nbf = Some(nbf);
        self
    }

    /// Add a custom claim.
    pub fn with_claim(mut self, name: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(name.to_string(), json_value);
        }
        self
    }

    /// Look up a claim by name, spanning registered and custom claims.
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "sub" => self.sub.clone().map(Value::String),
            "exp" => self.exp.map(Value::from),
            "iat" => self.iat.map(Value::from),
            "nbf" => self.nbf.map(Value::from),
            "iss" => self.iss.clone().map(Value::String),
            "aud" => self.aud.clone().map(Value::String),
            "jti" => self.jti.clone().map(Value::String),
            _ => self.extra.get(name).cloned(),
        }
    }

    /// Convert the claim mapping verbatim into a user record.
    ///
    /// Used by the trust-the-payload path (`query_datasource = false`): no
    /// schema validation is applied beyond this conversion, so any claim the
    /// token carries becomes a field of the "authenticated user" as long as
    /// the signature verified.
    pub fn into_record(self) -> UserRecord {
        let mut record: UserRecord = self.extra;
        if let Some(sub) = self.sub {
            record.insert("sub".to_string(), Value::String(sub));
        }
        if let Some(exp) = self.exp {
            record.insert("exp".to_string(), Value::from(exp));
        }
        if let Some(iat) = self.iat {
            record.insert("iat".to_string(), Value::from(iat));
        }
        if let Some(nbf) = self.nbf {
            record.insert("nbf".to_string(), Value::from(nbf));
        }
        if let Some(iss) = self.iss {
            record.insert("iss".to_string(), Value::String(iss));
        }
        if let Some(aud) = self.aud {
            record.insert("aud".to_string(), Value::String(aud));
        }
        if let Some(jti) = self.jti {
            record.insert("jti".to_string(), Value::String(jti));
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_pattern() {
        let claims = Claims::new()
            .with_subject("user123")
            .with_expiration(1234567890)
            .with_claim("role", "admin");

        assert_eq!(claims.sub, Some("user123".to_string()));
        assert_eq!(claims.exp, Some(1234567890));
        assert_eq!(claims.extra.get("role").unwrap().as_str(), Some("admin"));
    }

    #[test]
    fn test_get_spans_registered_and_custom_claims() {
        let claims = Claims::new()
            .with_subject("42")
            .with_claim("tenant", "acme");

        assert_eq!(claims.get("sub"), Some(json!("42")));
        assert_eq!(claims.get("tenant"), Some(json!("acme")));
        assert_eq!(claims.get("missing"), None);
    }

    #[test]
    fn test_into_record_is_verbatim() {
        let claims = Claims::new()
            .with_subject("1")
            .with_claim("role", "admin");

        let record = claims.into_record();
        assert_eq!(record.get("sub"), Some(&json!("1")));
        assert_eq!(record.get("role"), Some(&json!("admin")));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_deserialize_custom_claims_into_extra() {
        let claims: Claims =
            serde_json::from_str(r#"{"sub":"7","role":"admin","level":3}"#).expect("valid json");

        assert_eq!(claims.sub, Some("7".to_string()));
        assert_eq!(claims.extra.get("role"), Some(&json!("admin")));
        assert_eq!(claims.extra.get("level"), Some(&json!(3)));
    }
}
