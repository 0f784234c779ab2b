use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Configuration error, fatal at construction time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("At least one token source (header or parameter) must be configured")]
    NoTokenSource,
}

/// What to do with a classified token verification failure.
///
/// The explicit rendition of a process-wide debug flag: chosen once at
/// construction so behavior stays deterministic and testable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorHandling {
    /// Swallow the failure, record it for later inspection, and report
    /// "no payload". Verification internals never reach end users.
    #[default]
    Suppress,
    /// Surface the classified failure to the caller as a hard error.
    /// Intended for development and debugging.
    Propagate,
}

/// Immutable authenticator settings, resolved at construction time.
///
/// Deserializable with serde defaults so hosts can load it from their own
/// configuration layer (files, environment) alongside the rest of their
/// settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Column compared against the token's `sub` claim during lookup.
    pub username_field: String,
    /// Query parameter carrying the token when no header is present.
    pub parameter: String,
    /// Header carrying the token. Empty disables the header source.
    pub header: String,
    /// Authorization scheme stripped from the header value, case-insensitively.
    pub prefix: String,
    /// Name of the user model queried in the external store.
    pub user_model: String,
    /// When false, the verified payload itself becomes the user record and
    /// the store is never queried.
    pub query_datasource: bool,
    /// Extra equality constraints ANDed into the lookup. On a key collision
    /// with the subject condition, scope wins (last-write-wins merge).
    pub scope: HashMap<String, Value>,
    /// Contained entities expanded and merged into the user record.
    pub contain: Vec<String>,
    /// Signing key. Falls back to the process-wide secret when unset.
    pub key: Option<String>,
    /// Verification failure policy.
    pub error_handling: ErrorHandling,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username_field: "username".to_string(),
            parameter: "_token".to_string(),
            header: "authorization".to_string(),
            prefix: "bearer".to_string(),
            user_model: "User".to_string(),
            query_datasource: true,
            scope: HashMap::new(),
            contain: Vec::new(),
            key: None,
            error_handling: ErrorHandling::Suppress,
        }
    }
}

impl AuthConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column compared against the `sub` claim.
    pub fn with_username_field(mut self, field: impl ToString) -> Self {
        self.username_field = field.to_string();
        self
    }

    /// Set the token query parameter name. Empty disables the source.
    pub fn with_parameter(mut self, parameter: impl ToString) -> Self {
        self.parameter = parameter.to_string();
        self
    }

    /// Set the token header name. Empty disables the source.
    pub fn with_header(mut self, header: impl ToString) -> Self {
        self.header = header.to_string();
        self
    }

    /// Set the authorization scheme prefix.
    pub fn with_prefix(mut self, prefix: impl ToString) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Set the user model name.
    pub fn with_user_model(mut self, model: impl ToString) -> Self {
        self.user_model = model.to_string();
        self
    }

    /// Select datastore verification (`true`) or trust-the-payload (`false`).
    pub fn with_query_datasource(mut self, query: bool) -> Self {
        self.query_datasource = query;
        self
    }

    /// Add a scope condition.
    pub fn with_scope(mut self, field: impl ToString, value: impl Into<Value>) -> Self {
        self.scope.insert(field.to_string(), value.into());
        self
    }

    /// Add a contained entity to expand.
    pub fn with_contain(mut self, entity: impl ToString) -> Self {
        self.contain.push(entity.to_string());
        self
    }

    /// Set a dedicated signing key.
    pub fn with_key(mut self, key: impl ToString) -> Self {
        self.key = Some(key.to_string());
        self
    }

    /// Set the verification failure policy.
    pub fn with_error_handling(mut self, mode: ErrorHandling) -> Self {
        self.error_handling = mode;
        self
    }

    /// Check construction-time invariants.
    ///
    /// # Errors
    /// * `NoTokenSource` - both header and parameter are empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.header.is_empty() && self.parameter.is_empty() {
            return Err(ConfigError::NoTokenSource);
        }
        Ok(())
    }
}
