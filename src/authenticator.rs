use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use async_trait::async_trait;
use tracing::debug;

use crate::config::AuthConfig;
use crate::config::ConfigError;
use crate::config::ErrorHandling;
use crate::extract::extract_token;
use crate::jwt::Claims;
use crate::jwt::TokenVerifier;
use crate::jwt::VerificationError;
use crate::request::TokenSource;
use crate::resolver::resolve_user;
use crate::store::StoreError;
use crate::store::UserRecord;
use crate::store::UserStore;

/// Errors surfaced by the identification phase.
///
/// Verification failures only appear here in [`ErrorHandling::Propagate`]
/// mode; in `Suppress` mode they collapse into a `None` outcome.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Token verification failed: {0}")]
    Verification(#[from] VerificationError),

    #[error("User store error: {0}")]
    Store(#[from] StoreError),
}

/// Two-phase authentication contract consumed by a host orchestrator.
#[async_trait]
pub trait Authenticate: Send + Sync {
    /// Phase 1: credential-exchange authentication.
    fn authenticate(&self, request: &dyn TokenSource) -> Option<UserRecord>;

    /// Phase 2: stateless identification from the request itself.
    async fn identify(
        &self,
        request: &(dyn TokenSource + Sync),
    ) -> Result<Option<UserRecord>, AuthError>;
}

/// Stateless bearer-token authenticator.
///
/// Wires token extraction, verification, the payload policy and user
/// resolution into the two-phase contract. Holds no per-request state; the
/// only interior mutability is a diagnostic slot recording the most recent
/// verification failure, safe to share across concurrent invocations.
pub struct Authenticator {
    config: AuthConfig,
    verifier: TokenVerifier,
    store: Arc<dyn UserStore>,
    last_failure: Mutex<Option<VerificationError>>,
}

impl Authenticator {
    /// Create an authenticator.
    ///
    /// # Arguments
    /// * `config` - immutable settings; validated here
    /// * `fallback_secret` - process-wide signing secret, used when the
    ///   configuration carries no dedicated key
    /// * `store` - external user store collaborator
    ///
    /// # Errors
    /// * `ConfigError` - construction invariants violated
    pub fn new(
        config: AuthConfig,
        fallback_secret: &[u8],
        store: Arc<dyn UserStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let verifier = match &config.key {
            Some(key) => TokenVerifier::new(key.as_bytes()),
            None => TokenVerifier::new(fallback_secret),
        };
        Ok(Self {
            config,
            verifier,
            store,
            last_failure: Mutex::new(None),
        })
    }

    /// The settings this authenticator was built with.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Most recent verification failure, if any.
    ///
    /// The introspection side channel for suppressed failures: downstream
    /// callers see a uniform `None` outcome whether a token was absent or
    /// failed verification, and this is the only way to tell them apart.
    pub fn last_verification_error(&self) -> Option<VerificationError> {
        self.last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // Verify the raw token, applying the configured failure policy.
    fn decode_payload(&self, token: &str) -> Result<Option<Claims>, AuthError> {
        match self.verifier.verify(token) {
            Ok(claims) => Ok(Some(claims)),
            Err(err) => {
                *self
                    .last_failure
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = Some(err.clone());
                match self.config.error_handling {
                    ErrorHandling::Propagate => Err(err.into()),
                    ErrorHandling::Suppress => {
                        debug!(error = %err, "token verification failed");
                        Ok(None)
                    }
                }
            }
        }
    }
}

#[async_trait]
impl Authenticate for Authenticator {
    /// Always "not applicable": this mechanism never authenticates through a
    /// credential exchange. A deliberate no-op, not a missing feature.
    fn authenticate(&self, _request: &dyn TokenSource) -> Option<UserRecord> {
        None
    }

    /// Run extraction, verification and the payload policy, resolving the
    /// subject against the user store when datastore verification is on.
    ///
    /// Absent token, missing `sub` and lookup misses all produce `Ok(None)`
    /// uniformly; no partial state leaks into the outcome.
    async fn identify(
        &self,
        request: &(dyn TokenSource + Sync),
    ) -> Result<Option<UserRecord>, AuthError> {
        let Some(token) = extract_token(request, &self.config) else {
            return Ok(None);
        };
        let Some(payload) = self.decode_payload(&token)? else {
            return Ok(None);
        };

        if !self.config.query_datasource {
            return Ok(Some(payload.into_record()));
        }

        let Some(subject) = payload.sub else {
            return Ok(None);
        };
        let user = resolve_user(self.store.as_ref(), &self.config, &subject).await?;
        Ok(user)
    }
}
