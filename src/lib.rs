//! Stateless JWT bearer authentication adapter
//!
//! Extracts a bearer token from a request, verifies its HMAC-SHA256
//! signature against a shared secret, and resolves the token's `sub` claim
//! into an application user record:
//! - Token extraction from a configured header or query parameter
//! - Signature and structure verification (HS256, via `jsonwebtoken`)
//! - A payload policy: trust the verified claims directly, or look the
//!   subject up in an external user store with scope conditions and
//!   related-data expansion
//!
//! The host framework stays out of scope: requests arrive through the
//! [`TokenSource`] trait and the user store through the [`UserStore`] trait.
//! This crate never issues or refreshes tokens and never caches decoded
//! payloads across requests.
//!
//! # Examples
//!
//! ## Token Extraction
//! ```
//! use jwt_auth::extract::extract_token;
//! use jwt_auth::{AuthConfig, StaticRequest};
//!
//! let config = AuthConfig::default();
//! let request = StaticRequest::new().with_header("Authorization", "Bearer abc.def.ghi");
//! assert_eq!(extract_token(&request, &config), Some("abc.def.ghi".to_string()));
//! ```
//!
//! ## Complete Authentication Flow
//! ```no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use jwt_auth::{
//!     Authenticate, AuthConfig, Authenticator, MemoryUserStore, StaticRequest, StoreRecord,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = MemoryUserStore::new();
//! let mut fields = HashMap::new();
//! fields.insert("id".to_string(), serde_json::json!(7));
//! fields.insert("username".to_string(), serde_json::json!("alice"));
//! store.insert("User", StoreRecord::new(fields));
//!
//! let config = AuthConfig::default().with_username_field("id");
//! let authenticator = Authenticator::new(config, b"shared_secret_32_bytes_long!!!!!!", Arc::new(store))?;
//!
//! let request = StaticRequest::new().with_header("Authorization", "Bearer <token>");
//! match authenticator.identify(&request).await? {
//!     Some(user) => println!("authenticated: {:?}", user.get("username")),
//!     None => println!("not authenticated"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod authenticator;
pub mod config;
pub mod extract;
pub mod jwt;
pub mod request;
pub mod resolver;
pub mod store;

// Re-export commonly used items
pub use authenticator::Authenticate;
pub use authenticator::AuthError;
pub use authenticator::Authenticator;
pub use config::AuthConfig;
pub use config::ConfigError;
pub use config::ErrorHandling;
pub use jwt::Claims;
pub use jwt::TokenVerifier;
pub use jwt::VerificationError;
pub use request::StaticRequest;
pub use request::TokenSource;
pub use store::Conditions;
pub use store::MemoryUserStore;
pub use store::StoreError;
pub use store::StoreRecord;
pub use store::UserRecord;
pub use store::UserStore;
