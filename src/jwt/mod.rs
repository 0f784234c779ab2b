pub mod claims;
pub mod errors;
pub mod verifier;

pub use claims::Claims;
pub use errors::VerificationError;
pub use verifier::TokenVerifier;
