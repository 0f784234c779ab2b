use jsonwebtoken::decode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::VerificationError;

/// JWT verifier for bearer tokens in compact serialization.
///
/// Fixed to the HS256 (HMAC with SHA-256) algorithm family; tokens signed
/// with any other algorithm are rejected as unsupported. Verification covers
/// structure, signature, `exp` and `nbf`; tokens without an `exp` claim are
/// accepted.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a new verifier with a signing secret.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens without 'exp' stay valid; expiry is enforced only when claimed
        validation.required_spec_claims.clear();
        validation.validate_nbf = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verify a raw token and produce its decoded payload.
    ///
    /// # Errors
    /// A classified [`VerificationError`]: malformed structure, signature
    /// mismatch, expired, not yet valid, or unsupported algorithm.
    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}
