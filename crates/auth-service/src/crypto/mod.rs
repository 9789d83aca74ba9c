use crate::errors::AuthError;
use crate::models::RejectionReason;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use common::jwt::{TokenClaims, JWT_ALGORITHM, JWT_TYPE, MAX_JWT_SIZE_BYTES};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use ring::rand::{SecureRandom, SystemRandom};
use std::fmt;
use tracing::instrument;

/// Minimum HMAC-SHA256 key length in bytes.
///
/// RFC 7518 Section 3.2: a key of the same size as the hash output (256 bits)
/// or larger MUST be used with HS256.
pub const MIN_SIGNING_KEY_BYTES: usize = 32;

/// Process-wide HS256 signing key.
///
/// Built once from configuration and shared read-only. Debug output never
/// includes key material, and the type is not serializable.
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    /// Build a signing key from raw secret bytes.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Crypto` if the secret is shorter than
    /// [`MIN_SIGNING_KEY_BYTES`].
    #[instrument(skip_all)]
    pub fn new(secret: &[u8]) -> Result<Self, AuthError> {
        if secret.len() < MIN_SIGNING_KEY_BYTES {
            return Err(AuthError::Crypto(format!(
                "Signing key too short: expected at least {} bytes, got {}",
                MIN_SIGNING_KEY_BYTES,
                secret.len()
            )));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &JWT_ALGORITHM)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Sign claims into a compact HS256 JWT.
///
/// Identical claims and key always produce the identical token.
#[instrument(skip_all)]
pub fn encode_token(claims: &TokenClaims, key: &SigningKey) -> Result<String, AuthError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some(JWT_TYPE.to_string());

    encode(&header, claims, &key.encoding)
        .map_err(|e| AuthError::Crypto(format!("JWT signing operation failed: {}", e)))
}

/// Verify a compact HS256 JWT and return its claims.
///
/// Checks, in order:
/// - Size (must be <= `MAX_JWT_SIZE_BYTES`), before any parsing
/// - Exactly three segments
/// - Header decodes, `alg` is HS256 and `typ` (if present) is JWT
/// - Signature decodes and matches
/// - Payload decodes and `exp > iat`
///
/// Expiry is NOT checked here; that is the validator's job.
#[instrument(skip_all)]
pub fn decode_token(token: &str, key: &SigningKey) -> Result<TokenClaims, RejectionReason> {
    // Check token size BEFORE any parsing or cryptographic operations
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "auth.crypto",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(RejectionReason::Malformed);
    }

    if token.split('.').count() != 3 {
        tracing::debug!(target: "auth.crypto", "Token rejected: expected three segments");
        return Err(RejectionReason::Malformed);
    }

    let header = decode_header(token).map_err(|e| {
        tracing::debug!(target: "auth.crypto", error = %e, "Invalid token header");
        if header_names_algorithm(token) {
            RejectionReason::Unsupported
        } else {
            RejectionReason::Malformed
        }
    })?;

    if header.alg != Algorithm::HS256 || header.typ.as_deref().is_some_and(|typ| typ != JWT_TYPE) {
        tracing::debug!(
            target: "auth.crypto",
            alg = ?header.alg,
            "Token rejected: unsupported algorithm or type"
        );
        return Err(RejectionReason::Unsupported);
    }

    let token_data = decode::<TokenClaims>(token, &key.decoding, &validation()).map_err(|e| {
        tracing::debug!(target: "auth.crypto", error = %e, "Token verification failed");
        match e.kind() {
            ErrorKind::InvalidSignature => RejectionReason::SignatureInvalid,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                RejectionReason::Unsupported
            }
            _ => RejectionReason::Malformed,
        }
    })?;
    let claims = token_data.claims;

    if claims.exp <= claims.iat {
        tracing::debug!(
            target: "auth.crypto",
            iat = claims.iat,
            exp = claims.exp,
            "Token rejected: exp is not after iat"
        );
        return Err(RejectionReason::Malformed);
    }

    Ok(claims)
}

/// Signature and structure only. Expiry belongs to the validator, which
/// checks it against an explicit clock.
fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

/// Whether the header is a JSON object naming an `alg`, even one this
/// service does not recognise (e.g. `none`).
fn header_names_algorithm(token: &str) -> bool {
    token
        .split('.')
        .next()
        .and_then(|header| URL_SAFE_NO_PAD.decode(header).ok())
        .and_then(|bytes| serde_json::from_slice::<serde_json::Value>(&bytes).ok())
        .is_some_and(|header| header.get("alg").is_some_and(serde_json::Value::is_string))
}

/// Generate cryptographically secure random bytes
pub fn generate_random_bytes(len: usize) -> Result<Vec<u8>, AuthError> {
    let rng = SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|e| AuthError::Crypto(format!("Random bytes generation failed: {}", e)))?;
    Ok(bytes)
}
