//! Observability module for the auth service
//!
//! Metrics and log hygiene helpers.
//!
//! # Privacy by Default
//!
//! Anything that touches key material, TOTP secrets or tokens uses
//! `#[instrument(skip_all)]` and logs an explicit allow-list of fields.
//! Fields are categorized as:
//! - **SAFE**: Can be logged in plaintext (token type, rejection reason)
//! - **HASHED**: Must be SHA-256 hashed for correlation (user_id)
//! - **NEVER**: Must never appear in logs (signing secret, TOTP secret, TOTP code, tokens)

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars)
///
/// Used for user identifiers that need correlation across log entries
/// but should not be stored in plaintext.
///
/// # Privacy
///
/// This is NOT cryptographically secure for secrets - it's a one-way hash
/// for correlation purposes only.
pub fn hash_for_correlation(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    // First 4 bytes (8 hex chars) - enough for correlation, limits reversibility
    hex::encode(digest.get(..4).unwrap_or_default())
}
