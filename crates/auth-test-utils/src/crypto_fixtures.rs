//! Deterministic cryptographic fixtures for testing
//!
//! Fixed secrets so tokens and TOTP codes are reproducible across runs.

use crate::test_ids::TEST_ISSUER;
use auth_service::config::Config;
use auth_service::crypto::SigningKey;
use std::collections::HashMap;
use std::sync::Arc;

/// Signing secret used by every test server and fixture (40 bytes).
pub const TEST_JWT_SECRET: &str = "test-signing-secret-do-not-use-in-prod!!";

/// A different secret, for tokens that must fail signature checks.
pub const OTHER_JWT_SECRET: &str = "attacker-controlled-secret-of-40-bytes!!";

/// RFC 6238 Appendix B SHA-1 seed ("12345678901234567890") in Base32.
pub const RFC6238_SECRET_BASE32: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

/// RFC 6238 Appendix B SHA-1 vectors, truncated to 6 digits: `(unix_secs, code)`.
pub const RFC6238_SHA1_VECTORS: [(i64, &str); 5] = [
    (59, "287082"),
    (1_111_111_109, "081804"),
    (1_111_111_111, "050471"),
    (1_234_567_890, "005924"),
    (2_000_000_000, "279037"),
];

/// Signing key built from [`TEST_JWT_SECRET`].
pub fn test_signing_key() -> Arc<SigningKey> {
    Arc::new(SigningKey::new(TEST_JWT_SECRET.as_bytes()).expect("test secret is long enough"))
}

/// Signing key built from [`OTHER_JWT_SECRET`].
pub fn other_signing_key() -> Arc<SigningKey> {
    Arc::new(SigningKey::new(OTHER_JWT_SECRET.as_bytes()).expect("other secret is long enough"))
}

/// Environment for a test server: test secret, test issuer, random port,
/// development endpoints enabled.
pub fn test_config_vars() -> HashMap<String, String> {
    HashMap::from([
        ("AUTH_JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
        ("AUTH_TOKEN_ISSUER".to_string(), TEST_ISSUER.to_string()),
        ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ("AUTH_ENABLE_TEST_ENDPOINTS".to_string(), "true".to_string()),
    ])
}

/// Parsed [`test_config_vars`].
pub fn test_config() -> Config {
    Config::from_vars(&test_config_vars()).expect("test config is valid")
}
