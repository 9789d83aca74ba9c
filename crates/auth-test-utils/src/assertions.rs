//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions for issued tokens. These inspect the
//! token's structure and claims; signature verification is the service's
//! job and is tested there.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// JWT claims structure
#[derive(Debug, Deserialize)]
struct JwtClaims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

fn segment(token: &str, index: usize) -> Vec<u8> {
    let part = token
        .split('.')
        .nth(index)
        .unwrap_or_else(|| panic!("JWT is missing segment {index}"));
    URL_SAFE_NO_PAD
        .decode(part)
        .unwrap_or_else(|e| panic!("Failed to base64 decode JWT segment {index}: {e}"))
}

fn claims(token: &str) -> JwtClaims {
    serde_json::from_slice(&segment(token, 1)).expect("Failed to parse JWT claims")
}

/// Custom assertions for tokens
///
/// # Example
/// ```rust,ignore
/// pair.access_token
///     .assert_valid_jwt()
///     .assert_token_type("access")
///     .assert_has_role("USER")
///     .assert_expires_in(3600);
/// ```
pub trait TokenAssertions {
    /// Assert that the token is a well-formed HS256 JWT
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert that the token carries the specified role
    fn assert_has_role(&self, role: &str) -> &Self;

    /// Assert the `type` claim (`access` or `refresh`)
    fn assert_token_type(&self, token_type: &str) -> &Self;

    /// Assert that the token expires within the specified seconds
    fn assert_expires_in(&self, seconds: u64) -> &Self;

    /// Assert that the token is for the specified subject
    fn assert_for_subject(&self, subject: &str) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );

        let header: JwtHeader =
            serde_json::from_slice(&segment(self, 0)).expect("Failed to parse JWT header JSON");
        assert_eq!(header.alg, "HS256", "Expected HS256 algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let claims = claims(self);
        assert!(
            claims.exp > claims.iat,
            "Expected exp after iat, got iat={} exp={}",
            claims.iat,
            claims.exp
        );

        // HMAC-SHA256 tag is 32 bytes
        assert_eq!(segment(self, 2).len(), 32, "Expected 32-byte HS256 signature");

        self
    }

    fn assert_has_role(&self, role: &str) -> &Self {
        let roles = claims(self).roles.unwrap_or_default();
        assert!(
            roles.iter().any(|r| r == role),
            "Token does not contain role '{}'. Available roles: {:?}",
            role,
            roles
        );

        self
    }

    fn assert_token_type(&self, token_type: &str) -> &Self {
        let actual = claims(self).token_type;
        assert_eq!(
            actual, token_type,
            "Expected token type '{}', got '{}'",
            token_type, actual
        );

        self
    }

    fn assert_expires_in(&self, seconds: u64) -> &Self {
        let now = chrono::Utc::now().timestamp();
        let expires_in = claims(self).exp - now;

        // Allow 5-second tolerance for slow test runs
        assert!(
            (expires_in - seconds as i64).abs() <= 5,
            "Expected token to expire in {} seconds, but expires in {} seconds",
            seconds,
            expires_in
        );

        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        let claims = claims(self);
        assert_eq!(
            claims.sub, subject,
            "Expected subject '{}', got '{}'",
            subject, claims.sub
        );

        self
    }
}
