//! Builder patterns for test data construction
//!
//! Provides fluent APIs for creating test tokens, including ones the service
//! must reject (expired, foreign algorithm, unsigned).

use crate::test_ids::{TEST_EMAIL_ALICE, TEST_ISSUER, TEST_USERNAME_ALICE, TEST_USER_ALICE};
use auth_service::crypto::{encode_token, SigningKey};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use common::jwt::{TokenClaims, TokenType};
use jsonwebtoken::{Algorithm, EncodingKey, Header};

/// Builder for creating test token claims
///
/// Defaults to an access token for alice with the `USER` role, issued now
/// and valid for one hour.
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user("user-42")
///     .with_roles(&["TRADER"])
///     .expires_in(60)
///     .sign(&test_signing_key());
/// ```
pub struct TestTokenBuilder {
    claims: TokenClaims,
}

impl TestTokenBuilder {
    /// Create a new token builder with defaults
    pub fn new() -> Self {
        let now = Utc::now().timestamp();
        Self {
            claims: TokenClaims {
                sub: TEST_USER_ALICE.to_string(),
                iss: TEST_ISSUER.to_string(),
                iat: now,
                exp: now + 3600,
                token_type: TokenType::Access,
                jti: Some(format!("test-jti-{now}")),
                username: Some(TEST_USERNAME_ALICE.to_string()),
                email: Some(TEST_EMAIL_ALICE.to_string()),
                roles: Some(vec!["USER".to_string()]),
            },
        }
    }

    /// Set the subject
    pub fn for_user(mut self, subject: &str) -> Self {
        self.claims.sub = subject.to_string();
        self
    }

    /// Set username and email
    pub fn with_profile(mut self, username: &str, email: &str) -> Self {
        self.claims.username = Some(username.to_string());
        self.claims.email = Some(email.to_string());
        self
    }

    /// Set the roles claim
    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.claims.roles = Some(roles.iter().map(|r| r.to_string()).collect());
        self
    }

    /// Set the issuer
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.claims.iss = issuer.to_string();
        self
    }

    /// Make this a refresh token (drops profile and roles)
    pub fn refresh(mut self) -> Self {
        self.claims.token_type = TokenType::Refresh;
        self.claims.username = None;
        self.claims.email = None;
        self.claims.roles = None;
        self
    }

    /// Set issued-at timestamp, keeping the current lifetime
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        let lifetime = self.claims.exp - self.claims.iat;
        self.claims.iat = timestamp;
        self.claims.exp = timestamp + lifetime;
        self
    }

    /// Set expiration in seconds from issuance
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.claims.exp = self.claims.iat + seconds;
        self
    }

    /// Make the token expired `seconds` ago, issued an hour before that
    pub fn expired_seconds_ago(mut self, seconds: i64) -> Self {
        let exp = Utc::now().timestamp() - seconds;
        self.claims.exp = exp;
        self.claims.iat = exp - 3600;
        self
    }

    /// Build the claims
    pub fn build(self) -> TokenClaims {
        self.claims
    }

    /// Sign with the service's own codec
    pub fn sign(self, key: &SigningKey) -> String {
        encode_token(&self.claims, key).expect("test claims serialize")
    }

    /// Sign with the `jsonwebtoken` crate using any HMAC algorithm
    pub fn sign_with_jsonwebtoken(self, secret: &str, algorithm: Algorithm) -> String {
        jsonwebtoken::encode(
            &Header::new(algorithm),
            &self.claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("jsonwebtoken encode")
    }

    /// An `alg: none` token with an empty signature segment
    pub fn unsigned(self) -> String {
        let header = serde_json::json!({"alg": "none", "typ": "JWT"});
        format!(
            "{}.{}.",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).expect("header")),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&self.claims).expect("claims"))
        )
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a token's payload without verifying it.
pub fn peek_claims(token: &str) -> serde_json::Value {
    let payload = token.split('.').nth(1).expect("JWT payload segment");
    let bytes = URL_SAFE_NO_PAD.decode(payload).expect("base64url payload");
    serde_json::from_slice(&bytes).expect("JSON payload")
}
