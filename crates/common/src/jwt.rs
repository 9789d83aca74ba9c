//! JWT claims and constants shared with every service that consumes tokens.
//!
//! The auth service signs tokens; downstream services call its validation
//! endpoint, but they still need a stable view of what a token carries.
//! This module is that view:
//! - Size limit applied before any parsing (DoS prevention)
//! - The `type` claim separating access tokens from refresh tokens
//! - The claim set itself, with identity fields redacted in Debug output
//!
//! # Wire format
//!
//! ```text
//! base64url({"alg":"HS256","typ":"JWT"}) . base64url(claims) . base64url(hmac_sha256)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// Tokens larger than this are rejected BEFORE base64 decoding or HMAC
/// computation. A typical access token with a handful of roles is well
/// under 1KB.
pub const MAX_JWT_SIZE_BYTES: usize = 8192; // 8KB

/// Signature algorithm written into (and required from) every token header.
pub const JWT_ALGORITHM: &str = "HS256";

/// Header `typ` value.
pub const JWT_TYPE: &str = "JWT";

/// Token type reported to OAuth-style clients alongside a token pair.
pub const BEARER_TOKEN_TYPE: &str = "Bearer";

/// Remaining lifetime under which a token counts as "expiring soon".
///
/// Advisory only: callers use it to refresh early. It never fails validation.
pub const EXPIRING_SOON_THRESHOLD: Duration = Duration::from_secs(300);

// =============================================================================
// Token type
// =============================================================================

/// Which credential a token is. Immutable after issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived, presented on every request, carries profile and roles.
    Access,
    /// Long-lived, only exchanged for a new access token.
    Refresh,
}

impl TokenType {
    /// Claim value as it appears on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Claims
// =============================================================================

/// Claim set protected by a token's signature.
///
/// Access tokens carry `username`, `email` and `roles`. Refresh tokens carry
/// only the subject and the registered claims; the profile fields are
/// omitted from the payload entirely.
///
/// # Security
///
/// `sub`, `username` and `email` identify a person and are redacted in
/// Debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user identifier) - redacted in Debug output.
    pub sub: String,

    /// Issuer identifier.
    pub iss: String,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Access or refresh.
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Unique token identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Login name (access tokens only) - redacted in Debug output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Email address (access tokens only) - redacted in Debug output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Roles granted at issuance (access tokens only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

impl fmt::Debug for TokenClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenClaims")
            .field("sub", &"[REDACTED]")
            .field("iss", &self.iss)
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .field("token_type", &self.token_type)
            .field("jti", &self.jti)
            .field("username", &self.username.as_ref().map(|_| "[REDACTED]"))
            .field("email", &self.email.as_ref().map(|_| "[REDACTED]"))
            .field("roles", &self.roles)
            .finish()
    }
}

impl TokenClaims {
    /// Whether this is an access token.
    #[must_use]
    pub fn is_access(&self) -> bool {
        self.token_type == TokenType::Access
    }

    /// Whether this is a refresh token.
    #[must_use]
    pub fn is_refresh(&self) -> bool {
        self.token_type == TokenType::Refresh
    }

    /// Roles carried by the token; empty for refresh tokens.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        self.roles.as_deref().unwrap_or_default()
    }

    /// Check if the token grants a specific role. Exact match only.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| r == role)
    }

    /// Whether the token is expired at `now` (expiry is exclusive: `now >= exp`).
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Whether fewer than `threshold` seconds of lifetime remain at `now`.
    #[must_use]
    pub fn expires_within(&self, threshold: Duration, now: i64) -> bool {
        // Bounded by EXPIRING_SOON_THRESHOLD-sized values in practice
        let threshold_secs = i64::try_from(threshold.as_secs()).unwrap_or(i64::MAX);
        self.exp.saturating_sub(now) < threshold_secs
    }
}

// =============================================================================
// Tests
// =============================================================================
