use common::jwt::TokenClaims;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Validation outcomes
// ============================================================================

/// Why a token was rejected.
///
/// Expected outcomes of validation, not faults. The `as_str` values are
/// bounded and safe to use as metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    EmptyToken,
    Malformed,
    SignatureInvalid,
    Expired,
    Unsupported,
    WrongTokenType,
}

impl RejectionReason {
    /// Stable label for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::EmptyToken => "empty_token",
            RejectionReason::Malformed => "malformed",
            RejectionReason::SignatureInvalid => "signature_invalid",
            RejectionReason::Expired => "expired",
            RejectionReason::Unsupported => "unsupported",
            RejectionReason::WrongTokenType => "wrong_token_type",
        }
    }

    /// Client-facing message. Never includes token contents.
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::EmptyToken => "token is required",
            RejectionReason::Malformed => "token is malformed",
            RejectionReason::SignatureInvalid => "token signature is invalid",
            RejectionReason::Expired => "token has expired",
            RejectionReason::Unsupported => "token algorithm or type is not supported",
            RejectionReason::WrongTokenType => "token must be an access token",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of validating a token. The tag fully determines the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid(TokenClaims),
    Invalid(RejectionReason),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    /// Claims of a valid token, if any.
    pub fn claims(&self) -> Option<&TokenClaims> {
        match self {
            ValidationResult::Valid(claims) => Some(claims),
            ValidationResult::Invalid(_) => None,
        }
    }

    /// Rejection reason of an invalid token, if any.
    pub fn reason(&self) -> Option<RejectionReason> {
        match self {
            ValidationResult::Valid(_) => None,
            ValidationResult::Invalid(reason) => Some(*reason),
        }
    }

    pub fn into_result(self) -> Result<TokenClaims, RejectionReason> {
        match self {
            ValidationResult::Valid(claims) => Ok(claims),
            ValidationResult::Invalid(reason) => Err(reason),
        }
    }
}

impl From<Result<TokenClaims, RejectionReason>> for ValidationResult {
    fn from(result: Result<TokenClaims, RejectionReason>) -> Self {
        match result {
            Ok(claims) => ValidationResult::Valid(claims),
            Err(reason) => ValidationResult::Invalid(reason),
        }
    }
}

// ============================================================================
// Token issuance
// ============================================================================

/// Access and refresh token issued together.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

// ============================================================================
// Request/response contract
// ============================================================================

#[derive(Clone, Deserialize, Serialize)]
pub struct ValidateTokenRequest {
    #[serde(default)]
    pub access_token: String,
}

impl fmt::Debug for ValidateTokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidateTokenRequest")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateTokenResponse {
    pub valid: bool,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
    /// Expiry as Unix epoch seconds; 0 when invalid.
    pub expires_at: i64,
    pub error_message: String,
}

impl ValidateTokenResponse {
    pub fn valid(claims: TokenClaims) -> Self {
        Self {
            valid: true,
            expires_at: claims.exp,
            roles: claims.roles.unwrap_or_default(),
            username: claims.username.unwrap_or_default(),
            email: claims.email.unwrap_or_default(),
            user_id: claims.sub,
            error_message: String::new(),
        }
    }

    pub fn invalid(reason: RejectionReason) -> Self {
        Self {
            error_message: reason.message().to_string(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct ValidateTotpRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub totp_code: String,
}

impl fmt::Debug for ValidateTotpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidateTotpRequest")
            .field("user_id", &"[REDACTED]")
            .field("totp_code", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateTotpResponse {
    pub valid: bool,
    pub error_message: String,
}

impl ValidateTotpResponse {
    pub fn valid() -> Self {
        Self {
            valid: true,
            error_message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error_message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckPermissionRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckPermissionResponse {
    pub allowed: bool,
    pub reason: String,
}

impl CheckPermissionResponse {
    pub fn allowed(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            reason: reason.into(),
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
        }
    }
}

/// Development-only request for a token pair.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TestTokenPairRequest {
    pub user_id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestTokenPairResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}
