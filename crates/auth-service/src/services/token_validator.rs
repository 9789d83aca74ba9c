use crate::crypto::{self, SigningKey};
use crate::models::{RejectionReason, ValidationResult};
use crate::observability::metrics;
use common::jwt::{TokenClaims, EXPIRING_SOON_THRESHOLD};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Verifies tokens signed with the process signing key.
///
/// Validation order:
/// 1. Empty or whitespace-only input is `EmptyToken`
/// 2. Codec checks (size, structure, algorithm, signature, claims)
/// 3. `now >= exp` is `Expired`
///
/// Signature is checked before expiry, so a forged token that is also
/// expired reports `SignatureInvalid`. Token type is NOT enforced by
/// [`TokenValidator::validate`]; use [`TokenValidator::validate_access_token`]
/// where only access tokens are acceptable.
#[derive(Debug)]
pub struct TokenValidator {
    key: Arc<SigningKey>,
}

impl TokenValidator {
    pub fn new(key: Arc<SigningKey>) -> Self {
        Self { key }
    }

    pub fn validate(&self, token: &str) -> ValidationResult {
        self.validate_at(token, chrono::Utc::now().timestamp())
    }

    /// Validate as if the current time were `now` (Unix seconds).
    #[instrument(skip_all)]
    pub fn validate_at(&self, token: &str, now: i64) -> ValidationResult {
        let start = Instant::now();
        let result = self.check(token, now);
        record(&result, start);
        result.into()
    }

    /// Validate and additionally require an access token.
    pub fn validate_access_token(&self, token: &str) -> ValidationResult {
        self.validate_access_token_at(token, chrono::Utc::now().timestamp())
    }

    #[instrument(skip_all)]
    pub fn validate_access_token_at(&self, token: &str, now: i64) -> ValidationResult {
        let start = Instant::now();
        let result = self.check(token, now).and_then(|claims| {
            if claims.is_access() {
                Ok(claims)
            } else {
                tracing::debug!(
                    target: "auth.service.token_validator",
                    token_type = %claims.token_type,
                    "Token rejected: access token required"
                );
                Err(RejectionReason::WrongTokenType)
            }
        });
        record(&result, start);
        result.into()
    }

    pub fn is_access_token(&self, token: &str) -> Result<bool, RejectionReason> {
        self.claims(token).map(|c| c.is_access())
    }

    pub fn is_refresh_token(&self, token: &str) -> Result<bool, RejectionReason> {
        self.claims(token).map(|c| c.is_refresh())
    }

    pub fn subject(&self, token: &str) -> Result<String, RejectionReason> {
        self.claims(token).map(|c| c.sub)
    }

    /// Username claim; `None` for refresh tokens.
    pub fn username(&self, token: &str) -> Result<Option<String>, RejectionReason> {
        self.claims(token).map(|c| c.username)
    }

    /// Email claim; `None` for refresh tokens.
    pub fn email(&self, token: &str) -> Result<Option<String>, RejectionReason> {
        self.claims(token).map(|c| c.email)
    }

    /// Roles claim; empty for refresh tokens.
    pub fn roles(&self, token: &str) -> Result<Vec<String>, RejectionReason> {
        self.claims(token).map(|c| c.roles.unwrap_or_default())
    }

    /// Expiry as Unix seconds.
    pub fn expiration(&self, token: &str) -> Result<i64, RejectionReason> {
        self.claims(token).map(|c| c.exp)
    }

    /// Whether less than five minutes of lifetime remain. Advisory only.
    pub fn is_expiring_soon(&self, token: &str) -> Result<bool, RejectionReason> {
        self.is_expiring_soon_at(token, chrono::Utc::now().timestamp())
    }

    pub fn is_expiring_soon_at(&self, token: &str, now: i64) -> Result<bool, RejectionReason> {
        self.validate_at(token, now)
            .into_result()
            .map(|c| c.expires_within(EXPIRING_SOON_THRESHOLD, now))
    }

    fn claims(&self, token: &str) -> Result<TokenClaims, RejectionReason> {
        self.validate(token).into_result()
    }

    fn check(&self, token: &str, now: i64) -> Result<TokenClaims, RejectionReason> {
        if token.trim().is_empty() {
            return Err(RejectionReason::EmptyToken);
        }

        let claims = crypto::decode_token(token, &self.key)?;

        if claims.is_expired_at(now) {
            tracing::debug!(
                target: "auth.service.token_validator",
                exp = claims.exp,
                now = now,
                "Token rejected: expired"
            );
            return Err(RejectionReason::Expired);
        }

        Ok(claims)
    }
}

fn record(result: &Result<TokenClaims, RejectionReason>, start: Instant) {
    match result {
        Ok(_) => metrics::record_token_validation("valid", None, start.elapsed()),
        Err(reason) => {
            metrics::record_token_validation("invalid", Some(reason.as_str()), start.elapsed());
        }
    }
}
