use crate::config::Config;
use crate::crypto::{self, SigningKey};
use crate::errors::AuthError;
use crate::models::TokenPair;
use crate::observability::{hash_for_correlation, metrics};
use common::jwt::{TokenClaims, TokenType, BEARER_TOKEN_TYPE};
use common::types::{Principal, TokenId};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Lifetimes and issuer stamped into every token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSettings {
    pub issuer: String,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
}

impl TokenSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            issuer: config.token_issuer.clone(),
            access_token_ttl_seconds: config.access_token_ttl_seconds,
            refresh_token_ttl_seconds: config.refresh_token_ttl_seconds,
        }
    }
}

/// Signs access and refresh tokens. Stateless: nothing is persisted.
#[derive(Debug)]
pub struct TokenIssuer {
    key: Arc<SigningKey>,
    settings: TokenSettings,
}

impl TokenIssuer {
    pub fn new(key: Arc<SigningKey>, settings: TokenSettings) -> Self {
        Self { key, settings }
    }

    pub fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    /// Issue an access token for `principal`.
    ///
    /// `roles` becomes the token's `roles` claim; `principal.roles` is not
    /// consulted.
    pub fn issue_access_token(
        &self,
        principal: &Principal,
        roles: &[String],
    ) -> Result<String, AuthError> {
        self.issue_access_token_at(principal, roles, chrono::Utc::now().timestamp())
    }

    /// Issue an access token as if the current time were `now`.
    #[instrument(skip_all, fields(user = %hash_for_correlation(&principal.user_id)))]
    pub fn issue_access_token_at(
        &self,
        principal: &Principal,
        roles: &[String],
        now: i64,
    ) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: principal.user_id.clone(),
            iss: self.settings.issuer.clone(),
            iat: now,
            exp: now.saturating_add(self.settings.access_token_ttl_seconds),
            token_type: TokenType::Access,
            jti: Some(TokenId::new().to_string()),
            username: Some(principal.username.clone()),
            email: Some(principal.email.clone()),
            roles: Some(roles.to_vec()),
        };

        self.sign(&claims)
    }

    /// Issue a refresh token carrying only the subject.
    pub fn issue_refresh_token(&self, user_id: &str) -> Result<String, AuthError> {
        self.issue_refresh_token_at(user_id, chrono::Utc::now().timestamp())
    }

    /// Issue a refresh token as if the current time were `now`.
    #[instrument(skip_all, fields(user = %hash_for_correlation(user_id)))]
    pub fn issue_refresh_token_at(&self, user_id: &str, now: i64) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iss: self.settings.issuer.clone(),
            iat: now,
            exp: now.saturating_add(self.settings.refresh_token_ttl_seconds),
            token_type: TokenType::Refresh,
            jti: Some(TokenId::new().to_string()),
            username: None,
            email: None,
            roles: None,
        };

        self.sign(&claims)
    }

    /// Issue an access and a refresh token for the same principal.
    pub fn issue_token_pair(
        &self,
        principal: &Principal,
        roles: &[String],
    ) -> Result<TokenPair, AuthError> {
        self.issue_token_pair_at(principal, roles, chrono::Utc::now().timestamp())
    }

    pub fn issue_token_pair_at(
        &self,
        principal: &Principal,
        roles: &[String],
        now: i64,
    ) -> Result<TokenPair, AuthError> {
        let access_token = self.issue_access_token_at(principal, roles, now)?;
        let refresh_token = self.issue_refresh_token_at(&principal.user_id, now)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: BEARER_TOKEN_TYPE.to_string(),
            expires_in: self.settings.access_token_ttl_seconds,
        })
    }

    /// Refuses claims with `exp <= iat`; such a token could never validate.
    fn sign(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        let start = Instant::now();
        let result = if claims.exp <= claims.iat {
            Err(AuthError::Crypto(format!(
                "Token lifetime must be positive: iat={}, exp={}",
                claims.iat, claims.exp
            )))
        } else {
            crypto::encode_token(claims, &self.key)
        };

        let status = if result.is_ok() { "success" } else { "error" };
        metrics::record_token_issuance(claims.token_type.as_str(), status, start.elapsed());

        match &result {
            Ok(_) => tracing::debug!(
                target: "auth.service.token_issuer",
                token_type = %claims.token_type,
                exp = claims.exp,
                "Token issued"
            ),
            Err(e) => tracing::error!(
                target: "auth.service.token_issuer",
                token_type = %claims.token_type,
                error = %e,
                "Token signing failed"
            ),
        }

        result
    }
}
