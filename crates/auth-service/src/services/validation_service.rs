//! Request/response facade over the token validator, TOTP authenticator and
//! authorization collaborators.
//!
//! Every request maps to exactly one response. Verification failures are
//! data (`valid=false` / `allowed=false` plus a client-safe message), never
//! faults; unexpected errors are logged and replaced with generic text.

use crate::errors::AuthError;
use crate::models::{
    CheckPermissionRequest, CheckPermissionResponse, ValidateTokenRequest,
    ValidateTokenResponse, ValidateTotpRequest, ValidateTotpResponse, ValidationResult,
};
use crate::observability::{hash_for_correlation, metrics};
use crate::services::policy::{DenyAllPolicyEngine, PolicyEngine};
use crate::services::secret_store::{SecretStore, UnconfiguredSecretStore};
use crate::services::token_validator::TokenValidator;
use crate::services::totp::TotpAuthenticator;
use common::secret::ExposeSecret;
use std::sync::Arc;
use tracing::instrument;

pub const TOTP_NOT_IMPLEMENTED: &str = "TOTP verification is not implemented";
pub const TOTP_NOT_ENROLLED: &str = "two-factor authentication is not enabled for this user";
pub const TOTP_INVALID_CODE: &str = "invalid TOTP code";
pub const TOTP_FAILED: &str = "TOTP verification failed";
pub const PERMISSION_NOT_IMPLEMENTED: &str = "permission checks are not implemented";
pub const PERMISSION_FAILED: &str = "permission check failed";

#[derive(Clone)]
pub struct ValidationService {
    validator: Arc<TokenValidator>,
    totp: Arc<TotpAuthenticator>,
    secrets: Arc<dyn SecretStore>,
    policy: Arc<dyn PolicyEngine>,
}

impl ValidationService {
    /// Build a facade with the fail-closed collaborators.
    pub fn new(validator: Arc<TokenValidator>, totp: Arc<TotpAuthenticator>) -> Self {
        Self {
            validator,
            totp,
            secrets: Arc::new(UnconfiguredSecretStore),
            policy: Arc::new(DenyAllPolicyEngine),
        }
    }

    #[must_use]
    pub fn with_secret_store(mut self, secrets: Arc<dyn SecretStore>) -> Self {
        self.secrets = secrets;
        self
    }

    #[must_use]
    pub fn with_policy_engine(mut self, policy: Arc<dyn PolicyEngine>) -> Self {
        self.policy = policy;
        self
    }

    /// Validate a bearer access token.
    #[instrument(skip_all)]
    pub fn validate_token(&self, request: &ValidateTokenRequest) -> ValidateTokenResponse {
        match self.validator.validate_access_token(&request.access_token) {
            ValidationResult::Valid(claims) => ValidateTokenResponse::valid(claims),
            ValidationResult::Invalid(reason) => {
                tracing::debug!(
                    target: "auth.service.validation",
                    reason = %reason,
                    "Token validation rejected"
                );
                ValidateTokenResponse::invalid(reason)
            }
        }
    }

    /// Verify a user's TOTP code.
    #[instrument(skip_all)]
    pub async fn validate_totp(&self, request: &ValidateTotpRequest) -> ValidateTotpResponse {
        if request.user_id.trim().is_empty() {
            metrics::record_totp_verification("rejected_input");
            return ValidateTotpResponse::invalid("user_id is required");
        }
        if request.totp_code.trim().is_empty() {
            metrics::record_totp_verification("rejected_input");
            return ValidateTotpResponse::invalid("totp_code is required");
        }

        let user = hash_for_correlation(&request.user_id);

        match self.secrets.totp_secret(&request.user_id).await {
            Ok(Some(secret)) => {
                if self.totp.verify_code(secret.expose_secret(), &request.totp_code) {
                    metrics::record_totp_verification("valid");
                    tracing::debug!(target: "auth.service.validation", user = %user, "TOTP code accepted");
                    ValidateTotpResponse::valid()
                } else {
                    metrics::record_totp_verification("invalid");
                    let err = AuthError::SecondFactorInvalid;
                    tracing::debug!(target: "auth.service.validation", user = %user, error = %err, "TOTP code rejected");
                    ValidateTotpResponse::invalid(TOTP_INVALID_CODE)
                }
            }
            Ok(None) => {
                metrics::record_totp_verification("not_enrolled");
                tracing::debug!(target: "auth.service.validation", user = %user, "TOTP not enrolled");
                ValidateTotpResponse::invalid(TOTP_NOT_ENROLLED)
            }
            Err(AuthError::NotImplemented(_)) => {
                metrics::record_totp_verification("not_implemented");
                ValidateTotpResponse::invalid(TOTP_NOT_IMPLEMENTED)
            }
            Err(e) => {
                metrics::record_totp_verification("error");
                tracing::error!(
                    target: "auth.service.validation",
                    user = %user,
                    error = %e,
                    "TOTP secret lookup failed"
                );
                ValidateTotpResponse::invalid(TOTP_FAILED)
            }
        }
    }

    /// Decide whether a user may perform an action on a resource.
    #[instrument(skip_all)]
    pub async fn check_permission(
        &self,
        request: &CheckPermissionRequest,
    ) -> CheckPermissionResponse {
        for (field, value) in [
            ("user_id", &request.user_id),
            ("resource", &request.resource),
            ("action", &request.action),
        ] {
            if value.trim().is_empty() {
                metrics::record_permission_check("rejected_input");
                return CheckPermissionResponse::denied(format!("{field} is required"));
            }
        }

        match self
            .policy
            .check(&request.user_id, &request.resource, &request.action)
            .await
        {
            Ok(true) => {
                metrics::record_permission_check("allowed");
                CheckPermissionResponse::allowed("permission granted")
            }
            Ok(false) => {
                metrics::record_permission_check("denied");
                CheckPermissionResponse::denied("permission denied")
            }
            Err(AuthError::NotImplemented(_)) => {
                metrics::record_permission_check("not_implemented");
                CheckPermissionResponse::denied(PERMISSION_NOT_IMPLEMENTED)
            }
            Err(e) => {
                metrics::record_permission_check("error");
                tracing::error!(
                    target: "auth.service.validation",
                    user = %hash_for_correlation(&request.user_id),
                    error = %e,
                    "Permission check failed"
                );
                CheckPermissionResponse::denied(PERMISSION_FAILED)
            }
        }
    }
}
