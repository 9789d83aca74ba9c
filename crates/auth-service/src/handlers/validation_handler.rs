//! Validation endpoints consumed by other services.
//!
//! All three always answer 200 OK: a rejected token, a wrong TOTP code or a
//! denied permission is a normal response body, not an HTTP error.

use crate::models::{
    CheckPermissionRequest, CheckPermissionResponse, ValidateTokenRequest,
    ValidateTokenResponse, ValidateTotpRequest, ValidateTotpResponse,
};
use crate::routes::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::instrument;

/// Handle token validation
///
/// POST /api/v1/auth/validate-token
#[instrument(skip_all, name = "auth.validate_token")]
pub async fn handle_validate_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ValidateTokenRequest>,
) -> Json<ValidateTokenResponse> {
    Json(state.validation.validate_token(&payload))
}

/// Handle TOTP validation
///
/// POST /api/v1/auth/validate-totp
#[instrument(skip_all, name = "auth.validate_totp")]
pub async fn handle_validate_totp(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ValidateTotpRequest>,
) -> Json<ValidateTotpResponse> {
    Json(state.validation.validate_totp(&payload).await)
}

/// Handle permission check
///
/// POST /api/v1/auth/check-permission
#[instrument(skip_all, name = "auth.check_permission")]
pub async fn handle_check_permission(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CheckPermissionRequest>,
) -> Json<CheckPermissionResponse> {
    Json(state.validation.check_permission(&payload).await)
}
