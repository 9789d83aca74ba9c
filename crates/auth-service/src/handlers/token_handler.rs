//! Development-only token issuance.
//!
//! Mounted only when `AUTH_ENABLE_TEST_ENDPOINTS=true`. There is no
//! credential check here: whoever can reach it gets a token for any identity.

use crate::errors::AuthError;
use crate::models::{TestTokenPairRequest, TestTokenPairResponse};
use crate::observability::hash_for_correlation;
use crate::routes::AppState;
use axum::{extract::State, Json};
use common::types::Principal;
use std::sync::Arc;
use tracing::instrument;

/// Default role when the request names none.
const DEFAULT_ROLE: &str = "USER";

/// Issue a token pair for an arbitrary identity
///
/// POST /api/v1/auth/test/token-pair
#[instrument(skip_all, name = "auth.test.token_pair")]
pub async fn handle_test_token_pair(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TestTokenPairRequest>,
) -> Result<Json<TestTokenPairResponse>, AuthError> {
    for (field, value) in [
        ("user_id", &payload.user_id),
        ("username", &payload.username),
        ("email", &payload.email),
    ] {
        if value.trim().is_empty() {
            return Err(AuthError::EmptyInput(field.to_string()));
        }
    }

    let roles = payload
        .roles
        .filter(|roles| !roles.is_empty())
        .unwrap_or_else(|| vec![DEFAULT_ROLE.to_string()]);

    let principal = Principal::new(&payload.user_id, &payload.username, &payload.email)
        .with_roles(roles.iter().cloned());

    let tokens = state.issuer.issue_token_pair(&principal, &roles)?;

    tracing::warn!(
        target: "auth.handler.test",
        user = %hash_for_correlation(&principal.user_id),
        "Issued token pair from development endpoint"
    );

    Ok(Json(TestTokenPairResponse {
        tokens,
        user_id: principal.user_id,
        username: principal.username,
        email: principal.email,
        roles,
    }))
}
