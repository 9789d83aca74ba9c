//! HTTP routes for the auth service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::crypto::SigningKey;
use crate::errors::AuthError;
use crate::handlers::{self, token_handler, validation_handler};
use crate::services::token_issuer::{TokenIssuer, TokenSettings};
use crate::services::token_validator::TokenValidator;
use crate::services::totp::{TotpAuthenticator, TotpSettings};
use crate::services::validation_service::ValidationService;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Token signer (used by the development endpoint).
    pub issuer: Arc<TokenIssuer>,

    /// Validation facade.
    pub validation: ValidationService,
}

impl AppState {
    /// Build the signing key and services from configuration, with the
    /// fail-closed TOTP secret store and policy engine.
    pub fn from_config(config: Config) -> Result<Self, AuthError> {
        let key = Arc::new(SigningKey::new(config.jwt_secret_bytes())?);

        let issuer = Arc::new(TokenIssuer::new(
            Arc::clone(&key),
            TokenSettings::from_config(&config),
        ));
        let validator = Arc::new(TokenValidator::new(key));
        let totp = Arc::new(TotpAuthenticator::new(TotpSettings::from_config(&config)));

        Ok(Self {
            config,
            issuer,
            validation: ValidationService::new(validator, totp),
        })
    }
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/api/v1/auth/validate-token`, `/validate-totp`, `/check-permission`
/// - `/api/v1/auth/test/token-pair` when test endpoints are enabled
/// - `/health` - Liveness check
/// - `/metrics` - Prometheus metrics endpoint
/// - TraceLayer for request logging
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let mut api_routes = Router::new()
        .route(
            "/api/v1/auth/validate-token",
            post(validation_handler::handle_validate_token),
        )
        .route(
            "/api/v1/auth/validate-totp",
            post(validation_handler::handle_validate_totp),
        )
        .route(
            "/api/v1/auth/check-permission",
            post(validation_handler::handle_check_permission),
        );

    if state.config.enable_test_endpoints {
        tracing::warn!("Development token endpoint enabled: /api/v1/auth/test/token-pair");
        api_routes = api_routes.route(
            "/api/v1/auth/test/token-pair",
            post(token_handler::handle_test_token_pair),
        );
    }

    let api_routes = api_routes
        .route("/health", get(handlers::health_check))
        .with_state(state);

    // Metrics route has its own state (PrometheusHandle)
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    api_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}
