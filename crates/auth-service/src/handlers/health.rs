//! Liveness endpoint.

use tracing::instrument;

/// GET /health
///
/// The service holds no connections, so being able to answer is the whole check.
#[instrument(skip_all, name = "auth.health.check")]
pub async fn health_check() -> &'static str {
    "OK"
}
