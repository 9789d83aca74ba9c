//! Metrics definitions for the auth service
//!
//! All metrics follow Prometheus naming conventions:
//! - `auth_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `token_type`: 2 values (access, refresh)
//! - `status`: 2 values (success, error) or (valid, invalid)
//! - `reason`: bounded by `RejectionReason` (6 values) plus `none`
//! - `outcome`: bounded by code (see each recorder)

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded. Token operations are
/// pure CPU work, so buckets are sub-millisecond to a few milliseconds.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    build_recorder()?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

/// Same bucket layout as [`init_metrics_recorder`], without installing it globally.
pub fn build_recorder() -> Result<PrometheusBuilder, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("auth_token_issuance".to_string()),
            &[
                0.0001, 0.0005, 0.001, 0.002, 0.005, 0.010, 0.025, 0.050, 0.100,
            ],
        )
        .map_err(|e| format!("Failed to set token issuance buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("auth_token_validation".to_string()),
            &[
                0.0001, 0.0005, 0.001, 0.002, 0.005, 0.010, 0.025, 0.050, 0.100,
            ],
        )
        .map_err(|e| format!("Failed to set token validation buckets: {e}"))
}

// ============================================================================
// Token Metrics
// ============================================================================

/// Record token issuance duration and outcome
///
/// Metric: `auth_token_issuance_duration_seconds`, `auth_token_issuance_total`
/// Labels: `token_type`, `status`
pub fn record_token_issuance(token_type: &str, status: &str, duration: Duration) {
    histogram!("auth_token_issuance_duration_seconds", "token_type" => token_type.to_string(), "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("auth_token_issuance_total", "token_type" => token_type.to_string(), "status" => status.to_string())
        .increment(1);
}

/// Record token validation result
///
/// Metric: `auth_token_validation_duration_seconds`, `auth_token_validations_total`
/// Labels: `status`, `reason`
pub fn record_token_validation(status: &str, reason: Option<&str>, duration: Duration) {
    let reason = reason.unwrap_or("none");

    histogram!("auth_token_validation_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("auth_token_validations_total", "status" => status.to_string(), "reason" => reason.to_string())
        .increment(1);
}

// ============================================================================
// Second Factor Metrics
// ============================================================================

/// Record a TOTP verification outcome
///
/// Metric: `auth_totp_verifications_total`
/// Labels: `outcome` (valid, invalid, not_enrolled, not_implemented, error, rejected_input)
pub fn record_totp_verification(outcome: &str) {
    counter!("auth_totp_verifications_total", "outcome" => outcome.to_string()).increment(1);
}

// ============================================================================
// Authorization Metrics
// ============================================================================

/// Record a permission check outcome
///
/// Metric: `auth_permission_checks_total`
/// Labels: `outcome` (allowed, denied, not_implemented, error, rejected_input)
pub fn record_permission_check(outcome: &str) {
    counter!("auth_permission_checks_total", "outcome" => outcome.to_string()).increment(1);
}
