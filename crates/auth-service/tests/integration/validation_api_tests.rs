//! End-to-end tests for the validation API over HTTP.
//!
//! Every validation endpoint answers 200 with the outcome in the body;
//! only malformed requests and the development endpoint use error statuses.

use auth_service::errors::AuthError;
use auth_service::models::{
    CheckPermissionResponse, TestTokenPairResponse, ValidateTokenResponse, ValidateTotpResponse,
};
use auth_service::services::policy::mock::MockPolicyEngine;
use auth_service::services::secret_store::mock::MockSecretStore;
use auth_service::services::totp::{TotpAuthenticator, TotpSettings};
use auth_service::services::validation_service::{
    PERMISSION_FAILED, PERMISSION_NOT_IMPLEMENTED, TOTP_FAILED, TOTP_INVALID_CODE,
    TOTP_NOT_ENROLLED, TOTP_NOT_IMPLEMENTED,
};
use auth_test_utils::*;
use reqwest::StatusCode;
use serde_json::json;
use std::sync::Arc;

async fn post<T: serde::de::DeserializeOwned>(
    server: &TestAuthServer,
    path: &str,
    body: serde_json::Value,
) -> Result<T, anyhow::Error> {
    let response = reqwest::Client::new()
        .post(format!("{}{}", server.url(), path))
        .json(&body)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK, "POST {path} should be 200");
    Ok(response.json().await?)
}

// ============================================================================
// validate-token
// ============================================================================

#[tokio::test]
async fn test_validate_token_accepts_issued_token() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = TestTokenBuilder::new()
        .for_user(TEST_USER_BOB)
        .with_profile(TEST_USERNAME_BOB, TEST_EMAIL_BOB)
        .with_roles(&[ROLE_USER, ROLE_TRADER])
        .sign(&test_signing_key());

    let response: ValidateTokenResponse = post(
        &server,
        "/api/v1/auth/validate-token",
        json!({ "access_token": token }),
    )
    .await?;

    assert!(response.valid);
    assert_eq!(response.user_id, TEST_USER_BOB);
    assert_eq!(response.username, TEST_USERNAME_BOB);
    assert_eq!(response.email, TEST_EMAIL_BOB);
    assert_eq!(response.roles, vec![ROLE_USER, ROLE_TRADER]);
    assert!(response.expires_at > chrono::Utc::now().timestamp());
    assert!(response.error_message.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_validate_token_rejections_are_data() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let key = test_signing_key();

    let cases = [
        (String::new(), "token is required"),
        ("a.b".to_string(), "token is malformed"),
        (
            TestTokenBuilder::new().sign(&other_signing_key()),
            "token signature is invalid",
        ),
        (
            TestTokenBuilder::new().expired_seconds_ago(30).sign(&key),
            "token has expired",
        ),
        (
            TestTokenBuilder::new().unsigned(),
            "token algorithm or type is not supported",
        ),
        (
            TestTokenBuilder::new().refresh().sign(&key),
            "token must be an access token",
        ),
    ];

    for (token, expected) in cases {
        let response: ValidateTokenResponse = post(
            &server,
            "/api/v1/auth/validate-token",
            json!({ "access_token": token }),
        )
        .await?;

        assert!(!response.valid);
        assert_eq!(response.error_message, expected);
        assert!(response.user_id.is_empty());
        assert!(response.roles.is_empty());
        assert_eq!(response.expires_at, 0);
    }

    Ok(())
}

#[tokio::test]
async fn test_validate_token_missing_field_is_empty_token() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let response: ValidateTokenResponse =
        post(&server, "/api/v1/auth/validate-token", json!({})).await?;

    assert!(!response.valid);
    assert_eq!(response.error_message, "token is required");

    Ok(())
}

#[tokio::test]
async fn test_malformed_json_is_client_error() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/auth/validate-token", server.url()))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;

    assert!(
        response.status().is_client_error(),
        "Expected 4xx, got {}",
        response.status()
    );

    Ok(())
}

// ============================================================================
// validate-totp
// ============================================================================

#[tokio::test]
async fn test_validate_totp_fails_closed_without_store() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let response: ValidateTotpResponse = post(
        &server,
        "/api/v1/auth/validate-totp",
        json!({ "user_id": TEST_USER_ALICE, "totp_code": "123456" }),
    )
    .await?;

    assert!(!response.valid);
    assert_eq!(response.error_message, TOTP_NOT_IMPLEMENTED);

    Ok(())
}

#[tokio::test]
async fn test_validate_totp_requires_fields() -> Result<(), anyhow::Error> {
    let store = Arc::new(MockSecretStore::empty());
    let server =
        TestAuthServer::spawn_with_collaborators(store.clone(), Arc::new(MockPolicyEngine::new()))
            .await?;

    let response: ValidateTotpResponse = post(
        &server,
        "/api/v1/auth/validate-totp",
        json!({ "user_id": "", "totp_code": "123456" }),
    )
    .await?;
    assert_eq!(response.error_message, "user_id is required");

    let response: ValidateTotpResponse = post(
        &server,
        "/api/v1/auth/validate-totp",
        json!({ "user_id": TEST_USER_ALICE, "totp_code": " " }),
    )
    .await?;
    assert_eq!(response.error_message, "totp_code is required");

    assert_eq!(store.call_count(), 0, "Input checks run before lookup");

    Ok(())
}

#[tokio::test]
async fn test_validate_totp_with_enrolled_user() -> Result<(), anyhow::Error> {
    let store = MockSecretStore::empty().with_secret(TEST_USER_ALICE, RFC6238_SECRET_BASE32);
    let server =
        TestAuthServer::spawn_with_collaborators(Arc::new(store), Arc::new(MockPolicyEngine::new()))
            .await?;
    let code = TotpAuthenticator::new(TotpSettings {
        issuer: "test".to_string(),
        window_size: 1,
    })
    .current_code(RFC6238_SECRET_BASE32)?;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let accepted: ValidateTotpResponse = post(
        &server,
        "/api/v1/auth/validate-totp",
        json!({ "user_id": TEST_USER_ALICE, "totp_code": code }),
    )
    .await?;
    assert!(accepted.valid);
    assert!(accepted.error_message.is_empty());

    let rejected: ValidateTotpResponse = post(
        &server,
        "/api/v1/auth/validate-totp",
        json!({ "user_id": TEST_USER_ALICE, "totp_code": wrong }),
    )
    .await?;
    assert!(!rejected.valid);
    assert_eq!(rejected.error_message, TOTP_INVALID_CODE);

    let not_enrolled: ValidateTotpResponse = post(
        &server,
        "/api/v1/auth/validate-totp",
        json!({ "user_id": TEST_USER_BOB, "totp_code": code }),
    )
    .await?;
    assert!(!not_enrolled.valid);
    assert_eq!(not_enrolled.error_message, TOTP_NOT_ENROLLED);

    Ok(())
}

#[tokio::test]
async fn test_validate_totp_store_failure_is_generic() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_with_collaborators(
        Arc::new(MockSecretStore::failing(AuthError::Internal)),
        Arc::new(MockPolicyEngine::new()),
    )
    .await?;

    let response: ValidateTotpResponse = post(
        &server,
        "/api/v1/auth/validate-totp",
        json!({ "user_id": TEST_USER_ALICE, "totp_code": "123456" }),
    )
    .await?;

    assert!(!response.valid);
    assert_eq!(response.error_message, TOTP_FAILED);

    Ok(())
}

// ============================================================================
// check-permission
// ============================================================================

#[tokio::test]
async fn test_check_permission_fails_closed_without_engine() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let response: CheckPermissionResponse = post(
        &server,
        "/api/v1/auth/check-permission",
        json!({ "user_id": TEST_USER_ALICE, "resource": RESOURCE_ORDERS, "action": ACTION_READ }),
    )
    .await?;

    assert!(!response.allowed);
    assert_eq!(response.reason, PERMISSION_NOT_IMPLEMENTED);

    Ok(())
}

#[tokio::test]
async fn test_check_permission_with_policy() -> Result<(), anyhow::Error> {
    let policy = MockPolicyEngine::new().grant(TEST_USER_ALICE, RESOURCE_ORDERS, ACTION_READ);
    let server =
        TestAuthServer::spawn_with_collaborators(Arc::new(MockSecretStore::empty()), Arc::new(policy))
            .await?;

    let allowed: CheckPermissionResponse = post(
        &server,
        "/api/v1/auth/check-permission",
        json!({ "user_id": TEST_USER_ALICE, "resource": RESOURCE_ORDERS, "action": ACTION_READ }),
    )
    .await?;
    assert!(allowed.allowed);

    let denied: CheckPermissionResponse = post(
        &server,
        "/api/v1/auth/check-permission",
        json!({ "user_id": TEST_USER_ALICE, "resource": RESOURCE_ORDERS, "action": ACTION_WRITE }),
    )
    .await?;
    assert!(!denied.allowed);
    assert_eq!(denied.reason, "permission denied");

    let missing: CheckPermissionResponse = post(
        &server,
        "/api/v1/auth/check-permission",
        json!({ "user_id": TEST_USER_ALICE, "action": ACTION_READ }),
    )
    .await?;
    assert!(!missing.allowed);
    assert_eq!(missing.reason, "resource is required");

    Ok(())
}

#[tokio::test]
async fn test_check_permission_engine_failure_is_generic() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_with_collaborators(
        Arc::new(MockSecretStore::empty()),
        Arc::new(MockPolicyEngine::failing(AuthError::Internal)),
    )
    .await?;

    let response: CheckPermissionResponse = post(
        &server,
        "/api/v1/auth/check-permission",
        json!({ "user_id": TEST_USER_ALICE, "resource": RESOURCE_ORDERS, "action": ACTION_READ }),
    )
    .await?;

    assert!(!response.allowed);
    assert_eq!(response.reason, PERMISSION_FAILED);

    Ok(())
}

// ============================================================================
// Development token endpoint
// ============================================================================

#[tokio::test]
async fn test_dev_token_pair_validates() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let pair: TestTokenPairResponse = post(
        &server,
        "/api/v1/auth/test/token-pair",
        json!({
            "user_id": TEST_USER_ALICE,
            "username": TEST_USERNAME_ALICE,
            "email": TEST_EMAIL_ALICE,
            "roles": [ROLE_TRADER],
        }),
    )
    .await?;

    assert_eq!(pair.tokens.token_type, "Bearer");
    assert_eq!(pair.tokens.expires_in, 3600);
    assert_eq!(pair.roles, vec![ROLE_TRADER]);
    pair.tokens
        .access_token
        .assert_valid_jwt()
        .assert_has_role(ROLE_TRADER)
        .assert_for_subject(TEST_USER_ALICE);

    let validated: ValidateTokenResponse = post(
        &server,
        "/api/v1/auth/validate-token",
        json!({ "access_token": pair.tokens.access_token }),
    )
    .await?;
    assert!(validated.valid);
    assert_eq!(validated.user_id, TEST_USER_ALICE);

    let refresh: ValidateTokenResponse = post(
        &server,
        "/api/v1/auth/validate-token",
        json!({ "access_token": pair.tokens.refresh_token }),
    )
    .await?;
    assert!(!refresh.valid);

    Ok(())
}

#[tokio::test]
async fn test_dev_token_pair_absent_when_disabled() -> Result<(), anyhow::Error> {
    let mut vars = test_config_vars();
    vars.insert("AUTH_ENABLE_TEST_ENDPOINTS".to_string(), "false".to_string());
    let config = auth_service::config::Config::from_vars(&vars)?;
    let server = TestAuthServer::spawn_with_config(config).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/auth/test/token-pair", server.url()))
        .json(&json!({ "user_id": "u", "username": "n", "email": "e" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_dev_token_pair_rejects_blank_identity() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/auth/test/token-pair", server.url()))
        .json(&json!({ "user_id": TEST_USER_ALICE, "username": "", "email": TEST_EMAIL_ALICE }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "EMPTY_INPUT");
    assert_eq!(body["error"]["message"], "username is required");

    Ok(())
}
