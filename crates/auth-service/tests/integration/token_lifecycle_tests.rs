//! Issue-then-validate flows across the issuer and validator.

use auth_service::models::{RejectionReason, ValidationResult};
use auth_service::services::token_issuer::{TokenIssuer, TokenSettings};
use auth_service::services::token_validator::TokenValidator;
use auth_test_utils::*;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use common::types::Principal;

const NOW: i64 = 1_700_000_000;

fn issuer() -> TokenIssuer {
    TokenIssuer::new(
        test_signing_key(),
        TokenSettings {
            issuer: TEST_ISSUER.to_string(),
            access_token_ttl_seconds: 3600,
            refresh_token_ttl_seconds: 604_800,
        },
    )
}

fn validator() -> TokenValidator {
    TokenValidator::new(test_signing_key())
}

fn roles(names: &[&str]) -> Vec<String> {
    names.iter().map(|r| r.to_string()).collect()
}

#[test]
fn test_round_trip_for_several_principals() {
    let cases = [
        (
            Principal::new(TEST_USER_ALICE, TEST_USERNAME_ALICE, TEST_EMAIL_ALICE),
            roles(&[ROLE_USER]),
        ),
        (
            Principal::new(TEST_USER_BOB, TEST_USERNAME_BOB, TEST_EMAIL_BOB),
            roles(&[ROLE_USER, ROLE_TRADER]),
        ),
        (
            Principal::new(TEST_USER_CHARLIE, "charlie", "charlie@example.com"),
            roles(&[]),
        ),
    ];

    for (principal, granted) in cases {
        let pair = issuer().issue_token_pair(&principal, &granted).unwrap();

        let claims = validator()
            .validate_access_token(&pair.access_token)
            .into_result()
            .unwrap();
        assert_eq!(claims.sub, principal.user_id);
        assert_eq!(claims.iss, TEST_ISSUER);
        assert_eq!(claims.username.as_deref(), Some(principal.username.as_str()));
        assert_eq!(claims.email.as_deref(), Some(principal.email.as_str()));
        assert_eq!(claims.roles(), granted.as_slice());

        pair.access_token
            .assert_valid_jwt()
            .assert_for_subject(&principal.user_id)
            .assert_token_type("access")
            .assert_expires_in(3600);
        pair.refresh_token
            .assert_valid_jwt()
            .assert_for_subject(&principal.user_id)
            .assert_token_type("refresh")
            .assert_expires_in(604_800);
    }
}

#[test]
fn test_access_token_lifetime_boundaries() {
    let principal = Principal::new("u1", "alice", "alice@example.com");
    let token = issuer()
        .issue_access_token_at(&principal, &roles(&["USER"]), NOW)
        .unwrap();
    let validator = validator();

    let claims = validator.validate_at(&token, NOW + 1).into_result().unwrap();
    assert_eq!(claims.exp, NOW + 3600);
    assert_eq!(claims.roles(), ["USER".to_string()]);

    assert_eq!(
        validator.validate_at(&token, NOW + 3601),
        ValidationResult::Invalid(RejectionReason::Expired)
    );
}

#[test]
fn test_tampered_payload_is_rejected() {
    let token = issuer()
        .issue_access_token(
            &Principal::new(TEST_USER_ALICE, TEST_USERNAME_ALICE, TEST_EMAIL_ALICE),
            &roles(&[ROLE_USER]),
        )
        .unwrap();

    // Escalate roles while keeping the original signature
    let mut claims = peek_claims(&token);
    claims["roles"] = serde_json::json!([ROLE_ADMIN]);
    let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
    let (header, rest) = token.split_once('.').unwrap();
    let (_, signature) = rest.split_once('.').unwrap();
    let forged = format!("{header}.{forged_payload}.{signature}");

    assert_eq!(
        validator().validate(&forged),
        ValidationResult::Invalid(RejectionReason::SignatureInvalid)
    );
}

#[test]
fn test_token_from_other_key_is_rejected() {
    let token = TestTokenBuilder::new().sign(&other_signing_key());

    assert_eq!(
        validator().validate(&token),
        ValidationResult::Invalid(RejectionReason::SignatureInvalid)
    );
}

#[test]
fn test_refresh_token_is_not_an_access_token() {
    let refresh = issuer().issue_refresh_token(TEST_USER_ALICE).unwrap();
    let validator = validator();

    assert!(validator.validate(&refresh).is_valid());
    assert_eq!(validator.is_refresh_token(&refresh), Ok(true));
    assert_eq!(
        validator.validate_access_token(&refresh),
        ValidationResult::Invalid(RejectionReason::WrongTokenType)
    );
}

#[test]
fn test_builder_tokens_follow_validator_rules() {
    let validator = validator();
    let key = test_signing_key();

    let expired = TestTokenBuilder::new().expired_seconds_ago(5).sign(&key);
    assert_eq!(
        validator.validate(&expired),
        ValidationResult::Invalid(RejectionReason::Expired)
    );

    let unsigned = TestTokenBuilder::new().unsigned();
    assert_eq!(
        validator.validate(&unsigned),
        ValidationResult::Invalid(RejectionReason::Unsupported)
    );

    let soon = TestTokenBuilder::new().expires_in(120).sign(&key);
    assert_eq!(validator.is_expiring_soon(&soon), Ok(true));
}
