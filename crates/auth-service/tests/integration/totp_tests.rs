//! TOTP verification against the published RFC 6238 vectors.

use auth_service::services::totp::{TotpAuthenticator, TotpSettings};
use auth_test_utils::*;

fn authenticator(window_size: u8) -> TotpAuthenticator {
    TotpAuthenticator::new(TotpSettings {
        issuer: "Trading Platform".to_string(),
        window_size,
    })
}

#[test]
fn test_rfc6238_vectors() {
    let totp = authenticator(0);

    for (unix_secs, code) in RFC6238_SHA1_VECTORS {
        assert_eq!(
            totp.current_code_at(RFC6238_SECRET_BASE32, unix_secs).unwrap(),
            code,
            "code at t={unix_secs}"
        );
        assert!(totp.verify_code_at(RFC6238_SECRET_BASE32, code, unix_secs));
    }
}

#[test]
fn test_window_accepts_adjacent_steps_only() {
    let totp = authenticator(1);
    let now = 1_700_000_010;
    let code_at = |t: i64| totp.current_code_at(RFC6238_SECRET_BASE32, t).unwrap();

    assert!(totp.verify_code_at(RFC6238_SECRET_BASE32, &code_at(now - 30), now));
    assert!(totp.verify_code_at(RFC6238_SECRET_BASE32, &code_at(now + 30), now));
    assert!(!totp.verify_code_at(RFC6238_SECRET_BASE32, &code_at(now - 60), now));
    assert!(!totp.verify_code_at(RFC6238_SECRET_BASE32, &code_at(now + 60), now));
}

#[test]
fn test_generated_secret_round_trip() {
    use common::secret::ExposeSecret;

    let totp = authenticator(1);
    let secret = totp.generate_secret().unwrap();
    let code = totp.current_code(secret.expose_secret()).unwrap();

    assert!(totp.is_valid_secret_format(secret.expose_secret()));
    assert!(totp.verify_code(secret.expose_secret(), &code));
}

#[test]
fn test_bad_inputs_fail_closed() {
    let totp = authenticator(1);

    assert!(!totp.verify_code("", "123456"));
    assert!(!totp.verify_code("not base32!", "123456"));
    assert!(!totp.verify_code(RFC6238_SECRET_BASE32, ""));
    assert!(!totp.verify_code(RFC6238_SECRET_BASE32, "12345"));
    assert!(!totp.verify_code(RFC6238_SECRET_BASE32, "abcdef"));
}

#[test]
fn test_provisioning_url_names_issuer_and_account() {
    let url = authenticator(1).provisioning_url(TEST_USERNAME_ALICE, RFC6238_SECRET_BASE32);

    assert!(url.starts_with("otpauth://totp/"));
    assert!(url.contains("alice"));
    assert!(url.contains(&format!("secret={RFC6238_SECRET_BASE32}")));
    assert!(url.contains("issuer=Trading%20Platform"));
}
