//! Time-based one-time passwords (RFC 6238).
//!
//! 30-second steps, 6-digit codes, HMAC-SHA1. These are the parameters every
//! mainstream authenticator app assumes when it scans an `otpauth://` URL
//! without explicit `algorithm`/`digits`/`period` parameters.
//!
//! Verification fails closed: anything that goes wrong while checking a code
//! yields `false`. Secrets and submitted codes never reach logs.

use crate::config::{Config, MAX_TOTP_WINDOW_SIZE};
use crate::crypto;
use crate::errors::AuthError;
use base32::Alphabet;
use common::secret::SecretString;
use ring::hmac;
use ring::rand::SystemRandom;
use tracing::instrument;

/// Seconds per TOTP step.
pub const TIME_STEP_SECONDS: u64 = 30;

/// Digits in a code.
pub const CODE_DIGITS: usize = 6;

/// Generated secret length (160 bits, RFC 4226 recommendation).
pub const SECRET_BYTES: usize = 20;

/// Shortest decoded secret accepted for verification (80 bits).
pub const MIN_SECRET_BYTES: usize = 10;

const CODE_MODULUS: u32 = 1_000_000;

const BASE32: Alphabet = Alphabet::RFC4648 { padding: false };

const QR_CHART_URL: &str = "https://chart.googleapis.com/chart?chs=200x200&chld=M%7C0&cht=qr&chl=";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotpSettings {
    /// Issuer label shown by authenticator apps.
    pub issuer: String,
    /// Steps accepted either side of the current one.
    pub window_size: u8,
}

impl TotpSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            issuer: config.totp_issuer.clone(),
            window_size: config.totp_window_size,
        }
    }
}

#[derive(Debug)]
pub struct TotpAuthenticator {
    settings: TotpSettings,
}

impl TotpAuthenticator {
    /// Window sizes above the maximum are clamped.
    pub fn new(mut settings: TotpSettings) -> Self {
        settings.window_size = settings.window_size.min(MAX_TOTP_WINDOW_SIZE);
        Self { settings }
    }

    pub fn settings(&self) -> &TotpSettings {
        &self.settings
    }

    /// Generate a new 160-bit secret, Base32 encoded without padding.
    #[instrument(skip_all)]
    pub fn generate_secret(&self) -> Result<SecretString, AuthError> {
        let bytes = crypto::generate_random_bytes(SECRET_BYTES)?;
        Ok(SecretString::from(base32::encode(BASE32, &bytes)))
    }

    pub fn verify_code(&self, secret: &str, code: &str) -> bool {
        self.verify_code_at(secret, code, chrono::Utc::now().timestamp())
    }

    /// Check `code` against the steps around `unix_secs`.
    #[instrument(skip_all)]
    pub fn verify_code_at(&self, secret: &str, code: &str, unix_secs: i64) -> bool {
        if secret.is_empty() {
            return false;
        }

        if code.len() != CODE_DIGITS || !code.bytes().all(|b| b.is_ascii_digit()) {
            tracing::debug!(target: "auth.totp", "Code rejected: not a 6-digit number");
            return false;
        }

        let key = match decode_secret(secret) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(target: "auth.totp", error = %e, "TOTP verification failed");
                return false;
            }
        };

        let Some(current) = time_step(unix_secs) else {
            tracing::warn!(target: "auth.totp", "TOTP verification failed: time before epoch");
            return false;
        };

        let comparison_key = match hmac::Key::generate(hmac::HMAC_SHA256, &SystemRandom::new()) {
            Ok(key) => key,
            Err(_) => {
                tracing::warn!(target: "auth.totp", "TOTP verification failed: no comparison key");
                return false;
            }
        };

        let window = i64::from(self.settings.window_size);
        let mut matched = false;

        // Every step in the window is checked, match or not
        for offset in -window..=window {
            let Some(step) = current.checked_add_signed(offset) else {
                continue;
            };
            if codes_match(&comparison_key, &hotp(&key, step), code) {
                matched = true;
            }
        }

        matched
    }

    /// Code for the current step. Diagnostics only.
    pub fn current_code(&self, secret: &str) -> Result<String, AuthError> {
        self.current_code_at(secret, chrono::Utc::now().timestamp())
    }

    #[instrument(skip_all)]
    pub fn current_code_at(&self, secret: &str, unix_secs: i64) -> Result<String, AuthError> {
        let key = decode_secret(secret)?;
        let step = time_step(unix_secs)
            .ok_or_else(|| AuthError::Crypto("TOTP time is before the Unix epoch".to_string()))?;
        Ok(hotp(&key, step))
    }

    /// `otpauth://` URL for enrolling an authenticator app.
    pub fn provisioning_url(&self, username: &str, secret: &str) -> String {
        let issuer = urlencoding::encode(&self.settings.issuer);
        format!(
            "otpauth://totp/{}:{}?secret={}&issuer={}",
            issuer,
            urlencoding::encode(username),
            secret,
            issuer
        )
    }

    /// Image URL rendering the provisioning URL as a QR code.
    pub fn qr_code_image_url(&self, username: &str, secret: &str) -> String {
        let url = self.provisioning_url(username, secret);
        format!("{}{}", QR_CHART_URL, urlencoding::encode(&url))
    }

    /// Whether `secret` decodes to a usable key.
    pub fn is_valid_secret_format(&self, secret: &str) -> bool {
        self.current_code(secret).is_ok()
    }
}

/// Decode a Base32 secret, tolerating spaces, padding and lowercase.
fn decode_secret(secret: &str) -> Result<Vec<u8>, AuthError> {
    let normalized: String = secret
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if normalized.is_empty() {
        return Err(AuthError::Crypto("TOTP secret is empty".to_string()));
    }

    let key = base32::decode(BASE32, &normalized)
        .ok_or_else(|| AuthError::Crypto("TOTP secret is not valid Base32".to_string()))?;

    if key.len() < MIN_SECRET_BYTES {
        return Err(AuthError::Crypto(format!(
            "TOTP secret too short: expected at least {} bytes, got {}",
            MIN_SECRET_BYTES,
            key.len()
        )));
    }

    Ok(key)
}

/// Constant-time equality, via an HMAC tag under a throwaway key.
fn codes_match(comparison_key: &hmac::Key, expected: &str, submitted: &str) -> bool {
    let tag = hmac::sign(comparison_key, expected.as_bytes());
    hmac::verify(comparison_key, submitted.as_bytes(), tag.as_ref()).is_ok()
}

fn time_step(unix_secs: i64) -> Option<u64> {
    u64::try_from(unix_secs).ok().map(|secs| secs / TIME_STEP_SECONDS)
}

/// RFC 4226 HOTP value for `counter`, zero-padded to six digits.
fn hotp(key: &[u8], counter: u64) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, key);
    let tag = hmac::sign(&key, &counter.to_be_bytes());
    let digest = tag.as_ref();

    // Dynamic truncation (RFC 4226 Section 5.3)
    let offset = digest.last().map_or(0, |b| usize::from(b & 0x0f));
    let binary = digest
        .get(offset..offset + 4)
        .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok())
        .map_or(0, |bytes| u32::from_be_bytes(bytes) & 0x7fff_ffff);

    format!("{:0width$}", binary % CODE_MODULUS, width = CODE_DIGITS)
}
