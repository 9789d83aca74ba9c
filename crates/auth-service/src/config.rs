use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Minimum signing secret length in bytes (256 bits for HS256).
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Default access token lifetime (1 hour).
pub const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 3600;

/// Default refresh token lifetime (7 days).
pub const DEFAULT_REFRESH_TOKEN_TTL_SECONDS: i64 = 604_800;

/// Default `iss` claim.
pub const DEFAULT_TOKEN_ISSUER: &str = "auth-service";

/// Default TOTP verification window, in 30-second steps either side of now.
pub const DEFAULT_TOTP_WINDOW_SIZE: u8 = 1;

/// Largest accepted TOTP window.
pub const MAX_TOTP_WINDOW_SIZE: u8 = 10;

/// Default issuer shown by authenticator apps.
pub const DEFAULT_TOTP_ISSUER: &str = "Auth Service";

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8013";

/// Auth service configuration loaded from environment variables.
///
/// Debug is manually implemented to redact the signing secret.
#[derive(Clone)]
pub struct Config {
    /// HMAC-SHA256 signing secret (UTF-8 bytes of `AUTH_JWT_SECRET`).
    pub jwt_secret: SecretString,

    /// Access token lifetime in seconds.
    pub access_token_ttl_seconds: i64,

    /// Refresh token lifetime in seconds.
    pub refresh_token_ttl_seconds: i64,

    /// Value stamped into every token's `iss` claim.
    pub token_issuer: String,

    /// TOTP steps accepted before and after the current one.
    pub totp_window_size: u8,

    /// Issuer label in provisioning URLs.
    pub totp_issuer: String,

    /// HTTP bind address.
    pub bind_address: String,

    /// Mount the development-only token pair endpoint.
    pub enable_test_endpoints: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("refresh_token_ttl_seconds", &self.refresh_token_ttl_seconds)
            .field("token_issuer", &self.token_issuer)
            .field("totp_window_size", &self.totp_window_size)
            .field("totp_issuer", &self.totp_issuer)
            .field("bind_address", &self.bind_address)
            .field("enable_test_endpoints", &self.enable_test_endpoints)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWT secret: {0}")]
    InvalidJwtSecret(String),

    #[error("Invalid token TTL for {name}: {reason}")]
    InvalidTtl { name: String, reason: String },

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let jwt_secret = vars
            .get("AUTH_JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_JWT_SECRET".to_string()))?;

        // Never echo the secret, only its length
        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::InvalidJwtSecret(format!(
                "Expected at least {} bytes, got {}",
                MIN_JWT_SECRET_BYTES,
                jwt_secret.len()
            )));
        }
        let jwt_secret = SecretString::from(jwt_secret.clone());

        let access_token_ttl_seconds = parse_ttl(
            vars,
            "AUTH_ACCESS_TOKEN_TTL_SECONDS",
            DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
        )?;

        let refresh_token_ttl_seconds = parse_ttl(
            vars,
            "AUTH_REFRESH_TOKEN_TTL_SECONDS",
            DEFAULT_REFRESH_TOKEN_TTL_SECONDS,
        )?;

        let token_issuer = non_empty(vars, "AUTH_TOKEN_ISSUER", DEFAULT_TOKEN_ISSUER)?;

        let totp_window_size = match vars.get("AUTH_TOTP_WINDOW_SIZE") {
            Some(value) => {
                let window: u8 = value.parse().map_err(|e| ConfigError::InvalidValue {
                    name: "AUTH_TOTP_WINDOW_SIZE".to_string(),
                    reason: format!("{e}"),
                })?;
                if window > MAX_TOTP_WINDOW_SIZE {
                    return Err(ConfigError::InvalidValue {
                        name: "AUTH_TOTP_WINDOW_SIZE".to_string(),
                        reason: format!("must be at most {MAX_TOTP_WINDOW_SIZE}, got {window}"),
                    });
                }
                window
            }
            None => DEFAULT_TOTP_WINDOW_SIZE,
        };

        let totp_issuer = non_empty(vars, "AUTH_TOTP_ISSUER", DEFAULT_TOTP_ISSUER)?;

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let enable_test_endpoints = match vars.get("AUTH_ENABLE_TEST_ENDPOINTS") {
            Some(value) => value.parse::<bool>().map_err(|_| ConfigError::InvalidValue {
                name: "AUTH_ENABLE_TEST_ENDPOINTS".to_string(),
                reason: format!("expected true or false, got '{value}'"),
            })?,
            None => false,
        };

        Ok(Config {
            jwt_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_seconds,
            token_issuer,
            totp_window_size,
            totp_issuer,
            bind_address,
            enable_test_endpoints,
        })
    }

    /// Raw signing secret bytes.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.expose_secret().as_bytes()
    }
}

fn parse_ttl(
    vars: &HashMap<String, String>,
    name: &str,
    default: i64,
) -> Result<i64, ConfigError> {
    let Some(value) = vars.get(name) else {
        return Ok(default);
    };

    let ttl: i64 = value.parse().map_err(|e| ConfigError::InvalidTtl {
        name: name.to_string(),
        reason: format!("{e}"),
    })?;

    if ttl <= 0 {
        return Err(ConfigError::InvalidTtl {
            name: name.to_string(),
            reason: format!("must be positive, got {ttl}"),
        });
    }

    Ok(ttl)
}

fn non_empty(
    vars: &HashMap<String, String>,
    name: &str,
    default: &str,
) -> Result<String, ConfigError> {
    match vars.get(name) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            reason: "must not be empty".to_string(),
        }),
        Some(value) => Ok(value.clone()),
        None => Ok(default.to_string()),
    }
}
