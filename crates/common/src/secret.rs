//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports [`secrecy`] wrappers. Every value that must never reach a log
//! line or an error message goes through these types: the token signing
//! secret, TOTP shared secrets, and bearer tokens held in memory.
//!
//! `SecretString` and `SecretBox<T>` implement `Debug` with redaction, so a
//! struct that derives `Debug` and holds one of them is safe to log. The inner
//! value is zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct Enrollment {
//!     user_id: String,
//!     totp_secret: SecretString,
//! }
//!
//! let enrollment = Enrollment {
//!     user_id: "u1".to_string(),
//!     totp_secret: SecretString::from("JBSWY3DPEHPK3PXP"),
//! };
//!
//! let logged = format!("{enrollment:?}");
//! assert!(!logged.contains("JBSWY3DPEHPK3PXP"));
//!
//! // Reading the value is always explicit.
//! let secret: &str = enrollment.totp_secret.expose_secret();
//! assert_eq!(secret, "JBSWY3DPEHPK3PXP");
//! ```
//!
//! # Usage Guidelines
//!
//! Use `SecretString` for:
//! - The JWT signing secret loaded from configuration
//! - Base32 TOTP secrets (generated or loaded from a secret store)
//! - Bearer tokens kept around longer than a single request
//!
//! Use `SecretBox<T>` for raw key bytes (e.g., `SecretBox<Vec<u8>>`).

pub use secrecy::{ExposeSecret, SecretBox, SecretString};
