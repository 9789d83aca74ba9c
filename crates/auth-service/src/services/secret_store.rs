//! Lookup of per-user TOTP secrets.
//!
//! The auth service does not own enrollment data. A deployment supplies a
//! [`SecretStore`] backed by whatever holds it (user directory, vault, ...).
//! Until one is supplied, [`UnconfiguredSecretStore`] keeps second-factor
//! checks failing closed.

use crate::errors::AuthError;
use common::secret::SecretString;

/// Source of TOTP secrets.
#[async_trait::async_trait]
pub trait SecretStore: Send + Sync {
    /// The user's Base32 TOTP secret.
    ///
    /// `Ok(None)` means the user has not enrolled in two-factor
    /// authentication.
    async fn totp_secret(&self, user_id: &str) -> Result<Option<SecretString>, AuthError>;
}

/// Default store: every lookup is `NotImplemented`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredSecretStore;

#[async_trait::async_trait]
impl SecretStore for UnconfiguredSecretStore {
    async fn totp_secret(&self, _user_id: &str) -> Result<Option<SecretString>, AuthError> {
        Err(AuthError::NotImplemented("TOTP secret lookup".to_string()))
    }
}

/// Mock secret store module for testing.
pub mod mock {
    use super::*;
    use common::secret::ExposeSecret;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory secret store.
    #[derive(Default)]
    pub struct MockSecretStore {
        secrets: HashMap<String, SecretString>,
        error: Option<AuthError>,
        call_count: AtomicUsize,
    }

    impl MockSecretStore {
        /// A store with no enrolled users.
        pub fn empty() -> Self {
            Self::default()
        }

        /// A store where every lookup fails with `error`.
        pub fn failing(error: AuthError) -> Self {
            Self {
                error: Some(error),
                ..Self::default()
            }
        }

        /// Enroll `user_id` with a Base32 secret.
        pub fn with_secret(mut self, user_id: &str, secret: &str) -> Self {
            self.secrets
                .insert(user_id.to_string(), SecretString::from(secret.to_string()));
            self
        }

        /// Get the number of lookups made.
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl SecretStore for MockSecretStore {
        async fn totp_secret(&self, user_id: &str) -> Result<Option<SecretString>, AuthError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            if let Some(error) = &self.error {
                return Err(error.clone());
            }

            Ok(self
                .secrets
                .get(user_id)
                .map(|s| SecretString::from(s.expose_secret().to_string())))
        }
    }

}
