//! Authorization decisions for `(user, resource, action)` triples.

use crate::errors::AuthError;

/// Decides whether a user may perform an action on a resource.
#[async_trait::async_trait]
pub trait PolicyEngine: Send + Sync {
    /// `Ok(true)` allows. Anything else denies.
    async fn check(&self, user_id: &str, resource: &str, action: &str) -> Result<bool, AuthError>;
}

/// Default engine: every check is `NotImplemented`, so every request is denied.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAllPolicyEngine;

#[async_trait::async_trait]
impl PolicyEngine for DenyAllPolicyEngine {
    async fn check(
        &self,
        _user_id: &str,
        _resource: &str,
        _action: &str,
    ) -> Result<bool, AuthError> {
        Err(AuthError::NotImplemented("permission checks".to_string()))
    }
}

/// Mock policy engine module for testing.
pub mod mock {
    use super::*;
    use std::collections::HashSet;

    /// Allows exactly the `(user, resource, action)` grants it was built with.
    #[derive(Default)]
    pub struct MockPolicyEngine {
        grants: HashSet<(String, String, String)>,
        error: Option<AuthError>,
    }

    impl MockPolicyEngine {
        /// An engine with no grants.
        pub fn new() -> Self {
            Self::default()
        }

        /// An engine where every check fails with `error`.
        pub fn failing(error: AuthError) -> Self {
            Self {
                error: Some(error),
                ..Self::default()
            }
        }

        pub fn grant(mut self, user_id: &str, resource: &str, action: &str) -> Self {
            self.grants.insert((
                user_id.to_string(),
                resource.to_string(),
                action.to_string(),
            ));
            self
        }
    }

    #[async_trait::async_trait]
    impl PolicyEngine for MockPolicyEngine {
        async fn check(
            &self,
            user_id: &str,
            resource: &str,
            action: &str,
        ) -> Result<bool, AuthError> {
            if let Some(error) = &self.error {
                return Err(error.clone());
            }

            Ok(self.grants.contains(&(
                user_id.to_string(),
                resource.to_string(),
                action.to_string(),
            )))
        }
    }
}
