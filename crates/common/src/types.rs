//! Common data types for auth components.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an issued token (the `jti` claim).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(pub Uuid);

impl TokenId {
    /// Create a new random token ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The authenticated identity a token is issued for.
///
/// Supplied by whatever authenticated the user; the auth service never
/// looks users up itself. `username` and `email` are redacted in Debug
/// output along with the user id.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable user identifier, becomes the token subject.
    pub user_id: String,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Roles the user currently holds.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Principal {
    /// Create a principal with no roles.
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            email: email.into(),
            roles: Vec::new(),
        }
    }

    /// Replace the principal's roles.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("user_id", &"[REDACTED]")
            .field("username", &"[REDACTED]")
            .field("email", &"[REDACTED]")
            .field("roles", &self.roles)
            .finish()
    }
}
