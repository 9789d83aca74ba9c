//! # Auth Test Utilities
//!
//! Shared test utilities for the auth service.
//!
//! This crate provides:
//! - Deterministic crypto fixtures (fixed signing secret, RFC 6238 seed)
//! - Test data builders (TestTokenBuilder)
//! - Server test harness (TestAuthServer for E2E tests)
//! - Fixed test IDs (users, roles)
//! - Custom assertions (TokenAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auth_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let key = test_signing_key();
//!
//!     let token = TestTokenBuilder::new()
//!         .for_user(TEST_USER_ALICE)
//!         .with_roles(&[ROLE_USER])
//!         .sign(&key);
//!
//!     token.assert_valid_jwt()
//!          .assert_has_role(ROLE_USER);
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod server_harness;
pub mod test_ids;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use crypto_fixtures::*;
pub use server_harness::*;
pub use test_ids::*;
pub use token_builders::*;
