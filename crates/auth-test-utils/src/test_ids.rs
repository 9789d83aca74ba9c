//! Fixed test IDs for deterministic tests
//!
//! Using fixed identities keeps assertions stable and failures reproducible.

// User IDs
pub const TEST_USER_ALICE: &str = "user-alice-0001";
pub const TEST_USER_BOB: &str = "user-bob-0002";
pub const TEST_USER_CHARLIE: &str = "user-charlie-0003";

// Profile data
pub const TEST_USERNAME_ALICE: &str = "alice";
pub const TEST_EMAIL_ALICE: &str = "alice@example.com";
pub const TEST_USERNAME_BOB: &str = "bob";
pub const TEST_EMAIL_BOB: &str = "bob@example.com";

// Roles
pub const ROLE_USER: &str = "USER";
pub const ROLE_TRADER: &str = "TRADER";
pub const ROLE_ADMIN: &str = "ADMIN";

// Issuer stamped by the test configuration
pub const TEST_ISSUER: &str = "auth-service-test";

// Permission checks
pub const RESOURCE_ORDERS: &str = "orders";
pub const ACTION_READ: &str = "read";
pub const ACTION_WRITE: &str = "write";
