//! Common types shared between the auth service and the services that consume its tokens.

#![warn(clippy::pedantic)]

/// Module for identity data types
pub mod types;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for JWT claims and wire-level constants
pub mod jwt;
