//! Auth Service Library
//!
//! Issues and validates HS256 bearer tokens, verifies TOTP second factors,
//! and answers permission checks for the services behind it.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Signing key and token codec
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `models` - Validation outcomes and request/response bodies
//! - `observability` - Metrics and log hygiene
//! - `routes` - Router and application state
//! - `services` - Token issuance/validation, TOTP, validation facade

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
