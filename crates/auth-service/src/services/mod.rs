pub mod policy;
pub mod secret_store;
pub mod token_issuer;
pub mod token_validator;
pub mod totp;
pub mod validation_service;
