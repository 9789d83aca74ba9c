pub mod health;
pub mod metrics;
pub mod token_handler;
pub mod validation_handler;

pub use health::health_check;
pub use metrics::metrics_handler;
