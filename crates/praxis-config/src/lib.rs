//! praxis-config
//!
//! Jurisdiction rates and engine tunables.
//! Owns the TaxConfig data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{TaxConfig, MAX_UPCOMING_WINDOW_DAYS};
