use std::result::Result as StdResult;

use praxis_config::ConfigError;
use praxis_core::CoreError;
use praxis_domain::{BracketTableError, DateRangeError, ObligationError};
use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the calculator, ledger and configuration layers.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TaxError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Obligation not found: {0}")]
    NotFound(Uuid),
    #[error("Obligation already registered: {0}")]
    DuplicateObligation(Uuid),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
}

pub type Result<T> = StdResult<T, TaxError>;

impl From<CoreError> for TaxError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput(message) => TaxError::InvalidInput(message),
            CoreError::NotFound(id) => TaxError::NotFound(id),
            CoreError::DuplicateObligation(id) => TaxError::DuplicateObligation(id),
        }
    }
}

impl From<ConfigError> for TaxError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => TaxError::StorageError(io.to_string()),
            ConfigError::Serde(message) | ConfigError::Invalid(message) => {
                TaxError::ConfigError(message)
            }
        }
    }
}

impl From<ObligationError> for TaxError {
    fn from(err: ObligationError) -> Self {
        TaxError::InvalidInput(err.to_string())
    }
}

impl From<BracketTableError> for TaxError {
    fn from(err: BracketTableError) -> Self {
        TaxError::InvalidInput(err.to_string())
    }
}

impl From<DateRangeError> for TaxError {
    fn from(err: DateRangeError) -> Self {
        TaxError::InvalidInput(err.to_string())
    }
}
