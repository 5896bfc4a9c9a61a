use praxis_domain::{BracketTableError, DateRangeError, ObligationError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Obligation not found: {0}")]
    NotFound(Uuid),
    #[error("Obligation already registered: {0}")]
    DuplicateObligation(Uuid),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<BracketTableError> for CoreError {
    fn from(err: BracketTableError) -> Self {
        CoreError::InvalidInput(err.to_string())
    }
}

impl From<ObligationError> for CoreError {
    fn from(err: ObligationError) -> Self {
        CoreError::InvalidInput(err.to_string())
    }
}

impl From<DateRangeError> for CoreError {
    fn from(err: DateRangeError) -> Self {
        CoreError::InvalidInput(err.to_string())
    }
}
