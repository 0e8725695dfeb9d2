//! Error type returned by every domain service.
//!
//! Repositories report failures as `anyhow::Error`; services wrap those as
//! [`LedgerError::Storage`]. Re-settling a paid week or editing a frozen
//! week are not errors and never show up here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed or out-of-range input
    #[error("{0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Unauthorized(String),

    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: &str) -> Self {
        LedgerError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Storage(err.into())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
