//! Errors surfaced by the basket runner.

use domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// A command failed inside the executor.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A script line could not be turned into a command.
    #[error("Script line {line}: {message}")]
    Script { line: usize, message: String },

    /// The store dump could not be written.
    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),
}

impl From<domain::ContractViolation> for AppError {
    fn from(violation: domain::ContractViolation) -> Self {
        AppError::Domain(violation.into())
    }
}

impl From<event_log::LogStoreError> for AppError {
    fn from(e: event_log::LogStoreError) -> Self {
        AppError::Domain(e.into())
    }
}
