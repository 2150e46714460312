use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum RefundError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    DataNotFound(String),
    #[error("{0}")]
    UnexpectedCustomError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
}

impl std::fmt::Debug for RefundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<RefundError> for GenericError {
    fn from(err: RefundError) -> GenericError {
        match err {
            RefundError::ValidationError(message) => GenericError::ValidationError(message),
            RefundError::DataNotFound(message) => GenericError::DataNotFound(message),
            RefundError::UnexpectedCustomError(error) => GenericError::UnexpectedCustomError(error),
            RefundError::UnexpectedError(error) => GenericError::UnexpectedError(error),
            RefundError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
        }
    }
}
