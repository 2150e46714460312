use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum ConnectAccountError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    UnexpectedCustomError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
}

impl std::fmt::Debug for ConnectAccountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<ConnectAccountError> for GenericError {
    fn from(err: ConnectAccountError) -> GenericError {
        match err {
            ConnectAccountError::ValidationError(message) => {
                GenericError::ValidationError(message)
            }
            ConnectAccountError::UnexpectedCustomError(error) => {
                GenericError::UnexpectedCustomError(error)
            }
            ConnectAccountError::UnexpectedError(error) => GenericError::UnexpectedError(error),
            ConnectAccountError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
        }
    }
}
