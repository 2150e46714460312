use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum CheckoutError {
    #[error("{0}")]
    SellerNotReady(String),
    #[error("{0}")]
    MissingPrice(String),
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

impl std::fmt::Debug for CheckoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<CheckoutError> for GenericError {
    fn from(err: CheckoutError) -> GenericError {
        match err {
            CheckoutError::SellerNotReady(message) => GenericError::ValidationError(message),
            CheckoutError::MissingPrice(message) => GenericError::ValidationError(message),
            CheckoutError::ValidationError(message) => GenericError::ValidationError(message),
            CheckoutError::DataNotFound(message) => GenericError::DataNotFound(message),
            CheckoutError::UnexpectedCustomError(error) => {
                GenericError::UnexpectedCustomError(error)
            }
            CheckoutError::UnexpectedError(error) => GenericError::UnexpectedError(error),
            CheckoutError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
        }
    }
}
