use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::schemas::GenericResponse;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum WebhookError {
    #[error("{0}")]
    SignatureError(String),
    #[error("{0}")]
    PayloadError(String),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for WebhookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for WebhookError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::SignatureError(_) => StatusCode::BAD_REQUEST,
            WebhookError::PayloadError(_) => StatusCode::BAD_REQUEST,
            WebhookError::DatabaseError(_, _) => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let status_code_str = status_code.as_str();
        let inner_error_msg = match self {
            WebhookError::SignatureError(message) => message.to_string(),
            WebhookError::PayloadError(message) => message.to_string(),
            WebhookError::DatabaseError(message, _err) => message.to_string(),
            WebhookError::UnexpectedError(inner_error) => inner_error.to_string(),
        };

        HttpResponse::build(status_code).json(GenericResponse::error(
            &inner_error_msg,
            status_code_str,
            Some(()),
        ))
    }
}
