use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body returned for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Upstream authentication error: {0}")]
    UpstreamAuth(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("External service timed out: {0}")]
    UpstreamTimeout(String),
}

impl AppError {
    pub fn missing_param(name: &str) -> Self {
        AppError::ValidationError(format!("{} is required", name))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(_) | AppError::UpstreamAuth(_) => StatusCode::UNAUTHORIZED,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            AppError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Message placed in the response body.
    pub fn message(&self) -> &str {
        match self {
            AppError::Auth(msg)
            | AppError::UpstreamAuth(msg)
            | AppError::ValidationError(msg)
            | AppError::Internal(msg)
            | AppError::ExternalService(msg)
            | AppError::UpstreamTimeout(msg) => msg.as_str(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Error: {}: {}", status, self.message());
        } else {
            tracing::debug!("Rejected request: {}: {}", status, self.message());
        }

        (status, Json(ErrorBody::new(self.message()))).into_response()
    }
}
