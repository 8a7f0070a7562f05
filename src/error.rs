//! Gateway error type and its mapping onto HTTP responses.

use crate::extract::ExtractError;
use crate::gemini::BackendError;
use crate::rates::RateError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Could not validate credentials")]
    AccessDenied,

    #[error("{0} is required")]
    MissingParameter(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("{0}")]
    Validation(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("{0}")]
    Backend(String),

    #[error("Could not find exchange rate for {from} to {to}")]
    RateNotFound { from: String, to: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::MissingParameter(_) | Self::InvalidCategory(_) | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
            Self::RateNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body returned for every failure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::Backend(_) | Self::Internal(_) => error!("{} ({})", self, status),
            Self::RateLimited(_) | Self::RateNotFound { .. } => warn!("{} ({})", self, status),
            _ => {}
        }

        let body = ErrorResponse {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<BackendError> for GatewayError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::RateLimited(msg) => Self::RateLimited(msg),
            other => Self::Backend(other.to_string()),
        }
    }
}

impl From<ExtractError> for GatewayError {
    fn from(err: ExtractError) -> Self {
        Self::Backend(format!("{} (completion: {})", err, err.text))
    }
}

impl From<RateError> for GatewayError {
    fn from(err: RateError) -> Self {
        match err {
            RateError::NotFound { from, to } => Self::RateNotFound { from, to },
        }
    }
}
