use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::utils::response::error as error_response;
use crate::validation::ValidationErrors;
use crate::workflow::TransitionError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid fields: {0}")]
    InvalidFields(#[from] ValidationErrors),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(#[from] TransitionError),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidFields(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InvalidFields(_) => "INVALID_FIELDS",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(TransitionError::CancellationWindowClosed) => {
                "CANCELLATION_WINDOW_CLOSED"
            }
            AppError::Conflict(TransitionError::OutsideCheckInWindow) => "CHECK_IN_NOT_ALLOWED",
            AppError::Conflict(_) => "INVALID_TRANSITION",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    // Client mistakes are warnings; only server faults are errors.
    fn log(&self) {
        match self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => {
                warn!(code = self.code(), message = %msg, "Request rejected");
            }
            AppError::InvalidFields(errors) => {
                warn!(code = self.code(), fields = errors.0.len(), "Record failed validation");
            }
            AppError::Conflict(e) => {
                warn!(code = self.code(), error = %e, "Booking transition refused");
            }
            AppError::InternalServerError(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        let (public_message, details) = match &self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => (msg.clone(), None),
            AppError::InvalidFields(errors) => (
                errors.to_string(),
                serde_json::to_value(&errors.0).ok(),
            ),
            AppError::Conflict(e) => (e.to_string(), None),
            AppError::InternalServerError(_) => ("An internal error occurred".to_string(), None),
        };

        error_response(code, public_message, details, status)
    }
}
