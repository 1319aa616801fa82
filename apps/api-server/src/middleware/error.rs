//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;
use std::time::Duration;

use vibe_core::SubmitError;
use vibe_core::error::FieldErrors;
use vibe_shared::ErrorResponse;

/// Detail shown when an image cannot be stored.
pub const UPLOAD_FAILED: &str = "Failed to upload image.";
/// Detail shown when a post cannot be stored.
pub const CREATE_FAILED: &str = "Failed to create post.";

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Validation(FieldErrors),
    TooManyRequests { retry_after: Duration },
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {}", errors),
            AppError::TooManyRequests { retry_after } => {
                write!(f, "Too many requests, retry after {:?}", retry_after)
            }
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    fn retry_after_secs(retry_after: &Duration) -> u64 {
        retry_after.as_secs_f64().ceil().max(1.0) as u64
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());

        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Validation(errors) => ErrorResponse::validation(errors.clone().into_map()),
            AppError::TooManyRequests { retry_after } => {
                let secs = Self::retry_after_secs(retry_after);
                builder.insert_header(("Retry-After", secs.to_string()));
                ErrorResponse::too_many_requests(format!(
                    "Rate limit exceeded. Try again in {} seconds.",
                    secs
                ))
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error(detail)
            }
        };

        builder.json(error)
    }
}

// Conversion from domain errors
impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(errors) => AppError::Validation(errors),
            SubmitError::Upload(_) => AppError::Internal(UPLOAD_FAILED.to_string()),
            SubmitError::Persistence(_) => AppError::Internal(CREATE_FAILED.to_string()),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
