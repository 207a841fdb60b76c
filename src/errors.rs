use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::structs::qr_request::ValidationFailure;

/// Faults inside the encode/render pipeline. None of these are fixable by the client.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("data does not fit in any QR version")]
    DataTooLong,

    #[error("QR encoder error: {0}")]
    Encoder(#[from] qrcode::types::QrError),

    #[error("PNG encoding error: {0}")]
    Png(#[from] image::ImageError),

    #[error("generation panicked: {0}")]
    Panicked(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("validation error")]
    Validation(ValidationFailure),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl From<ValidationFailure> for ApiError {
    fn from(failure: ValidationFailure) -> Self {
        ApiError::Validation(failure)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(failure) => HttpResponse::BadRequest().json(failure),
            // Details stay in the logs
            ApiError::Generation(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Failed to generate QR code"
            })),
        }
    }
}
