use actix_web::{HttpResponse, error, http::header, web};
use serde::Serialize;

use crate::errors::ApiError;
use crate::models::qr_code::RenderedImage;
use crate::state::app_state::AppState;
use crate::structs::qr_request::{GenerationRequest, ValidationFailure};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrResponse {
    pub data_url: String,
}

fn generate(app_state: &AppState, req: GenerationRequest) -> Result<RenderedImage, ApiError> {
    let validated = req.into_validated().map_err(|failure| {
        log::info!(
            "Rejected QR request, invalid fields: {:?}",
            failure.field_errors.keys().collect::<Vec<_>>()
        );
        failure
    })?;

    let image = app_state.generator.generate(&validated).map_err(|e| {
        log::error!("QR code generation failed: {}", e);
        e
    })?;

    log::debug!(
        "Generated {}x{} QR code ({} bytes)",
        image.width,
        image.height,
        image.bytes.len()
    );
    Ok(image)
}

/// Generate a QR code and return it as a base64 PNG data URL
pub async fn generate_qr(
    app_state: web::Data<AppState>,
    web::Json(req): web::Json<GenerationRequest>,
) -> Result<HttpResponse, ApiError> {
    let image = generate(&app_state, req)?;

    Ok(HttpResponse::Ok().json(QrResponse {
        data_url: image.to_data_url(),
    }))
}

/// Generate a QR code and return the raw PNG as a download
pub async fn generate_qr_png(
    app_state: web::Data<AppState>,
    web::Json(req): web::Json<GenerationRequest>,
) -> Result<HttpResponse, ApiError> {
    let image = generate(&app_state, req)?;

    Ok(HttpResponse::Ok()
        .content_type("image/png")
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"qr-code.png\"",
        ))
        .body(image.bytes))
}

const MALFORMED_BODY_MESSAGE: &str =
    "Request body must be a JSON object such as {\"link\": \"https://example.com\", \"size\": 320}";

/// Turn unparseable bodies into the same 400 shape as field validation errors
pub fn json_error_handler(err: error::JsonPayloadError, _req: &actix_web::HttpRequest) -> error::Error {
    log::info!("Rejected malformed QR request body: {}", err);
    let failure = ValidationFailure::malformed_body(MALFORMED_BODY_MESSAGE);
    ApiError::Validation(failure).into()
}
