use actix_web::web;

use crate::handlers::health_handlers::health_check;
use crate::handlers::qr_handlers::{generate_qr, generate_qr_png, json_error_handler};

/// Largest JSON body accepted by the generation routes
const JSON_LIMIT: usize = 16 * 1024;

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(
                web::JsonConfig::default()
                    .limit(JSON_LIMIT)
                    .error_handler(json_error_handler),
            )
            .route("/health/check", web::get().to(health_check))
            .route("/qr", web::post().to(generate_qr))
            .route("/qr/png", web::post().to(generate_qr_png)),
    );
}
