//! Actix Web REST adapter.

pub mod attractions;
pub mod auth;
pub mod compilations;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod state;
pub mod validation;

use actix_web::web;

use crate::domain::Error;

/// Register all routes. The caller supplies `web::Data<AppState>`, the
/// session middleware, and the trace middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .route("/health/live", web::get().to(health::live))
        .route("/health/ready", web::get().to(health::ready))
        .service(
            web::scope("/api/v1")
                .route("/auth/signup", web::post().to(auth::signup))
                .route("/auth/signin", web::post().to(auth::signin))
                .route("/attractions", web::get().to(attractions::list))
                .route("/attractions/save", web::post().to(attractions::save))
                .route("/attractions/{place_id}", web::get().to(attractions::get))
                .route("/compilations", web::get().to(compilations::list))
                .route(
                    "/compilations/{id}/add_item",
                    web::post().to(compilations::add_item),
                )
                .route(
                    "/compilations/{id}/remove_item",
                    web::post().to(compilations::remove_item),
                ),
        );
}

/// Surface body deserialization failures in the standard error envelope
/// instead of Actix's plain-text default.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed request body: {err}")).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed query string: {err}")).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed path parameter: {err}")).into()
    })
}
