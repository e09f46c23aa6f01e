//! Server assembly: configuration, state wiring, and the Actix app.

mod config;

pub use config::{ConfigError, ServerConfig};

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
use thiserror::Error as ThisError;
use tracing::info;

use backend::Trace;
use backend::domain::ports::PlacesSourceError;
use backend::domain::{AttractionsService, AuthService, CompilationsService};
use backend::inbound::http::{self, state::AppState};
use backend::outbound::persistence::{
    DieselAttractionRepository, DieselCompilationRepository, DieselUserRepository, PoolBuildError,
    PoolConfig, build_pool,
};
use backend::outbound::places::{PlacesConfig, PlacesHttpSource};

#[derive(Debug, ThisError)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pool(#[from] PoolBuildError),
    #[error("failed to construct places client: {0}")]
    Places(#[from] PlacesSourceError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::from_env()?;

    let pool = build_pool(&PoolConfig::new(&config.database_url)).await?;
    let places = Arc::new(PlacesHttpSource::new(PlacesConfig::new(
        config.places_api_url.clone(),
        config.places_api_key.clone(),
    ))?);

    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let attractions_repo = Arc::new(DieselAttractionRepository::new(pool.clone()));
    let compilations_repo = Arc::new(DieselCompilationRepository::new(pool));

    let attractions = Arc::new(AttractionsService::new(attractions_repo, places));
    let state = AppState::new(
        Arc::new(AuthService::new(users)),
        Arc::clone(&attractions),
        Arc::new(CompilationsService::new(compilations_repo, attractions)),
    );
    state.health.mark_ready();

    let session_key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;
    info!(addr = %config.bind_addr, "server listening");
    HttpServer::new(move || {
        let app = App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(http::configure)
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(cookie_secure)
                    .build(),
            )
            .wrap(actix_middleware::NormalizePath::trim())
            .wrap(Trace);
        #[cfg(debug_assertions)]
        let app = app.service(
            utoipa_swagger_ui::SwaggerUi::new("/docs/{_url}")
                .url("/api-docs/openapi.json", {
                    use utoipa::OpenApi;
                    backend::doc::ApiDoc::openapi()
                }),
        );
        app
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;
    Ok(())
}
