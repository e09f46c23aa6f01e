mod server;

use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<(), server::ServerError> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    server::run().await
}
