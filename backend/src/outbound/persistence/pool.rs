//! Async connection pooling for PostgreSQL.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use thiserror::Error as ThisError;

use crate::domain::ports::StoreError;

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConnection<'a> = PooledConnection<'a, AsyncPgConnection>;

const DEFAULT_MAX_SIZE: u32 = 10;
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub database_url: String,
    pub max_size: u32,
    pub connection_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }
}

#[derive(Debug, ThisError)]
#[error("failed to build database pool: {0}")]
pub struct PoolBuildError(String);

/// Build a bb8 pool over `AsyncPgConnection`. Connections are established
/// lazily, so a wrong URL surfaces at first checkout rather than here.
pub async fn build_pool(config: &PoolConfig) -> Result<DbPool, PoolBuildError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
    Pool::builder()
        .max_size(config.max_size)
        .connection_timeout(config.connection_timeout)
        .build(manager)
        .await
        .map_err(|error| PoolBuildError(error.to_string()))
}

pub(crate) async fn checkout(pool: &DbPool) -> Result<DbConnection<'_>, StoreError> {
    pool.get()
        .await
        .map_err(|error| StoreError::Unavailable(error.to_string()))
}

pub(crate) fn map_query_error(error: diesel::result::Error) -> StoreError {
    StoreError::Query(error.to_string())
}
