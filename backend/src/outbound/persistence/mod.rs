//! PostgreSQL persistence adapters.

mod diesel_attraction_repository;
mod diesel_compilation_repository;
mod diesel_user_repository;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_attraction_repository::DieselAttractionRepository;
pub use diesel_compilation_repository::DieselCompilationRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolBuildError, PoolConfig, build_pool};
