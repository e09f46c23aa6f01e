//! Outbound ports. Adapters under `outbound/` implement these traits; the
//! `test-support` feature ships in-memory implementations.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error as ThisError;
use uuid::Uuid;

use crate::domain::attraction::{Attraction, AttractionFilter, PlaceId};
use crate::domain::compilation::{Compilation, CompilationSummary};
use crate::domain::error::Error;
use crate::domain::user::{NewUser, User, UserId};

/// Failure talking to the backing datastore.
#[derive(Debug, ThisError)]
pub enum StoreError {
    /// The store could not be reached (pool exhausted, connection refused).
    #[error("datastore unavailable: {0}")]
    Unavailable(String),
    /// A statement failed once a connection was held.
    #[error("query failed: {0}")]
    Query(String),
}

impl From<StoreError> for Error {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Unavailable(_) => Error::service_unavailable("datastore unavailable"),
            StoreError::Query(message) => Error::internal(message),
        }
    }
}

/// Failure persisting or loading user accounts.
#[derive(Debug, ThisError)]
pub enum UserStoreError {
    /// The unique email constraint was violated.
    #[error("a user with that email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<UserStoreError> for Error {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::DuplicateEmail => {
                Error::invalid_request("A user with that email already exists.")
                    .with_details(serde_json::json!({ "field": "email" }))
            }
            UserStoreError::Store(store) => store.into(),
        }
    }
}

/// Failure reaching or decoding the external places service.
#[derive(Debug, ThisError)]
pub enum PlacesSourceError {
    /// The upstream rejected the request as malformed.
    #[error("upstream rejected the request: {0}")]
    InvalidRequest(String),
    /// The upstream throttled us.
    #[error("upstream rate limited the request: {0}")]
    RateLimited(String),
    /// The upstream timed out.
    #[error("upstream timed out: {0}")]
    Timeout(String),
    /// Transport-level failure or an upstream 5xx.
    #[error("upstream transport failure: {0}")]
    Transport(String),
    /// The response body was not the JSON we expect.
    #[error("failed to decode upstream response: {0}")]
    Decode(String),
}

impl From<PlacesSourceError> for Error {
    fn from(error: PlacesSourceError) -> Self {
        match error {
            PlacesSourceError::InvalidRequest(message) => Error::invalid_request(message),
            other => Error::upstream_unavailable(other.to_string()),
        }
    }
}

/// Persistence port for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<User, UserStoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError>;
}

/// Persistence port for canonical attractions.
#[async_trait]
pub trait AttractionRepository: Send + Sync {
    /// Insert-or-update keyed on `place_id`. Likes and featured flags on an
    /// existing record survive the update.
    async fn upsert(&self, attraction: &Attraction) -> Result<Attraction, StoreError>;
    async fn find_by_place_id(&self, place_id: &PlaceId) -> Result<Option<Attraction>, StoreError>;
    /// Case-insensitive substring match on name, address, and city, scoped
    /// by the filter.
    async fn search(
        &self,
        text: &str,
        filter: &AttractionFilter,
        limit: i64,
    ) -> Result<Vec<Attraction>, StoreError>;
    /// Ordered by likes, rating, then rating count, all descending, scoped
    /// by the filter.
    async fn list_popular(
        &self,
        filter: &AttractionFilter,
        limit: i64,
    ) -> Result<Vec<Attraction>, StoreError>;
    /// Attractions sharing the base's city or category, base excluded.
    async fn list_similar(&self, base: &Attraction, limit: i64)
    -> Result<Vec<Attraction>, StoreError>;
}

/// Persistence port for compilations and their items.
#[async_trait]
pub trait CompilationRepository: Send + Sync {
    /// Find the owner's compilation by name, creating it when absent.
    /// The flag reports whether a new compilation was created.
    async fn find_or_create(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<(Compilation, bool), StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Compilation>, StoreError>;
    /// The owner's compilations with item counts, most recently updated first.
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<CompilationSummary>, StoreError>;
    /// Append an item at the tail. Returns `false` when the item was already
    /// present; duplicates never produce a second row.
    async fn add_item(&self, compilation_id: Uuid, place_id: &PlaceId) -> Result<bool, StoreError>;
    /// Returns `false` when the compilation held no such item.
    async fn remove_item(
        &self,
        compilation_id: Uuid,
        place_id: &PlaceId,
    ) -> Result<bool, StoreError>;
}

/// Port for the external places-lookup service. Payloads stay raw JSON; the
/// identity resolver owns shaping.
#[async_trait]
pub trait PlacesSource: Send + Sync {
    /// Free-text search returning raw place records.
    async fn search(&self, query: &str) -> Result<Vec<Value>, PlacesSourceError>;
    /// Detail lookup for a single place. `None` when the upstream has no
    /// record for the identifier.
    async fn details(&self, place_id: &PlaceId) -> Result<Option<Value>, PlacesSourceError>;
}
