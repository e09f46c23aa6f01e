//! User-owned compilations of saved attractions.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::attraction::PlaceId;
use crate::domain::user::UserId;

/// Name given to the compilation created when a caller saves an attraction
/// without naming a destination.
pub const DEFAULT_COMPILATION_NAME: &str = "My Trip";

/// A named, ordered collection of saved attractions.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub id: Uuid,
    pub owner: UserId,
    pub name: String,
    /// Items in insertion order.
    pub items: Vec<CompilationItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single saved attraction within a compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationItem {
    pub place_id: PlaceId,
    pub position: i32,
    pub added_at: DateTime<Utc>,
}

/// Listing view of a compilation: metadata plus an item count.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationSummary {
    pub id: Uuid,
    pub name: String,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
