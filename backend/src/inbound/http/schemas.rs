//! Request and response payloads for the REST surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Compilation, CompilationItem, CompilationSummary, User};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    #[schema(example = "traveler@example.com")]
    pub email: String,
    #[schema(example = "wanderlust1")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_uuid(),
            email: user.email,
        }
    }
}

/// Listing mode for `GET /attractions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    Popular,
    Similar,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttractionsQuery {
    /// Free-text search query.
    pub q: Option<String>,
    /// Listing mode; `similar` requires `place_id`.
    pub mode: Option<ListMode>,
    /// Base attraction for `mode=similar`.
    pub place_id: Option<String>,
    /// Restrict results to this country, matched case-insensitively.
    pub country: Option<String>,
    /// Restrict results to this city, matched case-insensitively.
    pub city: Option<String>,
    /// Maximum number of results, clamped server-side.
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveAttractionRequest {
    pub place_id: String,
    /// Existing compilation to add to; must belong to the caller.
    pub compilation_id: Option<Uuid>,
    /// Compilation name to find or create when no id is given.
    pub compilation_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompilationItemRequest {
    pub place_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompilationItemResponse {
    pub place_id: String,
    pub position: i32,
    pub added_at: DateTime<Utc>,
}

impl From<CompilationItem> for CompilationItemResponse {
    fn from(item: CompilationItem) -> Self {
        Self {
            place_id: item.place_id.into(),
            position: item.position,
            added_at: item.added_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompilationResponse {
    pub id: Uuid,
    pub name: String,
    pub items: Vec<CompilationItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Compilation> for CompilationResponse {
    fn from(compilation: Compilation) -> Self {
        Self {
            id: compilation.id,
            name: compilation.name,
            items: compilation
                .items
                .into_iter()
                .map(CompilationItemResponse::from)
                .collect(),
            created_at: compilation.created_at,
            updated_at: compilation.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompilationSummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CompilationSummary> for CompilationSummaryResponse {
    fn from(summary: CompilationSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            item_count: summary.item_count,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}
