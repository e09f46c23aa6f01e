//! Managing user-owned compilations of saved attractions.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::attraction::PlaceId;
use crate::domain::attractions_service::AttractionsService;
use crate::domain::compilation::{Compilation, CompilationSummary, DEFAULT_COMPILATION_NAME};
use crate::domain::error::Error;
use crate::domain::ports::CompilationRepository;
use crate::domain::user::UserId;

/// Where an added item should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilationTarget {
    /// An existing compilation; it must belong to the caller.
    ById(Uuid),
    /// The caller's compilation with this name, created when absent.
    ByName(String),
    /// The caller's default compilation, created when absent.
    Default,
}

/// Result of adding an item.
#[derive(Debug, Clone, PartialEq)]
pub struct AddOutcome {
    pub compilation: Compilation,
    /// Whether a new compilation was created to receive the item.
    pub created: bool,
}

pub struct CompilationsService {
    compilations: Arc<dyn CompilationRepository>,
    attractions: Arc<AttractionsService>,
}

impl CompilationsService {
    pub fn new(
        compilations: Arc<dyn CompilationRepository>,
        attractions: Arc<AttractionsService>,
    ) -> Self {
        Self {
            compilations,
            attractions,
        }
    }

    /// The caller's compilations, most recently updated first.
    pub async fn list(&self, user: UserId) -> Result<Vec<CompilationSummary>, Error> {
        Ok(self.compilations.list_by_owner(user).await?)
    }

    /// Save an attraction into one of the caller's compilations.
    ///
    /// The attraction is resolved and persisted first, degrading to a
    /// minimal record when the upstream is unavailable. Adding an item that
    /// is already present is a no-op.
    ///
    /// # Errors
    /// `not_found` for an unknown compilation id, `forbidden` for a foreign
    /// one.
    pub async fn add_item(
        &self,
        user: UserId,
        place_id: &PlaceId,
        target: CompilationTarget,
    ) -> Result<AddOutcome, Error> {
        self.attractions.save(place_id).await?;

        let (compilation, created) = match target {
            CompilationTarget::ById(id) => (self.owned_compilation(user, id).await?, false),
            CompilationTarget::ByName(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(Error::invalid_request("compilation name must not be blank")
                        .with_details(serde_json::json!({ "field": "compilation_name" })));
                }
                self.compilations.find_or_create(user, name).await?
            }
            CompilationTarget::Default => {
                self.compilations
                    .find_or_create(user, DEFAULT_COMPILATION_NAME)
                    .await?
            }
        };
        if created {
            info!(%user, compilation_id = %compilation.id, name = %compilation.name, "compilation created");
        }

        let inserted = self.compilations.add_item(compilation.id, place_id).await?;
        if !inserted {
            debug!(compilation_id = %compilation.id, %place_id, "item already present");
        }
        let compilation = self.reload(compilation.id).await?;
        Ok(AddOutcome {
            compilation,
            created,
        })
    }

    /// Remove an item from one of the caller's compilations.
    ///
    /// # Errors
    /// `not_found` for an unknown compilation or absent item, `forbidden`
    /// for a compilation owned by someone else.
    pub async fn remove_item(
        &self,
        user: UserId,
        compilation_id: Uuid,
        place_id: &PlaceId,
    ) -> Result<Compilation, Error> {
        let compilation = self.owned_compilation(user, compilation_id).await?;
        let removed = self.compilations.remove_item(compilation.id, place_id).await?;
        if !removed {
            return Err(Error::not_found("item not found in compilation"));
        }
        self.reload(compilation.id).await
    }

    async fn owned_compilation(&self, user: UserId, id: Uuid) -> Result<Compilation, Error> {
        let compilation = self
            .compilations
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("compilation not found"))?;
        if compilation.owner != user {
            return Err(Error::forbidden("compilation belongs to another user"));
        }
        Ok(compilation)
    }

    async fn reload(&self, id: Uuid) -> Result<Compilation, Error> {
        self.compilations
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::internal("compilation vanished during update"))
    }
}
