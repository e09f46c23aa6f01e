//! In-memory port implementations for tests.
//!
//! Available behind the `test-support` feature so integration tests can
//! exercise the full HTTP surface without PostgreSQL or network access.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::attraction::{Attraction, AttractionFilter, PlaceId};
use crate::domain::compilation::{Compilation, CompilationItem, CompilationSummary};
use crate::domain::ports::{
    AttractionRepository, CompilationRepository, PlacesSource, PlacesSourceError, StoreError,
    UserRepository, UserStoreError,
};
use crate::domain::user::{NewUser, User, UserId};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserStoreError> {
        let mut users = self.users.lock().expect("lock poisoned");
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(UserStoreError::DuplicateEmail);
        }
        let now = Utc::now();
        let user = User {
            id: UserId::from_uuid(Uuid::new_v4()),
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        let users = self.users.lock().expect("lock poisoned");
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError> {
        let users = self.users.lock().expect("lock poisoned");
        Ok(users.iter().find(|user| user.id == id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryAttractionRepository {
    records: Mutex<Vec<Attraction>>,
}

impl InMemoryAttractionRepository {
    /// Number of stored attractions.
    pub fn len(&self) -> usize {
        self.records.lock().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn popularity(a: &Attraction, b: &Attraction) -> Ordering {
    b.likes
        .cmp(&a.likes)
        .then(b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal))
        .then(b.user_ratings_total.cmp(&a.user_ratings_total))
}

fn clamp(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

fn matches_filter(attraction: &Attraction, filter: &AttractionFilter) -> bool {
    let field_matches = |field: &Option<String>, wanted: &Option<String>| match wanted.as_deref() {
        Some(wanted) => field
            .as_deref()
            .is_some_and(|value| value.eq_ignore_ascii_case(wanted)),
        None => true,
    };
    field_matches(&attraction.country, &filter.country)
        && field_matches(&attraction.city, &filter.city)
}

#[async_trait]
impl AttractionRepository for InMemoryAttractionRepository {
    async fn upsert(&self, attraction: &Attraction) -> Result<Attraction, StoreError> {
        let mut records = self.records.lock().expect("lock poisoned");
        let mut stored = attraction.clone();
        if let Some(existing) = records
            .iter_mut()
            .find(|existing| existing.place_id == attraction.place_id)
        {
            // Curation state survives a re-upsert, as in the real store.
            stored.likes = existing.likes;
            stored.is_featured = existing.is_featured;
            *existing = stored.clone();
        } else {
            records.push(stored.clone());
        }
        Ok(stored)
    }

    async fn find_by_place_id(&self, place_id: &PlaceId) -> Result<Option<Attraction>, StoreError> {
        let records = self.records.lock().expect("lock poisoned");
        Ok(records
            .iter()
            .find(|attraction| &attraction.place_id == place_id)
            .cloned())
    }

    async fn search(
        &self,
        text: &str,
        filter: &AttractionFilter,
        limit: i64,
    ) -> Result<Vec<Attraction>, StoreError> {
        let needle = text.to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        };
        let records = self.records.lock().expect("lock poisoned");
        let mut matches: Vec<Attraction> = records
            .iter()
            .filter(|attraction| {
                contains(&attraction.name)
                    || contains(&attraction.formatted_address)
                    || contains(&attraction.city)
            })
            .filter(|attraction| matches_filter(attraction, filter))
            .cloned()
            .collect();
        matches.sort_by(popularity);
        matches.truncate(clamp(limit));
        Ok(matches)
    }

    async fn list_popular(
        &self,
        filter: &AttractionFilter,
        limit: i64,
    ) -> Result<Vec<Attraction>, StoreError> {
        let records = self.records.lock().expect("lock poisoned");
        let mut all: Vec<Attraction> = records
            .iter()
            .filter(|attraction| matches_filter(attraction, filter))
            .cloned()
            .collect();
        all.sort_by(popularity);
        all.truncate(clamp(limit));
        Ok(all)
    }

    async fn list_similar(
        &self,
        base: &Attraction,
        limit: i64,
    ) -> Result<Vec<Attraction>, StoreError> {
        if base.city.is_none() && base.category.is_none() {
            return Ok(Vec::new());
        }
        let records = self.records.lock().expect("lock poisoned");
        let mut matches: Vec<Attraction> = records
            .iter()
            .filter(|attraction| attraction.place_id != base.place_id)
            .filter(|attraction| {
                (base.city.is_some() && attraction.city == base.city)
                    || (base.category.is_some() && attraction.category == base.category)
            })
            .cloned()
            .collect();
        matches.sort_by(popularity);
        matches.truncate(clamp(limit));
        Ok(matches)
    }
}

#[derive(Default)]
pub struct InMemoryCompilationRepository {
    compilations: Mutex<Vec<Compilation>>,
}

#[async_trait]
impl CompilationRepository for InMemoryCompilationRepository {
    async fn find_or_create(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<(Compilation, bool), StoreError> {
        let mut compilations = self.compilations.lock().expect("lock poisoned");
        if let Some(existing) = compilations
            .iter()
            .find(|compilation| compilation.owner == owner && compilation.name == name)
        {
            return Ok((existing.clone(), false));
        }
        let now = Utc::now();
        let compilation = Compilation {
            id: Uuid::new_v4(),
            owner,
            name: name.to_owned(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        compilations.push(compilation.clone());
        Ok((compilation, true))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Compilation>, StoreError> {
        let compilations = self.compilations.lock().expect("lock poisoned");
        Ok(compilations
            .iter()
            .find(|compilation| compilation.id == id)
            .cloned())
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<CompilationSummary>, StoreError> {
        let compilations = self.compilations.lock().expect("lock poisoned");
        let mut summaries: Vec<CompilationSummary> = compilations
            .iter()
            .filter(|compilation| compilation.owner == owner)
            .map(|compilation| CompilationSummary {
                id: compilation.id,
                name: compilation.name.clone(),
                item_count: compilation.items.len() as i64,
                created_at: compilation.created_at,
                updated_at: compilation.updated_at,
            })
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn add_item(&self, compilation_id: Uuid, place_id: &PlaceId) -> Result<bool, StoreError> {
        let mut compilations = self.compilations.lock().expect("lock poisoned");
        let Some(compilation) = compilations
            .iter_mut()
            .find(|compilation| compilation.id == compilation_id)
        else {
            return Err(StoreError::Query("compilation row missing".into()));
        };
        if compilation
            .items
            .iter()
            .any(|item| &item.place_id == place_id)
        {
            return Ok(false);
        }
        let position = compilation
            .items
            .iter()
            .map(|item| item.position + 1)
            .max()
            .unwrap_or(0);
        compilation.items.push(CompilationItem {
            place_id: place_id.clone(),
            position,
            added_at: Utc::now(),
        });
        compilation.updated_at = Utc::now();
        Ok(true)
    }

    async fn remove_item(
        &self,
        compilation_id: Uuid,
        place_id: &PlaceId,
    ) -> Result<bool, StoreError> {
        let mut compilations = self.compilations.lock().expect("lock poisoned");
        let Some(compilation) = compilations
            .iter_mut()
            .find(|compilation| compilation.id == compilation_id)
        else {
            return Ok(false);
        };
        let before = compilation.items.len();
        compilation.items.retain(|item| &item.place_id != place_id);
        let removed = compilation.items.len() < before;
        if removed {
            compilation.updated_at = Utc::now();
        }
        Ok(removed)
    }
}

/// Scripted [`PlacesSource`]: canned search results, per-id details, or a
/// forced failure.
#[derive(Default)]
pub struct StubPlacesSource {
    search_results: Mutex<Vec<Value>>,
    details: Mutex<HashMap<String, Value>>,
    failure: Mutex<Option<PlacesSourceError>>,
}

impl StubPlacesSource {
    pub fn set_search_results(&self, results: Vec<Value>) {
        *self.search_results.lock().expect("lock poisoned") = results;
    }

    pub fn set_details(&self, place_id: &str, record: Value) {
        self.details
            .lock()
            .expect("lock poisoned")
            .insert(place_id.to_owned(), record);
    }

    /// Make every subsequent call fail with (a copy of) this error.
    pub fn fail_with(&self, error: PlacesSourceError) {
        *self.failure.lock().expect("lock poisoned") = Some(error);
    }

    fn active_failure(&self) -> Option<PlacesSourceError> {
        self.failure
            .lock()
            .expect("lock poisoned")
            .as_ref()
            .map(|error| match error {
                PlacesSourceError::InvalidRequest(m) => {
                    PlacesSourceError::InvalidRequest(m.clone())
                }
                PlacesSourceError::RateLimited(m) => PlacesSourceError::RateLimited(m.clone()),
                PlacesSourceError::Timeout(m) => PlacesSourceError::Timeout(m.clone()),
                PlacesSourceError::Transport(m) => PlacesSourceError::Transport(m.clone()),
                PlacesSourceError::Decode(m) => PlacesSourceError::Decode(m.clone()),
            })
    }
}

#[async_trait]
impl PlacesSource for StubPlacesSource {
    async fn search(&self, _query: &str) -> Result<Vec<Value>, PlacesSourceError> {
        if let Some(error) = self.active_failure() {
            return Err(error);
        }
        Ok(self.search_results.lock().expect("lock poisoned").clone())
    }

    async fn details(&self, place_id: &PlaceId) -> Result<Option<Value>, PlacesSourceError> {
        if let Some(error) = self.active_failure() {
            return Err(error);
        }
        Ok(self
            .details
            .lock()
            .expect("lock poisoned")
            .get(place_id.as_str())
            .cloned())
    }
}
