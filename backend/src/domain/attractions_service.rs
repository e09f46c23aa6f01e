//! Attraction lookup, search, and persistence.
//!
//! The local store is authoritative once a record lands in it; the external
//! places service fills gaps. Normalization warnings are logged and never
//! fail a request.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::attraction::{Attraction, AttractionFilter, PlaceId};
use crate::domain::error::Error;
use crate::domain::normalize::normalize;
use crate::domain::ports::{AttractionRepository, PlacesSource, PlacesSourceError};

/// Query issued upstream when the popular listing has nothing local to serve.
const POPULAR_FALLBACK_QUERY: &str = "tourist attractions";

pub struct AttractionsService {
    repository: Arc<dyn AttractionRepository>,
    places: Arc<dyn PlacesSource>,
}

impl AttractionsService {
    pub fn new(repository: Arc<dyn AttractionRepository>, places: Arc<dyn PlacesSource>) -> Self {
        Self { repository, places }
    }

    /// Fetch a single attraction, consulting the upstream when it is not
    /// cached locally.
    ///
    /// # Errors
    /// `not_found` when neither the store nor the upstream knows the
    /// identifier; upstream failures surface as `upstream_unavailable`.
    pub async fn get(&self, place_id: &PlaceId) -> Result<Attraction, Error> {
        if let Some(attraction) = self.repository.find_by_place_id(place_id).await? {
            return Ok(attraction);
        }
        match self.places.details(place_id).await? {
            Some(raw) => self.store_raw(&raw).await,
            None => Err(Error::not_found("attraction not found")),
        }
    }

    /// Free-text search: local matches first, otherwise the query is proxied
    /// upstream and every result is normalized and persisted. The filter
    /// scopes local matches; upstream queries carry the scope as text.
    pub async fn search(
        &self,
        query: &str,
        filter: &AttractionFilter,
        limit: i64,
    ) -> Result<Vec<Attraction>, Error> {
        let local = self.repository.search(query, filter, limit).await?;
        if !local.is_empty() {
            return Ok(local);
        }
        debug!(query, "no local matches, delegating search upstream");
        let upstream_query = scoped_query(query, filter);
        let raw_records = self.places.search(&upstream_query).await?;
        self.store_raw_batch(raw_records, limit).await
    }

    /// Popular attractions, seeded from the upstream when the store has
    /// nothing matching the filter.
    pub async fn popular(
        &self,
        filter: &AttractionFilter,
        limit: i64,
    ) -> Result<Vec<Attraction>, Error> {
        let popular = self.repository.list_popular(filter, limit).await?;
        if !popular.is_empty() {
            return Ok(popular);
        }
        debug!("no popular attractions stored, seeding listing upstream");
        let upstream_query = scoped_query(POPULAR_FALLBACK_QUERY, filter);
        let raw_records = self.places.search(&upstream_query).await?;
        self.store_raw_batch(raw_records, limit).await
    }

    /// Attractions similar to the given one: same city or category.
    pub async fn similar(&self, place_id: &PlaceId, limit: i64) -> Result<Vec<Attraction>, Error> {
        let base = self.get(place_id).await?;
        Ok(self.repository.list_similar(&base, limit).await?)
    }

    /// Resolve and persist an attraction ahead of bookmarking it.
    ///
    /// A dead or empty upstream degrades to a minimal identifier-only record
    /// so the bookmark itself never fails on upstream weather.
    pub async fn save(&self, place_id: &PlaceId) -> Result<Attraction, Error> {
        if let Some(attraction) = self.repository.find_by_place_id(place_id).await? {
            return Ok(attraction);
        }
        match self.places.details(place_id).await {
            Ok(Some(raw)) => self.store_raw(&raw).await,
            Ok(None) => {
                warn!(%place_id, "upstream has no record, storing minimal attraction");
                Ok(self
                    .repository
                    .upsert(&Attraction::minimal(place_id.clone()))
                    .await?)
            }
            Err(PlacesSourceError::InvalidRequest(message)) => {
                Err(PlacesSourceError::InvalidRequest(message).into())
            }
            Err(error) => {
                warn!(%place_id, %error, "upstream unavailable, storing minimal attraction");
                Ok(self
                    .repository
                    .upsert(&Attraction::minimal(place_id.clone()))
                    .await?)
            }
        }
    }

    async fn store_raw(&self, raw: &Value) -> Result<Attraction, Error> {
        let normalized = normalize(raw)?;
        for warning in &normalized.warnings {
            warn!(place_id = %normalized.attraction.place_id, %warning, "partial place record");
        }
        Ok(self.repository.upsert(&normalized.attraction).await?)
    }

    /// Normalize and persist a batch of raw records, skipping the ones with
    /// no identifier.
    async fn store_raw_batch(
        &self,
        raw_records: Vec<Value>,
        limit: i64,
    ) -> Result<Vec<Attraction>, Error> {
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut stored = Vec::new();
        for raw in raw_records {
            match self.store_raw(&raw).await {
                Ok(attraction) => stored.push(attraction),
                Err(error) if error.code == crate::domain::ErrorCode::InvalidRequest => {
                    warn!(%error, "skipping upstream record without identifier");
                }
                Err(error) => return Err(error),
            }
            if stored.len() >= limit {
                break;
            }
        }
        Ok(stored)
    }
}

/// Fold the geographic scope into an upstream free-text query. The city wins
/// when both are set since it is the narrower scope.
fn scoped_query(query: &str, filter: &AttractionFilter) -> String {
    match filter.city.as_deref().or(filter.country.as_deref()) {
        Some(place) => format!("{query} in {place}"),
        None => query.to_owned(),
    }
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::test_support::{InMemoryAttractionRepository, StubPlacesSource};
    use rstest::rstest;
    use serde_json::json;

    fn service(
        repository: Arc<InMemoryAttractionRepository>,
        places: Arc<StubPlacesSource>,
    ) -> AttractionsService {
        AttractionsService::new(repository, places)
    }

    fn place_id(raw: &str) -> PlaceId {
        PlaceId::new(raw).expect("valid id")
    }

    #[rstest]
    #[tokio::test]
    async fn get_falls_back_to_upstream_details_and_caches() {
        let repository = Arc::new(InMemoryAttractionRepository::default());
        let places = Arc::new(StubPlacesSource::default());
        places.set_details("p1", json!({ "place_id": "p1", "name": "Louvre Museum" }));
        let service = service(Arc::clone(&repository), places);

        let fetched = service.get(&place_id("p1")).await.expect("resolves");
        assert_eq!(fetched.name.as_deref(), Some("Louvre Museum"));
        assert!(
            repository
                .find_by_place_id(&place_id("p1"))
                .await
                .expect("store reachable")
                .is_some()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn get_unknown_everywhere_is_not_found() {
        let service = service(
            Arc::new(InMemoryAttractionRepository::default()),
            Arc::new(StubPlacesSource::default()),
        );
        let error = service.get(&place_id("ghost")).await.expect_err("missing");
        assert_eq!(error.code, ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn search_persists_upstream_results_idempotently() {
        let repository = Arc::new(InMemoryAttractionRepository::default());
        let places = Arc::new(StubPlacesSource::default());
        places.set_search_results(vec![
            json!({ "place_id": "p1", "name": "Eiffel Tower" }),
            json!({ "name": "record without identifier" }),
        ]);
        let service = service(Arc::clone(&repository), places);

        let filter = AttractionFilter::default();
        let first = service
            .search("eiffel", &filter, 20)
            .await
            .expect("searches");
        assert_eq!(first.len(), 1);
        // A repeat search now matches locally; the store still holds one record.
        let second = service
            .search("eiffel", &filter, 20)
            .await
            .expect("searches");
        assert_eq!(second.len(), 1);
        assert_eq!(repository.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn popular_seeds_from_upstream_when_store_is_empty() {
        let repository = Arc::new(InMemoryAttractionRepository::default());
        let places = Arc::new(StubPlacesSource::default());
        places.set_search_results(vec![
            json!({ "place_id": "p1", "rating": 4.8 }),
            json!({ "place_id": "p2", "rating": 4.1 }),
        ]);
        let service = service(Arc::clone(&repository), places);

        let seeded = service
            .popular(&AttractionFilter::default(), 20)
            .await
            .expect("lists");
        assert_eq!(seeded.len(), 2);
        assert_eq!(repository.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn popular_scopes_to_the_requested_country() {
        let repository = Arc::new(InMemoryAttractionRepository::default());
        let places = Arc::new(StubPlacesSource::default());
        for (id, country) in [("p1", "France"), ("p2", "Italy"), ("p3", "france")] {
            let mut attraction = Attraction::minimal(place_id(id));
            attraction.country = Some(country.to_owned());
            repository.upsert(&attraction).await.expect("store reachable");
        }
        let service = service(repository, places);

        let filter = AttractionFilter {
            country: Some("France".into()),
            city: None,
        };
        let popular = service.popular(&filter, 20).await.expect("lists");
        let ids: Vec<&str> = popular.iter().map(|a| a.place_id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"p1"));
        assert!(ids.contains(&"p3"));
    }

    #[rstest]
    #[tokio::test]
    async fn search_scopes_local_matches_by_city() {
        let repository = Arc::new(InMemoryAttractionRepository::default());
        let places = Arc::new(StubPlacesSource::default());
        for (id, city) in [("p1", "Paris"), ("p2", "Lyon")] {
            let mut attraction = Attraction::minimal(place_id(id));
            attraction.name = Some("Museum of Art".to_owned());
            attraction.city = Some(city.to_owned());
            repository.upsert(&attraction).await.expect("store reachable");
        }
        let service = service(repository, places);

        let filter = AttractionFilter {
            country: None,
            city: Some("paris".into()),
        };
        let matches = service.search("museum", &filter, 20).await.expect("searches");
        let ids: Vec<&str> = matches.iter().map(|a| a.place_id.as_str()).collect();
        assert_eq!(ids, vec!["p1"]);
    }

    #[rstest]
    #[case(AttractionFilter::default(), "tourist attractions")]
    #[case(
        AttractionFilter { country: Some("France".into()), city: None },
        "tourist attractions in France"
    )]
    #[case(
        AttractionFilter { country: Some("France".into()), city: Some("Paris".into()) },
        "tourist attractions in Paris"
    )]
    fn scoped_query_prefers_the_narrower_place(
        #[case] filter: AttractionFilter,
        #[case] expected: &str,
    ) {
        assert_eq!(scoped_query(POPULAR_FALLBACK_QUERY, &filter), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn save_degrades_to_minimal_record_when_upstream_fails() {
        let repository = Arc::new(InMemoryAttractionRepository::default());
        let places = Arc::new(StubPlacesSource::default());
        places.fail_with(PlacesSourceError::Transport("connection refused".into()));
        let service = service(Arc::clone(&repository), places);

        let saved = service.save(&place_id("p1")).await.expect("saves anyway");
        assert_eq!(saved.place_id.as_str(), "p1");
        assert!(saved.name.is_none());
        assert_eq!(repository.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn similar_excludes_the_base_attraction() {
        let repository = Arc::new(InMemoryAttractionRepository::default());
        let places = Arc::new(StubPlacesSource::default());
        for (id, city) in [("p1", "Paris"), ("p2", "Paris"), ("p3", "Rome")] {
            let mut attraction = Attraction::minimal(place_id(id));
            attraction.city = Some(city.to_owned());
            repository.upsert(&attraction).await.expect("store reachable");
        }
        let service = service(repository, places);

        let similar = service.similar(&place_id("p1"), 20).await.expect("lists");
        let ids: Vec<&str> = similar.iter().map(|a| a.place_id.as_str()).collect();
        assert_eq!(ids, vec!["p2"]);
    }
}
