//! Attraction entities.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::Error;

/// Validated external place identifier. Never empty.
///
/// # Examples
/// ```
/// use backend::domain::PlaceId;
///
/// let id = PlaceId::new("p1").expect("non-empty id");
/// assert_eq!(id.as_str(), "p1");
/// assert!(PlaceId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "ChIJLU7jZClu5kcR4PcOOO6p3I0")]
pub struct PlaceId(String);

impl PlaceId {
    /// Construct a place identifier, rejecting empty or blank input.
    pub fn new(raw: impl Into<String>) -> Result<Self, Error> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(Error::invalid_request("missing required field: place_id")
                .with_details(serde_json::json!({ "field": "place_id" })));
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PlaceId {
    type Error = Error;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<PlaceId> for String {
    fn from(id: PlaceId) -> Self {
        id.0
    }
}

/// Geographic coordinates. Each axis is independently nullable so a partially
/// geocoded record keeps the shape `{ "lat": ..., "lng": ... }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Location {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lat.is_none() && self.lng.is_none()
    }
}

/// Optional geographic scoping for listings: match on country and/or city,
/// case-insensitively. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttractionFilter {
    pub country: Option<String>,
    pub city: Option<String>,
}

impl AttractionFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.city.is_none()
    }
}

/// A tourist attraction in canonical form.
///
/// Only `place_id` is guaranteed; everything else degrades to `None`, an
/// empty collection, or zero when the upstream record lacks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Attraction {
    pub place_id: PlaceId,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub types: Vec<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: i32,
    pub price_level: Option<i32>,
    pub location: Location,
    pub photo_reference: Option<String>,
    pub photos_count: i32,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    #[schema(value_type = Object)]
    pub opening_hours: Option<Value>,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub raw_data: Option<Value>,
    pub likes: i32,
    pub is_featured: bool,
}

impl Attraction {
    /// A placeholder record carrying nothing but the identifier. Used when an
    /// attraction must be persisted but the upstream lookup yielded nothing.
    #[must_use]
    pub fn minimal(place_id: PlaceId) -> Self {
        Self {
            place_id,
            name: None,
            formatted_address: None,
            country: None,
            city: None,
            category: None,
            types: Vec::new(),
            rating: None,
            user_ratings_total: 0,
            price_level: None,
            location: Location::default(),
            photo_reference: None,
            photos_count: 0,
            website: None,
            phone_number: None,
            opening_hours: None,
            raw_data: None,
            likes: 0,
            is_featured: false,
        }
    }
}
