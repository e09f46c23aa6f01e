//! Identity resolution for raw place records.
//!
//! External place payloads arrive in whatever shape the upstream produced.
//! [`normalize`] shapes them into a canonical [`Attraction`]: only a missing
//! identifier is fatal, every other gap is reported as a
//! [`PartialDataWarning`] while still yielding a usable record.

use serde_json::Value;

use crate::domain::attraction::{Attraction, Location, PlaceId};
use crate::domain::error::Error;

/// Place types too generic to serve as a category.
const GENERIC_TYPES: [&str; 2] = ["point_of_interest", "establishment"];

/// Non-fatal gap detected while normalizing a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialDataWarning {
    MissingName,
    MissingLocation,
    MissingPhotoReference,
    MissingAddress,
}

impl std::fmt::Display for PartialDataWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::MissingName => "missing name",
            Self::MissingLocation => "missing location",
            Self::MissingPhotoReference => "missing photo reference",
            Self::MissingAddress => "missing formatted address",
        };
        f.write_str(text)
    }
}

/// A normalized attraction together with any gaps found on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAttraction {
    pub attraction: Attraction,
    pub warnings: Vec<PartialDataWarning>,
}

/// Normalize a raw place record into an [`Attraction`].
///
/// Accepts `id` as an alias for `place_id` and `photos[*].ref` as an alias
/// for `photos[*].photo_reference`. Deterministic: the same input always
/// yields the same attraction.
///
/// # Errors
/// Returns `invalid_request` when the record carries no identifier. All other
/// omissions degrade into warnings.
///
/// # Examples
/// ```
/// use backend::domain::normalize;
/// use serde_json::json;
///
/// let raw = json!({
///     "id": "p1",
///     "geometry": { "location": { "lat": 48.8, "lng": 2.3 } },
///     "photos": [{ "ref": "abc" }],
/// });
/// let normalized = normalize(&raw).expect("identifier present");
/// assert_eq!(normalized.attraction.place_id.as_str(), "p1");
/// assert_eq!(normalized.attraction.location.lat, Some(48.8));
/// assert_eq!(normalized.attraction.photo_reference.as_deref(), Some("abc"));
/// ```
pub fn normalize(raw: &Value) -> Result<NormalizedAttraction, Error> {
    let place_id = string_field(raw, "place_id")
        .or_else(|| string_field(raw, "id"))
        .map(PlaceId::new)
        .transpose()?
        .ok_or_else(|| {
            Error::invalid_request("missing required field: place_id")
                .with_details(serde_json::json!({ "field": "place_id" }))
        })?;

    let mut warnings = Vec::new();

    let name = string_field(raw, "name");
    if name.is_none() {
        warnings.push(PartialDataWarning::MissingName);
    }

    let formatted_address = string_field(raw, "formatted_address");
    if formatted_address.is_none() {
        warnings.push(PartialDataWarning::MissingAddress);
    }

    let location = extract_location(raw);
    if location.is_empty() {
        warnings.push(PartialDataWarning::MissingLocation);
    }

    let photos = raw
        .get("photos")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let photo_reference = string_field(raw, "photo_reference").or_else(|| {
        photos.first().and_then(|photo| {
            string_field(photo, "photo_reference").or_else(|| string_field(photo, "ref"))
        })
    });
    if photo_reference.is_none() {
        warnings.push(PartialDataWarning::MissingPhotoReference);
    }

    let types: Vec<String> = raw
        .get("types")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();
    let category = types
        .iter()
        .find(|entry| !GENERIC_TYPES.contains(&entry.as_str()))
        .cloned();

    let (country, city) = extract_address_components(raw);

    let attraction = Attraction {
        place_id,
        name,
        formatted_address,
        country,
        city,
        category,
        types,
        rating: raw.get("rating").and_then(Value::as_f64),
        user_ratings_total: int_field(raw, "user_ratings_total").unwrap_or(0),
        price_level: int_field(raw, "price_level"),
        location,
        photo_reference,
        photos_count: i32::try_from(photos.len()).unwrap_or(i32::MAX),
        website: string_field(raw, "website"),
        phone_number: string_field(raw, "formatted_phone_number")
            .or_else(|| string_field(raw, "phone_number")),
        opening_hours: raw.get("opening_hours").cloned(),
        raw_data: Some(raw.clone()),
        likes: 0,
        is_featured: false,
    };

    Ok(NormalizedAttraction {
        attraction,
        warnings,
    })
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_owned)
}

fn int_field(value: &Value, key: &str) -> Option<i32> {
    value
        .get(key)
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok())
}

fn extract_location(raw: &Value) -> Location {
    let point = raw
        .pointer("/geometry/location")
        .or_else(|| raw.get("location"));
    match point {
        Some(point) => Location {
            lat: point.get("lat").and_then(Value::as_f64),
            lng: point.get("lng").and_then(Value::as_f64),
        },
        None => Location::default(),
    }
}

/// Derive country and city from `address_components`. The city is the
/// `locality` entry, falling back to `postal_town`.
fn extract_address_components(raw: &Value) -> (Option<String>, Option<String>) {
    let Some(components) = raw.get("address_components").and_then(Value::as_array) else {
        return (None, None);
    };
    let mut country = None;
    let mut locality = None;
    let mut postal_town = None;
    for component in components {
        let Some(kinds) = component.get("types").and_then(Value::as_array) else {
            continue;
        };
        let has = |kind: &str| kinds.iter().any(|entry| entry.as_str() == Some(kind));
        let long_name = string_field(component, "long_name");
        if country.is_none() && has("country") {
            country = long_name.clone();
        }
        if locality.is_none() && has("locality") {
            locality = long_name.clone();
        }
        if postal_town.is_none() && has("postal_town") {
            postal_town = long_name;
        }
    }
    (country, locality.or(postal_town))
}
