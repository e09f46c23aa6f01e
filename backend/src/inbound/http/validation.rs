//! Request validation helpers shared by handlers.

use crate::domain::{Error, PlaceId};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 50;

/// Clamp a caller-supplied result limit into the served range.
#[must_use]
pub fn clamp_limit(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Parse a place identifier out of a request field.
pub fn parse_place_id(raw: &str) -> Result<PlaceId, Error> {
    PlaceId::new(raw)
}

/// Trim an optional text field, treating blank input as absent.
#[must_use]
pub fn trimmed(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
