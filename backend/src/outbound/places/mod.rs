//! Adapter for the external places-lookup service.

mod http_source;

pub use http_source::{PlacesConfig, PlacesHttpSource};
