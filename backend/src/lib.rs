//! REST backend for a travel-attraction bookmarking application.
//!
//! Hexagonal layout: `domain` holds entities, services, and ports;
//! `inbound::http` is the Actix Web adapter; `outbound` implements the ports
//! against PostgreSQL and the external places service.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(feature = "test-support")]
pub mod test_support;

pub use domain::{Error, ErrorCode};
pub use middleware::trace::{Trace, TraceId};
