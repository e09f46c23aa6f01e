//! Transport-agnostic domain: entities, services, ports, and errors.

pub mod attraction;
pub mod attractions_service;
pub mod auth_service;
pub mod compilation;
pub mod compilations_service;
pub mod error;
pub mod normalize;
pub mod password;
pub mod ports;
pub mod user;

pub use attraction::{Attraction, AttractionFilter, Location, PlaceId};
pub use attractions_service::AttractionsService;
pub use auth_service::AuthService;
pub use compilation::{Compilation, CompilationItem, CompilationSummary, DEFAULT_COMPILATION_NAME};
pub use compilations_service::{AddOutcome, CompilationTarget, CompilationsService};
pub use error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use normalize::{NormalizedAttraction, PartialDataWarning, normalize};
pub use user::{NewUser, User, UserId};
