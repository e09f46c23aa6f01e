//! Shared application state handed to handlers.

use std::sync::Arc;

use crate::domain::{AttractionsService, AuthService, CompilationsService};
use crate::inbound::http::health::HealthState;

/// Services and probes shared across workers via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub attractions: Arc<AttractionsService>,
    pub compilations: Arc<CompilationsService>,
    pub health: HealthState,
}

impl AppState {
    pub fn new(
        auth: Arc<AuthService>,
        attractions: Arc<AttractionsService>,
        compilations: Arc<CompilationsService>,
    ) -> Self {
        Self {
            auth,
            attractions,
            compilations,
            health: HealthState::new(),
        }
    }
}
