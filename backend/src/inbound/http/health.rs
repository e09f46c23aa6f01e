//! Liveness and readiness probes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::inbound::http::state::AppState;

/// Readiness flag flipped once startup wiring (pool checks, migrations)
/// completes.
#[derive(Clone, Default)]
pub struct HealthState {
    ready: Arc<AtomicBool>,
}

impl HealthState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

#[derive(Serialize, ToSchema)]
struct ProbeResponse {
    status: &'static str,
}

/// Process liveness. Always `200` while the server can answer at all.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn live() -> HttpResponse {
    HttpResponse::Ok().json(ProbeResponse { status: "alive" })
}

/// Readiness to serve traffic.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready to serve traffic"),
        (status = 503, description = "Still starting up"),
    )
)]
pub async fn ready(state: web::Data<AppState>) -> HttpResponse {
    if state.health.is_ready() {
        HttpResponse::Ok().json(ProbeResponse { status: "ready" })
    } else {
        HttpResponse::ServiceUnavailable().json(ProbeResponse {
            status: "starting",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_state_starts_not_ready() {
        let state = HealthState::new();
        assert!(!state.is_ready());
        state.mark_ready();
        assert!(state.is_ready());
    }
}
