//! Compilation listing and item management handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::domain::{CompilationTarget, Error};
use crate::inbound::http::schemas::{
    CompilationItemRequest, CompilationResponse, CompilationSummaryResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::AppState;
use crate::inbound::http::validation::parse_place_id;

/// List the caller's compilations with item counts.
#[utoipa::path(
    get,
    path = "/api/v1/compilations",
    tag = "compilations",
    responses(
        (status = 200, description = "The caller's compilations", body = [CompilationSummaryResponse]),
        (status = 401, description = "Not signed in", body = crate::domain::Error),
    )
)]
pub async fn list(
    state: web::Data<AppState>,
    session: SessionContext,
) -> Result<HttpResponse, Error> {
    let user = session.require_user_id()?;
    let summaries = state.compilations.list(user).await?;
    let payload: Vec<CompilationSummaryResponse> = summaries
        .into_iter()
        .map(CompilationSummaryResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(payload))
}

/// Add an attraction to a specific compilation.
#[utoipa::path(
    post,
    path = "/api/v1/compilations/{id}/add_item",
    tag = "compilations",
    params(("id" = Uuid, Path, description = "Compilation identifier")),
    request_body = CompilationItemRequest,
    responses(
        (status = 200, description = "Updated compilation", body = CompilationResponse),
        (status = 401, description = "Not signed in", body = crate::domain::Error),
        (status = 403, description = "Compilation belongs to another user", body = crate::domain::Error),
        (status = 404, description = "Unknown compilation", body = crate::domain::Error),
    )
)]
pub async fn add_item(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    body: web::Json<CompilationItemRequest>,
) -> Result<HttpResponse, Error> {
    let user = session.require_user_id()?;
    let place_id = parse_place_id(&body.place_id)?;
    let outcome = state
        .compilations
        .add_item(user, &place_id, CompilationTarget::ById(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(CompilationResponse::from(outcome.compilation)))
}

/// Remove an attraction from a specific compilation.
#[utoipa::path(
    post,
    path = "/api/v1/compilations/{id}/remove_item",
    tag = "compilations",
    params(("id" = Uuid, Path, description = "Compilation identifier")),
    request_body = CompilationItemRequest,
    responses(
        (status = 200, description = "Updated compilation", body = CompilationResponse),
        (status = 401, description = "Not signed in", body = crate::domain::Error),
        (status = 403, description = "Compilation belongs to another user", body = crate::domain::Error),
        (status = 404, description = "Unknown compilation or absent item", body = crate::domain::Error),
    )
)]
pub async fn remove_item(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    body: web::Json<CompilationItemRequest>,
) -> Result<HttpResponse, Error> {
    let user = session.require_user_id()?;
    let place_id = parse_place_id(&body.place_id)?;
    let compilation = state
        .compilations
        .remove_item(user, path.into_inner(), &place_id)
        .await?;
    Ok(HttpResponse::Ok().json(CompilationResponse::from(compilation)))
}
