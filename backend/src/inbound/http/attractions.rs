//! Attraction browsing and saving handlers.

use actix_web::{HttpResponse, web};

use crate::domain::{AttractionFilter, CompilationTarget, Error};
use crate::inbound::http::schemas::{
    AttractionsQuery, CompilationResponse, ListMode, SaveAttractionRequest,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::AppState;
use crate::inbound::http::validation::{clamp_limit, parse_place_id, trimmed};

/// List attractions: popular by default, free-text search with `q`, or
/// `mode=similar` around a base `place_id`.
#[utoipa::path(
    get,
    path = "/api/v1/attractions",
    tag = "attractions",
    params(AttractionsQuery),
    responses(
        (status = 200, description = "Matching attractions", body = [crate::domain::Attraction]),
        (status = 400, description = "Malformed query", body = crate::domain::Error),
        (status = 502, description = "Places service unavailable", body = crate::domain::Error),
    )
)]
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<AttractionsQuery>,
) -> Result<HttpResponse, Error> {
    let limit = clamp_limit(query.limit);
    let filter = AttractionFilter {
        country: trimmed(query.country.as_deref()),
        city: trimmed(query.city.as_deref()),
    };
    let attractions = match (query.mode, query.q.as_deref()) {
        (Some(ListMode::Similar), _) => {
            let base = query.place_id.as_deref().ok_or_else(|| {
                Error::invalid_request("mode=similar requires place_id")
                    .with_details(serde_json::json!({ "field": "place_id" }))
            })?;
            state
                .attractions
                .similar(&parse_place_id(base)?, limit)
                .await?
        }
        (Some(ListMode::Popular), _) => state.attractions.popular(&filter, limit).await?,
        (None, Some(q)) if !q.trim().is_empty() => {
            state.attractions.search(q.trim(), &filter, limit).await?
        }
        (None, _) => state.attractions.popular(&filter, limit).await?,
    };
    Ok(HttpResponse::Ok().json(attractions))
}

/// Fetch a single attraction by place identifier.
#[utoipa::path(
    get,
    path = "/api/v1/attractions/{place_id}",
    tag = "attractions",
    params(("place_id" = String, Path, description = "External place identifier")),
    responses(
        (status = 200, description = "The attraction", body = crate::domain::Attraction),
        (status = 404, description = "Unknown attraction", body = crate::domain::Error),
    )
)]
pub async fn get(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let place_id = parse_place_id(&path.into_inner())?;
    let attraction = state.attractions.get(&place_id).await?;
    Ok(HttpResponse::Ok().json(attraction))
}

/// Save an attraction into one of the caller's compilations.
///
/// Without a target the item lands in the caller's default compilation.
/// Responds `201` when a compilation had to be created to receive the item.
#[utoipa::path(
    post,
    path = "/api/v1/attractions/save",
    tag = "attractions",
    request_body = SaveAttractionRequest,
    responses(
        (status = 200, description = "Saved into an existing compilation", body = CompilationResponse),
        (status = 201, description = "Saved into a newly created compilation", body = CompilationResponse),
        (status = 401, description = "Not signed in", body = crate::domain::Error),
        (status = 403, description = "Compilation belongs to another user", body = crate::domain::Error),
        (status = 404, description = "Unknown compilation", body = crate::domain::Error),
    )
)]
pub async fn save(
    state: web::Data<AppState>,
    session: SessionContext,
    body: web::Json<SaveAttractionRequest>,
) -> Result<HttpResponse, Error> {
    let user = session.require_user_id()?;
    let body = body.into_inner();
    let place_id = parse_place_id(&body.place_id)?;
    let target = match (body.compilation_id, body.compilation_name) {
        (Some(id), _) => CompilationTarget::ById(id),
        (None, Some(name)) => CompilationTarget::ByName(name),
        (None, None) => CompilationTarget::Default,
    };
    let outcome = state.compilations.add_item(user, &place_id, target).await?;
    let payload = CompilationResponse::from(outcome.compilation);
    if outcome.created {
        Ok(HttpResponse::Created().json(payload))
    } else {
        Ok(HttpResponse::Ok().json(payload))
    }
}
