//! OpenAPI document served by the Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{Attraction, Error, ErrorCode, Location, PlaceId};
use crate::inbound::http::schemas::{
    CompilationItemRequest, CompilationItemResponse, CompilationResponse,
    CompilationSummaryResponse, CredentialsRequest, ListMode, SaveAttractionRequest, UserResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Travel attraction bookmarking API",
        description = "Signup/signin, attraction search proxied from an external \
                       places service, and user-owned compilations of saved attractions."
    ),
    paths(
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::signin,
        crate::inbound::http::attractions::list,
        crate::inbound::http::attractions::get,
        crate::inbound::http::attractions::save,
        crate::inbound::http::compilations::list,
        crate::inbound::http::compilations::add_item,
        crate::inbound::http::compilations::remove_item,
    ),
    components(schemas(
        Attraction,
        Location,
        PlaceId,
        Error,
        ErrorCode,
        CredentialsRequest,
        UserResponse,
        ListMode,
        SaveAttractionRequest,
        CompilationItemRequest,
        CompilationItemResponse,
        CompilationResponse,
        CompilationSummaryResponse,
    )),
    tags(
        (name = "auth", description = "Account signup and signin"),
        (name = "attractions", description = "Attraction search and retrieval"),
        (name = "compilations", description = "User-owned compilations of saved attractions"),
        (name = "health", description = "Liveness and readiness probes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_includes_all_operations() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/health/live",
            "/health/ready",
            "/api/v1/auth/signup",
            "/api/v1/auth/signin",
            "/api/v1/attractions",
            "/api/v1/attractions/{place_id}",
            "/api/v1/attractions/save",
            "/api/v1/compilations",
            "/api/v1/compilations/{id}/add_item",
            "/api/v1/compilations/{id}/remove_item",
        ] {
            assert!(
                paths.iter().any(|path| path.as_str() == expected),
                "missing path {expected}"
            );
        }
    }
}
