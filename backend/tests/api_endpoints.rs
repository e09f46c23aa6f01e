//! End-to-end tests of the REST surface against in-memory adapters.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use backend::Trace;
use backend::domain::{AttractionsService, AuthService, CompilationsService};
use backend::inbound::http::{self, state::AppState};
use backend::test_support::{
    InMemoryAttractionRepository, InMemoryCompilationRepository, InMemoryUserRepository,
    StubPlacesSource,
};

fn build_state(places: Arc<StubPlacesSource>) -> AppState {
    let attractions = Arc::new(AttractionsService::new(
        Arc::new(InMemoryAttractionRepository::default()),
        places,
    ));
    AppState::new(
        Arc::new(AuthService::new(Arc::new(
            InMemoryUserRepository::default(),
        ))),
        Arc::clone(&attractions),
        Arc::new(CompilationsService::new(
            Arc::new(InMemoryCompilationRepository::default()),
            attractions,
        )),
    )
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(http::configure)
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_secure(false)
                        .build(),
                )
                .wrap(Trace),
        )
        .await
    };
}

async fn signup<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(json!({ "email": email, "password": "wanderlust1" }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    res.response()
        .cookies()
        .next()
        .expect("session cookie")
        .into_owned()
}

#[actix_web::test]
async fn signup_establishes_a_usable_session() {
    let app = init_app!(build_state(Arc::new(StubPlacesSource::default())));
    let cookie = signup(&app, "traveler@example.com").await;

    let req = test::TestRequest::get()
        .uri("/api/v1/compilations")
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn duplicate_signup_is_rejected() {
    let app = init_app!(build_state(Arc::new(StubPlacesSource::default())));
    signup(&app, "traveler@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(json!({ "email": "traveler@example.com", "password": "other-password" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn signin_with_bad_credentials_is_generic_unauthorized() {
    let app = init_app!(build_state(Arc::new(StubPlacesSource::default())));
    signup(&app, "traveler@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signin")
        .set_json(json!({ "email": "traveler@example.com", "password": "not-the-password" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["message"], "Invalid credentials");
}

#[actix_web::test]
async fn protected_routes_require_a_session() {
    let app = init_app!(build_state(Arc::new(StubPlacesSource::default())));
    let req = test::TestRequest::get()
        .uri("/api/v1/compilations")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
async fn search_normalizes_and_serves_upstream_records() {
    let places = Arc::new(StubPlacesSource::default());
    places.set_search_results(vec![json!({
        "id": "p1",
        "geometry": { "location": { "lat": 48.8, "lng": 2.3 } },
        "photos": [{ "ref": "abc" }],
    })]);
    let app = init_app!(build_state(places));

    let req = test::TestRequest::get()
        .uri("/api/v1/attractions?q=louvre")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body[0]["place_id"], "p1");
    assert_eq!(body[0]["location"], json!({ "lat": 48.8, "lng": 2.3 }));
    assert_eq!(body[0]["photo_reference"], "abc");
}

#[actix_web::test]
async fn popular_listing_scopes_to_the_requested_country() {
    let places = Arc::new(StubPlacesSource::default());
    places.set_search_results(vec![
        json!({
            "place_id": "p1",
            "name": "Eiffel Tower",
            "address_components": [
                { "long_name": "Paris", "types": ["locality"] },
                { "long_name": "France", "types": ["country"] },
            ],
        }),
        json!({
            "place_id": "p2",
            "name": "Colosseum",
            "address_components": [
                { "long_name": "Rome", "types": ["locality"] },
                { "long_name": "Italy", "types": ["country"] },
            ],
        }),
    ]);
    let app = init_app!(build_state(places));

    // Seed the store through an unscoped listing.
    let req = test::TestRequest::get()
        .uri("/api/v1/attractions")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let req = test::TestRequest::get()
        .uri("/api/v1/attractions?country=france")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["place_id"], "p1");
    assert_eq!(body[0]["country"], "France");
}

#[actix_web::test]
async fn unknown_attraction_is_not_found() {
    let app = init_app!(build_state(Arc::new(StubPlacesSource::default())));
    let req = test::TestRequest::get()
        .uri("/api/v1/attractions/ghost")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn attraction_detail_falls_back_to_upstream() {
    let places = Arc::new(StubPlacesSource::default());
    places.set_details("p1", json!({ "place_id": "p1", "name": "Louvre Museum" }));
    let app = init_app!(build_state(places));

    let req = test::TestRequest::get()
        .uri("/api/v1/attractions/p1")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "Louvre Museum");
}

#[actix_web::test]
async fn save_creates_default_compilation_then_deduplicates() {
    let app = init_app!(build_state(Arc::new(StubPlacesSource::default())));
    let cookie = signup(&app, "traveler@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/attractions/save")
        .cookie(cookie.clone())
        .set_json(json!({ "place_id": "p1" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "My Trip");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::post()
        .uri("/api/v1/attractions/save")
        .cookie(cookie)
        .set_json(json!({ "place_id": "p1" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn save_into_a_named_compilation_creates_it() {
    let app = init_app!(build_state(Arc::new(StubPlacesSource::default())));
    let cookie = signup(&app, "traveler@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/attractions/save")
        .cookie(cookie)
        .set_json(json!({ "place_id": "p1", "compilation_name": "Paris" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "Paris");
    assert_eq!(body["items"][0]["place_id"], "p1");
}

#[actix_web::test]
async fn foreign_compilations_are_off_limits() {
    let app = init_app!(build_state(Arc::new(StubPlacesSource::default())));
    let owner_cookie = signup(&app, "owner@example.com").await;
    let intruder_cookie = signup(&app, "intruder@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/attractions/save")
        .cookie(owner_cookie.clone())
        .set_json(json!({ "place_id": "p1" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(res).await;
    let compilation_id = body["id"].as_str().expect("compilation id").to_owned();

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/compilations/{compilation_id}/remove_item"
        ))
        .cookie(intruder_cookie)
        .set_json(json!({ "place_id": "p1" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "forbidden");

    // The owner's compilation is unchanged.
    let req = test::TestRequest::get()
        .uri("/api/v1/compilations")
        .cookie(owner_cookie)
        .to_request();
    let res = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body[0]["item_count"], 1);
}

#[actix_web::test]
async fn removing_an_absent_item_is_not_found() {
    let app = init_app!(build_state(Arc::new(StubPlacesSource::default())));
    let cookie = signup(&app, "traveler@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/attractions/save")
        .cookie(cookie.clone())
        .set_json(json!({ "place_id": "p1" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(res).await;
    let compilation_id = body["id"].as_str().expect("compilation id").to_owned();

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/compilations/{compilation_id}/remove_item"
        ))
        .cookie(cookie)
        .set_json(json!({ "place_id": "never-added" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn add_then_remove_round_trips_through_a_compilation() {
    let app = init_app!(build_state(Arc::new(StubPlacesSource::default())));
    let cookie = signup(&app, "traveler@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/attractions/save")
        .cookie(cookie.clone())
        .set_json(json!({ "place_id": "p1" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(res).await;
    let compilation_id = body["id"].as_str().expect("compilation id").to_owned();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/compilations/{compilation_id}/add_item"))
        .cookie(cookie.clone())
        .set_json(json!({ "place_id": "p2" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/compilations/{compilation_id}/remove_item"
        ))
        .cookie(cookie)
        .set_json(json!({ "place_id": "p1" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["items"][0]["place_id"], "p2");
}

#[actix_web::test]
async fn malformed_query_strings_use_the_error_envelope() {
    let app = init_app!(build_state(Arc::new(StubPlacesSource::default())));
    for uri in [
        "/api/v1/attractions?limit=abc",
        "/api/v1/attractions?mode=bogus",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "uri {uri}");
        let content_type = res
            .headers()
            .get("content-type")
            .expect("content type")
            .to_str()
            .expect("ascii header")
            .to_owned();
        assert!(content_type.starts_with("application/json"), "uri {uri}");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request", "uri {uri}");
    }
}

#[actix_web::test]
async fn malformed_path_parameters_use_the_error_envelope() {
    let app = init_app!(build_state(Arc::new(StubPlacesSource::default())));
    let req = test::TestRequest::post()
        .uri("/api/v1/compilations/not-a-uuid/add_item")
        .set_json(json!({ "place_id": "p1" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn malformed_bodies_use_the_error_envelope() {
    let app = init_app!(build_state(Arc::new(StubPlacesSource::default())));
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}
