//! Signup and signin handlers.

use actix_web::{HttpResponse, web};

use crate::domain::Error;
use crate::inbound::http::schemas::{CredentialsRequest, UserResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::AppState;

/// Register an account and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created, session established", body = UserResponse),
        (status = 400, description = "Malformed credentials or duplicate email", body = crate::domain::Error),
    )
)]
pub async fn signup(
    state: web::Data<AppState>,
    session: SessionContext,
    body: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, Error> {
    let user = state.auth.signup(&body.email, &body.password).await?;
    session.sign_in(user.id)?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Verify credentials and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signin",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in, session established", body = UserResponse),
        (status = 401, description = "Invalid credentials", body = crate::domain::Error),
    )
)]
pub async fn signin(
    state: web::Data<AppState>,
    session: SessionContext,
    body: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, Error> {
    let user = state.auth.signin(&body.email, &body.password).await?;
    session.sign_in(user.id)?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
