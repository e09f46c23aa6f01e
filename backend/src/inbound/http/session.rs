//! Cookie-session helpers.
//!
//! [`SessionContext`] wraps the actix-session [`Session`] so handlers deal in
//! [`UserId`]s and domain errors instead of raw session plumbing.

use actix_session::Session;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::domain::{Error, UserId};

const USER_ID_KEY: &str = "user_id";

/// Extractor giving handlers typed access to the request's session.
pub struct SessionContext {
    session: Session,
}

impl SessionContext {
    /// The signed-in user, or `unauthorized` when the session carries none.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("authentication required"))
    }

    /// The signed-in user, if any.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let stored = self
            .session
            .get::<Uuid>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("session read failed: {error}")))?;
        Ok(stored.map(UserId::from_uuid))
    }

    /// Establish a session for the given user, discarding any previous one.
    pub fn sign_in(&self, user: UserId) -> Result<(), Error> {
        self.session.renew();
        self.session
            .insert(USER_ID_KEY, user.as_uuid())
            .map_err(|error| Error::internal(format!("session write failed: {error}")))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        ready(
            Session::from_request(req, payload)
                .into_inner()
                .map(|session| Self { session }),
        )
    }
}
