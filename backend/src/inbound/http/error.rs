//! Mapping domain errors onto HTTP responses.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue};
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Strip internals before they reach a client. The trace id survives so the
/// failure can still be located in the logs.
fn redact_if_internal(mut payload: Error) -> Error {
    if payload.code == ErrorCode::InternalError {
        payload.message = "internal server error".to_owned();
        payload.details = None;
    }
    payload
}

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = ?self.code, message = %self.message, "request failed");
        } else {
            debug!(code = ?self.code, message = %self.message, "request rejected");
        }
        let payload = redact_if_internal(self.clone());
        let mut builder = HttpResponse::build(status);
        if let Some(trace_id) = payload.trace_id.as_deref()
            && let Ok(value) = HeaderValue::from_str(trace_id)
        {
            builder.insert_header((HeaderName::from_static(TRACE_ID_HEADER), value));
        }
        builder.json(payload)
    }
}
