use std::sync::Arc;

use axum::{
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};
use tracing::error;
use uuid::Uuid;

use crate::web::{log, Error, REQUEST_ID_HEADER};

/// Turns an `Error` stashed in the response extensions into the client facing `SignupOutcome`.
/// Server side failures get logged here with their full detail, the client only gets the outcome message.
pub async fn response_mapper(
    req_method: Method,
    uri: Uri,
    headers: HeaderMap,
    resp: Response,
) -> Response {
    let req_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let web_error = resp.extensions().get::<Arc<Error>>().map(|er| er.as_ref());
    let outcome = web_error.map(Error::outcome);

    if let (Some(er), Some(outcome)) = (web_error, outcome) {
        if outcome.status_code().is_server_error() {
            let variant: &str = er.as_ref();
            error!("{:<12} - {variant}: {er} ID: {req_id}", "SERVER_ERROR");
        }
    }

    log::log_request(&req_id, req_method, uri, resp.status(), web_error, outcome);

    outcome.map(IntoResponse::into_response).unwrap_or(resp)
}
