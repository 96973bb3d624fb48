use axum::http::{Method, StatusCode, Uri};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::types::SignupOutcome;
use crate::web::Error;

pub fn log_request(
    req_id: &str,
    req_method: Method,
    uri: Uri,
    status_code: StatusCode,
    web_error: Option<&Error>,
    outcome: Option<SignupOutcome>,
) {
    let status_code = outcome
        .map(|oc| oc.status_code())
        .unwrap_or(status_code)
        .as_u16();

    let logline = LogLine {
        timestamp: chrono::Utc::now().to_rfc3339(),
        req_id,
        req_method: req_method.to_string(),
        uri: uri.to_string(),
        status_code,
        outcome: outcome.map(|oc| AsRef::<str>::as_ref(&oc).to_string()),
        web_error_type: web_error.map(|we| AsRef::<str>::as_ref(we).to_string()),
        web_error_detail: web_error.map(|we| we.to_string()),
    };

    debug!("LOGLINE: {}", json!(logline));
}

#[derive(Serialize)]
struct LogLine<'a> {
    timestamp: String,
    req_id: &'a str,

    req_method: String,
    uri: String,
    status_code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_error_detail: Option<String>,
}
