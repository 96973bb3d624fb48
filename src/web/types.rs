use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use strum_macros::AsRefStr;

use super::Error;

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable signup.
/// Missing fields and JSON `null`s both end up as `None`, they get rejected in validation.
#[derive(Deserialize, Debug, Default)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Validated signup.
/// Both fields are present and non-empty. Nothing is trimmed or normalized,
/// and the email format is intentionally not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignup {
    pub name: String,
    pub email: String,
}

/// The body sent to the webhook.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct WebhookPayload<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

/// Every way a waitlist signup can end, as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum SignupOutcome {
    Success,
    ValidationError,
    ConfigurationError,
    UpstreamError,
    UnexpectedError,
}

// ###################################
// ->   IMPLS
// ###################################
impl SignupRequest {
    /// Reads a signup out of a raw JSON body.
    ///
    /// Only the fields of a JSON object count: arrays and scalars carry no `name` or `email`,
    /// so they parse into an empty request and fail validation. A top level `null` or invalid
    /// JSON is a parsing error.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, Error> {
        let request = match serde_json::from_slice(body)? {
            value @ (Value::Object(_) | Value::Null) => serde_json::from_value(value)?,
            _ => SignupRequest::default(),
        };
        Ok(request)
    }
}

impl TryFrom<SignupRequest> for ValidSignup {
    type Error = Error;

    fn try_from(request: SignupRequest) -> Result<Self, Self::Error> {
        match (request.name, request.email) {
            (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => {
                Ok(ValidSignup { name, email })
            }
            _ => Err(Error::MissingNameOrEmail),
        }
    }
}

impl ValidSignup {
    pub fn payload(&self) -> WebhookPayload<'_> {
        WebhookPayload {
            name: &self.name,
            email: &self.email,
        }
    }
}

impl SignupOutcome {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationError => StatusCode::BAD_REQUEST,
            Self::ConfigurationError | Self::UpstreamError | Self::UnexpectedError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Successfully joined waitlist",
            Self::ValidationError => "Missing name or email",
            Self::ConfigurationError => "Server configuration error",
            Self::UpstreamError => "Failed to submit data",
            Self::UnexpectedError => "Internal Server Error",
        }
    }
}

impl IntoResponse for SignupOutcome {
    fn into_response(self) -> Response {
        let mut res =
            (self.status_code(), Json(json!({ "message": self.message() }))).into_response();
        // Picked up by the trace layer for the `END` line.
        res.extensions_mut().insert(self);
        res
    }
}
