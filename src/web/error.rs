use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use super::types::SignupOutcome;
use crate::webhook_client;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("name or email missing from the signup request")]
    MissingNameOrEmail,
    #[error("webhook url is not set")]
    WebhookNotConfigured,

    #[error("failed to parse the request body: {0}")]
    BodyParsing(#[from] serde_json::Error),
    #[error("webhook client error: {0}")]
    WebhookClient(#[from] webhook_client::Error),
}

impl Error {
    /// The only part of an error that the client ever gets to see.
    pub fn outcome(&self) -> SignupOutcome {
        match self {
            Error::MissingNameOrEmail => SignupOutcome::ValidationError,
            Error::WebhookNotConfigured => SignupOutcome::ConfigurationError,
            Error::WebhookClient(webhook_client::Error::Upstream { .. }) => {
                SignupOutcome::UpstreamError
            }
            _ => SignupOutcome::UnexpectedError,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that the response mapper can retrieve it later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}
