use axum::{body::Bytes, extract::State};
use tracing::{info, Span};

use crate::{
    web::{
        types::{SignupOutcome, SignupRequest, ValidSignup},
        Error, Result,
    },
    AppState,
};

/// Validates the signup and relays it to the configured webhook, exactly once.
///
/// The body is read as raw bytes so that a malformed body ends up as our own `Error::BodyParsing`
/// instead of an axum rejection, and so that the `Content-Type` header isn't required.
#[tracing::instrument(
    name = "Relaying waitlist signup",
    skip(app_state, body),
    fields(signup_name = tracing::field::Empty, signup_email = tracing::field::Empty)
)]
pub async fn waitlist(State(app_state): State<AppState>, body: Bytes) -> Result<SignupOutcome> {
    let signup = ValidSignup::try_from(SignupRequest::from_json_slice(&body)?)?;

    let span = Span::current();
    span.record("signup_name", signup.name.as_str());
    span.record("signup_email", signup.email.as_str());

    let relay = app_state.relay().ok_or(Error::WebhookNotConfigured)?;
    relay.submit(&signup.payload()).await?;

    info!("{:<12} - signup relayed", "WAITLIST");
    Ok(SignupOutcome::Success)
}
