use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request, Response},
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{MakeSpan, OnRequest, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::{
    web::{midware, routes::routes, types::SignupOutcome, REQUEST_ID_HEADER},
    App, Result,
};

/// The core async function returning a future that will serve this application.
///
/// Accepts an `App` and layers request ids, per-request tracing and the response mapper on top
/// of the routes.
///
/// Current implementation might return an IO error from `axum::serve`
pub async fn serve(app: App) -> Result<()> {
    let App {
        app_state,
        listener,
    } = app;
    let x_request_id: HeaderName = HeaderName::from_static(REQUEST_ID_HEADER);

    let trace_layer = build_trace_layer();

    let app = Router::new().merge(routes(app_state)).layer(
        ServiceBuilder::new()
            // Set UUID per request
            .layer(SetRequestIdLayer::new(
                x_request_id.clone(),
                MakeRequestUuid,
            ))
            // The response mapper builds a fresh response for errors, so the id has to be
            // propagated after (above) it, otherwise the header would get dropped.
            .layer(PropagateRequestIdLayer::new(x_request_id))
            .layer(trace_layer)
            .layer(middleware::map_response(midware::response_mapper)),
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// Request spans carry the request id, and the `END` line reports the signup outcome when there
/// is one (the health check has none).
fn build_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    impl MakeSpan<Body> + Clone,
    impl OnRequest<Body> + Clone,
    impl OnResponse<Body> + Clone,
> {
    TraceLayer::new_for_http()
        .make_span_with(request_span)
        .on_request(log_start)
        .on_response(log_end)
}

fn request_span(req: &Request<Body>) -> Span {
    let req_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .unwrap_or_default();

    tracing::error_span!("request", req_id, method = %req.method(), path = req.uri().path())
}

fn log_start(req: &Request<Body>, _span: &Span) {
    tracing::info!("START {} {}", req.method(), req.uri().path());
}

fn log_end(res: &Response<Body>, latency: Duration, _span: &Span) {
    let status = res.status();
    let outcome = res
        .extensions()
        .get::<SignupOutcome>()
        .map(AsRef::<str>::as_ref)
        .unwrap_or("-");

    if status.is_client_error() || status.is_server_error() {
        tracing::error!(%status, outcome, ?latency, "END");
    } else {
        tracing::info!(%status, outcome, ?latency, "END");
    }
}
