//! Request ID middleware for correlating probe results with server logs.
//!
//! Every request runs inside an `info_span!("request")` carrying its id. A
//! caller that already sent a UUID in `x-request-id` (a load balancer or a
//! tracing proxy) keeps it; anything else gets a fresh v4 UUID. The id is
//! always echoed back in the response header.

use std::time::Instant;

use axum::http::{HeaderMap, HeaderValue};
use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::REQUEST_ID_HEADER;

/// Request id supplied by the caller, if it is a well-formed UUID.
fn incoming_request_id(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?;
    Uuid::parse_str(value.trim()).ok()
}

/// Outermost layer: assigns the request id, wraps routing and the handler in
/// the request span and logs completion with status and latency.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(request.headers()).unwrap_or_else(Uuid::new_v4);
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    span.record("duration_ms", duration_ms);
    span.in_scope(|| {
        tracing::info!(status = response.status().as_u16(), "Request completed");
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.hyphenated().to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
