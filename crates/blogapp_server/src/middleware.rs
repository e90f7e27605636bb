//! Request logging middleware.
//!
//! Emits exactly one `http_request` event per request and echoes the generated
//! id in `x-request-id`. Server errors are logged here, with their detail.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use crate::error::FailureDetail;
use log::{error, info};
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn log_requests(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let mut response = next.run(request).await;

    let status = response.status();
    let duration_ms = started_at.elapsed().as_millis();
    if status.is_server_error() {
        let detail = response
            .extensions_mut()
            .remove::<FailureDetail>()
            .map_or_else(|| "unknown".to_string(), |detail| detail.0);
        error!(
            "event=http_request module=server status=error request_id={request_id} method={method} path={path} http_status={} duration_ms={duration_ms} error={detail}",
            status.as_u16()
        );
    } else {
        info!(
            "event=http_request module=server status=ok request_id={request_id} method={method} path={path} http_status={} duration_ms={duration_ms}",
            status.as_u16()
        );
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
