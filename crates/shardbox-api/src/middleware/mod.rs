// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Axum middleware for request ids, metrics and request logging.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use http::header::CONTENT_LENGTH;
use http::{HeaderMap, HeaderValue};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::metrics::{determine_operation, record_request};

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The unique id of the request being served, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn content_length(headers: &HeaderMap) -> u64 {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0)
}

/// Metrics and logging middleware.
///
/// Generates the request id, runs the request inside an `http_request`
/// span, stamps the id on the response and records request metrics.
pub async fn metrics_layer(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_bytes = content_length(request.headers());
    let operation = determine_operation(&method, &path);

    request.extensions_mut().insert(RequestId(request_id.clone()));

    let span = info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %path,
        operation = operation.map_or("unknown", |o| o.as_str()),
    );

    let mut response = next.run(request).instrument(span).await;

    if !response.headers().contains_key(REQUEST_ID_HEADER) {
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
    }

    if let Some(op) = operation {
        let response_bytes = content_length(response.headers());
        record_request(op, response.status().as_u16(), start.elapsed(), request_bytes, response_bytes);
    }

    response
}
