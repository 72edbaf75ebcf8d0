// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! HTTP API metrics definitions.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};

/// API operation type for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Read an object.
    GetObject,
    /// Store an object.
    PutObject,
    /// Liveness check.
    Health,
}

impl Operation {
    /// Returns the operation name as a string for metric labels.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetObject => "GetObject",
            Self::PutObject => "PutObject",
            Self::Health => "Health",
        }
    }
}

/// Initialize metric descriptions (call once at startup).
pub fn init_metrics() {
    describe_counter!("shardbox_requests_total", "Total number of API requests");
    describe_histogram!("shardbox_request_duration_seconds", "Request duration in seconds");
    describe_counter!("shardbox_request_bytes_total", "Total bytes received in requests");
    describe_counter!("shardbox_response_bytes_total", "Total bytes sent in responses");
}

/// Record a completed request.
pub fn record_request(
    operation: Operation,
    status_code: u16,
    duration: Duration,
    request_bytes: u64,
    response_bytes: u64,
) {
    let op = operation.as_str();
    let status = status_class(status_code);

    counter!("shardbox_requests_total", "operation" => op, "status" => status).increment(1);
    histogram!("shardbox_request_duration_seconds", "operation" => op, "status" => status)
        .record(duration.as_secs_f64());

    if request_bytes > 0 {
        counter!("shardbox_request_bytes_total", "operation" => op).increment(request_bytes);
    }
    if response_bytes > 0 {
        counter!("shardbox_response_bytes_total", "operation" => op).increment(response_bytes);
    }
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Determine the API operation from HTTP method and path.
#[must_use]
pub fn determine_operation(method: &http::Method, path: &str) -> Option<Operation> {
    if path == "/ok" {
        return (*method == http::Method::GET).then_some(Operation::Health);
    }

    let id = path.strip_prefix("/object/").filter(|id| !id.is_empty())?;
    if id.contains('/') {
        return None;
    }

    match *method {
        http::Method::GET => Some(Operation::GetObject),
        http::Method::PUT => Some(Operation::PutObject),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use http::Method;

    use super::*;

    #[test]
    fn test_determine_operation() {
        assert_eq!(determine_operation(&Method::GET, "/object/id-03"), Some(Operation::GetObject));
        assert_eq!(determine_operation(&Method::PUT, "/object/id-03"), Some(Operation::PutObject));
        assert_eq!(determine_operation(&Method::GET, "/ok"), Some(Operation::Health));
    }

    #[test]
    fn test_unknown_operations() {
        assert_eq!(determine_operation(&Method::DELETE, "/object/id-03"), None);
        assert_eq!(determine_operation(&Method::GET, "/object/"), None);
        assert_eq!(determine_operation(&Method::GET, "/object/a/b"), None);
        assert_eq!(determine_operation(&Method::POST, "/ok"), None);
        assert_eq!(determine_operation(&Method::GET, "/"), None);
    }

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(201), "2xx");
        assert_eq!(status_class(404), "4xx");
        assert_eq!(status_class(500), "5xx");
        assert_eq!(status_class(99), "other");
    }
}
