// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! API error types.
//!
//! Error responses carry a status code and an `x-request-id` header. The body
//! is always empty; the message only goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::middleware::REQUEST_ID_HEADER;

/// Category of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// The request was malformed (wrong content type, unreadable body).
    BadRequest,
    /// The object could not be read.
    NotFound,
    /// The object could not be stored.
    InternalError,
}

impl ApiErrorCode {
    /// Returns the code name for logs and metric labels.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BadRequest",
            Self::NotFound => "NotFound",
            Self::InternalError => "InternalError",
        }
    }

    /// Returns the HTTP status for this code.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API-level error that can be converted to an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    /// Error category.
    pub code: ApiErrorCode,
    /// Human-readable message, logged but never sent.
    pub message: String,
    /// Request ID for tracking.
    pub request_id: String,
}

impl ApiError {
    /// Create a new API error.
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self { code, message: message.into(), request_id: request_id.into() }
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), [(REQUEST_ID_HEADER, self.request_id)]).into_response()
    }
}
