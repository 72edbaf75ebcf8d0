// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Object handlers.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use shardbox_core::ObjectId;
use shardbox_storage::{collect_stream, stream_from_bytes};
use tracing::{debug, error, warn};

use crate::error::{ApiError, ApiErrorCode};
use crate::handlers::AppState;
use crate::middleware::RequestId;

/// The only content type accepted for uploads, and the one reads return.
pub const OBJECT_CONTENT_TYPE: &str = "application/octet-stream";

fn parse_id(raw: &str, request_id: &RequestId) -> Result<ObjectId, ApiError> {
    ObjectId::parse(raw)
        .map_err(|e| ApiError::new(ApiErrorCode::BadRequest, e.to_string(), request_id.as_str()))
}

/// `GET /object/{id}`: read an object through the shard router.
///
/// The object is fully buffered before the response starts, so a failure
/// anywhere in the read is reported as 404.
pub async fn get_object(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id, &request_id)?;

    let not_found = |message: String| {
        warn!(id = %id, error = %message, "Object read failed");
        ApiError::new(ApiErrorCode::NotFound, message, request_id.as_str())
    };

    let body = state.store.get(id.as_str()).await.map_err(|e| not_found(e.to_string()))?;
    let data = collect_stream(body, 0).await.map_err(|e| not_found(e.to_string()))?;

    debug!(id = %id, size = data.len(), "Object read");
    Ok(([(header::CONTENT_TYPE, OBJECT_CONTENT_TYPE)], data).into_response())
}

/// `PUT /object/{id}`: store an object through the shard router.
///
/// The content type must be exactly `application/octet-stream`; anything else
/// is rejected before the body is read or storage is touched.
pub async fn put_object(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, ApiError> {
    let id = parse_id(&id, &request_id)?;

    let content_type = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
    if content_type != Some(OBJECT_CONTENT_TYPE) {
        warn!(id = %id, content_type = ?content_type, "Rejected upload content type");
        return Err(ApiError::new(
            ApiErrorCode::BadRequest,
            format!("content type must be {OBJECT_CONTENT_TYPE}"),
            request_id.as_str(),
        ));
    }

    let data = axum::body::to_bytes(body, state.max_body_size).await.map_err(|e| {
        warn!(id = %id, error = %e, "Could not read request body");
        ApiError::new(ApiErrorCode::BadRequest, e.to_string(), request_id.as_str())
    })?;

    let length = data.len() as u64;
    state.store.put(id.as_str(), stream_from_bytes(data), length).await.map_err(|e| {
        error!(id = %id, error = %e, "Object write failed");
        ApiError::new(ApiErrorCode::InternalError, e.to_string(), request_id.as_str())
    })?;

    debug!(id = %id, size = length, "Object stored");
    Ok(StatusCode::CREATED.into_response())
}
