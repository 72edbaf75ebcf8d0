// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Liveness endpoint.

use axum::http::StatusCode;

/// `GET /ok`: reports that the process is serving. Backends are not contacted.
pub async fn ok() -> StatusCode {
    StatusCode::OK
}
