// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! HTTP API for shardbox.
//!
//! This crate provides the HTTP layer in front of the shard router:
//! - `GET`/`PUT /object/{id}` for opaque byte objects
//! - `GET /ok` for liveness
//! - Request-id, tracing and metrics middleware

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;

pub use error::{ApiError, ApiErrorCode};
pub use handlers::AppState;
pub use metrics::init_metrics;
pub use router::create_router;
