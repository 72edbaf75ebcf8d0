// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Request handlers.

pub mod health;
pub mod object;

use std::sync::Arc;

use shardbox_storage::ObjectStore;

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The object store requests are routed to.
    pub store: Arc<dyn ObjectStore>,
    /// Largest request body accepted, in bytes.
    pub max_body_size: usize,
}
