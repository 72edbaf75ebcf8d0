// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for shardbox.

use thiserror::Error;

/// A specialized `Result` type for shardbox operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while routing to or talking with backend nodes.
#[derive(Debug, Error)]
pub enum Error {
    /// The object could not be read.
    ///
    /// Covers both a missing object and a node that could not serve the
    /// request; callers cannot tell the two apart.
    #[error("object {id} not found: {reason}")]
    NotFound {
        /// The identifier that was requested.
        id: String,
        /// What the node reported.
        reason: String,
    },

    /// A backend node call failed.
    #[error("backend error on {node}: {message}")]
    Backend {
        /// The node endpoint.
        node: String,
        /// A human-readable error message.
        message: String,
    },

    /// A shard router was built over an empty node list.
    #[error("shard router requires at least one backend node")]
    NoNodes,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new backend error for the given node.
    #[must_use]
    pub fn backend(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend { node: node.into(), message: message.into() }
    }

    /// Creates a new not-found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotFound { id: id.into(), reason: reason.into() }
    }

    /// Returns true if this is a read failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
