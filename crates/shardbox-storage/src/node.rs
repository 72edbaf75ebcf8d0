// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Node client: uniform access to one backend node's bucket.

use async_trait::async_trait;
use shardbox_core::{Error, Result};
use tracing::{debug, info};

use crate::backend::{NodeBackend, ObjectStore};
use crate::stream::ObjectStream;

/// Client for the shardbox bucket on a single backend node.
#[derive(Debug)]
pub struct NodeClient<B> {
    backend: B,
    bucket: String,
}

impl<B: NodeBackend> NodeClient<B> {
    /// Connect to a node, creating the bucket if it does not exist yet.
    ///
    /// This is the only place the bucket is checked; requests assume it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket check or creation fails.
    pub async fn connect(backend: B, bucket: impl Into<String>) -> Result<Self> {
        let bucket = bucket.into();

        if backend.bucket_exists(&bucket).await? {
            debug!(node = backend.name(), bucket = %bucket, "Bucket already exists");
        } else {
            info!(node = backend.name(), bucket = %bucket, "Creating bucket");
            backend.create_bucket(&bucket).await?;
        }

        Ok(Self { backend, bucket })
    }

    /// Returns the node name.
    #[must_use]
    pub fn node(&self) -> &str {
        self.backend.name()
    }

    /// Returns the bucket this client reads and writes.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl<B: NodeBackend> ObjectStore for NodeClient<B> {
    async fn get(&self, id: &str) -> Result<ObjectStream> {
        self.backend.get_object(&self.bucket, id).await.map_err(|err| match err {
            Error::NotFound { .. } => err,
            other => Error::not_found(id, other.to_string()),
        })
    }

    async fn put(&self, id: &str, body: ObjectStream, length: u64) -> Result<()> {
        self.backend.put_object(&self.bucket, id, body, length).await
    }
}
