// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! In-process node backend.
//!
//! Keeps objects in memory. Used for local development and for exercising
//! the routing core in tests without a real object store.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use shardbox_core::{Error, Result};

use crate::backend::NodeBackend;
use crate::stream::{collect_stream, stream_from_bytes, ObjectStream};

/// A backend node that stores objects in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    name: String,
    buckets: DashMap<String, DashMap<String, Bytes>>,
}

impl MemoryBackend {
    /// Creates an empty node with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), buckets: DashMap::new() }
    }

    /// Number of objects stored in a bucket.
    #[must_use]
    pub fn object_count(&self, bucket: &str) -> usize {
        self.buckets.get(bucket).map_or(0, |objects| objects.len())
    }

    fn no_such_bucket(&self, bucket: &str) -> Error {
        Error::backend(&self.name, format!("NoSuchBucket: {bucket}"))
    }
}

#[async_trait]
impl NodeBackend for MemoryBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        Ok(self.buckets.contains_key(bucket))
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.buckets.entry(bucket.to_string()).or_default();
        Ok(())
    }

    async fn get_object(&self, bucket: &str, id: &str) -> Result<ObjectStream> {
        let objects = self.buckets.get(bucket).ok_or_else(|| self.no_such_bucket(bucket))?;
        let data = objects.get(id).ok_or_else(|| Error::not_found(id, "NoSuchKey"))?;
        Ok(stream_from_bytes(data.value().clone()))
    }

    async fn put_object(
        &self,
        bucket: &str,
        id: &str,
        body: ObjectStream,
        length: u64,
    ) -> Result<()> {
        if !self.buckets.contains_key(bucket) {
            return Err(self.no_such_bucket(bucket));
        }

        let data = collect_stream(body, usize::try_from(length).unwrap_or(0)).await?;
        if data.len() as u64 != length {
            return Err(Error::InvalidRequest(format!(
                "declared length {length} but body produced {} bytes",
                data.len()
            )));
        }

        // Re-check: the bucket map must not be held across the await above.
        let objects = self.buckets.get(bucket).ok_or_else(|| self.no_such_bucket(bucket))?;
        objects.insert(id.to_string(), data);
        Ok(())
    }
}
