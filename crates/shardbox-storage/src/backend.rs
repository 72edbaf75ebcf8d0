// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Storage contracts.
//!
//! Two layers:
//! - [`ObjectStore`] is what the HTTP layer sees: get and put by id. The
//!   shard router and every node client implement it.
//! - [`NodeBackend`] is the minimal capability set of one backend node.
//!   It lets the routing core run against in-memory or scripted fakes
//!   without any network library.

use async_trait::async_trait;
use shardbox_core::Result;

use crate::stream::ObjectStream;

/// Get/put access to an id-addressed byte-object namespace.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the object named `id` as a lazily consumed stream.
    async fn get(&self, id: &str) -> Result<ObjectStream>;

    /// Store `length` bytes read from `body` as the object named `id`,
    /// replacing any previous object with that id.
    ///
    /// `length` must equal the number of bytes the stream produces.
    async fn put(&self, id: &str, body: ObjectStream, length: u64) -> Result<()>;
}

/// The operations a backend storage node must expose.
#[async_trait]
pub trait NodeBackend: Send + Sync {
    /// Human-readable node name (usually its endpoint), for logs and errors.
    fn name(&self) -> &str;

    /// Check whether a bucket exists.
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    /// Create a bucket.
    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// Fetch an object from a bucket.
    ///
    /// Returns `Error::NotFound` when the node reports no such object.
    async fn get_object(&self, bucket: &str, id: &str) -> Result<ObjectStream>;

    /// Upload an object of known length into a bucket.
    async fn put_object(
        &self,
        bucket: &str,
        id: &str,
        body: ObjectStream,
        length: u64,
    ) -> Result<()>;
}
