// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Shard router: partitions the id space over a frozen node list.
//!
//! # Routing
//!
//! ```text
//! owner(id) = crc32c(id) % nodes.len()
//! ```
//!
//! The node list is fixed at construction and never mutated, so `owner` is a
//! pure function of the id for the router's lifetime. A PUT followed by a GET
//! of the same id always reaches the same node without coordination.
//!
//! There is no retry, fallback or replication: if the owning node is down the
//! operation fails, and only ids owned by that node are affected.

use std::sync::Arc;

use async_trait::async_trait;
use shardbox_core::{Error, Result};
use tracing::debug;

use crate::backend::ObjectStore;
use crate::hash::shard_index;
use crate::metrics::{record_node_count, record_shard_operation};
use crate::stream::ObjectStream;

/// Routes every id to exactly one node of a fixed, ordered node list.
pub struct ShardRouter {
    nodes: Vec<Arc<dyn ObjectStore>>,
}

impl ShardRouter {
    /// Build a router over an ordered node list.
    ///
    /// The order defines shard ownership and must be identical across
    /// restarts for existing objects to stay reachable.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoNodes` if `nodes` is empty.
    pub fn new(nodes: Vec<Arc<dyn ObjectStore>>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(Error::NoNodes);
        }
        record_node_count(nodes.len());
        Ok(Self { nodes })
    }

    /// Index of the node owning `id`, in [0, node_count).
    #[must_use]
    pub fn owner(&self, id: &str) -> usize {
        // `new` rejects an empty node list.
        shard_index(id, self.nodes.len()).unwrap_or(0)
    }

    /// Number of nodes in the shard list.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl std::fmt::Debug for ShardRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardRouter").field("nodes", &self.nodes.len()).finish()
    }
}

#[async_trait]
impl ObjectStore for ShardRouter {
    async fn get(&self, id: &str) -> Result<ObjectStream> {
        let shard = self.owner(id);
        debug!(id, shard, "Routing get");

        let result = self.nodes[shard].get(id).await;
        record_shard_operation(shard, "get", result.is_ok());
        result
    }

    async fn put(&self, id: &str, body: ObjectStream, length: u64) -> Result<()> {
        let shard = self.owner(id);
        debug!(id, shard, length, "Routing put");

        let result = self.nodes[shard].put(id, body, length).await;
        record_shard_operation(shard, "put", result.is_ok());
        result
    }
}
