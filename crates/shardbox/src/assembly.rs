// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Startup wiring: discovery, one node client per node, shard router.
//!
//! Every step here is fatal on failure. The process must not serve until
//! each discovered node has its bucket.

use std::sync::Arc;

use anyhow::{Context, Result};
use shardbox_core::{Config, NodeDescriptor, StorageBackendKind};
use shardbox_discovery::{discover_nodes, Discovery, StaticDiscovery};
use shardbox_storage::{MemoryBackend, NodeClient, ObjectStore, S3Backend, ShardRouter};
use tracing::info;

/// Descriptors for `count` in-process nodes.
#[must_use]
pub fn memory_nodes(count: usize) -> Vec<NodeDescriptor> {
    (0..count).map(|i| NodeDescriptor::new(format!("memory://node-{i}"), "", "")).collect()
}

fn discovery_for(config: &Config) -> Result<Box<dyn Discovery>> {
    match config.storage.backend {
        StorageBackendKind::Memory => {
            Ok(Box::new(StaticDiscovery::new(memory_nodes(config.storage.memory_nodes))))
        }
        StorageBackendKind::S3 => {
            shardbox_discovery::from_config(&config.discovery).context("Invalid discovery configuration")
        }
    }
}

async fn connect_node(config: &Config, node: &NodeDescriptor) -> Result<Arc<dyn ObjectStore>> {
    let bucket = config.storage.bucket.as_str();
    let store: Arc<dyn ObjectStore> = match config.storage.backend {
        StorageBackendKind::S3 => {
            let backend = S3Backend::new(node, &config.storage.region);
            Arc::new(NodeClient::connect(backend, bucket).await?)
        }
        StorageBackendKind::Memory => {
            Arc::new(NodeClient::connect(MemoryBackend::new(&node.endpoint), bucket).await?)
        }
    };
    Ok(store)
}

/// Discover the backend nodes and build the shard router over them.
///
/// # Errors
///
/// Fails if discovery fails or finds nothing, or if any node's bucket cannot
/// be checked or created.
pub async fn build_shard_router(config: &Config) -> Result<ShardRouter> {
    let discovery = discovery_for(config)?;
    let nodes = discover_nodes(discovery.as_ref()).await.context("Node discovery failed")?;

    let mut stores = Vec::with_capacity(nodes.len());
    for (shard, node) in nodes.iter().enumerate() {
        let store = connect_node(config, node)
            .await
            .with_context(|| format!("Failed to prepare node {}", node.endpoint))?;
        info!(shard, node = %node.endpoint, "Backend node ready");
        stores.push(store);
    }

    ShardRouter::new(stores).context("Failed to build shard router")
}
