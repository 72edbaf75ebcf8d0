// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Backend node discovery for shardbox.
//!
//! Discovery runs once at startup and yields the ordered node list the shard
//! router is built over. The list is never refreshed while the process runs.
//!
//! ```text
//!   StaticDiscovery ──┐
//!   DnsDiscovery ─────┼──► discover_nodes() ──► Vec<NodeDescriptor> ──► ShardRouter
//!   DockerDiscovery ──┘
//! ```
//!
//! Order matters: shard ownership is a function of a node's position in the
//! list, so every provider must return nodes in a reproducible order.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod dns;
mod docker;
mod static_nodes;

use async_trait::async_trait;
pub use dns::DnsDiscovery;
pub use docker::DockerDiscovery;
use shardbox_core::config::DiscoveryConfig;
use shardbox_core::{DiscoveryMode, NodeDescriptor};
pub use static_nodes::StaticDiscovery;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during node discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// DNS resolution failed.
    #[error("DNS resolution failed: {0}")]
    DnsResolution(String),

    /// The Docker engine could not be queried.
    #[error("Docker discovery failed: {0}")]
    Docker(String),

    /// Discovery succeeded but returned no nodes.
    #[error("no backend nodes discovered by {0}")]
    NoNodes(&'static str),
}

/// Result type for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// A provider of backend node descriptors.
#[async_trait]
pub trait Discovery: Send + Sync {
    /// Returns the name of this discovery backend.
    fn name(&self) -> &'static str;

    /// Discovers the backend nodes, in shard order.
    async fn discover(&self) -> DiscoveryResult<Vec<NodeDescriptor>>;
}

/// Build the discovery provider selected by configuration.
///
/// # Errors
///
/// Returns `DiscoveryError::Config` if the selected mode is missing settings
/// or a static node endpoint is malformed or repeated.
pub fn from_config(config: &DiscoveryConfig) -> DiscoveryResult<Box<dyn Discovery>> {
    match config.mode {
        DiscoveryMode::Static => Ok(Box::new(StaticDiscovery::validated(config.nodes.clone())?)),
        DiscoveryMode::Dns => {
            let hostname = config.hostname.as_deref().filter(|h| !h.is_empty()).ok_or_else(
                || DiscoveryError::Config("dns discovery requires discovery.hostname".into()),
            )?;
            Ok(Box::new(
                DnsDiscovery::new(hostname, config.port)
                    .with_scheme(&config.scheme)
                    .with_credentials(&config.access_key, &config.secret_key),
            ))
        }
        DiscoveryMode::Docker => {
            if config.image.is_empty() {
                return Err(DiscoveryError::Config(
                    "docker discovery requires discovery.image".into(),
                ));
            }
            Ok(Box::new(
                DockerDiscovery::connect_local(&config.image, config.port)?
                    .with_scheme(&config.scheme)
                    .with_credentials(&config.access_key, &config.secret_key),
            ))
        }
    }
}

/// Run discovery and require at least one node.
///
/// # Errors
///
/// Returns the provider's error, or `DiscoveryError::NoNodes` if it found nothing.
pub async fn discover_nodes(discovery: &dyn Discovery) -> DiscoveryResult<Vec<NodeDescriptor>> {
    let nodes = discovery.discover().await?;
    if nodes.is_empty() {
        return Err(DiscoveryError::NoNodes(discovery.name()));
    }

    info!(backend = discovery.name(), count = nodes.len(), "Discovered backend nodes");
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_discover_nodes_rejects_empty() {
        let discovery = StaticDiscovery::new(Vec::new());
        let result = discover_nodes(&discovery).await;
        assert!(matches!(result, Err(DiscoveryError::NoNodes("static"))));
    }

    #[tokio::test]
    async fn test_discover_nodes_keeps_order() {
        let discovery = StaticDiscovery::new(vec![
            NodeDescriptor::new("http://10.0.0.2:9000", "a", "s"),
            NodeDescriptor::new("http://10.0.0.1:9000", "a", "s"),
        ]);
        let nodes = discover_nodes(&discovery).await.unwrap();
        assert_eq!(nodes[0].endpoint, "http://10.0.0.2:9000");
        assert_eq!(nodes[1].endpoint, "http://10.0.0.1:9000");
    }

    #[test]
    fn test_from_config_static() {
        let config = DiscoveryConfig::default();
        assert_eq!(from_config(&config).unwrap().name(), "static");
    }

    #[test]
    fn test_from_config_static_rejects_bad_endpoints() {
        let config = DiscoveryConfig {
            nodes: vec![NodeDescriptor::new("10.0.0.1:9000", "a", "s")],
            ..Default::default()
        };
        assert!(matches!(from_config(&config), Err(DiscoveryError::Config(_))));

        let config = DiscoveryConfig {
            nodes: vec![
                NodeDescriptor::new("http://10.0.0.1:9000", "a", "s"),
                NodeDescriptor::new("http://10.0.0.1:9000/", "b", "t"),
            ],
            ..Default::default()
        };
        assert!(matches!(from_config(&config), Err(DiscoveryError::Config(_))));
    }

    #[tokio::test]
    async fn test_from_config_static_normalizes_endpoints() {
        let config = DiscoveryConfig {
            nodes: vec![NodeDescriptor::new("http://10.0.0.1:9000/", "a", "s")],
            ..Default::default()
        };
        let nodes = from_config(&config).unwrap().discover().await.unwrap();
        assert_eq!(nodes[0].endpoint, "http://10.0.0.1:9000");
    }

    #[test]
    fn test_from_config_dns_requires_hostname() {
        let config = DiscoveryConfig { mode: DiscoveryMode::Dns, ..Default::default() };
        assert!(matches!(from_config(&config), Err(DiscoveryError::Config(_))));

        let config = DiscoveryConfig {
            mode: DiscoveryMode::Dns,
            hostname: Some("storage.internal".into()),
            ..Default::default()
        };
        assert_eq!(from_config(&config).unwrap().name(), "dns");
    }

    #[tokio::test]
    async fn test_from_config_docker() {
        let config = DiscoveryConfig {
            mode: DiscoveryMode::Docker,
            image: String::new(),
            ..Default::default()
        };
        assert!(matches!(from_config(&config), Err(DiscoveryError::Config(_))));

        let config = DiscoveryConfig { mode: DiscoveryMode::Docker, ..Default::default() };
        assert_eq!(from_config(&config).unwrap().name(), "docker");
    }
}
