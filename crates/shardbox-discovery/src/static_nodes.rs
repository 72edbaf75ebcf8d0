// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Static node discovery from configuration or the command line.
//!
//! No network calls are made; the configured list is returned as is, in the
//! order it was written.

use std::collections::HashSet;

use async_trait::async_trait;
use shardbox_core::NodeDescriptor;
use tracing::debug;

use crate::{Discovery, DiscoveryError, DiscoveryResult};

/// Static discovery over a fixed, ordered node list.
#[derive(Debug, Clone)]
pub struct StaticDiscovery {
    nodes: Vec<NodeDescriptor>,
}

impl StaticDiscovery {
    /// Creates a static discovery with the given nodes.
    #[must_use]
    pub fn new(nodes: Vec<NodeDescriptor>) -> Self {
        Self { nodes }
    }

    /// Creates a static discovery from endpoint URLs sharing one set of credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint is not an http(s) URL or appears twice.
    pub fn from_endpoints(
        endpoints: &[String],
        access_key: &str,
        secret_key: &str,
    ) -> DiscoveryResult<Self> {
        let nodes = endpoints
            .iter()
            .map(|endpoint| NodeDescriptor::new(endpoint.as_str(), access_key, secret_key))
            .collect();
        Self::validated(nodes)
    }

    /// Creates a static discovery after normalizing and checking every endpoint.
    ///
    /// Surrounding whitespace and trailing slashes are stripped.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint is not an http(s) URL or appears twice.
    pub fn validated(nodes: Vec<NodeDescriptor>) -> DiscoveryResult<Self> {
        let mut seen = HashSet::new();
        let mut checked = Vec::with_capacity(nodes.len());

        for mut node in nodes {
            let endpoint = node.endpoint.trim().trim_end_matches('/').to_string();
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(DiscoveryError::Config(format!(
                    "Invalid node endpoint '{endpoint}': expected http:// or https://"
                )));
            }
            if !seen.insert(endpoint.clone()) {
                return Err(DiscoveryError::Config(format!("Duplicate node endpoint '{endpoint}'")));
            }
            node.endpoint = endpoint;
            checked.push(node);
        }

        Ok(Self::new(checked))
    }

    /// Returns the configured nodes.
    #[must_use]
    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.nodes
    }
}

#[async_trait]
impl Discovery for StaticDiscovery {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn discover(&self) -> DiscoveryResult<Vec<NodeDescriptor>> {
        debug!(count = self.nodes.len(), "Returning static node list");
        Ok(self.nodes.clone())
    }
}
