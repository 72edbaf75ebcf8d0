// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! DNS-based node discovery.
//!
//! Resolves the A/AAAA records of one hostname. Every resolved address
//! becomes a node on the configured port:
//!
//! ```text
//! storage.internal.  300  IN  A  10.0.0.2
//! storage.internal.  300  IN  A  10.0.0.1
//!
//! => http://10.0.0.1:9000, http://10.0.0.2:9000
//! ```
//!
//! Resolvers do not agree on record order, so addresses are sorted before
//! endpoints are built.

use std::collections::BTreeSet;
use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use shardbox_core::NodeDescriptor;
use tokio::net::lookup_host;
use tracing::{debug, warn};

use crate::{Discovery, DiscoveryError, DiscoveryResult};

/// Discovers nodes by resolving a hostname.
#[derive(Debug, Clone)]
pub struct DnsDiscovery {
    hostname: String,
    port: u16,
    scheme: String,
    access_key: String,
    secret_key: String,
}

impl DnsDiscovery {
    /// Creates a DNS discovery for `hostname`; nodes listen on `port`.
    #[must_use]
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            scheme: "http".to_string(),
            access_key: String::new(),
            secret_key: String::new(),
        }
    }

    /// Sets the URL scheme of discovered endpoints.
    #[must_use]
    pub fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    /// Sets the credentials shared by all discovered nodes.
    #[must_use]
    pub fn with_credentials(mut self, access_key: &str, secret_key: &str) -> Self {
        self.access_key = access_key.to_string();
        self.secret_key = secret_key.to_string();
        self
    }

    async fn resolve(&self) -> DiscoveryResult<BTreeSet<IpAddr>> {
        let target = format!("{}:{}", self.hostname, self.port);
        debug!(hostname = %self.hostname, port = self.port, "Resolving DNS records");

        let addrs: BTreeSet<IpAddr> = lookup_host(&target)
            .await
            .map_err(|e| DiscoveryError::DnsResolution(format!("{}: {e}", self.hostname)))?
            .map(|addr| addr.ip())
            .collect();

        if addrs.is_empty() {
            warn!(hostname = %self.hostname, "DNS returned no addresses");
        }
        Ok(addrs)
    }

    fn endpoint(&self, ip: IpAddr) -> String {
        format!("{}://{}", self.scheme, SocketAddr::new(ip, self.port))
    }
}

#[async_trait]
impl Discovery for DnsDiscovery {
    fn name(&self) -> &'static str {
        "dns"
    }

    async fn discover(&self) -> DiscoveryResult<Vec<NodeDescriptor>> {
        let nodes = self
            .resolve()
            .await?
            .into_iter()
            .map(|ip| NodeDescriptor::new(self.endpoint(ip), &self.access_key, &self.secret_key))
            .collect();
        Ok(nodes)
    }
}
