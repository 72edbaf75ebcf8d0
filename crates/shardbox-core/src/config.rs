// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for shardbox.

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::NodeDescriptor;

/// Main configuration for the shardbox server.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Backend storage configuration.
    pub storage: StorageConfig,
    /// Node discovery configuration.
    pub discovery: DiscoveryConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Metrics configuration.
    pub metrics: MetricsConfig,
}

impl Config {
    /// Load configuration from an optional TOML file.
    ///
    /// Without a path the defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(crate::Error::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be parsed.
    pub fn parse(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind: SocketAddr,
    /// Maximum request body size in bytes.
    /// Larger bodies are rejected as unreadable.
    /// Default: 256 MiB.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_body_size: 256 * 1024 * 1024,
        }
    }
}

/// Which node backend implementation to build per descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackendKind {
    /// S3-compatible object storage nodes.
    #[default]
    S3,
    /// In-process nodes, for local development.
    Memory,
}

/// Backend storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Node backend implementation.
    pub backend: StorageBackendKind,
    /// Bucket holding shardbox objects on every node.
    pub bucket: String,
    /// Region sent to S3-compatible nodes.
    pub region: String,
    /// Number of in-process nodes for the memory backend.
    pub memory_nodes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::S3,
            bucket: "objects".to_string(),
            region: "us-east-1".to_string(),
            memory_nodes: 3,
        }
    }
}

/// How backend nodes are discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMode {
    /// A fixed, ordered list of nodes.
    #[default]
    Static,
    /// Resolve a hostname to one node per address.
    Dns,
    /// Inspect storage containers on the local Docker engine.
    Docker,
}

/// Node discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Discovery mode.
    pub mode: DiscoveryMode,
    /// Nodes for static discovery, in shard order.
    pub nodes: Vec<NodeDescriptor>,
    /// Hostname for DNS discovery.
    pub hostname: Option<String>,
    /// Container image for Docker discovery.
    pub image: String,
    /// Node port for DNS and Docker discovery.
    pub port: u16,
    /// URL scheme for discovered nodes.
    pub scheme: String,
    /// Access key shared by DNS-discovered nodes, and the fallback for
    /// containers without credentials in their environment.
    pub access_key: String,
    /// Secret key, shared the same way as `access_key`.
    pub secret_key: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            mode: DiscoveryMode::Static,
            nodes: Vec::new(),
            hostname: None,
            image: "minio/minio".to_string(),
            port: 9000,
            scheme: "http".to_string(),
            access_key: String::new(),
            secret_key: String::new(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format.
    #[default]
    Pretty,
    /// JSON format.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Log output format.
    pub format: LogFormat,
    /// Include HTTP request/response logging.
    pub log_requests: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Pretty, log_requests: true }
    }
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Enable the Prometheus endpoint.
    pub enabled: bool,
    /// Bind address for the metrics listener.
    pub bind: String,
    /// Port for the metrics listener (separate from the main server).
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: false, bind: "0.0.0.0".to_string(), port: 9100 }
    }
}
