// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Command line interface definition.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shardbox_core::{Config, DiscoveryMode, StorageBackendKind};
use shardbox_discovery::StaticDiscovery;

/// Shardbox: an HTTP object store sharded over S3-compatible nodes.
#[derive(Parser)]
#[command(name = "shardbox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start the server.
    Serve(ServeArgs),
    /// Print version information.
    Version,
}

/// Arguments for the serve command.
#[derive(Args, Default)]
pub struct ServeArgs {
    /// Path to configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Bind address (overrides config).
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,

    /// Backend node endpoint, in shard order. Repeat for each node.
    ///
    /// Replaces the configured node list and selects static discovery.
    /// Example: --node http://10.0.0.1:9000 --node http://10.0.0.2:9000
    #[arg(long = "node", value_name = "URL")]
    pub nodes: Vec<String>,

    /// Access key for the backend nodes (overrides config).
    #[arg(long)]
    pub access_key: Option<String>,

    /// Secret key for the backend nodes (overrides config).
    #[arg(long)]
    pub secret_key: Option<String>,

    /// Serve from N in-process nodes instead of S3 backends.
    #[arg(long, value_name = "N", conflicts_with = "nodes")]
    pub memory_nodes: Option<usize>,
}

impl ServeArgs {
    /// Apply command line overrides on top of the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a `--node` endpoint is invalid.
    pub fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(access_key) = &self.access_key {
            config.discovery.access_key.clone_from(access_key);
        }
        if let Some(secret_key) = &self.secret_key {
            config.discovery.secret_key.clone_from(secret_key);
        }

        if !self.nodes.is_empty() {
            let discovery = StaticDiscovery::from_endpoints(
                &self.nodes,
                &config.discovery.access_key,
                &config.discovery.secret_key,
            )
            .context("Invalid --node argument")?;
            config.discovery.mode = DiscoveryMode::Static;
            config.discovery.nodes = discovery.nodes().to_vec();
            config.storage.backend = StorageBackendKind::S3;
        }

        if let Some(count) = self.memory_nodes {
            config.storage.backend = StorageBackendKind::Memory;
            config.storage.memory_nodes = count;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn serve_args(args: &[&str]) -> ServeArgs {
        let argv = std::iter::once("shardbox").chain(std::iter::once("serve")).chain(args.iter().copied());
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Serve(args) => args,
            Commands::Version => panic!("expected serve"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_command() {
        let cli = Cli::try_parse_from(["shardbox", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_node_overrides() {
        let args = serve_args(&[
            "--bind",
            "127.0.0.1:4000",
            "--node",
            "http://10.0.0.1:9000",
            "--node",
            "http://10.0.0.2:9000",
            "--access-key",
            "minio",
            "--secret-key",
            "minio123",
        ]);

        let mut config = Config::default();
        config.discovery.mode = DiscoveryMode::Dns;
        args.apply(&mut config).unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:4000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.discovery.mode, DiscoveryMode::Static);
        assert_eq!(config.discovery.nodes.len(), 2);
        assert_eq!(config.discovery.nodes[1].endpoint, "http://10.0.0.2:9000");
        assert_eq!(config.discovery.nodes[0].access_key, "minio");
        assert_eq!(config.discovery.nodes[0].secret_key, "minio123");
    }

    #[test]
    fn test_memory_nodes_override() {
        let args = serve_args(&["--memory-nodes", "5"]);
        let mut config = Config::default();
        args.apply(&mut config).unwrap();

        assert_eq!(config.storage.backend, StorageBackendKind::Memory);
        assert_eq!(config.storage.memory_nodes, 5);
    }

    #[test]
    fn test_memory_nodes_conflicts_with_node() {
        let result = Cli::try_parse_from([
            "shardbox",
            "serve",
            "--memory-nodes",
            "2",
            "--node",
            "http://10.0.0.1:9000",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_node_rejected() {
        let args = serve_args(&["--node", "10.0.0.1:9000"]);
        assert!(args.apply(&mut Config::default()).is_err());
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = Config::default();
        ServeArgs::default().apply(&mut config).unwrap();
        assert_eq!(config.server.bind, Config::default().server.bind);
        assert_eq!(config.storage.backend, StorageBackendKind::S3);
    }
}
