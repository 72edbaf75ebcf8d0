// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Shardbox: an HTTP object store sharded over S3-compatible nodes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use shardbox::{build_shard_router, Server, ShutdownSignals};
use shardbox_api::{create_router, init_metrics};
use shardbox_core::{Config, DiscoveryMode, LogFormat, StorageBackendKind};
use shardbox_storage::metrics::init_storage_metrics;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => run_server(args).await,
        Commands::Version => {
            println!("shardbox {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn run_server(args: cli::ServeArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;
    args.apply(&mut config)?;

    init_logging(&config)?;

    if config.metrics.enabled {
        init_metrics();
        init_storage_metrics();

        let metrics_addr: std::net::SocketAddr =
            format!("{}:{}", config.metrics.bind, config.metrics.port)
                .parse()
                .context("Invalid metrics bind address")?;

        PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()
            .context("Failed to install Prometheus exporter")?;

        info!("Metrics endpoint listening on http://{}/metrics", metrics_addr);
    }

    print_banner(&config);

    let router = build_shard_router(&config).await?;
    info!(nodes = router.node_count(), bucket = %config.storage.bucket, "Shard router ready");

    let app = create_router(
        Arc::new(router),
        config.server.max_body_size,
        config.logging.log_requests,
    );

    let mut signals = ShutdownSignals::install()?;
    let server = Server::start(config.server.bind, app).await?;
    println!("\n  Ready to accept connections.\n");

    let signal = signals.recv().await?;
    info!(signal, "Received signal, initiating shutdown");

    server.stop().await
}

fn load_config(path: &Option<PathBuf>) -> Result<Config> {
    Config::load(path.as_deref()).context("Failed to load configuration")
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.level))
        .context("Invalid log level")?;

    let fmt_layer = tracing_subscriber::fmt::layer();

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry().with(filter).with(fmt_layer.json()).try_init()?;
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry().with(filter).with(fmt_layer).try_init()?;
        }
    }

    Ok(())
}

fn print_banner(config: &Config) {
    let nodes = match (config.storage.backend, config.discovery.mode) {
        (StorageBackendKind::Memory, _) => {
            format!("{} in-process nodes", config.storage.memory_nodes)
        }
        (StorageBackendKind::S3, DiscoveryMode::Static) => config
            .discovery
            .nodes
            .iter()
            .map(|n| format!("{} (key {})", n.endpoint, mask_secret(&n.access_key)))
            .collect::<Vec<_>>()
            .join(", "),
        (StorageBackendKind::S3, DiscoveryMode::Dns) => format!(
            "dns {}:{}",
            config.discovery.hostname.as_deref().unwrap_or("<unset>"),
            config.discovery.port
        ),
        (StorageBackendKind::S3, DiscoveryMode::Docker) => {
            format!("docker containers of {}:{}", config.discovery.image, config.discovery.port)
        }
    };

    println!(
        r#"
      shardbox  v{}

  Endpoint:    http://{}
  Bucket:      {}
  Nodes:       {}

  Test with:
    curl -X PUT -H 'Content-Type: application/octet-stream' --data-binary @file http://{}/object/my-id
    curl http://{}/object/my-id
"#,
        env!("CARGO_PKG_VERSION"),
        config.server.bind,
        config.storage.bucket,
        nodes,
        config.server.bind,
        config.server.bind
    );
}

fn mask_secret(secret: &str) -> String {
    match secret.char_indices().nth(4) {
        Some((idx, _)) => format!("{}****", &secret[..idx]),
        None => "*".repeat(secret.chars().count()),
    }
}
