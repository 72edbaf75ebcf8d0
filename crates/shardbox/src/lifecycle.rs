// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Server lifecycle: start, stop and wait for a termination signal.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

/// A running HTTP server.
///
/// Dropping a `Server` without calling [`Server::stop`] also triggers a
/// graceful shutdown, but nothing waits for it to finish.
#[derive(Debug)]
pub struct Server {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl Server {
    /// Bind `bind` and start serving `app` in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(bind: SocketAddr, app: Router) -> Result<Self> {
        let listener = TcpListener::bind(bind)
            .await
            .with_context(|| format!("Failed to bind to address {bind}"))?;
        let addr = listener.local_addr().context("Failed to read bound address")?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!("Server listening on http://{}", addr);
        Ok(Self { addr, shutdown_tx, handle })
    }

    /// The address the server is bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections, let in-flight requests finish, and wait
    /// for the serving task to exit.
    ///
    /// # Errors
    ///
    /// Returns the serving task's error, if it failed.
    pub async fn stop(self) -> Result<()> {
        // The task may already have exited, in which case nobody is listening.
        let _ = self.shutdown_tx.send(());
        self.handle.await.context("Server task panicked")?.context("Server error")?;
        info!("Server shutdown complete");
        Ok(())
    }
}

/// Installed termination signal handlers.
///
/// Signals that arrive after [`ShutdownSignals::install`] returns are
/// buffered until [`ShutdownSignals::recv`] is polled, so install before
/// anything that could trigger a shutdown.
#[cfg(unix)]
#[derive(Debug)]
pub struct ShutdownSignals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    hangup: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    /// Install handlers for SIGINT, SIGTERM, SIGHUP and SIGQUIT.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if a signal handler cannot be installed.
    pub fn install() -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?,
            terminate: signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?,
            hangup: signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?,
            quit: signal(SignalKind::quit()).context("Failed to install SIGQUIT handler")?,
        })
    }

    /// Wait for the next termination signal and return its name.
    ///
    /// # Errors
    ///
    /// Never fails on unix; the signature matches other platforms.
    pub async fn recv(&mut self) -> Result<&'static str> {
        let name = tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.hangup.recv() => "SIGHUP",
            _ = self.quit.recv() => "SIGQUIT",
        };
        Ok(name)
    }
}

/// Installed Ctrl+C handler.
#[cfg(not(unix))]
#[derive(Debug)]
pub struct ShutdownSignals(());

#[cfg(not(unix))]
impl ShutdownSignals {
    /// Prepare to wait for Ctrl+C.
    ///
    /// # Errors
    ///
    /// Never fails here; the handler is installed on first [`Self::recv`].
    pub fn install() -> Result<Self> {
        Ok(Self(()))
    }

    /// Wait for Ctrl+C.
    ///
    /// # Errors
    ///
    /// Returns an error if the Ctrl+C handler cannot be installed.
    pub async fn recv(&mut self) -> Result<&'static str> {
        tokio::signal::ctrl_c().await.context("Failed to install Ctrl+C handler")?;
        Ok("Ctrl+C")
    }
}
