//! Unix signal handling.
//!
//! - SIGTERM/SIGINT: graceful shutdown
//! - SIGHUP: reload the persisted config from disk

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

/// Installs the process signal handlers and exposes them as awaitable
/// signals.
pub struct SignalHandler {
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
    reload_tx: Arc<watch::Sender<bool>>,
    reload_rx: watch::Receiver<bool>,
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalHandler {
    /// Creates a new signal handler.
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (reload_tx, reload_rx) = watch::channel(false);

        Self {
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
            reload_tx: Arc::new(reload_tx),
            reload_rx,
        }
    }

    /// Spawns the signal listener task. Call once at startup.
    #[cfg(unix)]
    pub fn spawn_listener(&self) {
        let shutdown_tx = self.shutdown_tx.clone();
        let reload_tx = self.reload_tx.clone();

        tokio::spawn(async move {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigterm =
                signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
            let mut sigint =
                signal(SignalKind::interrupt()).expect("Failed to install SIGINT handler");
            let mut sighup =
                signal(SignalKind::hangup()).expect("Failed to install SIGHUP handler");

            loop {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, initiating shutdown");
                        let _ = shutdown_tx.send(true);
                        break;
                    }
                    _ = sigint.recv() => {
                        info!("Received SIGINT, initiating shutdown");
                        let _ = shutdown_tx.send(true);
                        break;
                    }
                    _ = sighup.recv() => {
                        info!("Received SIGHUP, triggering config reload");
                        let _ = reload_tx.send(true);
                    }
                }
            }

            debug!("Signal listener stopped");
        });
    }

    /// Non-Unix implementation: Ctrl+C only.
    #[cfg(not(unix))]
    pub fn spawn_listener(&self) {
        let shutdown_tx = self.shutdown_tx.clone();

        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("Received Ctrl+C, initiating shutdown");
                let _ = shutdown_tx.send(true);
            }
        });
    }

    /// Returns a future source that completes when shutdown is signaled.
    pub fn shutdown(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.shutdown_rx.clone(),
        }
    }

    /// Returns a stream of reload edges.
    pub fn reload(&self) -> ReloadSignal {
        ReloadSignal {
            rx: self.reload_rx.clone(),
        }
    }

    /// Programmatically triggers a shutdown.
    pub fn trigger_shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Programmatically triggers a reload edge.
    pub fn trigger_reload(&self) {
        let _ = self.reload_tx.send(true);
    }
}

/// Completes once shutdown is signaled.
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Waits for the shutdown signal.
    pub async fn wait(mut self) {
        loop {
            if *self.rx.borrow() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Yields once per reload pulse.
pub struct ReloadSignal {
    rx: watch::Receiver<bool>,
}

impl ReloadSignal {
    /// Waits for the next rising edge. Returns false when the sender is
    /// gone and no further reloads can arrive.
    pub async fn next(&mut self) -> bool {
        loop {
            if self.rx.changed().await.is_err() {
                return false;
            }
            if *self.rx.borrow() {
                return true;
            }
        }
    }
}
