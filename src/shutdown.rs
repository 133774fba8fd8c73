//! Shutdown signal handling
//!
//! Ctrl+C and SIGTERM set a shared flag that the frame loop checks once per
//! refresh, so the element is detached before the process exits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::{Context, Result};
use tokio::signal;

/// Flag raised when the process has been asked to stop
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Raise `stop` on Ctrl+C or SIGTERM.
///
/// The listener runs on its own thread with a single-threaded runtime, since
/// the frame loop itself is synchronous.
pub fn listen(stop: StopFlag) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build signal runtime")?;

    thread::Builder::new()
        .name("wos-signals".into())
        .spawn(move || {
            runtime.block_on(async {
                let ctrl_c = async {
                    if let Err(e) = signal::ctrl_c().await {
                        log::error!("Failed to listen for Ctrl+C: {}", e);
                        std::future::pending::<()>().await;
                    }
                };

                #[cfg(unix)]
                let terminate = async {
                    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                        Ok(mut sigterm) => {
                            sigterm.recv().await;
                        }
                        Err(e) => {
                            log::error!("Failed to listen for SIGTERM: {}", e);
                            std::future::pending::<()>().await;
                        }
                    }
                };

                #[cfg(not(unix))]
                let terminate = std::future::pending::<()>();

                tokio::select! {
                    _ = ctrl_c => log::info!("Received Ctrl+C, shutting down"),
                    _ = terminate => log::info!("Received SIGTERM, shutting down"),
                }
            });
            stop.raise();
        })
        .context("Failed to spawn signal thread")?;

    Ok(())
}
