//! Shutdown Coordination
//!
//! A single `ShutdownCoordinator` is created per scan and cloned into
//! discovery, every worker and the reducer. Triggering it from any clone
//! (signal handler, outer deadline, test) is observed by all of them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Shared cancellation signal for a scan
#[derive(Clone, Debug)]
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
    shutdown_requested: Arc<AtomicBool>,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(8);
        Self {
            shutdown_tx,
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to shutdown notifications
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Trigger shutdown
    pub fn trigger_shutdown(&self) {
        // Release pairs with the Acquire load in is_shutdown_requested
        self.shutdown_requested.store(true, Ordering::Release);
        let _ = self.shutdown_tx.send(());
    }

    /// Check if shutdown has been requested
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Acquire)
    }

    /// Resolve once shutdown has been requested.
    ///
    /// Subscribes before checking the flag so a trigger between the two
    /// cannot be missed.
    pub async fn cancelled(&self) {
        let mut rx = self.subscribe();
        if self.is_shutdown_requested() {
            return;
        }
        // Lagged or Closed both mean a send happened or can never happen
        let _ = rx.recv().await;
    }

    /// Trigger shutdown once `deadline` elapses unless the scan finished first
    pub fn trigger_after(&self, deadline: Duration) -> tokio::task::JoinHandle<()> {
        let coordinator = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(deadline) => {
                    log::warn!("Scan deadline of {:?} reached; cancelling", deadline);
                    coordinator.trigger_shutdown();
                }
                _ = coordinator.cancelled() => {}
            }
        })
    }

    /// Route SIGINT/SIGTERM/SIGHUP/SIGQUIT (or Ctrl-C elsewhere) into this coordinator.
    ///
    /// A second signal exits the process immediately.
    pub fn install_signal_handlers(&self) {
        setup_signal_handlers(self.shutdown_tx.clone(), self.shutdown_requested.clone());
    }
}

fn setup_signal_handlers(shutdown_tx: broadcast::Sender<()>, shutdown_requested: Arc<AtomicBool>) {
    #[cfg(unix)]
    {
        // Writing to a closed pipe (`glstats | head`) should end quietly
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        use std::sync::atomic::AtomicUsize;
        use tokio::signal::unix::{signal, SignalKind};
        let signal_count = Arc::new(AtomicUsize::new(0));
        let signals = [
            SignalKind::interrupt(),
            SignalKind::terminate(),
            SignalKind::hangup(),
            SignalKind::quit(),
        ];

        for kind in signals {
            let tx = shutdown_tx.clone();
            let requested = shutdown_requested.clone();
            let sig_ctr = signal_count.clone();

            tokio::spawn(async move {
                let Ok(mut sig) = signal(kind) else {
                    return;
                };
                while sig.recv().await.is_some() {
                    let prev = sig_ctr.fetch_add(1, Ordering::AcqRel);
                    requested.store(true, Ordering::Release);
                    let _ = tx.send(());
                    if prev >= 1 {
                        log::warn!("Second interrupt received; exiting");
                        std::process::exit(130);
                    }
                    log::warn!("Interrupt received; cancelling scan (repeat to force exit)");
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            let mut count = 0usize;
            while tokio::signal::ctrl_c().await.is_ok() {
                count += 1;
                shutdown_requested.store(true, Ordering::Release);
                let _ = shutdown_tx.send(());
                if count > 1 {
                    std::process::exit(130);
                }
            }
        });
    }
}
