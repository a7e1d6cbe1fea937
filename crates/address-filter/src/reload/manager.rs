//! Background reload worker
//!
//! `ReloadManager` owns one OS thread that drives a current-thread tokio
//! runtime. The worker waits on the notifier and on a shutdown channel;
//! each change event triggers a reload of the store. The public API is
//! synchronous so it can be used with or without an ambient runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::{oneshot, watch};
use tracing::{debug, error, info, warn};

use crate::error::FilterError;
use crate::ports::{ReloadEvent, ReloadNotifier, Reloadable};

const WORKER_THREAD_NAME: &str = "address-filter-reload";

#[derive(Debug, Default)]
struct ReloadCounters {
    reloads_applied: AtomicU64,
    reload_failures: AtomicU64,
}

/// Outcome counts of the reload worker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReloadStats {
    pub reloads_applied: u64,
    pub reload_failures: u64,
}

/// Drives reloads of a `Reloadable` store from a `ReloadNotifier`.
pub struct ReloadManager {
    store: Arc<dyn Reloadable>,
    // Present until `start` hands it to the worker
    notifier: Option<Box<dyn ReloadNotifier>>,
    shutdown_tx: Option<watch::Sender<bool>>,
    worker: Option<JoinHandle<Option<Box<dyn ReloadNotifier>>>>,
    counters: Arc<ReloadCounters>,
}

impl ReloadManager {
    pub fn new(store: Arc<dyn Reloadable>, notifier: Box<dyn ReloadNotifier>) -> Self {
        Self {
            store,
            notifier: Some(notifier),
            shutdown_tx: None,
            worker: None,
            counters: Arc::new(ReloadCounters::default()),
        }
    }

    /// Spawn the reload worker.
    ///
    /// A manager runs at most once; calling `start` again, including after
    /// `stop`, returns `FilterError::AlreadyStarted`. If the worker cannot
    /// be spawned the manager keeps its notifier and `start` may be retried.
    pub fn start(&mut self) -> Result<(), FilterError> {
        self.start_with(thread::Builder::new().name(WORKER_THREAD_NAME.to_string()))
    }

    fn start_with(&mut self, builder: thread::Builder) -> Result<(), FilterError> {
        if self.worker.is_some() {
            return Err(FilterError::AlreadyStarted);
        }
        let notifier = self.notifier.take().ok_or(FilterError::AlreadyStarted)?;

        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                self.notifier = Some(notifier);
                return Err(FilterError::WorkerSpawn(e.to_string()));
            }
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        // The notifier only moves to the worker once the thread exists
        let (notifier_tx, notifier_rx) = oneshot::channel::<Box<dyn ReloadNotifier>>();
        let store = Arc::clone(&self.store);
        let counters = Arc::clone(&self.counters);
        let source = notifier.source().display().to_string();

        let spawned = builder.spawn(move || {
            runtime.block_on(async move {
                let notifier = notifier_rx.await.ok()?;
                Some(run_reload_loop(store, notifier, shutdown_rx, counters).await)
            })
        });
        let worker = match spawned {
            Ok(worker) => worker,
            Err(e) => {
                self.notifier = Some(notifier);
                return Err(FilterError::WorkerSpawn(e.to_string()));
            }
        };
        if let Err(mut notifier) = notifier_tx.send(notifier) {
            notifier.close();
        }

        self.shutdown_tx = Some(shutdown_tx);
        self.worker = Some(worker);
        info!(path = %source, "Reload manager started");
        Ok(())
    }

    /// Signal the worker, wait for it to exit and close the notifier.
    ///
    /// Idempotent. Returns `FilterError::WorkerPanicked` if the worker
    /// thread panicked; the manager is stopped either way.
    pub fn stop(&mut self) -> Result<(), FilterError> {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            // Err means the worker already exited
            let _ = shutdown_tx.send(true);
        }

        if let Some(mut notifier) = self.notifier.take() {
            notifier.close();
        }

        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        match worker.join() {
            Ok(notifier) => {
                if let Some(mut notifier) = notifier {
                    notifier.close();
                }
                info!("Reload manager stopped");
                Ok(())
            }
            Err(_) => Err(FilterError::WorkerPanicked),
        }
    }

    /// Whether the worker thread is alive.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map(|worker| !worker.is_finished())
            .unwrap_or(false)
    }

    pub fn stats(&self) -> ReloadStats {
        ReloadStats {
            reloads_applied: self.counters.reloads_applied.load(Ordering::Relaxed),
            reload_failures: self.counters.reload_failures.load(Ordering::Relaxed),
        }
    }
}

impl Drop for ReloadManager {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!(error = %e, "Reload manager failed to stop cleanly");
        }
    }
}

impl std::fmt::Debug for ReloadManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadManager")
            .field("running", &self.is_running())
            .field("stats", &self.stats())
            .finish()
    }
}

async fn run_reload_loop(
    store: Arc<dyn Reloadable>,
    mut notifier: Box<dyn ReloadNotifier>,
    mut shutdown: watch::Receiver<bool>,
    counters: Arc<ReloadCounters>,
) -> Box<dyn ReloadNotifier> {
    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => {
                debug!("Reload worker received shutdown signal");
                break;
            }
            event = notifier.next_change() => match event {
                Ok(event) => apply_reload(store.as_ref(), &event, &counters),
                Err(FilterError::NotifierClosed) => {
                    warn!("Reload notifier closed, worker exiting");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Reload notifier error");
                }
            }
        }
    }
    notifier
}

fn apply_reload(store: &dyn Reloadable, event: &ReloadEvent, counters: &ReloadCounters) {
    match store.reload_from_file(&event.path) {
        Ok(snapshot) => {
            counters.reloads_applied.fetch_add(1, Ordering::Relaxed);
            info!(
                path = %event.path.display(),
                generation = snapshot.generation,
                addresses = snapshot.address_count,
                "Address filter reloaded"
            );
        }
        Err(e) => {
            counters.reload_failures.fetch_add(1, Ordering::Relaxed);
            error!(
                path = %event.path.display(),
                error = %e,
                "Address filter reload failed, keeping previous snapshot"
            );
        }
    }
}
