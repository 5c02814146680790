//! # Catalog Loader
//!
//! Runs the one suspending operation in the storefront: fetching the
//! catalog. The fetch happens on a background task so the view stays
//! responsive, and can be abandoned at any point.
//!
//! ## Load Task
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Load Task Lifecycle                              │
//! │                                                                         │
//! │  spawn ──► store.begin_load() ──None──► (already loading, no task)     │
//! │                 │ Some(ticket)                                          │
//! │                 ▼                                                       │
//! │          tokio::select! {                                              │
//! │            source.fetch() [+ timeout] ──Ok──► ingest ──► complete      │
//! │                                       ──Err─► fail (warn!)             │
//! │            shutdown_rx.recv()  ───────────────► abandon                │
//! │          }                                                             │
//! │                                                                         │
//! │  Shutdown fires on LoadHandle::abandon() AND when the handle is        │
//! │  dropped (the channel closes), so dropping the owner cancels the load. │
//! │  The outcome is published on a watch channel; any number of            │
//! │  LoadCompletion clones can wait on it while the handle stays put.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use storefront_core::{Catalog, CatalogStore, LoadTicket};

use crate::error::{ClientError, ClientResult};
use crate::source::CatalogSource;
use crate::wire::ingest;

/// Shared handle to the catalog store.
pub type SharedCatalog = Arc<RwLock<CatalogStore>>;

// =============================================================================
// Load Outcome
// =============================================================================

/// How a load task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Catalog is `Loaded`.
    Loaded { accepted: usize, rejected: usize },
    /// Catalog is `Failed` with this message.
    Failed(String),
    /// Nobody wanted the result anymore; the catalog went back to `NotLoaded`
    /// (or a newer load owns it).
    Abandoned,
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

// =============================================================================
// Load Handle
// =============================================================================

/// Owner's side of a running load.
#[derive(Debug)]
pub struct LoadHandle {
    ticket: LoadTicket,
    shutdown_tx: mpsc::Sender<()>,
    done_rx: watch::Receiver<Option<LoadOutcome>>,
}

impl LoadHandle {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    /// Asks the task to stop. The catalog returns to `NotLoaded`.
    pub fn abandon(&self) {
        if self.shutdown_tx.try_send(()).is_err() {
            debug!("Load task already stopping");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.done_rx.borrow().is_some()
    }

    /// A waiter that does not own the load.
    ///
    /// Waiting through it leaves the handle where it is, so the load can
    /// still be abandoned while someone waits.
    pub fn completion(&self) -> LoadCompletion {
        LoadCompletion {
            done_rx: self.done_rx.clone(),
        }
    }

    /// Waits for the task to end.
    pub async fn wait(&self) -> ClientResult<LoadOutcome> {
        self.completion().wait().await
    }
}

/// Cloneable signal that resolves when a load task ends.
#[derive(Debug, Clone)]
pub struct LoadCompletion {
    done_rx: watch::Receiver<Option<LoadOutcome>>,
}

impl LoadCompletion {
    pub async fn wait(mut self) -> ClientResult<LoadOutcome> {
        let outcome = match self.done_rx.wait_for(|outcome| outcome.is_some()).await {
            Ok(done) => (*done).clone(),
            Err(_) => None,
        };

        outcome.ok_or_else(|| {
            ClientError::ChannelError("load task ended without an outcome".to_string())
        })
    }
}

// =============================================================================
// Catalog Loader
// =============================================================================

/// Background task that performs one catalog load.
pub struct CatalogLoader {
    store: SharedCatalog,
    source: Arc<dyn CatalogSource>,
    timeout: Option<Duration>,
    ticket: LoadTicket,
    shutdown_rx: mpsc::Receiver<()>,
}

impl CatalogLoader {
    /// Starts a load and spawns its task.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// ## Returns
    /// `None` if a load is already in flight.
    pub fn spawn(
        store: SharedCatalog,
        source: Arc<dyn CatalogSource>,
        timeout: Option<Duration>,
    ) -> Option<LoadHandle> {
        let ticket = match write(&store).begin_load() {
            Some(ticket) => ticket,
            None => {
                debug!("Catalog load already in progress, ignoring request");
                return None;
            }
        };

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let (done_tx, done_rx) = watch::channel(None);

        let loader = CatalogLoader {
            store,
            source,
            timeout,
            ticket,
            shutdown_rx,
        };

        tokio::spawn(async move {
            let outcome = loader.run().await;
            done_tx.send_replace(Some(outcome));
        });

        Some(LoadHandle {
            ticket,
            shutdown_tx,
            done_rx,
        })
    }

    async fn run(mut self) -> LoadOutcome {
        info!(source = %self.source.describe(), "Catalog load starting");

        let source = Arc::clone(&self.source);
        let timeout = self.timeout;
        let fetch = async move {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, source.fetch())
                    .await
                    .unwrap_or_else(|_| Err(ClientError::Timeout(limit.as_secs()))),
                None => source.fetch().await,
            }
        };

        let result = tokio::select! {
            result = fetch => Some(result),
            _ = self.shutdown_rx.recv() => None,
        };

        let mut store = write(&self.store);

        match result {
            Some(Ok(records)) => {
                let report = ingest(records);
                let rejected = report.rejected.len();

                match Catalog::from_products(report.products) {
                    Ok(catalog) => {
                        let accepted = catalog.len();
                        if !store.complete(self.ticket, catalog) {
                            debug!("Catalog load superseded, dropping result");
                            return LoadOutcome::Abandoned;
                        }
                        info!(accepted, rejected, "Catalog loaded");
                        LoadOutcome::Loaded { accepted, rejected }
                    }
                    Err(e) => self.fail(&mut store, e.to_string()),
                }
            }
            Some(Err(e)) => self.fail(&mut store, e.to_string()),
            None => {
                if store.abandon(self.ticket) {
                    info!("Catalog load abandoned");
                }
                LoadOutcome::Abandoned
            }
        }
    }

    fn fail(&self, store: &mut CatalogStore, message: String) -> LoadOutcome {
        if !store.fail(self.ticket, message.clone()) {
            return LoadOutcome::Abandoned;
        }

        warn!(error = %message, "Catalog load failed");
        let recorded = store.error().unwrap_or(&message).to_string();
        LoadOutcome::Failed(recorded)
    }
}

// =============================================================================
// Lock Helpers
// =============================================================================
// A panic while holding the lock cannot leave CatalogStore half-updated
// (every transition is a single assignment), so poisoning is ignored.

pub(crate) fn read(store: &SharedCatalog) -> std::sync::RwLockReadGuard<'_, CatalogStore> {
    store.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write(store: &SharedCatalog) -> std::sync::RwLockWriteGuard<'_, CatalogStore> {
    store.write().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Unit Tests
// =============================================================================
