//! The reconciliation engine: one task owning the cache, the debounce timer
//! and the store client.
//!
//! All handlers run sequentially on this task; the only suspension points
//! are the awaited store operations and the debounce sleep. Two rebuild
//! passes can therefore never overlap, and rebuild requests arriving while a
//! pass runs simply arm a fresh timer.

use std::future::pending;

use cns_client::StoreClient;
use cns_client::StoreError;
use cns_client::StoreEvent;
use futures::StreamExt;
use tokio::sync::watch;
use tokio::time::Duration;
use tokio::time::sleep_until;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::trace;
use tracing::warn;

use crate::Result;
use crate::cache::Cache;
use crate::classifier::Intent;
use crate::classifier::classify;
use crate::config::OrchestratorConfig;
use crate::connections;
use crate::matchmaker;
use crate::propagate;
use crate::timer::RebuildTimer;

pub struct Engine<S> {
    store: S,
    cache: Cache,
    timer: RebuildTimer,
    /// Watch prefix, e.g. `cns`.
    namespace: String,
    /// First segment of the namespace; every reconciled key starts with it.
    root: String,
    shutdown: watch::Receiver<()>,
}

impl<S: StoreClient> Engine<S> {
    pub fn new(store: S, config: &OrchestratorConfig, shutdown: watch::Receiver<()>) -> Self {
        let root = config
            .namespace
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            store,
            cache: Cache::new(),
            timer: RebuildTimer::new(Duration::from_millis(config.debounce_ms)),
            namespace: config.namespace.clone(),
            root,
            shutdown,
        }
    }

    /// Loads the namespace snapshot, opens the watch and reconciles until
    /// the shutdown signal fires or the watch stream fails.
    pub async fn run(&mut self) -> Result<()> {
        let snapshot = self.store.all(&self.namespace).await?;
        info!(namespace = %self.namespace, keys = snapshot.len(), "initial cache loaded");
        self.cache = Cache::load(snapshot);

        let mut events = self.store.watch(&self.namespace).await?;

        // Whatever is already declared in the store gets one pass.
        self.timer.arm();

        loop {
            let deadline = self.timer.deadline();
            let tick = async move {
                match deadline {
                    Some(deadline) => sleep_until(deadline).await,
                    None => pending().await,
                }
            };

            tokio::select! {
                biased;

                _ = self.shutdown.changed() => {
                    info!("shutdown signal received");
                    break;
                }

                _ = tick => {
                    self.timer.cancel();
                    if let Err(e) = self.build().await {
                        error!(error = %e, "rebuild failed");
                    }
                }

                event = events.next() => {
                    match event {
                        Some(Ok(event)) => self.handle(event).await,
                        Some(Err(e)) => {
                            error!(error = %e, "watch stream failed");
                            return Err(e.into());
                        }
                        None => {
                            warn!("watch stream ended");
                            return Err(StoreError::FailedToWatch("stream ended".into()).into());
                        }
                    }
                }
            }
        }

        self.timer.cancel();
        drop(events);
        self.store.close().await?;
        Ok(())
    }

    /// Refreshes the cache, then dispatches. Handler failures are logged and
    /// swallowed: one bad event or failed put must not kill the watch.
    async fn handle(&mut self, event: StoreEvent) {
        trace!(op = ?event.op, key = %event.key, "store event");
        self.cache.apply(&event);

        match classify(&event, &self.root) {
            Intent::Rebuild => self.timer.arm(),
            Intent::Update { key, value } => {
                if let Err(e) =
                    propagate::update(&self.store, &self.cache, &self.root, &key, &value).await
                {
                    error!(error = %e, key = %key, "connection property update failed");
                }
            }
            Intent::Propagate { key, value } => {
                if let Err(e) =
                    propagate::propagate(&self.store, &self.cache, &self.root, &key, &value).await
                {
                    error!(error = %e, key = %key, "capability property propagation failed");
                }
            }
            Intent::Ignore => {}
        }
    }

    /// One full matchmaking and materialisation pass over the cache.
    pub(crate) async fn build(&self) -> Result<()> {
        let candidates = matchmaker::candidates(&self.cache, &self.root);
        debug!(candidates = candidates.len(), "rebuild pass");
        connections::materialise(&self.store, &self.cache, &candidates).await
    }
}
