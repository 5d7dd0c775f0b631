//! In-memory store double for writer, propagation and engine tests.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use cns_client::EventOp;
use cns_client::EventStream;
use cns_client::StoreClient;
use cns_client::StoreEvent;
use cns_client::StoreResult;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Cloneable shared-state store: every clone sees the same entries and every
/// put is fanned out to all open watch streams, like the real thing.
#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    entries: BTreeMap<String, String>,
    versions: BTreeMap<String, i64>,
    watchers: Vec<mpsc::UnboundedSender<StoreResult<StoreEvent>>>,
    puts: u64,
}

impl MemoryStore {
    /// Store pre-populated without emitting watch events.
    pub(crate) fn seeded(entries: &[(&str, &str)]) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            for (key, value) in entries {
                state.entries.insert(key.to_string(), value.to_string());
                state.versions.insert(key.to_string(), 1);
            }
        }
        store
    }

    pub(crate) fn value(&self, key: &str) -> Option<String> {
        self.state.lock().unwrap().entries.get(key).cloned()
    }

    pub(crate) fn keys_under(&self, prefix: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Number of puts issued through the client interface; seeding does not
    /// count.
    pub(crate) fn put_count(&self) -> u64 {
        self.state.lock().unwrap().puts
    }

    /// Removes a key and fans a delete event out to the watchers.
    pub(crate) fn delete(&self, key: &str) {
        let mut state = self.state.lock().unwrap();
        state.entries.remove(key);
        let event = StoreEvent {
            op: EventOp::Delete,
            key: key.to_string(),
            value: String::new(),
            version: 0,
        };
        state.watchers.retain(|w| w.send(Ok(event.clone())).is_ok());
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn all(&self, prefix: &str) -> StoreResult<BTreeMap<String, String>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.state.lock().unwrap().entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        let version = state
            .versions
            .entry(key.to_string())
            .and_modify(|v| *v += 1)
            .or_insert(1);
        let version = *version;
        state.entries.insert(key.to_string(), value.to_string());
        state.puts += 1;

        let event = StoreEvent {
            op: EventOp::Put,
            key: key.to_string(),
            value: value.to_string(),
            version,
        };
        state.watchers.retain(|w| w.send(Ok(event.clone())).is_ok());
        Ok(())
    }

    async fn watch(&self, _prefix: &str) -> StoreResult<EventStream> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().unwrap().watchers.push(tx);
        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }

    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}
