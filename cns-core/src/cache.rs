use std::collections::BTreeMap;

use cns_client::EventOp;
use cns_client::StoreEvent;

use crate::keys;

/// In-memory mirror of the orchestrated store prefix.
///
/// Written only by the engine's event handler, and always before the event is
/// dispatched, so every downstream reader sees the latest value for the
/// event's key. Ordered keys keep rebuild walks deterministic given the key
/// set.
#[derive(Debug, Clone, Default)]
pub struct Cache {
    entries: BTreeMap<String, String>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cache with a store snapshot.
    pub fn load(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Applies a watch event: put inserts, delete removes.
    pub fn apply(&mut self, event: &StoreEvent) {
        match event.op {
            EventOp::Put => {
                self.entries.insert(event.key.clone(), event.value.clone());
            }
            EventOp::Delete => {
                self.entries.remove(&event.key);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Wildcard-filtered sub-map; see [`keys::filter`].
    pub fn filter(&self, pattern: &str) -> BTreeMap<String, String> {
        keys::filter(&self.entries, pattern)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
