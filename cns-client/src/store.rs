//! Store contract consumed by the reconciliation engine.
//!
//! The engine never talks to the wire directly; it is generic over this trait
//! so scenario tests can substitute an in-memory store for the gRPC
//! implementation.

use std::collections::BTreeMap;
use std::pin::Pin;

use futures::Stream;

use crate::StoreResult;

/// A single mutation observed on the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub op: EventOp,
    pub key: String,
    pub value: String,
    /// Modification count of the key; `1` marks key creation.
    pub version: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOp {
    Put,
    Delete,
}

/// Stream of watch events for a key prefix.
pub type EventStream = Pin<Box<dyn Stream<Item = StoreResult<StoreEvent>> + Send>>;

/// Key-value store interface: prefix-range get, single-key get/put, prefix
/// watch and close. Keys and values are UTF-8 strings; no multi-key
/// atomicity is assumed.
#[async_trait::async_trait]
pub trait StoreClient: Send + Sync {
    /// Returns every key under `prefix` with its current value.
    async fn all(&self, prefix: &str) -> StoreResult<BTreeMap<String, String>>;

    /// Returns the value of `key`, or `None` if absent.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, creating or overwriting.
    async fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Opens a watch over `prefix` yielding one [`StoreEvent`] per mutation,
    /// in the order the store emits them.
    async fn watch(&self, prefix: &str) -> StoreResult<EventStream>;

    /// Releases the connection. Watch streams already handed out end when
    /// dropped.
    async fn close(&self) -> StoreResult<()>;
}
