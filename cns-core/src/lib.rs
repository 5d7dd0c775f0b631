//! Reconciliation engine for the CNS orchestrator.
//!
//! Observes a key-value namespace describing networks of nodes, contexts and
//! capabilities, keeps the `connections` subtree in agreement with the
//! declared provider/consumer capabilities, and propagates property values
//! across established connections according to per-property ownership.
//!
//! Core pieces, in data-flow order:
//! - [`Cache`] - in-memory mirror of the watched prefix
//! - [`classify`] - store mutation → logical intent
//! - [`RebuildTimer`] - debounced rebuild scheduling
//! - [`matchmaker`] - provider/consumer pair enumeration
//! - [`connections`] - double-sided connection materialisation
//! - [`propagate`] - directional property sync
//! - [`Engine`] - the single owning task tying them together

mod cache;
mod classifier;
mod config;
pub mod connections;
mod constants;
mod engine;
mod errors;
pub mod keys;
pub mod matchmaker;
pub mod propagate;
pub mod schema;
mod timer;

pub use cache::Cache;
pub use classifier::Intent;
pub use classifier::classify;
pub use config::OrchestratorConfig;
pub use constants::DEFAULT_DEBOUNCE_MS;
pub use constants::DEFAULT_NAMESPACE;
pub use engine::Engine;
pub use errors::Error;
pub use errors::Result;
pub use schema::Mode;
pub use schema::Role;
pub use timer::RebuildTimer;

#[cfg(test)]
mod test_store;

#[cfg(test)]
mod classifier_test;
#[cfg(test)]
mod keys_test;
