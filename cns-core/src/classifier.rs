//! Event classifier: maps raw store mutations to logical intents.

use cns_client::EventOp;
use cns_client::StoreEvent;
use tracing::debug;

use crate::keys;
use crate::schema::Role;
use crate::schema::segment;

/// Logical intent of a store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Topology changed; schedule a debounced full rebuild.
    Rebuild,
    /// Connection-level property write; push to the opposite endpoint.
    Update { key: String, value: String },
    /// Capability-level default write; fan out to the capability's
    /// connections.
    Propagate { key: String, value: String },
    /// No reconciliation action.
    Ignore,
}

/// Dispatches an event by the positional segments of its key.
///
/// The caller refreshes the cache first; classification itself never reads
/// it. Keys outside `root` or missing the network segment are silently
/// ignored. Deletes are logged and dropped: reactive removal of the opposite
/// connection record is deliberately not performed (see DESIGN.md).
pub fn classify(event: &StoreEvent, root: &str) -> Intent {
    let parts = keys::split(&event.key);

    if parts.get(segment::ROOT).copied() != Some(root) || parts.get(segment::NETWORK).is_none() {
        return Intent::Ignore;
    }

    if event.op == EventOp::Delete {
        debug!(key = %event.key, "delete observed; connections are not torn down reactively");
        return Intent::Ignore;
    }

    match parts.get(segment::KIND).copied() {
        Some("orchestrator") | Some("profiles") => Intent::Rebuild,
        Some("nodes") => {
            if parts.get(segment::ROLE).copied().and_then(Role::parse).is_none() {
                return Intent::Ignore;
            }
            match parts.get(segment::CAPABILITY).copied() {
                Some("version") | Some("scope") => Intent::Rebuild,
                Some("properties") => Intent::Propagate {
                    key: event.key.clone(),
                    value: event.value.clone(),
                },
                Some("connections")
                    if parts.get(segment::CONNECTION_SUB).copied() == Some("properties") =>
                {
                    Intent::Update {
                        key: event.key.clone(),
                        value: event.value.clone(),
                    }
                }
                _ => Intent::Ignore,
            }
        }
        _ => Intent::Ignore,
    }
}
