use cns_client::EventOp;
use cns_client::StoreEvent;

use crate::Intent;
use crate::classify;

fn put(key: &str, value: &str) -> StoreEvent {
    StoreEvent {
        op: EventOp::Put,
        key: key.to_string(),
        value: value.to_string(),
        version: 1,
    }
}

fn delete(key: &str) -> StoreEvent {
    StoreEvent {
        op: EventOp::Delete,
        key: key.to_string(),
        value: String::new(),
        version: 0,
    }
}

#[test]
fn test_orchestrator_write_triggers_rebuild() {
    assert_eq!(classify(&put("cns/net1/orchestrator", "bysystem"), "cns"), Intent::Rebuild);
}

#[test]
fn test_profile_write_triggers_rebuild() {
    let key = "cns/net1/profiles/p1/versions/version1/properties/x/provider";
    assert_eq!(classify(&put(key, "yes"), "cns"), Intent::Rebuild);
}

#[test]
fn test_capability_version_and_scope_trigger_rebuild() {
    let version = "cns/net1/nodes/a/contexts/x/provider/p1/version";
    let scope = "cns/net1/nodes/a/contexts/x/consumer/p1/scope";
    assert_eq!(classify(&put(version, "1"), "cns"), Intent::Rebuild);
    assert_eq!(classify(&put(scope, "x"), "cns"), Intent::Rebuild);
}

#[test]
fn test_capability_property_triggers_propagate() {
    let key = "cns/net1/nodes/a/contexts/x/provider/p1/properties/speed";
    assert_eq!(
        classify(&put(key, "fast"), "cns"),
        Intent::Propagate {
            key: key.to_string(),
            value: "fast".to_string(),
        }
    );
}

#[test]
fn test_connection_property_triggers_update() {
    let key = "cns/net1/nodes/a/contexts/x/provider/p1/connections/abc/properties/speed";
    assert_eq!(
        classify(&put(key, "fast"), "cns"),
        Intent::Update {
            key: key.to_string(),
            value: "fast".to_string(),
        }
    );
}

#[test]
fn test_connection_link_is_ignored() {
    // The doubly-linked endpoint record itself carries no property to sync.
    let key = "cns/net1/nodes/a/contexts/x/provider/p1/connections/abc/consumer";
    assert_eq!(classify(&put(key, "cns/net1/nodes/b/contexts/x"), "cns"), Intent::Ignore);
}

#[test]
fn test_unknown_role_is_ignored() {
    let key = "cns/net1/nodes/a/contexts/x/observer/p1/version";
    assert_eq!(classify(&put(key, "1"), "cns"), Intent::Ignore);
}

#[test]
fn test_foreign_root_is_ignored() {
    assert_eq!(classify(&put("other/net1/orchestrator", "bysystem"), "cns"), Intent::Ignore);
}

#[test]
fn test_missing_network_segment_is_ignored() {
    assert_eq!(classify(&put("cns", "x"), "cns"), Intent::Ignore);
}

#[test]
fn test_name_writes_are_ignored() {
    assert_eq!(classify(&put("cns/net1/name", "My Network"), "cns"), Intent::Ignore);
    assert_eq!(classify(&put("cns/net1/nodes/a/name", "A"), "cns"), Intent::Ignore);
}

#[test]
fn test_deletes_are_logged_only() {
    assert_eq!(classify(&delete("cns/net1/orchestrator"), "cns"), Intent::Ignore);
    assert_eq!(
        classify(&delete("cns/net1/nodes/a/contexts/x/provider/p1/version"), "cns"),
        Intent::Ignore
    );
}
