use std::collections::BTreeMap;

use crate::keys::filter;
use crate::keys::split;

fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_split_yields_positional_segments() {
    let parts = split("cns/net1/nodes/a/contexts/x/provider/p1/version");
    assert_eq!(parts.len(), 9);
    assert_eq!(parts[0], "cns");
    assert_eq!(parts[1], "net1");
    assert_eq!(parts[6], "provider");
    assert_eq!(parts[8], "version");
}

#[test]
fn test_split_keeps_empty_segments() {
    assert_eq!(split("cns//name"), vec!["cns", "", "name"]);
}

#[test]
fn test_filter_literal_pattern() {
    let m = map(&[("cns/net1/name", "n"), ("cns/net1/orchestrator", "bysystem")]);
    let out = filter(&m, "cns/net1/name");
    assert_eq!(out.len(), 1);
    assert_eq!(out["cns/net1/name"], "n");
}

#[test]
fn test_filter_wildcard_matches_within_one_segment() {
    let m = map(&[
        ("cns/net1/name", "a"),
        ("cns/net2/name", "b"),
        ("cns/net1/nodes/x/name", "c"),
    ]);
    let out = filter(&m, "cns/*/name");
    assert_eq!(
        out.keys().collect::<Vec<_>>(),
        vec!["cns/net1/name", "cns/net2/name"]
    );
}

#[test]
fn test_filter_requires_same_segment_count() {
    let m = map(&[("cns/net1/name", "a"), ("cns/net1/nodes/x/name", "b")]);
    assert!(filter(&m, "cns/*/nodes/*/name").contains_key("cns/net1/nodes/x/name"));
    assert!(!filter(&m, "cns/*/nodes/*/name").contains_key("cns/net1/name"));
}

#[test]
fn test_filter_is_case_insensitive() {
    let m = map(&[("cns/Net1/Name", "a")]);
    assert_eq!(filter(&m, "cns/net1/name").len(), 1);
    assert_eq!(filter(&m, "CNS/*/NAME").len(), 1);
}

#[test]
fn test_filter_escapes_regex_metacharacters() {
    let m = map(&[("cns/a+b/name", "a"), ("cns/axb/name", "b")]);
    // Literal `+` must match itself only.
    let out = filter(&m, "cns/a+b/name");
    assert_eq!(out.keys().collect::<Vec<_>>(), vec!["cns/a+b/name"]);
    // A `.` in the pattern is not a regex dot.
    assert!(filter(&m, "cns/a.b/name").is_empty());
}

#[test]
fn test_filter_star_matches_empty_segment() {
    let m = map(&[("cns//name", "a")]);
    assert_eq!(filter(&m, "cns/*/name").len(), 1);
}
