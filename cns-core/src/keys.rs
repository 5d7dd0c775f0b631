//! Key parser and wildcard filter.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::warn;

/// Splits a key into its positional segments. Positions are fixed by the
/// schema; callers index the result through [`crate::schema::segment`].
pub fn split(key: &str) -> Vec<&str> {
    key.split('/').collect()
}

/// Keeps the entries whose key matches `pattern` under glob semantics: the
/// segment counts must be equal and each pattern segment matches the
/// corresponding key segment with `*` expanding within that segment only.
/// Matching is case-insensitive; every other regex metacharacter in the
/// pattern is taken literally.
pub fn filter(map: &BTreeMap<String, String>, pattern: &str) -> BTreeMap<String, String> {
    let regex = match glob_regex(pattern) {
        Ok(regex) => regex,
        Err(e) => {
            warn!(pattern, error = %e, "unmatchable filter pattern");
            return BTreeMap::new();
        }
    };

    map.iter()
        .filter(|(key, _)| regex.is_match(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Anchored, case-insensitive regex for a glob pattern. `[^/]*` in place of
/// `*` keeps wildcards inside their segment and makes the segment counts of
/// pattern and key agree by construction.
fn glob_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("(?i)^");
    for (i, segment) in pattern.split('/').enumerate() {
        if i > 0 {
            source.push('/');
        }
        source.push_str(&regex::escape(segment).replace("\\*", "[^/]*"));
    }
    source.push('$');
    Regex::new(&source)
}
