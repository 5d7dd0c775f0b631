//! Matchmaker: enumerates provider/consumer pairs under each network's
//! scope mode.

use tracing::debug;

use crate::cache::Cache;
use crate::keys;
use crate::schema::Mode;
use crate::schema::segment;

/// A provider/consumer pairing sharing profile and version, to be
/// materialised by the connection writer. Endpoints are absolute prefixes of
/// the form `cns/{network}/nodes/{node}/contexts/{ctx}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub provider: String,
    pub consumer: String,
    pub profile: String,
    pub version: String,
}

/// Walks the cache and lists every candidate pair.
///
/// Networks without a recognised orchestrator mode are skipped whole. The
/// provider's context name acts as the match scope: a consumer qualifies
/// when its context carries the same name, declares the same profile, and
/// its version value equals the provider's.
pub fn candidates(cache: &Cache, root: &str) -> Vec<Candidate> {
    let mut found = Vec::new();

    for network_key in cache.filter(&format!("{root}/*/name")).keys() {
        let Some(&network) = keys::split(network_key).get(segment::NETWORK) else {
            continue;
        };

        let mode = cache
            .get(&format!("{root}/{network}/orchestrator"))
            .and_then(Mode::parse);
        let Some(mode) = mode else {
            debug!(network, "missing or unrecognised orchestrator mode; skipping network");
            continue;
        };

        for node_key in cache.filter(&format!("{root}/{network}/nodes/*/name")).keys() {
            let Some(&node) = keys::split(node_key).get(segment::NODE) else {
                continue;
            };

            let contexts = format!("{root}/{network}/nodes/{node}/contexts");
            for context_key in cache.filter(&format!("{contexts}/*/name")).keys() {
                let Some(&context) = keys::split(context_key).get(segment::CONTEXT) else {
                    continue;
                };

                let provider = format!("{contexts}/{context}");
                for (version_key, version) in
                    cache.filter(&format!("{provider}/provider/*/version"))
                {
                    let Some(&profile) = keys::split(&version_key).get(segment::PROFILE) else {
                        continue;
                    };
                    emit_consumers(
                        cache, root, mode, network, &provider, context, profile, &version,
                        &mut found,
                    );
                }
            }
        }
    }

    found
}

/// Fans one provider capability out to its candidate consumers under the
/// network's mode.
#[allow(clippy::too_many_arguments)]
fn emit_consumers(
    cache: &Cache,
    root: &str,
    mode: Mode,
    network: &str,
    provider: &str,
    scope: &str,
    profile: &str,
    version: &str,
    found: &mut Vec<Candidate>,
) {
    match mode {
        Mode::AllSystems => {
            for network_key in cache.filter(&format!("{root}/*/name")).keys() {
                if let Some(&network) = keys::split(network_key).get(segment::NETWORK) {
                    match_network(cache, root, network, provider, scope, profile, version, found);
                }
            }
        }
        Mode::BySystem => {
            match_network(cache, root, network, provider, scope, profile, version, found);
        }
    }
}

/// Per-network matcher: consumers of the same profile in a context named
/// like the provider's, declaring the provider's version.
#[allow(clippy::too_many_arguments)]
fn match_network(
    cache: &Cache,
    root: &str,
    network: &str,
    provider: &str,
    scope: &str,
    profile: &str,
    version: &str,
    found: &mut Vec<Candidate>,
) {
    for node_key in cache.filter(&format!("{root}/{network}/nodes/*/name")).keys() {
        let Some(&node) = keys::split(node_key).get(segment::NODE) else {
            continue;
        };

        let contexts = format!("{root}/{network}/nodes/{node}/contexts");
        for context_key in cache.filter(&format!("{contexts}/*/name")).keys() {
            let Some(&context) = keys::split(context_key).get(segment::CONTEXT) else {
                continue;
            };
            if context != scope {
                continue;
            }

            let consumer = format!("{contexts}/{context}");
            for (_, declared) in cache.filter(&format!("{consumer}/consumer/{profile}/version")) {
                if declared == version {
                    found.push(Candidate {
                        provider: provider.to_string(),
                        consumer: consumer.clone(),
                        profile: profile.to_string(),
                        version: version.to_string(),
                    });
                }
            }
        }
    }
}
