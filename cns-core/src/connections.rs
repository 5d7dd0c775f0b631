//! Connection writer: idempotently materialises both sides of each
//! candidate pairing.

use std::collections::BTreeMap;

use cns_client::StoreClient;
use nanoid::nanoid;
use tracing::info;

use crate::Result;
use crate::cache::Cache;
use crate::keys;
use crate::matchmaker::Candidate;
use crate::schema::segment;

/// Writes the missing side(s) of every candidate connection.
///
/// Puts are sequential and non-transactional; the watch echoes them back into
/// the cache. Re-running with no intervening mutations produces no writes.
pub async fn materialise<S: StoreClient>(
    store: &S,
    cache: &Cache,
    candidates: &[Candidate],
) -> Result<()> {
    for candidate in candidates {
        write_connection(store, cache, candidate).await?;
    }
    Ok(())
}

async fn write_connection<S: StoreClient>(
    store: &S,
    cache: &Cache,
    candidate: &Candidate,
) -> Result<()> {
    let provider_side = format!(
        "{}/provider/{}/connections",
        candidate.provider, candidate.profile
    );
    let consumer_side = format!(
        "{}/consumer/{}/connections",
        candidate.consumer, candidate.profile
    );

    // A side already pointing at the partner keeps its id; the consumer-side
    // id wins when both carry one.
    let mut id: Option<String> = None;

    let mut add_provider = true;
    for (key, value) in cache.filter(&format!("{provider_side}/*/consumer")) {
        if value == candidate.consumer {
            id = keys::split(&key)
                .get(segment::CONNECTION_ID)
                .map(|s| s.to_string());
            add_provider = false;
            break;
        }
    }

    let mut add_consumer = true;
    for (key, value) in cache.filter(&format!("{consumer_side}/*/provider")) {
        if value == candidate.provider {
            id = keys::split(&key)
                .get(segment::CONNECTION_ID)
                .map(|s| s.to_string());
            add_consumer = false;
            break;
        }
    }

    if !add_provider && !add_consumer {
        return Ok(());
    }

    let defaults = merged_defaults(cache, candidate);
    let id = id.unwrap_or_else(|| nanoid!());

    if add_provider {
        info!(
            provider = %candidate.provider,
            consumer = %candidate.consumer,
            profile = %candidate.profile,
            id = %id,
            "adding provider-side connection"
        );
        store
            .put(&format!("{provider_side}/{id}/consumer"), &candidate.consumer)
            .await?;
        for (name, value) in &defaults {
            store
                .put(&format!("{provider_side}/{id}/properties/{name}"), value)
                .await?;
        }
    }

    if add_consumer {
        info!(
            provider = %candidate.provider,
            consumer = %candidate.consumer,
            profile = %candidate.profile,
            id = %id,
            "adding consumer-side connection"
        );
        store
            .put(&format!("{consumer_side}/{id}/provider"), &candidate.provider)
            .await?;
        for (name, value) in &defaults {
            store
                .put(&format!("{consumer_side}/{id}/properties/{name}"), value)
                .await?;
        }
    }

    Ok(())
}

/// Union of both capabilities' default properties; consumer values take
/// precedence on key collision.
fn merged_defaults(cache: &Cache, candidate: &Candidate) -> BTreeMap<String, String> {
    let mut defaults = BTreeMap::new();

    let provider_properties = format!(
        "{}/provider/{}/properties/*",
        candidate.provider, candidate.profile
    );
    for (key, value) in cache.filter(&provider_properties) {
        if let Some(&name) = keys::split(&key).get(segment::PROPERTY) {
            defaults.insert(name.to_string(), value);
        }
    }

    let consumer_properties = format!(
        "{}/consumer/{}/properties/*",
        candidate.consumer, candidate.profile
    );
    for (key, value) in cache.filter(&consumer_properties) {
        if let Some(&name) = keys::split(&key).get(segment::PROPERTY) {
            defaults.insert(name.to_string(), value);
        }
    }

    defaults
}
