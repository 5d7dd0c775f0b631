//! Property propagation: the two directional sync paths.
//!
//! `update` fires on a connection-level property write and pushes the value
//! to the opposite endpoint of that connection. `propagate` fires on a
//! capability-level default write and fans the value out to every connection
//! of the capability; the echoes of those writes then cascade through
//! `update` to the opposite endpoints.

use cns_client::StoreClient;
use tracing::debug;

use crate::Result;
use crate::cache::Cache;
use crate::keys;
use crate::schema::Mode;
use crate::schema::Role;
use crate::schema::opposite_role;
use crate::schema::segment;

/// Resolution shared by both paths: the touched capability's namespace and
/// the role the value flows to.
struct Direction {
    /// `{endpoint}/{role}/{profile}`.
    namespace: String,
    profile: String,
    opposite: Role,
}

/// Resolves the flow direction for a property write, or `None` when the
/// write must be ignored: unrecognised network mode, write from the
/// non-owning side, or missing capability version / profile flag.
fn resolve(cache: &Cache, root: &str, parts: &[&str], property: &str) -> Option<Direction> {
    let network = parts.get(segment::NETWORK)?;
    cache
        .get(&format!("{root}/{network}/orchestrator"))
        .and_then(Mode::parse)?;

    let role = Role::parse(parts.get(segment::ROLE)?)?;
    let profile = *parts.get(segment::PROFILE)?;
    let namespace = parts[..=segment::PROFILE].join("/");

    let version = cache.get(&format!("{namespace}/version"))?;
    let flag = cache.get(&format!(
        "{root}/{network}/profiles/{profile}/versions/version{version}/properties/{property}/provider"
    ))?;
    let opposite = opposite_role(role, flag)?;

    Some(Direction {
        namespace,
        profile: profile.to_string(),
        opposite,
    })
}

/// Connection-level property write: mirror the value onto the opposite
/// endpoint of that connection.
pub async fn update<S: StoreClient>(
    store: &S,
    cache: &Cache,
    root: &str,
    key: &str,
    value: &str,
) -> Result<()> {
    let parts = keys::split(key);
    let (Some(&id), Some(&property)) = (
        parts.get(segment::CONNECTION_ID),
        parts.get(segment::CONNECTION_PROPERTY),
    ) else {
        return Ok(());
    };

    let Some(direction) = resolve(cache, root, &parts, property) else {
        debug!(key, "connection property write does not propagate");
        return Ok(());
    };

    let link = format!("{}/connections/{}/{}", direction.namespace, id, direction.opposite);
    let Some(other) = cache.get(&link) else {
        debug!(key, link = %link, "connection has no opposite endpoint record");
        return Ok(());
    };

    let target = format!(
        "{}/{}/{}/connections/{}/properties/{}",
        other, direction.opposite, direction.profile, id, property
    );
    store.put(&target, value).await?;
    Ok(())
}

/// Capability-level default write: set the value on every connection of the
/// capability. The echoed writes re-enter through `update`.
pub async fn propagate<S: StoreClient>(
    store: &S,
    cache: &Cache,
    root: &str,
    key: &str,
    value: &str,
) -> Result<()> {
    let parts = keys::split(key);
    let Some(&property) = parts.get(segment::PROPERTY) else {
        return Ok(());
    };

    let Some(direction) = resolve(cache, root, &parts, property) else {
        debug!(key, "capability property write does not propagate");
        return Ok(());
    };

    let links = format!("{}/connections/*/{}", direction.namespace, direction.opposite);
    for link_key in cache.filter(&links).keys() {
        let Some(&id) = keys::split(link_key).get(segment::CONNECTION_ID) else {
            continue;
        };
        let target = format!(
            "{}/connections/{}/properties/{}",
            direction.namespace, id, property
        );
        store.put(&target, value).await?;
    }
    Ok(())
}
