//! Batched loader dispatch for one priority level.

use anyhow::{Context, Result};
use futures::future;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ResolverConfig;
use crate::content::ResourceId;
use crate::core::ResolutionError;
use crate::loader::{LoadedResources, ResourceLoader, ResourceLoaderProvider};

/// Call every implicated loader exactly once with all of its ids.
///
/// `resources_by_loader` maps each loader key to its distinct ids. All keys
/// are checked before any loader runs: an empty or unregistered key fails
/// the whole level. With `parallel_loads` the batches run concurrently and
/// the first failure wins; otherwise they run in key order.
pub(crate) async fn load_resources(
    provider: &dyn ResourceLoaderProvider,
    resources_by_loader: BTreeMap<String, Vec<ResourceId>>,
    locale: Option<&str>,
    config: &ResolverConfig,
) -> Result<BTreeMap<String, LoadedResources>> {
    let mut batches = Vec::with_capacity(resources_by_loader.len());
    for (key, ids) in resources_by_loader {
        let loader = lookup_loader(provider, &key, &ids)?;
        batches.push((key, loader, ids));
    }

    let timeout = config.load_timeout();
    let results = if config.parallel_loads {
        let futures = batches
            .into_iter()
            .map(|(key, loader, ids)| load_batch(key, loader, ids, locale, timeout));
        future::try_join_all(futures).await?
    } else {
        let mut results = Vec::with_capacity(batches.len());
        for (key, loader, ids) in batches {
            results.push(load_batch(key, loader, ids, locale, timeout).await?);
        }
        results
    };

    Ok(results.into_iter().collect())
}

fn lookup_loader(
    provider: &dyn ResourceLoaderProvider,
    key: &str,
    ids: &[ResourceId],
) -> Result<Arc<dyn ResourceLoader>, ResolutionError> {
    if key.is_empty() {
        let id = ids.first().cloned().unwrap_or(ResourceId::Str(String::new()));
        return Err(ResolutionError::EmptyResourceLoaderKey { id });
    }

    provider
        .get_resource_loader(key)
        .ok_or_else(|| ResolutionError::ResourceLoaderNotFound {
            key: key.to_string(),
            available: provider.resource_loader_keys(),
        })
}

async fn load_batch(
    key: String,
    loader: Arc<dyn ResourceLoader>,
    ids: Vec<ResourceId>,
    locale: Option<&str>,
    timeout: Option<Duration>,
) -> Result<(String, LoadedResources)> {
    tracing::debug!("Loading {} resource(s) with loader '{}' (locale: {:?})", ids.len(), key, locale);

    let call = loader.load(&ids, locale);
    let loaded = match timeout {
        Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| ResolutionError::LoaderTimeout {
            key: key.clone(),
            timeout: limit,
        })?,
        None => call.await,
    }
    .with_context(|| format!("Resource loader '{}' failed to load {} resource(s)", key, ids.len()))?;

    Ok((key, loaded))
}
