//! Batch resource loaders and the registry that hands them out.
//!
//! A [`ResourceLoader`] turns a set of ids into loaded values for one kind of
//! resource (pages, media, accounts, smart-content queries). The engine calls
//! each loader at most once per priority level with every distinct id it needs
//! at that level, so loaders should fetch the whole batch in one round trip.
//!
//! Loaders are looked up by key through a [`ResourceLoaderProvider`];
//! [`ResourceLoaderRegistry`] is the map-backed provider.

use anyhow::Result;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::content::{ResourceId, Value};
use crate::dimension::ContentEntity;

/// A loaded resource.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedResource {
    /// A content-rich entity; the engine aggregates and resolves it further.
    Entity(ContentEntity),
    /// Any other value, stored as-is. It may itself contain placeholders,
    /// which are resolved one level deeper.
    Value(Value),
}

impl From<ContentEntity> for LoadedResource {
    fn from(entity: ContentEntity) -> Self {
        Self::Entity(entity)
    }
}

impl From<Value> for LoadedResource {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<serde_json::Value> for LoadedResource {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(Value::from(value))
    }
}

/// Result of one batch load: entries only for ids the loader could resolve.
pub type LoadedResources = HashMap<ResourceId, LoadedResource>;

/// Future returned by [`ResourceLoader::load`].
pub type LoadFuture<'a> = Pin<Box<dyn Future<Output = Result<LoadedResources>> + Send + 'a>>;

/// Loads resources of one kind in batches.
pub trait ResourceLoader: Send + Sync {
    /// Load every id in `ids` for `locale`.
    ///
    /// Ids that cannot be resolved are simply absent from the result; they end
    /// up as `null` in the resolved output. Errors are propagated by the engine
    /// without retry.
    fn load<'a>(&'a self, ids: &'a [ResourceId], locale: Option<&'a str>) -> LoadFuture<'a>;
}

/// Keyed lookup of resource loaders.
pub trait ResourceLoaderProvider: Send + Sync {
    /// The loader registered under `key`, if any.
    fn get_resource_loader(&self, key: &str) -> Option<Arc<dyn ResourceLoader>>;

    /// Every registered key, used for error suggestions.
    fn resource_loader_keys(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Map-backed [`ResourceLoaderProvider`].
#[derive(Clone, Default)]
pub struct ResourceLoaderRegistry {
    loaders: BTreeMap<String, Arc<dyn ResourceLoader>>,
}

impl ResourceLoaderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `loader` under `key`, replacing any previous loader.
    #[must_use]
    pub fn with_loader(mut self, key: impl Into<String>, loader: Arc<dyn ResourceLoader>) -> Self {
        self.register(key, loader);
        self
    }

    /// Register `loader` under `key`, replacing any previous loader.
    pub fn register(&mut self, key: impl Into<String>, loader: Arc<dyn ResourceLoader>) {
        let key = key.into();
        if self.loaders.insert(key.clone(), loader).is_some() {
            tracing::debug!("Replaced resource loader '{}'", key);
        }
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl ResourceLoaderProvider for ResourceLoaderRegistry {
    fn get_resource_loader(&self, key: &str) -> Option<Arc<dyn ResourceLoader>> {
        self.loaders.get(key).cloned()
    }

    fn resource_loader_keys(&self) -> Vec<String> {
        self.loaders.keys().cloned().collect()
    }
}

impl fmt::Debug for ResourceLoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLoaderRegistry").field("keys", &self.loaders.keys()).finish()
    }
}
