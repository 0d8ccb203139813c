//! The content resolution engine.
//!
//! [`ContentResolver`] turns a [`DimensionSnapshot`] into a fully materialized
//! [`NormalizedContent`]:
//!
//! 1. every registered field resolver runs over the snapshot and its views are
//!    flattened into parallel `content`/`view` trees, filing placeholders into
//!    a pending queue keyed `priority -> loader key -> depth -> id`;
//! 2. the queue is drained one priority level at a time, highest first. Each
//!    level calls every implicated loader exactly once with all of its ids.
//!    Loaded entities are aggregated for the same locale and stage and
//!    resolved, filing their own placeholders one level deeper in the same
//!    queue. Depth counts entity-graph levels only, so nesting views inside
//!    one entity never adds a level. Anything deeper than `max_depth` is never
//!    loaded;
//! 3. placeholders are substituted pass by pass until nothing changes, for at
//!    most `max_depth` passes. What is left becomes `null`;
//! 4. the result is normalized into `{resource, content, view, extension,
//!    ...settings}`.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use content_resolution::dimension::DimensionContentAggregator;
//! use content_resolution::loader::ResourceLoaderRegistry;
//! use content_resolution::resolver::ContentResolver;
//! use content_resolution::resolvers::{TemplateRegistry, default_field_resolvers};
//!
//! # async fn example(snapshot: content_resolution::dimension::DimensionSnapshot) -> anyhow::Result<()> {
//! let loaders = ResourceLoaderRegistry::new();
//! let resolver = ContentResolver::new(Arc::new(loaders), Arc::new(DimensionContentAggregator::new()))
//!     .with_field_resolvers(default_field_resolvers(TemplateRegistry::new()));
//!
//! let resolved = resolver.resolve(&snapshot).await?;
//! println!("{}", resolved.to_json());
//! # Ok(())
//! # }
//! ```

mod dispatch;
mod flatten;
mod normalize;
mod pending;
mod substitution;

pub use normalize::NormalizedContent;
pub use pending::{DepthEntries, PendingResources, PriorityBucket};

use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::constants::ROOT_DEPTH;
use crate::content::{ContentView, Reference, ResourceId, Value};
use crate::core::ResolutionError;
use crate::dimension::{DimensionAggregator, DimensionSnapshot};
use crate::loader::{LoadedResource, ResourceLoaderProvider};
use crate::resolvers::FieldResolver;
use substitution::ResolvedResources;

/// Ids to load per loader key, each with the shallowest depth it was requested at.
type LoadRequests = BTreeMap<String, BTreeMap<ResourceId, usize>>;

/// Shallowest depth each `(loader key, id)` was requested at during one call.
type RequestedDepths = HashMap<(String, ResourceId), usize>;

/// Resolves snapshots through field resolvers and batched resource loaders.
///
/// A resolver holds no per-call state; every [`resolve`](Self::resolve) owns
/// its own queue and resolved table, so one instance can serve concurrent
/// calls.
pub struct ContentResolver {
    loaders: Arc<dyn ResourceLoaderProvider>,
    aggregator: Arc<dyn DimensionAggregator>,
    field_resolvers: Vec<Arc<dyn FieldResolver>>,
    config: ResolverConfig,
}

impl ContentResolver {
    /// Create a resolver without field resolvers and with the default config.
    pub fn new(loaders: Arc<dyn ResourceLoaderProvider>, aggregator: Arc<dyn DimensionAggregator>) -> Self {
        Self {
            loaders,
            aggregator,
            field_resolvers: Vec::new(),
            config: ResolverConfig::default(),
        }
    }

    /// Use `config` after validating it.
    pub fn with_config(mut self, config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Register a field resolver. A later resolver with the same name wins.
    #[must_use]
    pub fn with_field_resolver(mut self, resolver: Arc<dyn FieldResolver>) -> Self {
        self.field_resolvers.push(resolver);
        self
    }

    #[must_use]
    pub fn with_field_resolvers(mut self, resolvers: impl IntoIterator<Item = Arc<dyn FieldResolver>>) -> Self {
        self.field_resolvers.extend(resolvers);
        self
    }

    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Fully resolve `snapshot`.
    ///
    /// # Errors
    ///
    /// - [`ResolutionError::ResourceLoaderNotFound`](crate::core::ResolutionError::ResourceLoaderNotFound)
    ///   or [`ResolutionError::EmptyResourceLoaderKey`](crate::core::ResolutionError::EmptyResourceLoaderKey)
    ///   when a placeholder names a loader that cannot be used
    /// - [`ResolutionError::LoaderTimeout`](crate::core::ResolutionError::LoaderTimeout)
    ///   when a loader exceeds the configured timeout
    /// - any error of a loader, field resolver or the aggregator, with context
    pub async fn resolve(&self, snapshot: &DimensionSnapshot) -> Result<NormalizedContent> {
        self.run(snapshot, None).await
    }

    /// Resolve only the named properties of `snapshot`.
    ///
    /// The filter is passed to the field resolvers of the root snapshot only;
    /// entities loaded along the way are resolved completely.
    pub async fn resolve_properties(
        &self,
        snapshot: &DimensionSnapshot,
        properties: &[String],
    ) -> Result<NormalizedContent> {
        self.run(snapshot, Some(properties)).await
    }

    /// References of every view the field resolvers produce for `snapshot`.
    ///
    /// Nothing is loaded. The result is sorted and free of duplicates.
    pub fn collect_references(&self, snapshot: &DimensionSnapshot) -> Result<Vec<Reference>> {
        let mut references = BTreeSet::new();
        for view in self.resolve_fields(snapshot, None)?.values() {
            collect_view_references(view, &mut references);
        }
        Ok(references.into_iter().collect())
    }

    async fn run(&self, snapshot: &DimensionSnapshot, properties: Option<&[String]>) -> Result<NormalizedContent> {
        let attributes = snapshot.attributes();
        let locale = attributes.locale.as_deref();
        let max_depth = self.config.max_depth;

        let mut pending = PendingResources::new();
        let root = self.resolve_snapshot(snapshot, properties, ROOT_DEPTH, &mut pending)?;

        let mut resolved = ResolvedResources::default();
        let mut requested = RequestedDepths::new();

        while let Some((priority, bucket)) = pending.pop_highest() {
            let requests = collect_requests(bucket, max_depth, &requested)?;
            if requests.is_empty() {
                tracing::trace!("Nothing left to load at priority {}", priority);
                continue;
            }

            tracing::debug!(
                "Loading priority {} with loader(s) {:?}",
                priority,
                requests.keys().collect::<Vec<_>>()
            );
            let batches: BTreeMap<String, Vec<ResourceId>> = requests
                .iter()
                .map(|(key, ids)| (key.clone(), ids.keys().cloned().collect::<Vec<_>>()))
                .collect();
            let mut loaded = dispatch::load_resources(self.loaders.as_ref(), batches, locale, &self.config).await?;

            for (key, ids) in requests {
                let mut results = loaded.remove(&key).unwrap_or_default();
                for (id, depth) in ids {
                    requested.insert((key.clone(), id.clone()), depth);
                    match results.remove(&id) {
                        Some(LoadedResource::Entity(entity)) => {
                            let sub_snapshot = self
                                .aggregator
                                .aggregate(&entity, &attributes)
                                .with_context(|| format!("Failed to aggregate {} {}", entity.resource_key, entity.id))?;
                            let value = self.resolve_snapshot(&sub_snapshot, None, depth, &mut pending)?;
                            resolved.insert(&key, id, value);
                        }
                        Some(LoadedResource::Value(value)) => {
                            let mut found = Vec::new();
                            value.collect_resources(&mut found);
                            for resource in found {
                                pending.insert(depth + 1, resource.clone());
                            }
                            resolved.insert(&key, id, value.strip_views());
                        }
                        None => tracing::trace!("Loader '{}' has no resource {}", key, id),
                    }
                }

                if !results.is_empty() {
                    tracing::warn!(
                        "Loader '{}' returned {} resource(s) that were not requested",
                        key,
                        results.len()
                    );
                }
            }
        }

        tracing::debug!("Substituting {} resolved resource(s)", resolved.len());
        let root = substitution::substitute(root, &resolved, max_depth);
        Ok(NormalizedContent::from_value(root))
    }

    /// Resolve a snapshot that sits at `depth` of the entity graph.
    ///
    /// Its placeholders are filed one level below it.
    fn resolve_snapshot(
        &self,
        snapshot: &DimensionSnapshot,
        properties: Option<&[String]>,
        depth: usize,
        pending: &mut PendingResources,
    ) -> Result<Value> {
        let views = self.resolve_fields(snapshot, properties)?;
        let (content, view) = flatten::flatten_resolved(views, depth + 1, pending);
        Ok(normalize::normalize(snapshot, content, view))
    }

    fn resolve_fields(
        &self,
        snapshot: &DimensionSnapshot,
        properties: Option<&[String]>,
    ) -> Result<BTreeMap<String, ContentView>> {
        let mut views = BTreeMap::new();
        for resolver in &self.field_resolvers {
            let resolved = resolver.resolve(snapshot, properties).with_context(|| {
                format!(
                    "Field resolver '{}' failed for {} {}",
                    resolver.name(),
                    snapshot.resource.resource_key,
                    snapshot.resource.id
                )
            })?;
            if let Some(view) = resolved {
                views.insert(resolver.name().to_string(), view);
            }
        }
        Ok(views)
    }
}

impl fmt::Debug for ContentResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentResolver")
            .field("field_resolvers", &self.field_resolvers.iter().map(|r| r.name()).collect::<Vec<_>>())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Distinct ids per loader of one priority level.
///
/// Entries deeper than `max_depth` are dropped, as are ids already requested
/// at the same or a shallower depth during this call. An id reached again at a
/// strictly shallower depth is requested again so its subtree can go deeper.
/// Loader keys are checked before the depth filter: an empty key is a
/// configuration error even when its placeholder would never be loaded.
fn collect_requests(bucket: PriorityBucket, max_depth: usize, requested: &RequestedDepths) -> Result<LoadRequests> {
    let mut requests = LoadRequests::new();
    for (key, depths) in bucket {
        if key.is_empty()
            && let Some(id) = depths.values().flat_map(|entries| entries.keys()).next()
        {
            return Err(ResolutionError::EmptyResourceLoaderKey { id: id.clone() }.into());
        }

        for (depth, entries) in depths {
            if depth > max_depth {
                tracing::trace!(
                    "Skipping {} '{}' resource(s) at depth {} (max depth {})",
                    entries.len(),
                    key,
                    depth,
                    max_depth
                );
                continue;
            }
            for id in entries.into_keys() {
                if let Some(&previous) = requested.get(&(key.clone(), id.clone()))
                    && previous <= depth
                {
                    continue;
                }
                let shallowest = requests.entry(key.clone()).or_default().entry(id).or_insert(depth);
                *shallowest = (*shallowest).min(depth);
            }
        }
    }
    Ok(requests)
}

fn collect_view_references(view: &ContentView, out: &mut BTreeSet<Reference>) {
    out.extend(view.references().iter().cloned());
    collect_value_references(view.content(), out);
}

fn collect_value_references(value: &Value, out: &mut BTreeSet<Reference>) {
    match value {
        Value::View(view) => collect_view_references(view, out),
        Value::List(items) => items.iter().for_each(|item| collect_value_references(item, out)),
        Value::Map(entries) => entries.values().for_each(|item| collect_value_references(item, out)),
        Value::Scalar(_) | Value::Resource(_) => {}
    }
}
