//! Content resolution engine
//!
//! Turns a localized, staged snapshot of a content-rich entity into a fully
//! materialized data structure ready for presentation. Parts of the snapshot
//! reference external resources (other entities, media, accounts) by id and
//! loader key instead of embedding them; the engine loads those resources in
//! batches, resolves loaded entities recursively and substitutes every
//! reference with its resolved value.
//!
//! # Architecture Overview
//!
//! ```text
//! DimensionSnapshot
//!   -> field resolvers            (ContentView trees with placeholders)
//!   -> flattening                 (content/view trees, pending queue)
//!   -> batched loader calls       (one call per loader and priority level)
//!   -> recursive resolution       (loaded entities, depth-bounded)
//!   -> substitution passes        (until nothing changes)
//!   -> {resource, content, view, extension, ...settings}
//! ```
//!
//! ## Key Properties
//!
//! - **No N+1 loads**: each loader is called at most once per priority level
//!   with every distinct id it owns at that level
//! - **Priority ordering**: higher priorities drain first, so smart-content
//!   queries are answered before ordinary references are loaded
//! - **Bounded**: `max_depth` (default 5) bounds both loading and
//!   substitution; anything deeper resolves to `null`
//! - **Fail fast on wiring errors**: unknown or empty loader keys abort the
//!   call; loader errors are propagated untouched
//!
//! # Modules
//!
//! - [`constants`] - Depth bounds, default priorities and loader keys
//! - [`core`] - Error types and user-facing error rendering
//! - [`config`] - Resolver configuration and TOML loading
//! - [`content`] - Values, content views and resolvable placeholders
//! - [`dimension`] - Entities, dimensions, snapshots and aggregation
//! - [`loader`] - Resource loader traits and the loader registry
//! - [`resolvers`] - Field resolvers (template, excerpt, SEO, settings)
//! - [`resolver`] - The resolution engine
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use content_resolution::config::ResolverConfig;
//! use content_resolution::dimension::{DimensionAggregator, DimensionAttributes, DimensionContentAggregator, Stage};
//! use content_resolution::loader::ResourceLoaderRegistry;
//! use content_resolution::resolver::ContentResolver;
//! use content_resolution::resolvers::{TemplateRegistry, default_field_resolvers};
//!
//! # async fn example(entity: content_resolution::dimension::ContentEntity) -> anyhow::Result<()> {
//! let templates = TemplateRegistry::load(std::path::Path::new("templates.toml"))?;
//! let config = ResolverConfig::load(std::path::Path::new("resolver.toml"))?;
//!
//! let aggregator = Arc::new(DimensionContentAggregator::new());
//! let resolver = ContentResolver::new(Arc::new(ResourceLoaderRegistry::new()), aggregator.clone())
//!     .with_config(config)?
//!     .with_field_resolvers(default_field_resolvers(templates));
//!
//! let snapshot = aggregator.aggregate(&entity, &DimensionAttributes::new(Some("en"), Stage::Live))?;
//! let resolved = resolver.resolve(&snapshot).await?;
//! println!("{}", serde_json::to_string_pretty(&resolved)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod content;
pub mod core;
pub mod dimension;
pub mod loader;
pub mod resolver;
pub mod resolvers;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
