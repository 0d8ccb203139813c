//! Per-property value resolvers used by the template and excerpt resolvers.
//!
//! A [`PropertyResolver`] turns the raw stored value of one property into a
//! [`ContentView`]. Which resolver handles a property is decided by the
//! property's type through a [`PropertyResolverRegistry`]; unknown types fall
//! back to [`DefaultPropertyResolver`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CATEGORY_LOADER_KEY, DEFAULT_PRIORITY, MEDIA_LOADER_KEY, PAGE_LOADER_KEY, SMART_CONTENT_LOADER_KEY,
    SMART_CONTENT_PRIORITY,
};
use crate::content::{ContentView, Reference, ResolvableResource, ResourceId, ResourceMetadata, Value, ValueMap};

/// Metadata of a single template property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyMetadata {
    /// Property name, also the key in the stored template data
    pub name: String,

    /// Property type, used to pick the property resolver
    #[serde(rename = "type")]
    pub property_type: String,

    /// Type specific parameters, e.g. `priority` or `loader`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, serde_json::Value>,

    /// Block types of a block property, keyed by block type name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub types: BTreeMap<String, Vec<PropertyMetadata>>,
}

impl PropertyMetadata {
    pub fn new(name: impl Into<String>, property_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_type: property_type.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn with_block_type(mut self, name: impl Into<String>, properties: Vec<Self>) -> Self {
        self.types.insert(name.into(), properties);
        self
    }

    fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(serde_json::Value::as_str)
    }

    fn param_priority(&self) -> Option<i32> {
        self.params.get("priority").and_then(serde_json::Value::as_i64).and_then(|p| i32::try_from(p).ok())
    }
}

/// Resolves the raw value of one property.
pub trait PropertyResolver: Send + Sync {
    /// Build the view for `data`, the stored value of `property`.
    ///
    /// `registry` resolves nested properties (blocks). Invalid data resolves
    /// to a `null` content instead of failing.
    fn resolve(
        &self,
        data: &serde_json::Value,
        locale: Option<&str>,
        property: &PropertyMetadata,
        registry: &PropertyResolverRegistry,
    ) -> ContentView;
}

/// Copies the stored value into the content; the view stays empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPropertyResolver;

impl PropertyResolver for DefaultPropertyResolver {
    fn resolve(
        &self,
        data: &serde_json::Value,
        _locale: Option<&str>,
        _property: &PropertyMetadata,
        _registry: &PropertyResolverRegistry,
    ) -> ContentView {
        ContentView::new(Value::from(data.clone()), ValueMap::new())
    }
}

/// Turns stored ids into placeholders for one loader.
///
/// A single id (or an object with an `id` field) becomes one placeholder with
/// the raw id under `id` in the view. A list becomes a list of placeholders
/// with the raw ids under `ids`. The property parameter `priority` overrides
/// the resolver's priority.
#[derive(Debug, Clone)]
pub struct ReferencePropertyResolver {
    loader_key: String,
    priority: i32,
}

impl ReferencePropertyResolver {
    pub fn new(loader_key: impl Into<String>, priority: i32) -> Self {
        Self {
            loader_key: loader_key.into(),
            priority,
        }
    }

    fn placeholder(&self, id: ResourceId, priority: i32) -> ResolvableResource {
        ResolvableResource::new(id, self.loader_key.clone(), priority)
    }
}

fn extract_id(value: &serde_json::Value) -> Option<ResourceId> {
    match value {
        serde_json::Value::Object(entries) => entries.get("id").and_then(ResourceId::from_json),
        other => ResourceId::from_json(other),
    }
}

impl PropertyResolver for ReferencePropertyResolver {
    fn resolve(
        &self,
        data: &serde_json::Value,
        _locale: Option<&str>,
        property: &PropertyMetadata,
        _registry: &PropertyResolverRegistry,
    ) -> ContentView {
        let priority = property.param_priority().unwrap_or(self.priority);

        if let serde_json::Value::Array(items) = data {
            let ids: Vec<ResourceId> = items.iter().filter_map(extract_id).collect();
            let view = ValueMap::from([(
                "ids".to_string(),
                Value::List(ids.iter().map(|id| Value::Scalar(id.to_json())).collect()),
            )]);
            let references = ids.iter().map(|id| Reference::new(id.clone(), self.loader_key.clone())).collect();
            let content = ids.into_iter().map(|id| Value::from(self.placeholder(id, priority))).collect::<Vec<_>>();
            return ContentView::with_references(content, view, references);
        }

        match extract_id(data) {
            Some(id) => ContentView::with_references(
                self.placeholder(id.clone(), priority),
                ValueMap::from([("id".to_string(), Value::Scalar(id.to_json()))]),
                vec![Reference::new(id, self.loader_key.clone())],
            ),
            None => ContentView::new(Value::NULL, ValueMap::from([("id".to_string(), Value::NULL)])),
        }
    }
}

/// Resolves a list of typed blocks.
///
/// Every stored block is an object with a `type` field naming one of the
/// property's block types. Its content is a map holding `type` and one nested
/// view per block property. Blocks of unknown type are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockPropertyResolver;

impl PropertyResolver for BlockPropertyResolver {
    fn resolve(
        &self,
        data: &serde_json::Value,
        locale: Option<&str>,
        property: &PropertyMetadata,
        registry: &PropertyResolverRegistry,
    ) -> ContentView {
        let Some(blocks) = data.as_array() else {
            return ContentView::new(Value::List(Vec::new()), ValueMap::new());
        };

        let mut views = Vec::with_capacity(blocks.len());
        for block in blocks {
            let Some(block_type) = block.get("type").and_then(serde_json::Value::as_str) else {
                tracing::debug!("Skipping block without type in property '{}'", property.name);
                continue;
            };
            let Some(block_properties) = property.types.get(block_type) else {
                tracing::debug!("Skipping block of unknown type '{}' in property '{}'", block_type, property.name);
                continue;
            };

            let mut content = ValueMap::from([("type".to_string(), Value::from(block_type))]);
            for child in block_properties {
                let child_data = block.get(&child.name).unwrap_or(&serde_json::Value::Null);
                content.insert(child.name.clone(), Value::from(registry.resolve(child_data, locale, child)));
            }
            views.push(Value::from(ContentView::new(content, ValueMap::new())));
        }

        ContentView::new(Value::List(views), ValueMap::new())
    }
}

/// Turns a stored smart-content query into a resolvable view.
///
/// The query is loaded before ordinary references through the loader named
/// by the `loader` parameter. The loader answers with a list of further
/// placeholders, which are resolved one level deeper. Without a stored query
/// the content is an empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmartContentPropertyResolver;

impl PropertyResolver for SmartContentPropertyResolver {
    fn resolve(
        &self,
        data: &serde_json::Value,
        _locale: Option<&str>,
        property: &PropertyMetadata,
        _registry: &PropertyResolverRegistry,
    ) -> ContentView {
        let loader_key = property.param_str("loader").unwrap_or(SMART_CONTENT_LOADER_KEY);
        let priority = property.param_priority().unwrap_or(SMART_CONTENT_PRIORITY);

        let serde_json::Value::Object(query) = data else {
            return ContentView::new(Value::List(Vec::new()), ValueMap::from([("query".to_string(), Value::NULL)]));
        };
        let query = query.clone();
        let query_id = serde_json::Value::Object(query.clone()).to_string();
        let metadata: ResourceMetadata = query.clone().into_iter().collect();

        let placeholder = ResolvableResource::new(query_id, loader_key, priority).with_metadata(metadata);
        ContentView::resolvable(
            placeholder,
            ValueMap::from([("query".to_string(), Value::from(serde_json::Value::Object(query)))]),
        )
    }
}

/// Property resolvers keyed by property type.
#[derive(Clone, Default)]
pub struct PropertyResolverRegistry {
    resolvers: BTreeMap<String, Arc<dyn PropertyResolver>>,
    fallback: DefaultPropertyResolver,
}

impl PropertyResolverRegistry {
    /// An empty registry; every property is copied through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in reference, block and smart-content types.
    pub fn with_defaults() -> Self {
        let pages = Arc::new(ReferencePropertyResolver::new(PAGE_LOADER_KEY, DEFAULT_PRIORITY));
        let media = Arc::new(ReferencePropertyResolver::new(MEDIA_LOADER_KEY, DEFAULT_PRIORITY));
        let categories = Arc::new(ReferencePropertyResolver::new(CATEGORY_LOADER_KEY, DEFAULT_PRIORITY));

        let mut registry = Self::new();
        registry.register("page_selection", pages.clone());
        registry.register("single_page_selection", pages);
        registry.register("media_selection", media.clone());
        registry.register("single_media_selection", media);
        registry.register("category_selection", categories.clone());
        registry.register("single_category_selection", categories);
        registry.register("block", Arc::new(BlockPropertyResolver));
        registry.register("smart_content", Arc::new(SmartContentPropertyResolver));
        registry
    }

    /// Register `resolver` for `property_type`, replacing any previous one.
    pub fn register(&mut self, property_type: impl Into<String>, resolver: Arc<dyn PropertyResolver>) {
        self.resolvers.insert(property_type.into(), resolver);
    }

    /// Resolve `data` with the resolver registered for the property's type.
    pub fn resolve(&self, data: &serde_json::Value, locale: Option<&str>, property: &PropertyMetadata) -> ContentView {
        match self.resolvers.get(&property.property_type) {
            Some(resolver) => resolver.resolve(data, locale, property, self),
            None => self.fallback.resolve(data, locale, property, self),
        }
    }
}

impl fmt::Debug for PropertyResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyResolverRegistry").field("types", &self.resolvers.keys()).finish()
    }
}
