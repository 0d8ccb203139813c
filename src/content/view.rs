//! Immutable `(content, view)` pairs produced by field resolvers.

use serde::{Deserialize, Serialize};

use super::resource::ResourceId;
use super::value::{Value, ValueMap};

/// A reference from the resolved content to another resource.
///
/// References are bookkeeping for a reference store and are independent of
/// resolution: a reference does not cause anything to be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Id of the referenced resource
    pub resource_id: ResourceId,
    /// Kind of the referenced resource, e.g. `"pages"` or `"media"`
    pub resource_key: String,
}

impl Reference {
    /// Create a new reference.
    pub fn new(resource_id: impl Into<ResourceId>, resource_key: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            resource_key: resource_key.into(),
        }
    }
}

/// Resolved content paired with its view side channel.
///
/// `content` holds presentation data and may contain nested views and
/// placeholders. `view` holds parallel metadata such as raw ids before
/// resolution; wherever both are map-shaped they share their keys. Views are
/// never mutated: resolvers always build new instances.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentView {
    content: Value,
    view: ValueMap,
    references: Vec<Reference>,
    resolvable: bool,
}

impl ContentView {
    /// Create a view with no references.
    pub fn new(content: impl Into<Value>, view: ValueMap) -> Self {
        Self {
            content: content.into(),
            view,
            references: Vec::new(),
            resolvable: false,
        }
    }

    /// Create a view carrying references for the reference store.
    pub fn with_references(content: impl Into<Value>, view: ValueMap, references: Vec<Reference>) -> Self {
        Self {
            references,
            ..Self::new(content, view)
        }
    }

    /// Create a view whose content needs second-stage resolution.
    ///
    /// Placeholders are collected from any nesting depth of the content of a
    /// resolvable view, not only from its top level.
    pub fn resolvable(content: impl Into<Value>, view: ValueMap) -> Self {
        Self {
            resolvable: true,
            ..Self::new(content, view)
        }
    }

    pub const fn content(&self) -> &Value {
        &self.content
    }

    pub const fn view(&self) -> &ValueMap {
        &self.view
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub const fn is_resolvable(&self) -> bool {
        self.resolvable
    }

    /// Consume the view, keeping only its content.
    pub fn into_content(self) -> Value {
        self.content
    }

    /// Consume the view into its content and view map.
    pub(crate) fn into_parts(self) -> (Value, ValueMap) {
        (self.content, self.view)
    }
}
