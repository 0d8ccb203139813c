//! Deferred references to externally loaded resources.
//!
//! A [`ResolvableResource`] stands in for something that is not loaded yet:
//! an entity, a media item, an account. Field resolvers place them in their
//! output; the engine collects them, loads them in batches, and finally asks
//! each placeholder how to turn the loaded value into its substituted value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::value::Value;

/// Opaque identifier of a loadable resource.
///
/// Ids are only meaningful to the loader that owns them. Integer ids sort
/// before string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    /// Numeric id, e.g. a database primary key
    Int(i64),
    /// String id, e.g. a uuid or a serialized query
    Str(String),
}

impl ResourceId {
    /// Read an id from a raw JSON value.
    ///
    /// Integers and strings are ids; anything else (including floats and
    /// empty strings) is not.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(number) => number.as_i64().map(Self::Int),
            serde_json::Value::String(id) if !id.is_empty() => Some(Self::Str(id.clone())),
            _ => None,
        }
    }

    /// The id as a JSON value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Int(id) => serde_json::Value::from(*id),
            Self::Str(id) => serde_json::Value::from(id.as_str()),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

/// Arbitrary context forwarded to a placeholder's substitution.
pub type ResourceMetadata = BTreeMap<String, serde_json::Value>;

/// Signature of a custom substitution callback.
pub type SubstitutionFn = dyn Fn(&Value, Option<&ResourceMetadata>) -> Value + Send + Sync;

/// How a loaded value becomes the value that replaces the placeholder.
#[derive(Clone, Default)]
pub enum Substitution {
    /// Use the loaded (and, for entities, resolved) value unchanged.
    #[default]
    ReplaceWithLoaded,
    /// Use a single field of a map-shaped loaded value; `null` when absent.
    ExtractField(String),
    /// Run a callback over the loaded value and the placeholder metadata.
    Custom(Arc<SubstitutionFn>),
}

impl Substitution {
    /// Wrap a closure as a custom substitution.
    pub fn custom<F>(callback: F) -> Self
    where
        F: Fn(&Value, Option<&ResourceMetadata>) -> Value + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(callback))
    }

    fn apply(&self, loaded: &Value, metadata: Option<&ResourceMetadata>) -> Value {
        match self {
            Self::ReplaceWithLoaded => loaded.clone(),
            Self::ExtractField(field) => loaded.get(field).cloned().unwrap_or(Value::NULL),
            Self::Custom(callback) => callback(loaded, metadata),
        }
    }
}

impl fmt::Debug for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReplaceWithLoaded => f.write_str("ReplaceWithLoaded"),
            Self::ExtractField(field) => f.debug_tuple("ExtractField").field(field).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Substitution {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ReplaceWithLoaded, Self::ReplaceWithLoaded) => true,
            (Self::ExtractField(a), Self::ExtractField(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Placeholder for a resource that has not been loaded yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvableResource {
    id: ResourceId,
    resource_loader_key: String,
    priority: i32,
    metadata: Option<ResourceMetadata>,
    substitution: Substitution,
}

impl ResolvableResource {
    /// Create a placeholder that is replaced by the loaded value as-is.
    pub fn new(id: impl Into<ResourceId>, resource_loader_key: impl Into<String>, priority: i32) -> Self {
        Self {
            id: id.into(),
            resource_loader_key: resource_loader_key.into(),
            priority,
            metadata: None,
            substitution: Substitution::ReplaceWithLoaded,
        }
    }

    /// Attach metadata forwarded to the substitution.
    #[must_use]
    pub fn with_metadata(mut self, metadata: ResourceMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Choose how the loaded value is turned into the substituted value.
    #[must_use]
    pub fn with_substitution(mut self, substitution: Substitution) -> Self {
        self.substitution = substitution;
        self
    }

    /// Id of the referenced resource.
    pub const fn id(&self) -> &ResourceId {
        &self.id
    }

    /// Key of the loader responsible for this resource.
    pub fn resource_loader_key(&self) -> &str {
        &self.resource_loader_key
    }

    /// Drain priority; higher drains first.
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Metadata forwarded to the substitution.
    pub const fn metadata(&self) -> Option<&ResourceMetadata> {
        self.metadata.as_ref()
    }

    /// Substitution strategy of this placeholder.
    pub const fn substitution(&self) -> &Substitution {
        &self.substitution
    }

    /// Compute the value that replaces this placeholder.
    #[must_use]
    pub fn substitute(&self, loaded: &Value) -> Value {
        self.substitution.apply(loaded, self.metadata.as_ref())
    }
}
