//! The value tree produced by field resolvers.
//!
//! [`Value`] is a closed sum type: plain data, lists, maps, nested
//! [`ContentView`]s, and [`ResolvableResource`] placeholders. The flattening
//! and substitution passes match on it exhaustively instead of inspecting
//! types at runtime.

use std::collections::BTreeMap;

use super::resource::ResolvableResource;
use super::view::ContentView;

/// Map-shaped value, used for `view` side channels and normalized output.
pub type ValueMap = BTreeMap<String, Value>;

/// A node of a content tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain data leaf (null, bool, number, string).
    ///
    /// Values built through `From<serde_json::Value>` never store arrays or
    /// objects here; those become [`Value::List`] and [`Value::Map`].
    Scalar(serde_json::Value),
    /// Ordered collection
    List(Vec<Value>),
    /// Keyed collection
    Map(ValueMap),
    /// Nested content view, flattened by the engine
    View(Box<ContentView>),
    /// Placeholder for a resource loaded later
    Resource(Box<ResolvableResource>),
}

impl Value {
    /// The `null` scalar.
    pub const NULL: Self = Self::Scalar(serde_json::Value::Null);

    /// Whether this is the `null` scalar.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(serde_json::Value::Null))
    }

    /// Look up a key of a map-shaped value.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(entries) => entries.get(key),
            Self::Scalar(_) | Self::List(_) | Self::View(_) | Self::Resource(_) => None,
        }
    }

    /// String content of a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Whether a placeholder occurs anywhere below this node.
    pub fn contains_resources(&self) -> bool {
        let mut found = Vec::new();
        self.collect_resources(&mut found);
        !found.is_empty()
    }

    /// Collect every placeholder below this node, including inside nested views.
    pub fn collect_resources<'a>(&'a self, out: &mut Vec<&'a ResolvableResource>) {
        match self {
            Self::Scalar(_) => {}
            Self::List(items) => items.iter().for_each(|item| item.collect_resources(out)),
            Self::Map(entries) => entries.values().for_each(|item| item.collect_resources(out)),
            Self::View(view) => view.content().collect_resources(out),
            Self::Resource(resource) => out.push(resource),
        }
    }

    /// Replace nested content views by their content, dropping their views.
    #[must_use]
    pub fn strip_views(self) -> Self {
        match self {
            Self::View(view) => view.into_content().strip_views(),
            Self::List(items) => Self::List(items.into_iter().map(Self::strip_views).collect()),
            Self::Map(entries) => {
                Self::Map(entries.into_iter().map(|(k, v)| (k, v.strip_views())).collect())
            }
            other @ (Self::Scalar(_) | Self::Resource(_)) => other,
        }
    }

    /// Convert into plain JSON.
    ///
    /// Placeholders that are still present become `null`: unresolved
    /// references never leak into the output.
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Self::Scalar(value) => value,
            Self::List(items) => serde_json::Value::Array(items.into_iter().map(Self::into_json).collect()),
            Self::Map(entries) => serde_json::Value::Object(
                entries.into_iter().map(|(key, value)| (key, value.into_json())).collect(),
            ),
            Self::View(view) => view.into_content().into_json(),
            Self::Resource(_) => serde_json::Value::Null,
        }
    }
}

/// Build a view map from a JSON object; anything else yields an empty map.
pub fn view_map(json: serde_json::Value) -> ValueMap {
    match Value::from(json) {
        Value::Map(entries) => entries,
        _ => ValueMap::new(),
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(entries) => {
                Self::Map(entries.into_iter().map(|(key, value)| (key, Self::from(value))).collect())
            }
            scalar => Self::Scalar(scalar),
        }
    }
}

impl From<ContentView> for Value {
    fn from(view: ContentView) -> Self {
        Self::View(Box::new(view))
    }
}

impl From<ResolvableResource> for Value {
    fn from(resource: ResolvableResource) -> Self {
        Self::Resource(Box::new(resource))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<ValueMap> for Value {
    fn from(entries: ValueMap) -> Self {
        Self::Map(entries)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(serde_json::Value::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(serde_json::Value::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Scalar(serde_json::Value::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Scalar(serde_json::Value::from(value))
    }
}
