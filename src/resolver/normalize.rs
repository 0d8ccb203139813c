//! Shaping flattened resolver output into the normalized result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::content::{Value, ValueMap};
use crate::dimension::DimensionSnapshot;

const TEMPLATE: &str = "template";
const SETTINGS: &str = "settings";
const RESERVED_KEYS: [&str; 4] = ["resource", "content", "view", "extension"];

/// Fully resolved output of one snapshot.
///
/// Serializes to `{resource, content, view, extension, ...settings}`: the
/// settings keys (`template`, `author`, `lastModified`, ...) sit on the top
/// level next to the four fixed keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedContent {
    /// The resolved entity
    pub resource: serde_json::Value,
    /// Resolved template properties
    pub content: serde_json::Value,
    /// View side channel of the template properties
    pub view: serde_json::Value,
    /// Content of every resolver other than template and settings, by name
    pub extension: BTreeMap<String, serde_json::Value>,
    /// Settings spread onto the top level
    #[serde(flatten)]
    pub settings: BTreeMap<String, serde_json::Value>,
}

impl NormalizedContent {
    /// Convert a substituted normalized value; leftover placeholders become `null`.
    pub(crate) fn from_value(value: Value) -> Self {
        let serde_json::Value::Object(mut entries) = value.into_json() else {
            return Self::default();
        };

        let mut take = |key: &str| entries.remove(key).unwrap_or(serde_json::Value::Null);
        let resource = take("resource");
        let content = take("content");
        let view = take("view");
        let extension = match take("extension") {
            serde_json::Value::Object(extension) => extension.into_iter().collect(),
            _ => BTreeMap::new(),
        };

        Self {
            resource,
            content,
            view,
            extension,
            settings: entries.into_iter().collect(),
        }
    }

    /// A settings value such as `author` or `template`.
    pub fn setting(&self, key: &str) -> Option<&serde_json::Value> {
        self.settings.get(key)
    }

    /// The whole result as one JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Normalize the flattened output of `snapshot`'s resolvers.
///
/// Placeholders stay in place; the result is substituted later. The
/// `template` output becomes `content` and `view`, the `settings` content is
/// spread onto the top level and everything else goes under `extension`.
pub(crate) fn normalize(snapshot: &DimensionSnapshot, mut content: ValueMap, mut view: ValueMap) -> Value {
    let template_content = content.remove(TEMPLATE).unwrap_or_else(|| Value::Map(ValueMap::new()));
    let template_view = view.remove(TEMPLATE).unwrap_or_else(|| Value::Map(ValueMap::new()));
    let settings = content.remove(SETTINGS);

    let mut normalized = ValueMap::from([
        ("resource".to_string(), Value::from(snapshot.resource.to_json())),
        ("content".to_string(), template_content),
        ("view".to_string(), template_view),
        ("extension".to_string(), Value::Map(content)),
    ]);

    match settings {
        Some(Value::Map(entries)) => {
            for (key, value) in entries {
                if RESERVED_KEYS.contains(&key.as_str()) {
                    tracing::warn!(
                        "Settings key '{}' of {} {} collides with a reserved key and is ignored",
                        key,
                        snapshot.resource.resource_key,
                        snapshot.resource.id
                    );
                    continue;
                }
                normalized.insert(key, value);
            }
        }
        Some(other) if !other.is_null() => {
            tracing::warn!("Ignoring settings of {} {} that are not a map", snapshot.resource.resource_key, snapshot.resource.id);
        }
        _ => {}
    }

    Value::Map(normalized)
}
