//! Metadata-driven resolution of template data.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::FieldResolver;
use super::property::{PropertyMetadata, PropertyResolverRegistry};
use crate::config::parse_config;
use crate::content::{ContentView, Value, ValueMap};
use crate::dimension::DimensionSnapshot;

/// Property layout of one template.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemplateMetadata {
    /// Properties in declaration order
    #[serde(default)]
    pub properties: Vec<PropertyMetadata>,
}

impl TemplateMetadata {
    pub fn new(properties: Vec<PropertyMetadata>) -> Self {
        Self { properties }
    }
}

/// Templates keyed by template key.
///
/// Can be loaded from TOML:
///
/// ```toml
/// [templates.default]
/// properties = [
///     { name = "title", type = "text_line" },
///     { name = "image", type = "single_media_selection" },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemplateRegistry {
    #[serde(default)]
    templates: BTreeMap<String, TemplateMetadata>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load templates from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        parse_config(path)
    }

    #[must_use]
    pub fn with_template(mut self, key: impl Into<String>, template: TemplateMetadata) -> Self {
        self.templates.insert(key.into(), template);
        self
    }

    pub fn get(&self, key: &str) -> Option<&TemplateMetadata> {
        self.templates.get(key)
    }
}

/// Resolves the template data of a snapshot, property by property.
///
/// The content is a map from property name to the property's view. With a
/// property filter, only the named properties are resolved.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    templates: Arc<TemplateRegistry>,
    properties: Arc<PropertyResolverRegistry>,
}

impl TemplateResolver {
    pub fn new(templates: Arc<TemplateRegistry>, properties: Arc<PropertyResolverRegistry>) -> Self {
        Self { templates, properties }
    }
}

impl FieldResolver for TemplateResolver {
    fn name(&self) -> &str {
        "template"
    }

    fn resolve(&self, snapshot: &DimensionSnapshot, properties: Option<&[String]>) -> Result<Option<ContentView>> {
        let Some(template_key) = snapshot.template_key() else {
            return Ok(None);
        };
        let Some(template) = self.templates.get(template_key) else {
            tracing::warn!(
                "Unknown template '{}' on {} {}, skipping template data",
                template_key,
                snapshot.resource.resource_key,
                snapshot.resource.id
            );
            return Ok(None);
        };

        let mut content = ValueMap::new();
        for property in &template.properties {
            if let Some(filter) = properties
                && !filter.contains(&property.name)
            {
                continue;
            }
            let data = snapshot.template_data().get(&property.name).unwrap_or(&serde_json::Value::Null);
            let view = self.properties.resolve(data, snapshot.locale.as_deref(), property);
            content.insert(property.name.clone(), Value::from(view));
        }

        Ok(Some(ContentView::new(content, ValueMap::new())))
    }
}
