use anyhow::Result;
use std::sync::Arc;

use super::FieldResolver;
use super::property::{PropertyMetadata, PropertyResolverRegistry};
use crate::content::{ContentView, Value, ValueMap};
use crate::dimension::DimensionSnapshot;

/// Excerpt fields and the property type each is resolved as.
const EXCERPT_FIELDS: &[(&str, &str)] = &[
    ("title", "text_line"),
    ("description", "text_editor"),
    ("more", "text_line"),
    ("tags", "tag_selection"),
    ("categories", "category_selection"),
    ("image", "single_media_selection"),
    ("icon", "single_media_selection"),
];

/// Resolves the excerpt of a snapshot.
///
/// Text fields and tags are copied, `image` and `icon` become media
/// placeholders and `categories` category placeholders. Snapshots without
/// excerpt data produce nothing.
#[derive(Debug, Clone)]
pub struct ExcerptResolver {
    properties: Arc<PropertyResolverRegistry>,
}

impl ExcerptResolver {
    pub fn new(properties: Arc<PropertyResolverRegistry>) -> Self {
        Self { properties }
    }
}

impl FieldResolver for ExcerptResolver {
    fn name(&self) -> &str {
        "excerpt"
    }

    fn resolve(&self, snapshot: &DimensionSnapshot, _properties: Option<&[String]>) -> Result<Option<ContentView>> {
        let excerpt = &snapshot.content.excerpt;
        if excerpt.is_empty() {
            return Ok(None);
        }

        let content: ValueMap = EXCERPT_FIELDS
            .iter()
            .map(|(name, property_type)| {
                let property = PropertyMetadata::new(*name, *property_type);
                let data = excerpt.get(*name).unwrap_or(&serde_json::Value::Null);
                let view = self.properties.resolve(data, snapshot.locale.as_deref(), &property);
                ((*name).to_string(), Value::from(view))
            })
            .collect();

        Ok(Some(ContentView::new(content, ValueMap::new())))
    }
}
