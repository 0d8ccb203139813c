//! Fluent builder for entities and snapshots used in tests.

use serde_json::json;

use crate::content::ResourceId;
use crate::dimension::{ContentEntity, DimensionContent, DimensionSnapshot, Stage};

/// A builder for a single-dimension [`ContentEntity`].
///
/// Defaults to locale `en`, stage `live` and template `default`.
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    id: ResourceId,
    resource_key: String,
    dimension: DimensionContent,
}

impl EntityBuilder {
    /// Start an entity of kind `resource_key`.
    pub fn new(id: impl Into<ResourceId>, resource_key: &str) -> Self {
        Self {
            id: id.into(),
            resource_key: resource_key.to_string(),
            dimension: DimensionContent {
                locale: Some("en".to_string()),
                stage: Stage::Live,
                template_key: Some("default".to_string()),
                ..DimensionContent::default()
            },
        }
    }

    /// Start a page.
    pub fn page(id: i64) -> Self {
        Self::new(id, "pages")
    }

    pub fn locale(mut self, locale: Option<&str>) -> Self {
        self.dimension.locale = locale.map(str::to_string);
        self
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.dimension.stage = stage;
        self
    }

    pub fn template(mut self, template_key: &str) -> Self {
        self.dimension.template_key = Some(template_key.to_string());
        self
    }

    /// Set a template property.
    pub fn property(mut self, name: &str, value: serde_json::Value) -> Self {
        self.dimension.template_data.insert(name.to_string(), value);
        self
    }

    /// Set the page referenced by the `link` property.
    pub fn link(self, target: i64) -> Self {
        self.property("link", json!(target))
    }

    pub fn excerpt(mut self, name: &str, value: serde_json::Value) -> Self {
        self.dimension.excerpt.insert(name.to_string(), value);
        self
    }

    pub fn seo(mut self, name: &str, value: serde_json::Value) -> Self {
        self.dimension.seo.insert(name.to_string(), value);
        self
    }

    pub fn author(mut self, id: impl Into<ResourceId>) -> Self {
        self.dimension.author = Some(id.into());
        self
    }

    pub fn main_webspace(mut self, webspace: &str) -> Self {
        self.dimension.main_webspace = Some(webspace.to_string());
        self
    }

    pub fn build(self) -> ContentEntity {
        ContentEntity::new(self.id, self.resource_key).with_dimension(self.dimension)
    }

    /// A snapshot of the built dimension, as an aggregator would produce it.
    pub fn snapshot(self) -> DimensionSnapshot {
        let locale = self.dimension.locale.clone();
        let stage = self.dimension.stage;
        let content = self.dimension.clone();
        DimensionSnapshot {
            resource: self.build(),
            locale,
            stage,
            content,
        }
    }
}

