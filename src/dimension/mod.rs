//! Content-rich entities and their localized, staged snapshots.
//!
//! A [`ContentEntity`] stores one [`DimensionContent`] per `(locale, stage)`
//! dimension; the unlocalized dimension (no locale) carries values shared by
//! every locale. An aggregator merges the dimensions relevant to one
//! [`DimensionAttributes`] into a read-only [`DimensionSnapshot`], which is
//! what field resolvers read.

mod aggregator;

pub use aggregator::{DimensionAggregator, DimensionContentAggregator};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::content::ResourceId;

/// Publication stage of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Work in progress, visible to editors
    #[default]
    Draft,
    /// Published content
    Live,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => f.write_str("draft"),
            Self::Live => f.write_str("live"),
        }
    }
}

/// The `(locale, stage)` a snapshot is aggregated for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DimensionAttributes {
    /// Requested locale; `None` selects unlocalized content only
    pub locale: Option<String>,
    /// Requested stage
    pub stage: Stage,
}

impl DimensionAttributes {
    /// Attributes for a locale and stage.
    pub fn new(locale: Option<&str>, stage: Stage) -> Self {
        Self {
            locale: locale.map(str::to_string),
            stage,
        }
    }
}

/// Raw stored data of one dimension of an entity.
///
/// Fields left empty in a localized dimension fall back to the unlocalized
/// dimension of the same stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DimensionContent {
    /// Locale of this dimension; `None` for the unlocalized dimension
    pub locale: Option<String>,
    /// Stage of this dimension
    pub stage: Stage,
    /// Key of the template describing `template_data`
    pub template_key: Option<String>,
    /// Raw template property values
    pub template_data: BTreeMap<String, serde_json::Value>,
    /// Raw excerpt values
    pub excerpt: BTreeMap<String, serde_json::Value>,
    /// Raw SEO values
    pub seo: BTreeMap<String, serde_json::Value>,
    /// Id of the authoring account
    pub author: Option<ResourceId>,
    /// Last modification time
    pub last_modified: Option<DateTime<Utc>>,
    /// Webspace the entity primarily belongs to
    pub main_webspace: Option<String>,
    /// Locale this dimension shadows, if any
    pub shadow_base_locale: Option<String>,
}

/// A content-rich entity with all of its dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntity {
    /// Entity id
    pub id: ResourceId,
    /// Kind of entity, e.g. `"pages"` or `"articles"`
    pub resource_key: String,
    /// Stored dimensions
    #[serde(default)]
    pub dimensions: Vec<DimensionContent>,
}

impl ContentEntity {
    /// Create an entity without dimensions.
    pub fn new(id: impl Into<ResourceId>, resource_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_key: resource_key.into(),
            dimensions: Vec::new(),
        }
    }

    /// Add a dimension.
    #[must_use]
    pub fn with_dimension(mut self, dimension: DimensionContent) -> Self {
        self.dimensions.push(dimension);
        self
    }

    /// The dimension stored for exactly this locale and stage.
    pub fn dimension(&self, locale: Option<&str>, stage: Stage) -> Option<&DimensionContent> {
        self.dimensions.iter().find(|d| d.locale.as_deref() == locale && d.stage == stage)
    }

    /// JSON form attached as `resource` to normalized output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// A localized, staged projection of a [`ContentEntity`].
///
/// Snapshots are produced by a [`DimensionAggregator`] per resolve call and
/// never mutated by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionSnapshot {
    /// The entity this snapshot was aggregated from
    pub resource: ContentEntity,
    /// Locale of the snapshot
    pub locale: Option<String>,
    /// Stage of the snapshot
    pub stage: Stage,
    /// Merged dimension data
    pub content: DimensionContent,
}

impl DimensionSnapshot {
    /// Attributes to aggregate entities referenced from this snapshot with.
    pub fn attributes(&self) -> DimensionAttributes {
        DimensionAttributes::new(self.locale.as_deref(), self.stage)
    }

    pub fn template_key(&self) -> Option<&str> {
        self.content.template_key.as_deref()
    }

    pub const fn template_data(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.content.template_data
    }
}
