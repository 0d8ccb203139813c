//! Merging an entity's dimensions into a snapshot.

use anyhow::Result;
use std::collections::BTreeMap;

use super::{ContentEntity, DimensionAttributes, DimensionContent, DimensionSnapshot};

/// Builds snapshots from entities.
///
/// Implementations must be deterministic for the same inputs within one
/// resolve call.
pub trait DimensionAggregator: Send + Sync {
    /// Aggregate `entity` for the given locale and stage.
    fn aggregate(&self, entity: &ContentEntity, attributes: &DimensionAttributes) -> Result<DimensionSnapshot>;
}

/// Aggregator over the dimensions stored on the entity itself.
///
/// The unlocalized dimension of the requested stage is the base; the
/// localized dimension overrides it. Scalar fields are replaced when the
/// localized value is set, maps merge key-wise. Missing dimensions yield an
/// empty snapshot rather than an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionContentAggregator;

impl DimensionContentAggregator {
    pub const fn new() -> Self {
        Self
    }
}

impl DimensionAggregator for DimensionContentAggregator {
    fn aggregate(&self, entity: &ContentEntity, attributes: &DimensionAttributes) -> Result<DimensionSnapshot> {
        let mut merged = entity.dimension(None, attributes.stage).cloned().unwrap_or_default();

        if let Some(locale) = attributes.locale.as_deref()
            && let Some(localized) = entity.dimension(Some(locale), attributes.stage)
        {
            merge_dimension(&mut merged, localized);
        }

        merged.locale = attributes.locale.clone();
        merged.stage = attributes.stage;

        tracing::trace!(
            "Aggregated {} {} for locale {:?} ({})",
            entity.resource_key,
            entity.id,
            attributes.locale,
            attributes.stage
        );

        Ok(DimensionSnapshot {
            resource: entity.clone(),
            locale: attributes.locale.clone(),
            stage: attributes.stage,
            content: merged,
        })
    }
}

fn merge_dimension(base: &mut DimensionContent, localized: &DimensionContent) {
    fn merge_map(base: &mut BTreeMap<String, serde_json::Value>, overrides: &BTreeMap<String, serde_json::Value>) {
        base.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    if localized.template_key.is_some() {
        base.template_key.clone_from(&localized.template_key);
    }
    merge_map(&mut base.template_data, &localized.template_data);
    merge_map(&mut base.excerpt, &localized.excerpt);
    merge_map(&mut base.seo, &localized.seo);
    if localized.author.is_some() {
        base.author.clone_from(&localized.author);
    }
    if localized.last_modified.is_some() {
        base.last_modified = localized.last_modified;
    }
    if localized.main_webspace.is_some() {
        base.main_webspace.clone_from(&localized.main_webspace);
    }
    if localized.shadow_base_locale.is_some() {
        base.shadow_base_locale.clone_from(&localized.shadow_base_locale);
    }
}
