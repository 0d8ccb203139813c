use anyhow::Result;

use super::FieldResolver;
use crate::content::{ContentView, Value, ValueMap};
use crate::dimension::DimensionSnapshot;

/// Copies the SEO fields of a snapshot into the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeoResolver;

impl FieldResolver for SeoResolver {
    fn name(&self) -> &str {
        "seo"
    }

    fn resolve(&self, snapshot: &DimensionSnapshot, _properties: Option<&[String]>) -> Result<Option<ContentView>> {
        let seo = &snapshot.content.seo;
        if seo.is_empty() {
            return Ok(None);
        }

        let content: ValueMap = seo
            .iter()
            .map(|(name, value)| {
                let view = ContentView::new(Value::from(value.clone()), ValueMap::new());
                (name.clone(), Value::from(view))
            })
            .collect();

        Ok(Some(ContentView::new(content, ValueMap::new())))
    }
}
