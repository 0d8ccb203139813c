use anyhow::Result;

use super::FieldResolver;
use crate::constants::{ACCOUNT_LOADER_KEY, AUTHOR_PRIORITY};
use crate::content::{ContentView, Reference, ResolvableResource, Value, ValueMap};
use crate::dimension::DimensionSnapshot;

/// Resolves the settings spread onto the top level of the normalized output.
///
/// Produces `template`, `author` (an account placeholder), `lastModified`,
/// `mainWebspace` and `shadowBaseLocale`. Unset values are `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsResolver;

fn optional_string(value: Option<&str>) -> Value {
    value.map_or(Value::NULL, Value::from)
}

impl FieldResolver for SettingsResolver {
    fn name(&self) -> &str {
        "settings"
    }

    fn resolve(&self, snapshot: &DimensionSnapshot, _properties: Option<&[String]>) -> Result<Option<ContentView>> {
        let settings = &snapshot.content;

        let author = match &settings.author {
            Some(id) => Value::from(ContentView::with_references(
                ResolvableResource::new(id.clone(), ACCOUNT_LOADER_KEY, AUTHOR_PRIORITY),
                ValueMap::from([("id".to_string(), Value::Scalar(id.to_json()))]),
                vec![Reference::new(id.clone(), ACCOUNT_LOADER_KEY)],
            )),
            None => Value::NULL,
        };
        let last_modified = settings.last_modified.map_or(Value::NULL, |at| Value::from(at.to_rfc3339()));

        let content = ValueMap::from([
            ("template".to_string(), optional_string(snapshot.template_key())),
            ("author".to_string(), author),
            ("lastModified".to_string(), last_modified),
            ("mainWebspace".to_string(), optional_string(settings.main_webspace.as_deref())),
            ("shadowBaseLocale".to_string(), optional_string(settings.shadow_base_locale.as_deref())),
        ]);

        Ok(Some(ContentView::new(content, ValueMap::new())))
    }
}
