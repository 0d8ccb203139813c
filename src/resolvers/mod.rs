//! Field resolvers: per-area strategies that turn a snapshot into views.
//!
//! Every [`FieldResolver`] covers one area of a snapshot and is keyed by its
//! [`name`](FieldResolver::name) in the engine output. The engine treats the
//! names `template` and `settings` specially when normalizing; every other
//! resolver ends up under `extension`.
//!
//! The built-in set is returned by [`default_field_resolvers`].

mod excerpt;
mod property;
mod seo;
mod settings;
mod template;

pub use excerpt::ExcerptResolver;
pub use property::{
    BlockPropertyResolver, DefaultPropertyResolver, PropertyMetadata, PropertyResolver, PropertyResolverRegistry,
    ReferencePropertyResolver, SmartContentPropertyResolver,
};
pub use seo::SeoResolver;
pub use settings::SettingsResolver;
pub use template::{TemplateMetadata, TemplateRegistry, TemplateResolver};

use anyhow::Result;
use std::sync::Arc;

use crate::content::ContentView;
use crate::dimension::DimensionSnapshot;

/// Produces the view tree for one area of a snapshot.
pub trait FieldResolver: Send + Sync {
    /// Key of this resolver's output.
    fn name(&self) -> &str;

    /// Resolve `snapshot`, or return `None` when there is nothing to contribute.
    ///
    /// `properties` restricts resolution to the named properties where the
    /// resolver supports it.
    fn resolve(&self, snapshot: &DimensionSnapshot, properties: Option<&[String]>) -> Result<Option<ContentView>>;
}

/// The template, excerpt, SEO and settings resolvers.
pub fn default_field_resolvers(templates: TemplateRegistry) -> Vec<Arc<dyn FieldResolver>> {
    let properties = Arc::new(PropertyResolverRegistry::with_defaults());
    vec![
        Arc::new(TemplateResolver::new(Arc::new(templates), properties.clone())),
        Arc::new(ExcerptResolver::new(properties)),
        Arc::new(SeoResolver),
        Arc::new(SettingsResolver),
    ]
}
