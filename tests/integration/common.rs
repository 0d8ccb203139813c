//! Shared setup for the integration tests.

use std::sync::Arc;

use content_resolution::config::ResolverConfig;
use content_resolution::dimension::DimensionContentAggregator;
use content_resolution::loader::ResourceLoaderRegistry;
use content_resolution::resolver::ContentResolver;
use content_resolution::resolvers::{PropertyMetadata, TemplateMetadata, TemplateRegistry, default_field_resolvers};
use content_resolution::test_utils::init_test_logging;
use serde_json::json;

/// The `default` template every test entity uses.
pub fn templates() -> TemplateRegistry {
    TemplateRegistry::new().with_template(
        "default",
        TemplateMetadata::new(vec![
            PropertyMetadata::new("title", "text_line"),
            PropertyMetadata::new("link", "single_page_selection"),
            PropertyMetadata::new("pages", "page_selection"),
            PropertyMetadata::new("featured", "page_selection"),
            PropertyMetadata::new("image", "single_media_selection"),
            PropertyMetadata::new("teasers", "smart_content").with_param("loader", json!("page_query")),
            PropertyMetadata::new("blocks", "block")
                .with_block_type("text", vec![PropertyMetadata::new("text", "text_editor")])
                .with_block_type(
                    "image",
                    vec![
                        PropertyMetadata::new("caption", "text_line"),
                        PropertyMetadata::new("media", "single_media_selection"),
                    ],
                ),
        ]),
    )
}

/// Resolver with the default field resolvers and config.
pub fn resolver(loaders: ResourceLoaderRegistry) -> ContentResolver {
    resolver_with_config(loaders, ResolverConfig::default())
}

pub fn resolver_with_config(loaders: ResourceLoaderRegistry, config: ResolverConfig) -> ContentResolver {
    init_test_logging(None);
    ContentResolver::new(Arc::new(loaders), Arc::new(DimensionContentAggregator::new()))
        .with_config(config)
        .unwrap()
        .with_field_resolvers(default_field_resolvers(templates()))
}
