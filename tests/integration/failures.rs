use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use content_resolution::config::ResolverConfig;
use content_resolution::content::{ContentView, ResolvableResource, ResourceId, ValueMap};
use content_resolution::core::{ResolutionError, user_friendly_error};
use content_resolution::dimension::{DimensionContentAggregator, DimensionSnapshot};
use content_resolution::loader::ResourceLoaderRegistry;
use content_resolution::resolver::ContentResolver;
use content_resolution::resolvers::FieldResolver;
use content_resolution::test_utils::{EntityBuilder, FailingLoader, RecordingLoader};
use serde_json::json;

use crate::common::{resolver, resolver_with_config};

/// Emits one placeholder for a fixed loader key.
struct SingleReference {
    loader_key: &'static str,
}

impl FieldResolver for SingleReference {
    fn name(&self) -> &str {
        "reference"
    }

    fn resolve(&self, _snapshot: &DimensionSnapshot, _properties: Option<&[String]>) -> Result<Option<ContentView>> {
        Ok(Some(ContentView::new(
            ResolvableResource::new(1, self.loader_key, 0),
            ValueMap::new(),
        )))
    }
}

fn engine(loader_key: &'static str, loaders: ResourceLoaderRegistry) -> ContentResolver {
    ContentResolver::new(Arc::new(loaders), Arc::new(DimensionContentAggregator::new()))
        .with_field_resolver(Arc::new(SingleReference { loader_key }))
}

#[tokio::test]
async fn test_unknown_loader_key_is_configuration_error() {
    let pages = Arc::new(RecordingLoader::new());
    let loaders = ResourceLoaderRegistry::new().with_loader("pages", pages.clone());

    let err = engine("ghost", loaders).resolve(&EntityBuilder::page(1).snapshot()).await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("ghost"));
    assert!(message.contains("not found"));
    let resolution = err.downcast_ref::<ResolutionError>().unwrap();
    assert!(resolution.is_configuration_error());
    assert_eq!(pages.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_loader_key_suggests_registered_key() {
    let loaders = ResourceLoaderRegistry::new().with_loader("pages", Arc::new(RecordingLoader::new()));

    let err = engine("page", loaders).resolve(&EntityBuilder::page(1).snapshot()).await.unwrap_err();

    let context = user_friendly_error(err);
    assert!(context.suggestion.as_deref().is_some_and(|s| s.contains("pages")));
}

#[tokio::test]
async fn test_empty_loader_key_is_configuration_error() {
    let err = engine("", ResourceLoaderRegistry::new())
        .resolve(&EntityBuilder::page(1).snapshot())
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<ResolutionError>(),
        Some(&ResolutionError::EmptyResourceLoaderKey { id: ResourceId::from(1) })
    );
}

#[tokio::test]
async fn test_loader_failure_is_propagated() {
    let resolver = resolver(ResourceLoaderRegistry::new().with_loader("media", Arc::new(FailingLoader::new("media backend unavailable"))));

    let snapshot = EntityBuilder::page(1).property("image", json!(42)).snapshot();
    let err = resolver.resolve(&snapshot).await.unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("media backend unavailable"));
    assert!(message.contains("media"));
    assert!(err.downcast_ref::<ResolutionError>().is_none());
}

#[tokio::test]
async fn test_slow_loader_times_out() {
    let media = Arc::new(RecordingLoader::new().with_json(42, json!({})).with_delay(Duration::from_secs(5)));
    let config = ResolverConfig {
        load_timeout_secs: Some(1),
        ..ResolverConfig::default()
    };
    let resolver = resolver_with_config(ResourceLoaderRegistry::new().with_loader("media", media), config);

    let snapshot = EntityBuilder::page(1).property("image", json!(42)).snapshot();
    let err = resolver.resolve(&snapshot).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ResolutionError>(),
        Some(ResolutionError::LoaderTimeout { key, timeout }) if key == "media" && *timeout == Duration::from_secs(1)
    ));
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = ContentResolver::new(
        Arc::new(ResourceLoaderRegistry::new()),
        Arc::new(DimensionContentAggregator::new()),
    )
    .with_config(ResolverConfig::with_max_depth(0));

    let err = result.unwrap_err();
    assert!(matches!(err.downcast_ref::<ResolutionError>(), Some(ResolutionError::InvalidConfig { .. })));
}
