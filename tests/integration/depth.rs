use anyhow::Result;
use std::sync::Arc;

use content_resolution::config::ResolverConfig;
use content_resolution::content::{ContentView, ResolvableResource, ResourceId, Value, ValueMap};
use content_resolution::dimension::{DimensionContentAggregator, DimensionSnapshot};
use content_resolution::loader::ResourceLoaderRegistry;
use content_resolution::resolver::ContentResolver;
use content_resolution::resolvers::FieldResolver;
use content_resolution::test_utils::{EntityBuilder, RecordingLoader, init_test_logging};
use serde_json::json;

use crate::common::{resolver, resolver_with_config};

/// Pages `2..=last`, each linking to the next one.
fn chain(last: i64) -> RecordingLoader {
    (2..=last).fold(RecordingLoader::new(), |loader, id| {
        loader.with_entity(EntityBuilder::page(id).link(id + 1).build())
    })
}

#[tokio::test]
async fn test_chain_stops_at_max_depth() {
    // A(1) -> B(2) -> C(3) -> D(4) -> E(5) -> F(6)
    let pages = Arc::new(chain(6));
    let resolver = resolver(ResourceLoaderRegistry::new().with_loader("pages", pages.clone()));

    let resolved = resolver.resolve(&EntityBuilder::page(1).link(2).snapshot()).await.unwrap();

    let b = &resolved.content["link"];
    let c = &b["content"]["link"];
    let d = &c["content"]["link"];
    let e = &d["content"]["link"];
    assert_eq!(b["resource"]["id"], json!(2));
    assert_eq!(c["resource"]["id"], json!(3));
    assert_eq!(d["resource"]["id"], json!(4));
    assert_eq!(e["resource"]["id"], json!(5));
    assert_eq!(e["content"]["link"], json!(null));
    assert_eq!(e["view"]["link"], json!({"id": 6}));

    let expected: Vec<Vec<ResourceId>> = (2..=5_i64).map(|id| vec![ResourceId::from(id)]).collect();
    assert_eq!(pages.requested_ids(), expected);
}

#[tokio::test]
async fn test_configured_max_depth_bounds_loading() {
    let pages = Arc::new(chain(6));
    let resolver = resolver_with_config(
        ResourceLoaderRegistry::new().with_loader("pages", pages.clone()),
        ResolverConfig::with_max_depth(2),
    );

    let resolved = resolver.resolve(&EntityBuilder::page(1).link(2).snapshot()).await.unwrap();

    assert_eq!(pages.requested_ids(), vec![vec![ResourceId::from(2)]]);
    assert_eq!(resolved.content["link"]["resource"]["id"], json!(2));
    assert_eq!(resolved.content["link"]["content"]["link"], json!(null));
}

#[tokio::test]
async fn test_cycle_terminates_without_reloading() {
    let pages = Arc::new(
        RecordingLoader::new()
            .with_entity(EntityBuilder::page(1).link(2).build())
            .with_entity(EntityBuilder::page(2).link(1).build()),
    );
    let resolver = resolver(ResourceLoaderRegistry::new().with_loader("pages", pages.clone()));

    let resolved = resolver.resolve(&EntityBuilder::page(1).link(2).snapshot()).await.unwrap();

    assert_eq!(pages.requested_ids(), vec![vec![ResourceId::from(2)], vec![ResourceId::from(1)]]);
    assert_eq!(resolved.content["link"]["resource"]["id"], json!(2));
    assert_eq!(resolved.content["link"]["content"]["link"]["resource"]["id"], json!(1));

    // Five substitution passes, then the remaining placeholder becomes null.
    let mut node = &resolved.content["link"];
    for _ in 1..5 {
        node = &node["content"]["link"];
        assert!(node.is_object());
    }
    assert_eq!(node["content"]["link"], json!(null));
}

/// Places every template property directly into the content as a page
/// placeholder, without wrapping it in a view.
///
/// A property is either a page id or `{"id": .., "priority": ..}`.
struct BareLinks;

impl FieldResolver for BareLinks {
    fn name(&self) -> &str {
        "template"
    }

    fn resolve(&self, snapshot: &DimensionSnapshot, _properties: Option<&[String]>) -> Result<Option<ContentView>> {
        let mut content = ValueMap::new();
        for (name, data) in snapshot.template_data() {
            let Some(id) = data.get("id").unwrap_or(data).as_i64() else {
                continue;
            };
            let priority = data.get("priority").and_then(serde_json::Value::as_i64).unwrap_or(0);
            let priority = i32::try_from(priority)?;
            content.insert(name.clone(), Value::from(ResolvableResource::new(id, "pages", priority)));
        }
        Ok(Some(ContentView::new(content, ValueMap::new())))
    }
}

fn bare_engine(pages: Arc<RecordingLoader>) -> ContentResolver {
    init_test_logging(None);
    ContentResolver::new(
        Arc::new(ResourceLoaderRegistry::new().with_loader("pages", pages)),
        Arc::new(DimensionContentAggregator::new()),
    )
    .with_field_resolver(Arc::new(BareLinks))
}

#[tokio::test]
async fn test_bare_placeholder_chain_stops_at_max_depth() {
    // Every page links the next one; the loader knows far more than five.
    let pages = Arc::new((2..=40_i64).fold(RecordingLoader::new(), |loader, id| {
        loader.with_entity(EntityBuilder::page(id).property("next", json!(id + 1)).build())
    }));

    let snapshot = EntityBuilder::page(1).property("next", json!(2)).snapshot();
    let resolved = bare_engine(pages.clone()).resolve(&snapshot).await.unwrap();

    let expected: Vec<Vec<ResourceId>> = (2..=5_i64).map(|id| vec![ResourceId::from(id)]).collect();
    assert_eq!(pages.requested_ids(), expected);

    let mut node = &resolved.content["next"];
    for id in 2..=5 {
        assert_eq!(node["resource"]["id"], json!(id));
        node = &node["content"]["next"];
    }
    assert_eq!(*node, json!(null));
}

#[tokio::test]
async fn test_id_reached_shallower_at_lower_priority_is_loaded_again() {
    // 1 -> 2 -> 3 -> 4 -> 5 at priority 10 puts page 5 on depth 5, where its
    // link to 6 is out of range. The root also links 5 directly at priority 0.
    let link = |id: i64| json!({"id": id, "priority": 10});
    let pages = Arc::new(
        RecordingLoader::new()
            .with_entity(EntityBuilder::page(2).property("next", link(3)).build())
            .with_entity(EntityBuilder::page(3).property("next", link(4)).build())
            .with_entity(EntityBuilder::page(4).property("next", link(5)).build())
            .with_entity(EntityBuilder::page(5).property("next", link(6)).build())
            .with_entity(EntityBuilder::page(6).build()),
    );

    let snapshot = EntityBuilder::page(1).property("chain", link(2)).property("link", json!(5)).snapshot();
    let resolved = bare_engine(pages.clone()).resolve(&snapshot).await.unwrap();

    let expected: Vec<Vec<ResourceId>> = [2_i64, 3, 4, 5, 5, 6].iter().map(|id| vec![ResourceId::from(*id)]).collect();
    assert_eq!(pages.requested_ids(), expected);

    let direct = &resolved.content["link"];
    assert_eq!(direct["resource"]["id"], json!(5));
    assert_eq!(direct["content"]["next"]["resource"]["id"], json!(6));
}
