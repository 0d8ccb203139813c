use std::sync::Arc;

use content_resolution::content::{ResolvableResource, ResourceId, Value};
use content_resolution::loader::ResourceLoaderRegistry;
use content_resolution::test_utils::{EntityBuilder, RecordingLoader};
use serde_json::json;

use crate::common::resolver;

fn query_results(ids: &[i64]) -> Value {
    Value::List(ids.iter().map(|id| Value::from(ResolvableResource::new(*id, "pages", 0))).collect())
}

#[tokio::test]
async fn test_query_results_are_resolved_in_a_second_pass() {
    let queries = Arc::new(RecordingLoader::new().with_value(r#"{"limit":2}"#, query_results(&[3, 4])));
    let pages = Arc::new(
        RecordingLoader::new()
            .with_entity(EntityBuilder::page(3).property("title", json!("Three")).build())
            .with_entity(EntityBuilder::page(4).property("title", json!("Four")).build())
            .with_entity(EntityBuilder::page(5).build()),
    );
    let resolver = resolver(
        ResourceLoaderRegistry::new()
            .with_loader("page_query", queries.clone())
            .with_loader("pages", pages.clone()),
    );

    let snapshot = EntityBuilder::page(1).property("teasers", json!({"limit": 2})).link(5).snapshot();
    let resolved = resolver.resolve(&snapshot).await.unwrap();

    assert_eq!(queries.requested_ids(), vec![vec![ResourceId::from(r#"{"limit":2}"#)]]);
    // Query results and the direct link share one batch.
    assert_eq!(
        pages.requested_ids(),
        vec![vec![ResourceId::from(3), ResourceId::from(4), ResourceId::from(5)]]
    );

    let teasers = resolved.content["teasers"].as_array().unwrap();
    assert_eq!(teasers.len(), 2);
    assert_eq!(teasers[0]["content"]["title"], json!("Three"));
    assert_eq!(teasers[1]["content"]["title"], json!("Four"));
    assert_eq!(resolved.view["teasers"], json!({"query": {"limit": 2}}));
    assert_eq!(resolved.content["link"]["resource"]["id"], json!(5));
}

#[tokio::test]
async fn test_unknown_query_result_is_null() {
    let queries = Arc::new(RecordingLoader::new());
    let resolver = resolver(ResourceLoaderRegistry::new().with_loader("page_query", queries.clone()));

    let snapshot = EntityBuilder::page(1).property("teasers", json!({"limit": 2})).snapshot();
    let resolved = resolver.resolve(&snapshot).await.unwrap();

    assert_eq!(queries.call_count(), 1);
    assert_eq!(resolved.content["teasers"], json!(null));
}
