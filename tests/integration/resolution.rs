use std::sync::Arc;

use content_resolution::content::ResourceId;
use content_resolution::loader::ResourceLoaderRegistry;
use content_resolution::test_utils::{EntityBuilder, LoadCall, RecordingLoader};
use serde_json::json;

use crate::common::resolver;

#[tokio::test]
async fn test_media_image_is_substituted() {
    let media = Arc::new(RecordingLoader::new().with_json(42, json!({"id": 42, "url": "/uploads/cover.jpg"})));
    let resolver = resolver(ResourceLoaderRegistry::new().with_loader("media", media.clone()));

    let snapshot = EntityBuilder::page(1).property("title", json!("Home")).property("image", json!({"id": 42})).snapshot();
    let resolved = resolver.resolve(&snapshot).await.unwrap();

    assert_eq!(resolved.content["title"], json!("Home"));
    assert_eq!(resolved.content["image"], json!({"id": 42, "url": "/uploads/cover.jpg"}));
    assert_eq!(resolved.view["image"], json!({"id": 42}));
    assert_eq!(
        media.calls(),
        vec![LoadCall {
            ids: vec![ResourceId::from(42)],
            locale: Some("en".to_string()),
        }]
    );
}

#[tokio::test]
async fn test_overlapping_references_share_one_call() {
    let pages = Arc::new(
        (1..=4_i64).fold(RecordingLoader::new(), |loader, id| loader.with_entity(EntityBuilder::page(id).build())),
    );
    let resolver = resolver(ResourceLoaderRegistry::new().with_loader("pages", pages.clone()));

    let snapshot = EntityBuilder::page(100)
        .property("pages", json!([1, 2, 3]))
        .property("featured", json!([3, 4]))
        .snapshot();
    let resolved = resolver.resolve(&snapshot).await.unwrap();

    assert_eq!(pages.requested_ids(), vec![(1..=4_i64).map(ResourceId::from).collect::<Vec<_>>()]);
    assert_eq!(resolved.content["pages"][2]["resource"]["id"], json!(3));
    assert_eq!(resolved.content["featured"][0]["resource"]["id"], json!(3));
    assert_eq!(resolved.content["featured"][1]["resource"]["id"], json!(4));
    assert_eq!(resolved.view["pages"], json!({"ids": [1, 2, 3]}));
}

#[tokio::test]
async fn test_normalized_layout() {
    let account = Arc::new(RecordingLoader::new().with_json(9, json!({"name": "Ada"})));
    let resolver = resolver(ResourceLoaderRegistry::new().with_loader("account", account));

    let snapshot = EntityBuilder::page(1)
        .property("title", json!("Home"))
        .excerpt("title", json!("Teaser"))
        .seo("noIndex", json!(true))
        .author(9)
        .main_webspace("main")
        .snapshot();
    let resolved = resolver.resolve(&snapshot).await.unwrap();

    assert_eq!(resolved.resource["id"], json!(1));
    assert_eq!(resolved.resource["resourceKey"], json!("pages"));
    assert_eq!(resolved.setting("template"), Some(&json!("default")));
    assert_eq!(resolved.setting("author"), Some(&json!({"name": "Ada"})));
    assert_eq!(resolved.setting("mainWebspace"), Some(&json!("main")));
    assert_eq!(resolved.setting("lastModified"), Some(&json!(null)));
    assert_eq!(resolved.extension["excerpt"]["title"], json!("Teaser"));
    assert_eq!(resolved.extension["excerpt"]["image"], json!(null));
    assert_eq!(resolved.extension["seo"], json!({"noIndex": true}));
    assert!(!resolved.extension.contains_key("settings"));

    let json = resolved.to_json();
    assert_eq!(json["author"], json!({"name": "Ada"}));
    assert_eq!(json["content"]["title"], json!("Home"));
}

#[tokio::test]
async fn test_author_loaded_once_across_the_graph() {
    let account = Arc::new(RecordingLoader::new().with_json(9, json!({"name": "Ada"})));
    let pages = Arc::new(
        RecordingLoader::new()
            .with_entity(EntityBuilder::page(2).author(9).build())
            .with_entity(EntityBuilder::page(3).author(9).build()),
    );
    let resolver = resolver(
        ResourceLoaderRegistry::new()
            .with_loader("account", account.clone())
            .with_loader("pages", pages.clone()),
    );

    let snapshot = EntityBuilder::page(1).author(9).link(2).property("pages", json!([3])).snapshot();
    let resolved = resolver.resolve(&snapshot).await.unwrap();

    assert_eq!(account.call_count(), 1);
    assert_eq!(pages.call_count(), 1);
    assert_eq!(resolved.setting("author"), Some(&json!({"name": "Ada"})));
    assert_eq!(resolved.content["link"]["author"], json!({"name": "Ada"}));
    assert_eq!(resolved.content["pages"][0]["author"], json!({"name": "Ada"}));
}

#[tokio::test]
async fn test_missing_resource_becomes_null() {
    let media = Arc::new(RecordingLoader::new());
    let resolver = resolver(ResourceLoaderRegistry::new().with_loader("media", media.clone()));

    let snapshot = EntityBuilder::page(1).property("image", json!(42)).snapshot();
    let resolved = resolver.resolve(&snapshot).await.unwrap();

    assert_eq!(resolved.content["image"], json!(null));
    assert_eq!(resolved.view["image"], json!({"id": 42}));
    assert_eq!(media.call_count(), 1);
}

#[tokio::test]
async fn test_blocks_resolve_nested_media() {
    let media = Arc::new(RecordingLoader::new().with_json(42, json!({"url": "/a.jpg"})));
    let resolver = resolver(ResourceLoaderRegistry::new().with_loader("media", media));

    let snapshot = EntityBuilder::page(1)
        .property(
            "blocks",
            json!([
                {"type": "text", "text": "<p>Hello</p>"},
                {"type": "image", "caption": "Cover", "media": {"id": 42}},
            ]),
        )
        .snapshot();
    let resolved = resolver.resolve(&snapshot).await.unwrap();

    assert_eq!(
        resolved.content["blocks"],
        json!([
            {"type": "text", "text": "<p>Hello</p>"},
            {"type": "image", "caption": "Cover", "media": {"url": "/a.jpg"}},
        ])
    );
    assert_eq!(resolved.view["blocks"][1]["media"], json!({"id": 42}));
}

#[tokio::test]
async fn test_snapshot_without_template_resolves_settings_only() {
    let resolver = resolver(ResourceLoaderRegistry::new());

    let snapshot = EntityBuilder::page(1).template("unknown").snapshot();
    let resolved = resolver.resolve(&snapshot).await.unwrap();

    assert_eq!(resolved.content, json!({}));
    assert_eq!(resolved.view, json!({}));
    assert_eq!(resolved.setting("template"), Some(&json!("unknown")));
}
