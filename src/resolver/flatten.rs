//! Flattening of view trees into parallel content and view values.
//!
//! Placeholders are left in the content for the substitution pass and filed
//! into the pending queue at the depth passed in. Depth counts levels of the
//! entity graph: every placeholder in one entity's tree shares a depth, no
//! matter how deeply its views nest.
//!
//! - a collection made only of views recurses into each element and keeps
//!   its list or map shape on both sides;
//! - a mixed collection recurses into its view elements, files its
//!   placeholders and copies everything else. Its view is the parent view
//!   plus the element views under their key;
//! - a placeholder as content is filed;
//! - a resolvable view has placeholders collected from its whole content.

use std::collections::BTreeMap;

use super::pending::PendingResources;
use crate::content::{ContentView, Value, ValueMap};

/// Flatten the output of every field resolver, filing placeholders at `depth`.
pub(crate) fn flatten_resolved(
    views: BTreeMap<String, ContentView>,
    depth: usize,
    pending: &mut PendingResources,
) -> (ValueMap, ValueMap) {
    let mut content = ValueMap::new();
    let mut view = ValueMap::new();
    for (name, resolved) in views {
        let (resolved_content, resolved_view) = resolve_content_view(resolved, depth, pending);
        content.insert(name.clone(), resolved_content);
        view.insert(name, resolved_view);
    }
    (content, view)
}

/// Flatten a single view, filing its placeholders at `depth`.
pub(crate) fn resolve_content_view(view: ContentView, depth: usize, pending: &mut PendingResources) -> (Value, Value) {
    let resolvable = view.is_resolvable();
    let (content, parent_view) = view.into_parts();

    if resolvable {
        let mut found = Vec::new();
        content.collect_resources(&mut found);
        for resource in found {
            pending.insert(depth, resource.clone());
        }
        return (content.strip_views(), Value::Map(parent_view));
    }

    match content {
        Value::Resource(resource) => {
            pending.insert(depth, (*resource).clone());
            (Value::Resource(resource), Value::Map(parent_view))
        }
        Value::View(inner) => resolve_content_view(*inner, depth, pending),
        Value::List(items) if is_uniform(items.iter()) => {
            let (contents, views): (Vec<Value>, Vec<Value>) = items
                .into_iter()
                .map(|item| resolve_element(item, depth, pending))
                .unzip();
            (Value::List(contents), Value::List(views))
        }
        Value::Map(entries) if is_uniform(entries.values()) => {
            let mut contents = ValueMap::new();
            let mut views = ValueMap::new();
            for (key, item) in entries {
                let (item_content, item_view) = resolve_element(item, depth, pending);
                contents.insert(key.clone(), item_content);
                views.insert(key, item_view);
            }
            (Value::Map(contents), Value::Map(views))
        }
        Value::List(items) => {
            let mut views = parent_view;
            let contents = items
                .into_iter()
                .enumerate()
                .map(|(index, item)| resolve_mixed(item, index.to_string(), depth, &mut views, pending))
                .collect();
            (Value::List(contents), Value::Map(views))
        }
        Value::Map(entries) => {
            let mut views = parent_view;
            let contents = entries
                .into_iter()
                .map(|(key, item)| {
                    let item = resolve_mixed(item, key.clone(), depth, &mut views, pending);
                    (key, item)
                })
                .collect();
            (Value::Map(contents), Value::Map(views))
        }
        scalar @ Value::Scalar(_) => (scalar, Value::Map(parent_view)),
    }
}

fn is_uniform<'a>(items: impl Iterator<Item = &'a Value>) -> bool {
    let mut items = items.peekable();
    items.peek().is_some() && items.all(|item| matches!(item, Value::View(_)))
}

fn resolve_element(item: Value, depth: usize, pending: &mut PendingResources) -> (Value, Value) {
    match item {
        Value::View(view) => resolve_content_view(*view, depth, pending),
        other => (other, Value::NULL),
    }
}

fn resolve_mixed(
    item: Value,
    key: String,
    depth: usize,
    views: &mut ValueMap,
    pending: &mut PendingResources,
) -> Value {
    match item {
        Value::View(view) => {
            let (content, view) = resolve_content_view(*view, depth, pending);
            views.insert(key, view);
            content
        }
        Value::Resource(resource) => {
            pending.insert(depth, (*resource).clone());
            Value::Resource(resource)
        }
        other => other,
    }
}
