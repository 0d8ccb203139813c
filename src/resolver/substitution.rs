//! Replacing placeholders with their resolved values.

use std::collections::BTreeMap;

use crate::content::{ResourceId, Value};

/// Values resolved during one call, keyed `loader key -> id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ResolvedResources {
    by_loader: BTreeMap<String, BTreeMap<ResourceId, Value>>,
}

impl ResolvedResources {
    pub(crate) fn insert(&mut self, loader_key: &str, id: ResourceId, value: Value) {
        self.by_loader.entry(loader_key.to_string()).or_default().insert(id, value);
    }

    pub(crate) fn get(&self, loader_key: &str, id: &ResourceId) -> Option<&Value> {
        self.by_loader.get(loader_key).and_then(|values| values.get(id))
    }

    pub(crate) fn len(&self) -> usize {
        self.by_loader.values().map(BTreeMap::len).sum()
    }
}

/// Substitute placeholders in `value` pass by pass.
///
/// Each pass replaces every placeholder found in `resolved` and does not look
/// inside the values it just inserted; the next pass does. Passes repeat while
/// something was replaced, at most `max_depth` times. Placeholders left after
/// the last pass become `null`.
pub(crate) fn substitute(value: Value, resolved: &ResolvedResources, max_depth: usize) -> Value {
    let mut current = value;
    for pass in 1..=max_depth {
        let mut replaced = 0;
        current = substitute_pass(current, resolved, &mut replaced);
        tracing::trace!("Substitution pass {} replaced {} placeholder(s)", pass, replaced);
        if replaced == 0 {
            break;
        }
    }
    null_unresolved(current)
}

fn substitute_pass(value: Value, resolved: &ResolvedResources, replaced: &mut usize) -> Value {
    match value {
        Value::Resource(resource) => match resolved.get(resource.resource_loader_key(), resource.id()) {
            Some(loaded) => {
                *replaced += 1;
                resource.substitute(loaded)
            }
            None => Value::Resource(resource),
        },
        Value::List(items) => Value::List(items.into_iter().map(|item| substitute_pass(item, resolved, replaced)).collect()),
        Value::Map(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(key, item)| (key, substitute_pass(item, resolved, replaced)))
                .collect(),
        ),
        Value::View(view) => substitute_pass(view.into_content(), resolved, replaced),
        scalar @ Value::Scalar(_) => scalar,
    }
}

fn null_unresolved(value: Value) -> Value {
    match value {
        Value::Resource(resource) => {
            tracing::trace!(
                "Unresolved {} {} substituted with null",
                resource.resource_loader_key(),
                resource.id()
            );
            Value::NULL
        }
        Value::List(items) => Value::List(items.into_iter().map(null_unresolved).collect()),
        Value::Map(entries) => Value::Map(entries.into_iter().map(|(key, item)| (key, null_unresolved(item))).collect()),
        Value::View(view) => null_unresolved(view.into_content()),
        scalar @ Value::Scalar(_) => scalar,
    }
}
