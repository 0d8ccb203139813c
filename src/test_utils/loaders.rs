//! In-memory resource loaders that record how they are called.

use anyhow::anyhow;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::content::{ResourceId, Value};
use crate::dimension::ContentEntity;
use crate::loader::{LoadFuture, LoadedResource, LoadedResources, ResourceLoader};

/// One recorded `load()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadCall {
    /// Requested ids, sorted
    pub ids: Vec<ResourceId>,
    /// Requested locale
    pub locale: Option<String>,
}

/// Loader answering from a fixed set of resources and recording every call.
///
/// Ids it does not know are left out of the answer.
#[derive(Debug, Default)]
pub struct RecordingLoader {
    resources: HashMap<ResourceId, LoadedResource>,
    calls: Mutex<Vec<LoadCall>>,
    delay: Option<Duration>,
}

impl RecordingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entity(mut self, entity: ContentEntity) -> Self {
        self.resources.insert(entity.id.clone(), LoadedResource::Entity(entity));
        self
    }

    #[must_use]
    pub fn with_json(mut self, id: impl Into<ResourceId>, value: serde_json::Value) -> Self {
        self.resources.insert(id.into(), LoadedResource::from(value));
        self
    }

    #[must_use]
    pub fn with_value(mut self, id: impl Into<ResourceId>, value: Value) -> Self {
        self.resources.insert(id.into(), LoadedResource::Value(value));
        self
    }

    /// Sleep for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every call so far, in call order.
    pub fn calls(&self) -> Vec<LoadCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// Ids of every call, in call order.
    pub fn requested_ids(&self) -> Vec<Vec<ResourceId>> {
        self.calls().into_iter().map(|call| call.ids).collect()
    }
}

impl ResourceLoader for RecordingLoader {
    fn load<'a>(&'a self, ids: &'a [ResourceId], locale: Option<&'a str>) -> LoadFuture<'a> {
        Box::pin(async move {
            let mut sorted = ids.to_vec();
            sorted.sort();
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(LoadCall {
                    ids: sorted,
                    locale: locale.map(str::to_string),
                });
            }

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let loaded: LoadedResources = ids
                .iter()
                .filter_map(|id| self.resources.get(id).map(|resource| (id.clone(), resource.clone())))
                .collect();
            Ok(loaded)
        })
    }
}

/// Loader that always fails with the given message.
#[derive(Debug, Clone)]
pub struct FailingLoader {
    message: String,
}

impl FailingLoader {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ResourceLoader for FailingLoader {
    fn load<'a>(&'a self, _ids: &'a [ResourceId], _locale: Option<&'a str>) -> LoadFuture<'a> {
        Box::pin(async move {
            let failed: anyhow::Result<LoadedResources> = Err(anyhow!("{}", self.message));
            failed
        })
    }
}
