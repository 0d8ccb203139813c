//! Unit tests for user-facing error contexts.

use std::time::Duration;

use anyhow::{Context, anyhow};
use content_resolution::core::{ErrorContext, ResolutionError, user_friendly_error};

#[test]
fn unknown_key_without_registered_loaders() {
    let error = ResolutionError::ResourceLoaderNotFound {
        key: "media".to_string(),
        available: Vec::new(),
    };
    let context = user_friendly_error(error.into());

    assert!(context.suggestion.as_deref().is_some_and(|s| s.contains("No resource loaders are registered")));
}

#[test]
fn unknown_key_lists_distant_keys() {
    let error = ResolutionError::ResourceLoaderNotFound {
        key: "accounts_v2_legacy".to_string(),
        available: vec!["media".to_string(), "pages".to_string()],
    };
    let context = user_friendly_error(error.into());

    let suggestion = context.suggestion.unwrap();
    assert!(suggestion.contains("media, pages"));
    assert!(!suggestion.contains("Did you mean"));
}

#[test]
fn typed_error_is_found_below_context() {
    let error = anyhow::Error::from(ResolutionError::LoaderTimeout {
        key: "media".to_string(),
        timeout: Duration::from_secs(3),
    })
    .context("Resource loader 'media' failed to load 2 resource(s)");

    let context = user_friendly_error(error);
    assert!(matches!(context.error, ResolutionError::LoaderTimeout { .. }));
    assert!(!context.error.is_configuration_error());
    assert!(context.suggestion.as_deref().is_some_and(|s| s.contains("load_timeout_secs")));
}

#[test]
fn untyped_failure_keeps_cause_chain() {
    let error: anyhow::Result<()> = Err(anyhow!("connection refused"));
    let error = error.context("Resource loader 'pages' failed to load 1 resource(s)").unwrap_err();

    let context = user_friendly_error(error);
    assert!(matches!(context.error, ResolutionError::CollaboratorFailed { .. }));
    let details = context.details.unwrap();
    assert!(details.contains("Caused by:"));
    assert!(details.contains("connection refused"));
}

#[test]
fn display_includes_details_and_suggestion() {
    let context = ErrorContext::new(ResolutionError::InvalidConfig {
        reason: "max_depth must be at least 1".to_string(),
    })
    .with_details("read from resolver.toml")
    .with_suggestion("Set max_depth to 1 or more");

    let rendered = context.to_string();
    assert!(rendered.starts_with("Invalid resolver configuration: max_depth must be at least 1"));
    assert!(rendered.contains("\nDetails: read from resolver.toml"));
    assert!(rendered.contains("\nSuggestion: Set max_depth to 1 or more"));
}
