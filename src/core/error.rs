//! Error handling for the resolution engine
//!
//! The engine reports failures through [`anyhow::Result`] and carries typed
//! [`ResolutionError`] values inside it, so callers can either bubble errors up
//! with context or downcast to react to a specific failure:
//!
//! ```rust,no_run
//! use content_resolution::core::ResolutionError;
//!
//! fn is_wiring_bug(error: &anyhow::Error) -> bool {
//!     error
//!         .downcast_ref::<ResolutionError>()
//!         .is_some_and(ResolutionError::is_configuration_error)
//! }
//! ```
//!
//! # Error Categories
//!
//! - **Configuration**: [`ResolutionError::ResourceLoaderNotFound`],
//!   [`ResolutionError::EmptyResourceLoaderKey`], [`ResolutionError::InvalidConfig`].
//!   These indicate a deployment or wiring defect and are never retried.
//! - **Loading**: [`ResolutionError::LoaderTimeout`]. Errors raised by loaders
//!   themselves are propagated untouched, wrapped only in context.
//!
//! Exceeding the maximum depth is deliberately *not* an error: affected leaves
//! are substituted with `null`.
//!
//! Use [`user_friendly_error`] to turn any error into an [`ErrorContext`] with
//! details and an actionable suggestion.

use colored::Colorize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::content::ResourceId;

/// The main error type for resolution failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// No loader is registered under the key a placeholder asked for.
    ///
    /// # Fields
    /// - `key`: The loader key that was requested
    /// - `available`: Keys the provider knows about, for suggestions
    #[error("Resource loader with key \"{key}\" not found")]
    ResourceLoaderNotFound {
        /// The loader key that was requested
        key: String,
        /// Loader keys registered with the provider
        available: Vec<String>,
    },

    /// A placeholder was created with an empty loader key.
    #[error("Resource loader key must not be empty (resource id: {id})")]
    EmptyResourceLoaderKey {
        /// Id of the offending placeholder
        id: ResourceId,
    },

    /// A loader did not answer within the configured timeout.
    #[error("Resource loader \"{key}\" timed out after {timeout:?}")]
    LoaderTimeout {
        /// The loader key whose batch timed out
        key: String,
        /// The configured timeout
        timeout: Duration,
    },

    /// A collaborator (loader, aggregator, field resolver) failed.
    ///
    /// Only produced by [`user_friendly_error`] when presenting an untyped
    /// failure; the engine itself propagates collaborator errors untouched.
    #[error("Collaborator failed: {message}")]
    CollaboratorFailed {
        /// Top-level message of the failure
        message: String,
    },

    /// Resolver configuration is invalid.
    #[error("Invalid resolver configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected
        reason: String,
    },
}

impl ResolutionError {
    /// Whether this error indicates a wiring or deployment defect.
    ///
    /// Configuration errors should surface as hard failures (5xx-equivalent);
    /// they are never caused by the content being resolved.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::ResourceLoaderNotFound { .. }
                | Self::EmptyResourceLoaderKey { .. }
                | Self::InvalidConfig { .. }
        )
    }
}

/// Error wrapper carrying user-facing details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ResolutionError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: ResolutionError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with details and a suggestion.
///
/// Typed [`ResolutionError`]s anywhere in the chain get a tailored message;
/// TOML parse failures are reported as configuration problems; everything else
/// is treated as a failure raised by a collaborator (loader, aggregator or
/// field resolver) and reported with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(resolution_error) =
        error.chain().find_map(|cause| cause.downcast_ref::<ResolutionError>())
    {
        return create_error_context(resolution_error.clone());
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(ResolutionError::InvalidConfig {
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of the resolver configuration file")
        .with_details("The configuration is read from a [resolver] table");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(ResolutionError::CollaboratorFailed {
        message: error.to_string(),
    })
    .with_details(message)
    .with_suggestion(
        "A resource loader, aggregator or field resolver failed. The engine does not retry; \
         check the collaborator named in the details",
    )
}

fn create_error_context(error: ResolutionError) -> ErrorContext {
    match &error {
        ResolutionError::ResourceLoaderNotFound {
            key,
            available,
        } => {
            let suggestion = match closest_key(key, available) {
                Some(candidate) => format!("Did you mean \"{candidate}\"?"),
                None if available.is_empty() => {
                    "No resource loaders are registered; register one for this key".to_string()
                }
                None => format!("Register a loader for \"{key}\" or use one of: {}", available.join(", ")),
            };
            ErrorContext::new(error.clone())
                .with_suggestion(suggestion)
                .with_details("A field resolver produced a reference for a loader that is not wired up")
        }
        ResolutionError::EmptyResourceLoaderKey {
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion("Every resolvable resource needs the key of the loader that loads it")
            .with_details("A field resolver produced a reference without a loader key"),
        ResolutionError::LoaderTimeout {
            key,
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Raise load_timeout_secs in the [resolver] configuration or check the backend behind \"{key}\""
            ))
            .with_details("The engine does not retry loader calls"),
        ResolutionError::CollaboratorFailed {
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion("Check the loader, aggregator or field resolver named in the message"),
        ResolutionError::InvalidConfig {
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion("Fix the [resolver] configuration values")
            .with_details("max_depth must be at least 1 and load_timeout_secs must not be 0"),
    }
}

/// Closest registered key by Jaro-Winkler similarity, if any is close enough.
fn closest_key<'a>(key: &str, available: &'a [String]) -> Option<&'a str> {
    available
        .iter()
        .map(|candidate| (candidate, strsim::jaro_winkler(key, candidate)))
        .filter(|(_, score)| *score >= 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate.as_str())
}
