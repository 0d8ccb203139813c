//! Core types shared across the resolution engine
//!
//! The core module holds the error taxonomy every other module reports
//! through:
//! - [`ResolutionError`] - typed failures, carried inside [`anyhow::Error`]
//! - [`ErrorContext`] - user-facing wrapper with details and suggestions
//! - [`user_friendly_error`] - convert any error into an [`ErrorContext`]
//!
//! Configuration errors (unknown or empty loader keys, invalid settings) are
//! fatal and propagate immediately out of a resolve call. Loader failures are
//! the loader's own responsibility and are propagated untouched.

pub mod error;

pub use error::{ErrorContext, ResolutionError, user_friendly_error};
