//! Test utilities for the resolution engine
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration tests:
//! - [`RecordingLoader`] and [`FailingLoader`] in-memory loaders
//! - [`EntityBuilder`] for entities and snapshots
//! - [`init_test_logging`] for tracing output in tests
//!
//! # Example
//!
//! ```rust,no_run
//! use content_resolution::test_utils::{EntityBuilder, RecordingLoader};
//!
//! let pages = RecordingLoader::new().with_entity(EntityBuilder::page(2).build());
//! let root = EntityBuilder::page(1).link(2).snapshot();
//! ```

pub mod builder;
pub mod loaders;

pub use builder::EntityBuilder;
pub use loaders::{FailingLoader, LoadCall, RecordingLoader};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG` when set; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=content_resolution=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
