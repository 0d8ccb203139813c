//! Global constants used throughout the resolution engine.
//!
//! Depth bounds and default priorities live here so that resolvers,
//! configuration defaults, and tests agree on the same numbers.

/// Default maximum depth of the resolved entity graph (5 levels).
///
/// Placeholders filed deeper than this are never loaded, and substitution
/// stops after this many passes. Both bounds must hold independently, otherwise
/// a cyclic graph can loop forever in whichever phase is unbounded.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Depth at which the root snapshot's resolver outputs are flattened.
///
/// Depth 0 is the snapshot request itself. The root entity's own references
/// therefore land on depth 2, the entities they point to resolve their
/// references on depth 3, and so on.
pub const ROOT_DEPTH: usize = 1;

/// Priority of ordinary entity and media references.
pub const DEFAULT_PRIORITY: i32 = 0;

/// Priority of smart-content queries (100).
///
/// Queries drain before ordinary references so that the ids a query discovers
/// are batched together with the references declared directly on the entity.
pub const SMART_CONTENT_PRIORITY: i32 = 100;

/// Priority of the author account referenced by the settings resolver.
pub const AUTHOR_PRIORITY: i32 = DEFAULT_PRIORITY;

/// Resource loader key used for media references.
pub const MEDIA_LOADER_KEY: &str = "media";

/// Resource loader key used for category references.
pub const CATEGORY_LOADER_KEY: &str = "category";

/// Resource loader key used for account (author) references.
pub const ACCOUNT_LOADER_KEY: &str = "account";

/// Resource loader key used for page references.
pub const PAGE_LOADER_KEY: &str = "pages";

/// Resource loader key smart-content queries are loaded with unless the
/// property names another one.
pub const SMART_CONTENT_LOADER_KEY: &str = "smart_content";
