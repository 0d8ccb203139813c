//! Content trees: values, content views and resolvable placeholders.
//!
//! Field resolvers build trees of [`ContentView`]s whose leaves are plain data
//! or [`ResolvableResource`] placeholders. The engine flattens those trees into
//! parallel `content`/`view` maps and substitutes the placeholders once their
//! resources are loaded.

mod resource;
mod value;
mod view;

pub use resource::{ResolvableResource, ResourceId, ResourceMetadata, Substitution, SubstitutionFn};
pub use value::{Value, ValueMap, view_map};
pub use view::{ContentView, Reference};
