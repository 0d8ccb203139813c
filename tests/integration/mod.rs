//! Integration test suite for the content resolution engine
//!
//! End-to-end tests that resolve snapshots through the default field
//! resolvers and in-memory loaders from `content_resolution::test_utils`.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! RUST_LOG=content_resolution=debug cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **resolution**: end-to-end resolution of templates, media, settings and blocks
//! - **batching**: priority ordering and one load per loader and level
//! - **depth**: depth bounds, reference chains and cycles
//! - **smart_content**: second-order references discovered by queries
//! - **failures**: configuration errors, loader failures and timeouts
//! - **properties**: property-filtered resolution and reference collection
//! - **config**: resolver configuration loaded from TOML

mod common;

mod depth;
mod failures;
mod resolution;
mod smart_content;
