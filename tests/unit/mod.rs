//! Unit tests for the public building blocks of the resolution engine.
//!
//! These exercise single components through the public API. End-to-end
//! resolution scenarios live in the integration suite.

mod error_context;
