// ABOUTME: Selector-driven extraction: the selector registry, field extractor, and category parser.
// ABOUTME: The built-in selector set is embedded JSON loaded through the loader module.

//! Extraction module.
//!
//! Submodules:
//! - `registry`: Validated per-category selector candidates.
//! - `loader`: The embedded default registry.
//! - `select`: Scalar and list field extraction over a [`crate::dom::Dom`].
//! - `parser`: Item boundary resolution and record assembly for one category.

pub mod loader;
pub mod parser;
pub mod registry;
pub mod select;
