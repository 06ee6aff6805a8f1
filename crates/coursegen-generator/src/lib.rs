//! Universal content generation.
//!
//! [`Generator`] is the single entry point for producing output documents
//! from specifications: it owns an engine registry (with the four built-in
//! backends pre-registered), merges generator-level default configuration
//! under each spec's own config, resolves the engine, and delegates to the
//! backend's `render_spec`.
//!
//! Batch operations are strictly sequential and per-item isolated: one bad
//! spec or file yields a `None` in its slot while the rest proceed, unless
//! the caller opts out of continue-on-error. Result ordering always
//! matches input ordering.

mod discover;
mod error;
mod generator;

pub use discover::discover_sources;
pub use error::GenerateError;
pub use generator::{Generator, ValidationReport};
