//! Declarative component specification model.
//!
//! A specification is a small document naming a rendering engine, an output
//! filename, document-wide configuration, and an ordered tree of typed
//! components:
//!
//! ```yaml
//! engine: markdown
//! filename: intro
//! config:
//!   title: Introduction
//! components:
//!   - type: Heading
//!     props: { content: Welcome, level: 1 }
//!   - type: Paragraph
//!     props: { content: Hello. }
//! ```
//!
//! This crate only models and validates the tree. It knows nothing about
//! engines or rendering; see `coursegen-render` for dispatch.
//!
//! Parsing is fail-closed: a malformed document produces a [`SpecError`]
//! before any component tree is handed out, never a partially built one.

mod error;
mod spec;
mod value;

pub use error::SpecError;
pub use spec::{ComponentSpec, RenderSpec};
pub use value::{PropError, PropValue, Props};
