//! Markdown document building.
//!
//! [`MarkdownDocument`] is an append-only buffer of markdown blocks with
//! primitives for headings, paragraphs, lists, code blocks, tables, images,
//! and the MkDocs extensions used by generated course material: admonitions
//! (`!!! note "Title"`), collapsible details (`??? question "Title"`), and
//! content tabs (`=== "Title"`). Pure string building — no I/O.
//!
//! The crate also hosts the knowledge-registry boundary: the [`Glossary`]
//! trait consumed by text components that render term tooltips, with an
//! in-memory YAML-backed implementation.

mod document;
mod glossary;

pub use document::MarkdownDocument;
pub use glossary::{Glossary, GlossaryError, InMemoryGlossary, TermEntry};
