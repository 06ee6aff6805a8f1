//! String-building backend adapters.
//!
//! Three of the four interchangeable backends live here:
//!
//! - [`markdown::MarkdownBackend`]: structured-text documents over the
//!   append-only `coursegen-markdown` collaborator.
//! - [`tables::TablesBackend`]: themed HTML pages of styled tables.
//! - [`plotly::PlotlyBackend`]: self-contained interactive-chart HTML
//!   pages referencing the plotly.js runtime.
//!
//! The raster-image backend has its own crate (`coursegen-raster`) because
//! it carries the SVG rasterization stack.
//!
//! Each backend owns a component registry local to itself; the same type
//! tag may resolve to entirely different implementations on another
//! backend.

pub mod markdown;
pub mod plotly;
pub mod tables;
