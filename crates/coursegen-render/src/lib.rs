//! Rendering contracts and dispatch.
//!
//! Two polymorphic seams make backends substitutable behind one
//! specification format:
//!
//! - [`Component`]: one unit of rendering logic, registered per backend
//!   under a type tag. The same tag may name different implementations on
//!   different backends.
//! - [`DocumentRenderer`]: one output backend owning the full render life
//!   cycle for a document — global config, component dispatch, persistence.
//!
//! Dispatch lives in [`ComponentRegistry`]: depth-first, order-preserving,
//! children before parent, with per-component failure isolation — a failing
//! component is logged and omitted while its siblings keep rendering.
//!
//! Backends are constructed on demand through an [`EngineRegistry`], an
//! explicit factory object injected wherever documents are generated; there
//! is no process-global engine table.

mod component;
mod context;
mod engine;
mod factory;
mod html;
mod registry;

pub use component::{Component, ComponentError, validate_props};
pub use context::RenderContext;
pub use engine::{
    DocumentRenderer, RenderError, RenderedDocument, check_engine, output_path, write_output,
};
pub use factory::{EngineInfo, EngineRegistry};
pub use html::{HtmlPage, escape_html};
pub use registry::{CHILDREN_PROP, ComponentOutcome, ComponentRegistry, RenderPass};
