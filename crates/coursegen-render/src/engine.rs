//! The backend renderer contract and shared persistence helpers.

use std::path::{Path, PathBuf};

use coursegen_spec::{RenderSpec, SpecError};

/// Error raised by a backend or the engine factory.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The requested engine name is not registered.
    #[error("unsupported engine `{0}`")]
    UnknownEngine(String),
    /// A spec was dispatched to a backend it does not name.
    #[error("spec names engine `{spec}` but renderer is `{renderer}`")]
    EngineMismatch {
        /// Engine named by the spec.
        spec: String,
        /// Engine the receiving backend implements.
        renderer: &'static str,
    },
    /// The specification failed shape validation.
    #[error(transparent)]
    Spec(#[from] SpecError),
    /// Writing the output file failed. Propagated, never retried.
    #[error("failed to write {}: {source}", path.display())]
    Persist {
        /// Output path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Backend-specific failure while assembling the document.
    #[error("{engine}: {message}")]
    Backend {
        /// Engine that failed.
        engine: &'static str,
        /// What went wrong.
        message: String,
    },
}

/// Result of a completed document render.
#[derive(Debug)]
pub struct RenderedDocument {
    /// Path of the written output file.
    pub path: PathBuf,
    /// Isolated per-component failures. The document was still produced;
    /// these name what was omitted from it.
    pub warnings: Vec<String>,
}

/// One interchangeable output backend.
///
/// A backend instance owns its output directory and merged configuration
/// and serves one document at a time. `render_spec` runs the whole life
/// cycle: engine check, global-config application (a full reset of
/// backend-local state, so an instance can be reused for the next document),
/// depth-first component dispatch, and persistence of exactly one output
/// file at `output_dir/filename.<ext>`.
pub trait DocumentRenderer {
    /// Engine name this backend registers under.
    fn engine_name(&self) -> &'static str;

    /// Extension of produced output files, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Component type tags this backend can dispatch.
    fn supported_components(&self) -> Vec<String>;

    /// Render one specification document to a file.
    fn render_spec(&mut self, spec: &RenderSpec) -> Result<RenderedDocument, RenderError>;
}

/// Verify a spec names the backend it was dispatched to.
pub fn check_engine(spec: &RenderSpec, renderer: &'static str) -> Result<(), RenderError> {
    if spec.engine == renderer {
        Ok(())
    } else {
        Err(RenderError::EngineMismatch {
            spec: spec.engine.clone(),
            renderer,
        })
    }
}

/// Deterministic output path: `output_dir/filename.extension`.
#[must_use]
pub fn output_path(output_dir: &Path, filename: &str, extension: &str) -> PathBuf {
    output_dir.join(format!("{filename}.{extension}"))
}

/// Write an output file, creating parent directories and overwriting any
/// existing file at `path`.
pub fn write_output(path: &Path, contents: &[u8]) -> Result<(), RenderError> {
    let persist_err = |source| RenderError::Persist {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(persist_err)?;
    }
    std::fs::write(path, contents).map_err(persist_err)
}
