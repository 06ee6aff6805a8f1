//! Generator-level errors.

use coursegen_render::RenderError;
use coursegen_spec::SpecError;

/// Error raised by the universal content generator.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The source document failed shape validation or parsing.
    #[error(transparent)]
    Spec(#[from] SpecError),
    /// The selected backend failed (unknown engine, persistence, ...).
    #[error(transparent)]
    Render(#[from] RenderError),
    /// The directory-discovery glob pattern is invalid.
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying pattern error.
        #[source]
        source: glob::PatternError,
    },
}
