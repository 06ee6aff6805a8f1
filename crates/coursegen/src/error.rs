//! CLI error types.

use coursegen_config::ConfigError;
use coursegen_generator::GenerateError;
use coursegen_markdown::GlossaryError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Generate(#[from] GenerateError),

    #[error("{0}")]
    Glossary(#[from] GlossaryError),

    #[error("{0}")]
    Validation(String),
}
