//! Specification shape errors.

use std::path::PathBuf;

/// Error raised while parsing or validating a specification document.
///
/// All variants are fatal for the document: nothing is rendered and no
/// partially built tree escapes.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// Top-level document is not a map.
    #[error("specification must be a map, got {0}")]
    NotAMap(&'static str),
    /// `engine` field absent or empty.
    #[error("specification is missing required field `engine`")]
    MissingEngine,
    /// `engine` field present but not a string.
    #[error("`engine` must be a string, got {0}")]
    EngineNotAString(&'static str),
    /// `components` field absent.
    #[error("specification is missing required field `components`")]
    MissingComponents,
    /// `components` present but not a list.
    #[error("`components` must be a list, got {0}")]
    ComponentsNotAList(&'static str),
    /// `filename` present but not a string.
    #[error("`filename` must be a string, got {0}")]
    FilenameNotAString(&'static str),
    /// `config` present but not a map.
    #[error("`config` must be a map, got {0}")]
    ConfigNotAMap(&'static str),
    /// A component entry is not a map.
    #[error("component at index {index} must be a map, got {kind}")]
    ComponentNotAMap {
        /// Position within its sibling list.
        index: usize,
        /// Shape actually found.
        kind: &'static str,
    },
    /// A component entry has no usable `type` tag.
    #[error("component at index {0} is missing required field `type`")]
    MissingComponentType(usize),
    /// A component `props` entry is not a map.
    #[error("component `{tag}`: `props` must be a map, got {kind}")]
    PropsNotAMap {
        /// Component type tag.
        tag: String,
        /// Shape actually found.
        kind: &'static str,
    },
    /// A component `children` entry is not a list.
    #[error("component `{tag}`: `children` must be a list, got {kind}")]
    ChildrenNotAList {
        /// Component type tag.
        tag: String,
        /// Shape actually found.
        kind: &'static str,
    },
    /// Source document could not be parsed as YAML.
    #[error("failed to parse YAML specification: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Source document could not be parsed as JSON.
    #[error("failed to parse JSON specification: {0}")]
    Json(#[from] serde_json::Error),
    /// Source file extension is not a recognized specification format.
    #[error("unsupported specification format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// Source file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
