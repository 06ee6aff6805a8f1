//! Knowledge-registry boundary for term lookups.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A glossary entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermEntry {
    /// Canonical term name.
    pub name: String,
    /// One-line definition shown in tooltips.
    pub definition: String,
}

/// Term lookup consumed by text components that render tooltips.
///
/// Implementations live outside the rendering core; the backends only see
/// this boundary.
pub trait Glossary: Send + Sync {
    /// Look up a term by name (case-insensitive).
    fn term(&self, name: &str) -> Option<TermEntry>;
}

/// Error loading a glossary file.
#[derive(Debug, thiserror::Error)]
pub enum GlossaryError {
    /// File could not be read.
    #[error("failed to read glossary {}: {source}", path.display())]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// File is not a flat `term: definition` YAML map.
    #[error("failed to parse glossary: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// In-memory glossary backed by a flat `term: definition` map.
#[derive(Debug, Default)]
pub struct InMemoryGlossary {
    /// Lowercased term → (canonical name, definition).
    terms: BTreeMap<String, TermEntry>,
}

impl InMemoryGlossary {
    /// Create an empty glossary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a term.
    pub fn insert(&mut self, name: &str, definition: &str) {
        self.terms.insert(
            name.to_lowercase(),
            TermEntry {
                name: name.to_owned(),
                definition: definition.to_owned(),
            },
        );
    }

    /// Parse a YAML `term: definition` map.
    pub fn from_yaml_str(source: &str) -> Result<Self, GlossaryError> {
        let raw: BTreeMap<String, String> = serde_yaml::from_str(source)?;
        let mut glossary = Self::new();
        for (name, definition) in &raw {
            glossary.insert(name, definition);
        }
        Ok(glossary)
    }

    /// Load a YAML glossary file.
    pub fn from_file(path: &Path) -> Result<Self, GlossaryError> {
        let source = std::fs::read_to_string(path).map_err(|source| GlossaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    /// Number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the glossary has no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Glossary for InMemoryGlossary {
    fn term(&self, name: &str) -> Option<TermEntry> {
        self.terms.get(&name.to_lowercase()).cloned()
    }
}
