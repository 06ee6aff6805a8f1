//! Source-document discovery.

use std::path::{Path, PathBuf};

use crate::error::GenerateError;

/// Find specification source files under `dir` matching a glob `pattern`
/// (e.g. `*.yaml`). With `recursive`, subdirectories are searched too.
///
/// Results are sorted, so batch ordering is deterministic across runs.
/// Unreadable entries are logged and skipped rather than failing the
/// whole discovery.
pub fn discover_sources(
    dir: &Path,
    pattern: &str,
    recursive: bool,
) -> Result<Vec<PathBuf>, GenerateError> {
    let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
    let full_pattern = if recursive {
        format!("{escaped_dir}/**/{pattern}")
    } else {
        format!("{escaped_dir}/{pattern}")
    };

    let entries = glob::glob(&full_pattern).map_err(|source| GenerateError::Pattern {
        pattern: pattern.to_owned(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "engine: markdown\ncomponents: []\n").unwrap();
    }

    #[test]
    fn test_flat_discovery_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.yaml"));
        touch(&dir.path().join("a.yaml"));
        touch(&dir.path().join("notes.txt"));

        let found = discover_sources(dir.path(), "*.yaml", false).unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("a.yaml"), dir.path().join("b.yaml")]
        );
    }

    #[test]
    fn test_recursive_discovery() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("top.yaml"));
        touch(&dir.path().join("unit-1/nested.yaml"));

        let flat = discover_sources(dir.path(), "*.yaml", false).unwrap();
        assert_eq!(flat.len(), 1);

        let recursive = discover_sources(dir.path(), "*.yaml", true).unwrap();
        assert_eq!(recursive.len(), 2);
        assert!(recursive.contains(&dir.path().join("unit-1/nested.yaml")));
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_sources(dir.path(), "[unclosed", false).unwrap_err();
        assert!(matches!(err, GenerateError::Pattern { .. }));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let found = discover_sources(dir.path(), "*.yaml", true).unwrap();
        assert!(found.is_empty());
    }
}
