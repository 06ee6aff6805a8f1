//! Configuration management for coursegen.
//!
//! Parses `coursegen.toml` with serde and auto-discovers the file in
//! parent directories. CLI settings override file values during load.
//!
//! ```toml
//! [output]
//! dir = "build"
//!
//! [glossary]
//! path = "glossary.yaml"
//!
//! [defaults.tables]
//! theme = "dark"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use coursegen_spec::Props;
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "coursegen.toml";

/// Error loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// CLI settings that override configuration file values.
///
/// All fields are optional; only non-`None` values override.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override glossary file path.
    pub glossary: Option<PathBuf>,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory generated documents are written into.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("build"),
        }
    }
}

/// Glossary configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GlossaryConfig {
    /// YAML glossary file consumed by `Term` components.
    pub path: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings.
    pub output: OutputConfig,
    /// Glossary settings.
    pub glossary: GlossaryConfig,
    /// Per-engine default global config, merged under every spec's own
    /// config for that engine's documents.
    pub defaults: BTreeMap<String, Props>,

    /// Path the config was loaded from (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load a specific config file and apply CLI overrides.
    pub fn load(path: &Path, cli: &CliSettings) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&source)?;
        config.config_path = Some(path.to_path_buf());
        config.resolve_relative_to(path.parent().unwrap_or(Path::new(".")));
        config.apply_cli(cli);
        Ok(config)
    }

    /// Discover `coursegen.toml` in `start` or any of its ancestors and
    /// load it; fall back to defaults when no file exists.
    pub fn discover(start: &Path, cli: &CliSettings) -> Result<Self, ConfigError> {
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Self::load(&candidate, cli);
            }
        }
        let mut config = Self::default();
        config.apply_cli(cli);
        Ok(config)
    }

    /// Default global config for one engine.
    #[must_use]
    pub fn engine_defaults(&self, engine: &str) -> Props {
        self.defaults.get(engine).cloned().unwrap_or_default()
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        if self.output.dir.is_relative() {
            self.output.dir = base.join(&self.output.dir);
        }
        if let Some(path) = &self.glossary.path {
            if path.is_relative() {
                self.glossary.path = Some(base.join(path));
            }
        }
    }

    fn apply_cli(&mut self, cli: &CliSettings) {
        if let Some(dir) = &cli.output_dir {
            self.output.dir.clone_from(dir);
        }
        if let Some(glossary) = &cli.glossary {
            self.glossary.path = Some(glossary.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.dir, PathBuf::from("build"));
        assert_eq!(config.glossary.path, None);
        assert!(config.defaults.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml_str(
            r#"
[output]
dir = "site"

[glossary]
path = "terms.yaml"

[defaults.tables]
theme = "dark"

[defaults.raster]
width = 1200
"#,
        )
        .unwrap();

        assert_eq!(config.output.dir, PathBuf::from("site"));
        assert_eq!(config.glossary.path, Some(PathBuf::from("terms.yaml")));
        assert_eq!(
            config.engine_defaults("tables").str_prop("theme").unwrap(),
            "dark"
        );
        assert_eq!(
            config.engine_defaults("raster").i64_prop("width").unwrap(),
            1200
        );
        assert!(config.engine_defaults("plotly").is_empty());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Config::from_toml_str("output = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[output]\ndir = \"out\"\n").unwrap();

        let config = Config::load(&path, &CliSettings::default()).unwrap();
        assert_eq!(config.output.dir, dir.path().join("out"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[output]\ndir = \"out\"\n").unwrap();

        let cli = CliSettings {
            output_dir: Some(PathBuf::from("/tmp/override")),
            glossary: None,
        };
        let config = Config::load(&path, &cli).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("/tmp/override"));
    }

    #[test]
    fn test_discover_walks_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILENAME),
            "[output]\ndir = \"found\"\n",
        )
        .unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config::discover(&nested, &CliSettings::default()).unwrap();
        assert_eq!(config.output.dir, dir.path().join("found"));
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::discover(dir.path(), &CliSettings::default()).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("build"));
        assert_eq!(config.config_path, None);
    }
}
