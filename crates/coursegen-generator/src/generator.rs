//! The universal content generator.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use coursegen_engines::markdown::MarkdownBackend;
use coursegen_engines::plotly::PlotlyBackend;
use coursegen_engines::tables::TablesBackend;
use coursegen_markdown::Glossary;
use coursegen_raster::RasterBackend;
use coursegen_render::{DocumentRenderer, EngineRegistry};
use coursegen_spec::{Props, RenderSpec, SpecError};

use crate::discover::discover_sources;
use crate::error::GenerateError;

/// Pre-flight validation result for a directory of source documents.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of files inspected.
    pub total: usize,
    /// Files that parsed and shape-validated.
    pub valid: usize,
    /// Files that did not.
    pub invalid: usize,
    /// One `(path, message)` entry per invalid file.
    pub errors: Vec<(PathBuf, String)>,
}

/// Single entry point for producing output from specifications.
///
/// Owns an explicit [`EngineRegistry`] with the four built-in backends
/// (`raster`, `plotly`, `tables`, `markdown`) registered at construction.
/// Generator-level default config is merged *under* each spec's own
/// config, so specs always win.
///
/// Builder note: [`with_glossary`](Self::with_glossary) rebuilds the
/// built-in engine set, so call it before registering custom engines.
pub struct Generator {
    engines: EngineRegistry,
    output_dir: PathBuf,
    defaults: Props,
    engine_defaults: BTreeMap<String, Props>,
}

impl Generator {
    /// Create a generator writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            engines: Self::builtin_engines(None),
            output_dir: output_dir.into(),
            defaults: Props::new(),
            engine_defaults: BTreeMap::new(),
        }
    }

    fn builtin_engines(glossary: Option<Arc<dyn Glossary>>) -> EngineRegistry {
        let mut engines = EngineRegistry::new();
        engines.register("raster", |dir, config| {
            Box::new(RasterBackend::new(dir, config))
        });
        engines.register("plotly", |dir, config| {
            Box::new(PlotlyBackend::new(dir, config))
        });
        engines.register("tables", |dir, config| {
            Box::new(TablesBackend::new(dir, config))
        });
        engines.register("markdown", move |dir, config| {
            let backend = MarkdownBackend::new(dir, config);
            match &glossary {
                Some(glossary) => Box::new(backend.with_glossary(Arc::clone(glossary))),
                None => Box::new(backend),
            }
        });
        engines
    }

    /// Set generator-level default config, merged under every spec's
    /// config.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Props) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set default config for one engine, layered over the generator-wide
    /// defaults and under spec-level config.
    #[must_use]
    pub fn with_engine_defaults(mut self, engine: &str, defaults: Props) -> Self {
        self.engine_defaults.insert(engine.to_owned(), defaults);
        self
    }

    /// Wire a knowledge registry into the structured-text backend.
    #[must_use]
    pub fn with_glossary(mut self, glossary: Arc<dyn Glossary>) -> Self {
        self.engines = Self::builtin_engines(Some(glossary));
        self
    }

    /// Register an additional (or replacement) engine.
    pub fn register_engine<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&Path, &Props) -> Box<dyn DocumentRenderer> + Send + Sync + 'static,
    {
        self.engines.register(name, factory);
    }

    /// The generator's engine registry.
    #[must_use]
    pub fn engines(&self) -> &EngineRegistry {
        &self.engines
    }

    /// Render one specification, returning the output path.
    pub fn generate_from_spec(&self, spec: &RenderSpec) -> Result<PathBuf, GenerateError> {
        if spec.engine.is_empty() {
            return Err(SpecError::MissingEngine.into());
        }

        let base_config = match self.engine_defaults.get(&spec.engine) {
            Some(engine_defaults) => Props::merged(&self.defaults, engine_defaults),
            None => self.defaults.clone(),
        };
        let mut renderer = self
            .engines
            .create(&spec.engine, &self.output_dir, &base_config)?;
        let document = renderer.render_spec(spec)?;
        for warning in &document.warnings {
            tracing::warn!(path = %document.path.display(), "{warning}");
        }
        Ok(document.path)
    }

    /// Parse a source document and render it.
    pub fn generate_from_file(&self, path: &Path) -> Result<PathBuf, GenerateError> {
        let spec = RenderSpec::from_file(path)?;
        self.generate_from_spec(&spec)
    }

    /// Render a batch of specs sequentially, in input order.
    ///
    /// With `continue_on_error`, a failing spec is logged and yields `None`
    /// at its position; otherwise the first failure aborts and propagates.
    pub fn generate_many(
        &self,
        specs: &[RenderSpec],
        continue_on_error: bool,
    ) -> Result<Vec<Option<PathBuf>>, GenerateError> {
        let mut results = Vec::with_capacity(specs.len());
        for spec in specs {
            match self.generate_from_spec(spec) {
                Ok(path) => results.push(Some(path)),
                Err(err) if continue_on_error => {
                    tracing::warn!(engine = %spec.engine, error = %err, "spec failed; continuing");
                    results.push(None);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(results)
    }

    /// Discover source documents under `dir` matching `pattern` and render
    /// each, with the same continue-on-error contract as
    /// [`generate_many`](Self::generate_many).
    pub fn generate_from_directory(
        &self,
        dir: &Path,
        pattern: &str,
        recursive: bool,
        continue_on_error: bool,
    ) -> Result<Vec<Option<PathBuf>>, GenerateError> {
        let sources = discover_sources(dir, pattern, recursive)?;
        let mut results = Vec::with_capacity(sources.len());
        for source in &sources {
            match self.generate_from_file(source) {
                Ok(path) => results.push(Some(path)),
                Err(err) if continue_on_error => {
                    tracing::warn!(source = %source.display(), error = %err, "source failed; continuing");
                    results.push(None);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(results)
    }

    /// Parse every matching source document without rendering anything.
    ///
    /// Pre-flight checking: no backend is constructed, no file written.
    pub fn validate_directory(
        &self,
        dir: &Path,
        pattern: &str,
        recursive: bool,
    ) -> Result<ValidationReport, GenerateError> {
        let sources = discover_sources(dir, pattern, recursive)?;
        let mut report = ValidationReport {
            total: sources.len(),
            ..ValidationReport::default()
        };
        for source in &sources {
            match RenderSpec::from_file(source) {
                Ok(spec) if self.engines.is_available(&spec.engine) => report.valid += 1,
                Ok(spec) => {
                    report.invalid += 1;
                    report.errors.push((
                        source.clone(),
                        format!("unsupported engine `{}`", spec.engine),
                    ));
                }
                Err(err) => {
                    report.invalid += 1;
                    report.errors.push((source.clone(), err.to_string()));
                }
            }
        }
        Ok(report)
    }
}
