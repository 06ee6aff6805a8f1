//! Engine registry and factory.

use std::collections::BTreeMap;
use std::path::Path;

use coursegen_spec::Props;

use crate::engine::{DocumentRenderer, RenderError};

type EngineFactory = Box<dyn Fn(&Path, &Props) -> Box<dyn DocumentRenderer> + Send + Sync>;

/// Static description of a registered engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineInfo {
    /// Registered engine name.
    pub name: String,
    /// Output file extension, without the dot.
    pub file_extension: String,
    /// Component type tags the engine dispatches.
    pub supported_components: Vec<String>,
}

/// Association of engine name to backend constructor.
///
/// An explicit object rather than process-global state: every generator
/// owns its own registry, so render passes stay independent and testable in
/// isolation. Read-mostly — populated once at construction, extended only
/// when a caller registers an additional backend.
#[derive(Default)]
pub struct EngineRegistry {
    engines: BTreeMap<String, EngineFactory>,
}

impl EngineRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend constructor under `name`.
    ///
    /// Re-registering an existing name is logged as a warning and the last
    /// registration wins. A factory whose instances declare a different
    /// engine name than `name` is also warned about, since specs naming
    /// `name` would then fail the backend's own engine check.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&Path, &Props) -> Box<dyn DocumentRenderer> + Send + Sync + 'static,
    {
        let declared = factory(Path::new("."), &Props::new()).engine_name();
        if declared != name {
            tracing::warn!(
                registered = %name,
                declared = %declared,
                "engine registered under a name it does not declare"
            );
        }
        if self
            .engines
            .insert(name.to_owned(), Box::new(factory))
            .is_some()
        {
            tracing::warn!(engine = %name, "replacing registered engine; last registration wins");
        }
    }

    /// Construct a configured backend for `name`.
    pub fn create(
        &self,
        name: &str,
        output_dir: &Path,
        config: &Props,
    ) -> Result<Box<dyn DocumentRenderer>, RenderError> {
        self.engines
            .get(name)
            .map(|factory| factory(output_dir, config))
            .ok_or_else(|| RenderError::UnknownEngine(name.to_owned()))
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn is_available(&self, name: &str) -> bool {
        self.engines.contains_key(name)
    }

    /// Registered engine names, sorted.
    #[must_use]
    pub fn engine_names(&self) -> Vec<String> {
        self.engines.keys().cloned().collect()
    }

    /// Describe a registered engine by probing a throwaway instance.
    #[must_use]
    pub fn engine_info(&self, name: &str) -> Option<EngineInfo> {
        let factory = self.engines.get(name)?;
        let probe = factory(Path::new("."), &Props::new());
        Some(EngineInfo {
            name: probe.engine_name().to_owned(),
            file_extension: probe.file_extension().to_owned(),
            supported_components: probe.supported_components(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursegen_spec::RenderSpec;
    use crate::engine::RenderedDocument;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    struct Stub {
        name: &'static str,
        output_dir: PathBuf,
    }

    impl DocumentRenderer for Stub {
        fn engine_name(&self) -> &'static str {
            self.name
        }

        fn file_extension(&self) -> &'static str {
            "txt"
        }

        fn supported_components(&self) -> Vec<String> {
            vec!["Stub".to_owned()]
        }

        fn render_spec(&mut self, spec: &RenderSpec) -> Result<RenderedDocument, RenderError> {
            Ok(RenderedDocument {
                path: self.output_dir.join(format!("{}.txt", spec.filename)),
                warnings: Vec::new(),
            })
        }
    }

    fn stub_registry() -> EngineRegistry {
        let mut registry = EngineRegistry::new();
        registry.register("stub", |output_dir, _config| {
            Box::new(Stub {
                name: "stub",
                output_dir: output_dir.to_path_buf(),
            })
        });
        registry
    }

    #[test]
    fn test_create_known_engine() {
        let registry = stub_registry();
        let renderer = registry
            .create("stub", Path::new("out"), &Props::new())
            .unwrap();
        assert_eq!(renderer.engine_name(), "stub");
    }

    #[test]
    fn test_create_unknown_engine() {
        let registry = stub_registry();
        let err = match registry.create("nope", Path::new("out"), &Props::new()) {
            Ok(_) => panic!("expected error"),
            Err(e) => e,
        };
        assert!(matches!(err, RenderError::UnknownEngine(name) if name == "nope"));
    }

    #[test]
    fn test_is_available() {
        let registry = stub_registry();
        assert!(registry.is_available("stub"));
        assert!(!registry.is_available("raster"));
    }

    #[test]
    fn test_engine_info() {
        let registry = stub_registry();
        let info = registry.engine_info("stub").unwrap();
        assert_eq!(info.name, "stub");
        assert_eq!(info.file_extension, "txt");
        assert_eq!(info.supported_components, vec!["Stub".to_owned()]);
        assert_eq!(registry.engine_info("nope"), None);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = stub_registry();
        registry.register("stub", |output_dir, _config| {
            Box::new(Stub {
                name: "stub",
                output_dir: output_dir.join("v2"),
            })
        });

        let mut renderer = registry
            .create("stub", Path::new("out"), &Props::new())
            .unwrap();
        let doc = renderer.render_spec(&RenderSpec::new("stub", "doc")).unwrap();
        assert_eq!(doc.path, PathBuf::from("out/v2/doc.txt"));
    }

    #[test]
    fn test_engine_names_sorted() {
        let mut registry = stub_registry();
        registry.register("alpha", |output_dir, _config| {
            Box::new(Stub {
                name: "alpha",
                output_dir: output_dir.to_path_buf(),
            })
        });
        assert_eq!(registry.engine_names(), vec!["alpha", "stub"]);
    }
}
