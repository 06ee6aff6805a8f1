//! Structured-text backend.
//!
//! Renders component trees to markup documents through the append-only
//! [`MarkdownDocument`] collaborator. Component fragments are markdown
//! strings; the backend appends top-level fragments to the document buffer
//! in document order, so composite components (tabs, sections) receive
//! their children already rendered to text and splice them in place.

mod components;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use coursegen_markdown::{Glossary, MarkdownDocument};
use coursegen_render::{
    Component, ComponentRegistry, DocumentRenderer, RenderContext, RenderError, RenderedDocument,
    check_engine, output_path, write_output,
};
use coursegen_spec::{PropValue, Props, RenderSpec};

const ENGINE: &str = "markdown";

/// Per-pass state shared by the structured-text components.
#[derive(Default)]
pub struct MarkdownCanvas {
    /// Free-form per-pass store (section counters and the like).
    pub context: RenderContext,
    /// Knowledge registry consulted by `Term` components.
    pub glossary: Option<Arc<dyn Glossary>>,
}

/// Structured-text backend producing `.md` documents.
pub struct MarkdownBackend {
    output_dir: PathBuf,
    base_config: Props,
    registry: ComponentRegistry<MarkdownCanvas>,
    canvas: MarkdownCanvas,
}

impl MarkdownBackend {
    /// Create a backend writing into `output_dir` with backend-wide config.
    #[must_use]
    pub fn new(output_dir: &Path, config: &Props) -> Self {
        let mut registry = ComponentRegistry::new();
        components::register_builtins(&mut registry);
        Self {
            output_dir: output_dir.to_path_buf(),
            base_config: config.clone(),
            registry,
            canvas: MarkdownCanvas::default(),
        }
    }

    /// Attach a knowledge registry for `Term` tooltips.
    #[must_use]
    pub fn with_glossary(mut self, glossary: Arc<dyn Glossary>) -> Self {
        self.canvas.glossary = Some(glossary);
        self
    }

    /// Add or override a component implementation on this backend.
    pub fn register_component(&mut self, component: impl Component<MarkdownCanvas> + 'static) {
        self.registry.register(component);
    }

    /// Reset backend-local state for a new document.
    fn apply_global_config(&mut self) {
        self.canvas.context.clear();
    }
}

impl DocumentRenderer for MarkdownBackend {
    fn engine_name(&self) -> &'static str {
        ENGINE
    }

    fn file_extension(&self) -> &'static str {
        "md"
    }

    fn supported_components(&self) -> Vec<String> {
        self.registry.tags()
    }

    fn render_spec(&mut self, spec: &RenderSpec) -> Result<RenderedDocument, RenderError> {
        check_engine(spec, ENGINE)?;
        let config = Props::merged(&self.base_config, &spec.config);
        self.apply_global_config();

        let pass = self.registry.render_all(&spec.components, &mut self.canvas);

        let mut doc = MarkdownDocument::new();
        if let Some(PropValue::Map(front)) = config.get("front_matter") {
            doc.front_matter(front).map_err(|err| RenderError::Backend {
                engine: ENGINE,
                message: format!("front matter: {err}"),
            })?;
        }
        if let Some(title) = config.get("title").and_then(PropValue::as_str) {
            doc.heading(1, title);
        }
        for fragment in &pass.fragments {
            if let Some(text) = fragment.as_str() {
                doc.raw(text);
            }
        }

        let path = output_path(&self.output_dir, &spec.filename, self.file_extension());
        write_output(&path, doc.into_string().as_bytes())?;
        Ok(RenderedDocument {
            path,
            warnings: pass.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursegen_spec::ComponentSpec;
    use pretty_assertions::assert_eq;

    fn heading(content: &str, level: i64) -> ComponentSpec {
        ComponentSpec::new(
            "Heading",
            Props::new().with("content", content).with("level", level),
        )
    }

    fn paragraph(content: &str) -> ComponentSpec {
        ComponentSpec::new("Paragraph", Props::new().with("content", content))
    }

    #[test]
    fn test_heading_then_paragraph_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = MarkdownBackend::new(dir.path(), &Props::new());

        let spec = RenderSpec::new(ENGINE, "doc")
            .with_components(vec![heading("Intro", 1), paragraph("Hello")]);
        let doc = backend.render_spec(&spec).unwrap();

        assert_eq!(doc.path, dir.path().join("doc.md"));
        let contents = std::fs::read_to_string(&doc.path).unwrap();
        assert_eq!(contents, "# Intro\n\nHello\n");
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_title_and_front_matter_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = MarkdownBackend::new(dir.path(), &Props::new());

        let config = Props::new().with("title", "Chapter 1").with(
            "front_matter",
            Props::new().with("slug", "chapter-1"),
        );
        let spec = RenderSpec::new(ENGINE, "chapter")
            .with_config(config)
            .with_components(vec![paragraph("Body")]);
        let doc = backend.render_spec(&spec).unwrap();

        let contents = std::fs::read_to_string(&doc.path).unwrap();
        assert_eq!(
            contents,
            "---\nslug: chapter-1\n---\n\n# Chapter 1\n\nBody\n"
        );
    }

    #[test]
    fn test_failed_component_omitted_siblings_kept() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = MarkdownBackend::new(dir.path(), &Props::new());

        let spec = RenderSpec::new(ENGINE, "doc").with_components(vec![
            paragraph("before"),
            // Missing required `content`.
            ComponentSpec::new("Heading", Props::new()),
            paragraph("after"),
        ]);
        let doc = backend.render_spec(&spec).unwrap();

        let contents = std::fs::read_to_string(&doc.path).unwrap();
        assert_eq!(contents, "before\n\nafter\n");
        assert_eq!(doc.warnings.len(), 1);
        assert!(doc.warnings[0].contains("`Heading`"));
    }

    #[test]
    fn test_unknown_component_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = MarkdownBackend::new(dir.path(), &Props::new());

        let spec = RenderSpec::new(ENGINE, "doc").with_components(vec![
            ComponentSpec::new("Carousel", Props::new()),
            paragraph("still here"),
        ]);
        let doc = backend.render_spec(&spec).unwrap();

        let contents = std::fs::read_to_string(&doc.path).unwrap();
        assert_eq!(contents, "still here\n");
        assert!(doc.warnings[0].contains("unsupported component type `Carousel`"));
    }

    #[test]
    fn test_engine_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = MarkdownBackend::new(dir.path(), &Props::new());

        let err = backend
            .render_spec(&RenderSpec::new("plotly", "doc"))
            .unwrap_err();
        assert!(matches!(err, RenderError::EngineMismatch { .. }));
    }

    #[test]
    fn test_rerender_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = MarkdownBackend::new(dir.path(), &Props::new());

        let first = RenderSpec::new(ENGINE, "doc").with_components(vec![paragraph("one")]);
        let second = RenderSpec::new(ENGINE, "doc").with_components(vec![paragraph("two")]);

        let path1 = backend.render_spec(&first).unwrap().path;
        let path2 = backend.render_spec(&second).unwrap().path;

        assert_eq!(path1, path2);
        assert_eq!(std::fs::read_to_string(&path2).unwrap(), "two\n");
    }

    #[test]
    fn test_empty_components_produce_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = MarkdownBackend::new(dir.path(), &Props::new());

        let doc = backend.render_spec(&RenderSpec::new(ENGINE, "empty")).unwrap();
        assert_eq!(std::fs::read_to_string(&doc.path).unwrap(), "");
    }
}
