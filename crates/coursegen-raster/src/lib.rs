//! Raster-image backend.
//!
//! The whole document is one drawing surface: components accumulate SVG
//! drawing elements in order, and at persistence time the surface is
//! flattened exactly once — parsed with `usvg`, rendered to a pixmap with
//! `resvg`, PNG-encoded, and embedded as a base64 data URI inside a
//! generated HTML shell.

mod components;
mod surface;

pub use surface::{Rect, Surface};

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use coursegen_render::{
    Component, ComponentRegistry, DocumentRenderer, HtmlPage, RenderError, RenderedDocument,
    check_engine, escape_html, output_path, write_output,
};
use coursegen_spec::{PropValue, Props, RenderSpec};

const ENGINE: &str = "raster";

const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 480;
const DEFAULT_PADDING: f64 = 60.0;
const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Raster-image backend producing `.html` pages with an embedded PNG.
pub struct RasterBackend {
    output_dir: PathBuf,
    base_config: Props,
    registry: ComponentRegistry<Surface>,
    surface: Surface,
    title: Option<String>,
}

impl RasterBackend {
    /// Create a backend writing into `output_dir` with backend-wide config.
    #[must_use]
    pub fn new(output_dir: &Path, config: &Props) -> Self {
        let mut registry = ComponentRegistry::new();
        components::register_builtins(&mut registry);
        Self {
            output_dir: output_dir.to_path_buf(),
            base_config: config.clone(),
            registry,
            surface: Surface::new(
                DEFAULT_WIDTH,
                DEFAULT_HEIGHT,
                DEFAULT_BACKGROUND,
                DEFAULT_PADDING,
            ),
            title: None,
        }
    }

    /// Add or override a component implementation on this backend.
    pub fn register_component(&mut self, component: impl Component<Surface> + 'static) {
        self.registry.register(component);
    }

    /// Open a fresh surface from document-wide settings, superseding any
    /// prior drawing state.
    fn apply_global_config(&mut self, config: &Props) {
        let width = dimension(config, "width", DEFAULT_WIDTH);
        let height = dimension(config, "height", DEFAULT_HEIGHT);
        let background = config
            .get("background")
            .and_then(PropValue::as_str)
            .unwrap_or(DEFAULT_BACKGROUND);
        let padding = config
            .get("padding")
            .and_then(PropValue::as_f64)
            .unwrap_or(DEFAULT_PADDING);

        self.surface = Surface::new(width, height, background, padding);
        self.title = config
            .get("title")
            .and_then(PropValue::as_str)
            .map(str::to_owned);

        if let Some(title) = &self.title {
            self.surface.push_element(&format!(
                r##"<text x="{x}" y="32" font-size="20" font-weight="bold" fill="#1f2328" text-anchor="middle">{title}</text>"##,
                x = f64::from(width) / 2.0,
                title = escape_html(title),
            ));
        }
    }
}

/// Read a pixel dimension from config, falling back when absent or out
/// of range.
fn dimension(config: &Props, key: &str, default: u32) -> u32 {
    let value = config.get(key).and_then(PropValue::as_f64);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let resolved = match value {
        Some(v) if (1.0..=16_384.0).contains(&v) => v.round() as u32,
        _ => default,
    };
    resolved
}

impl DocumentRenderer for RasterBackend {
    fn engine_name(&self) -> &'static str {
        ENGINE
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }

    fn supported_components(&self) -> Vec<String> {
        self.registry.tags()
    }

    fn render_spec(&mut self, spec: &RenderSpec) -> Result<RenderedDocument, RenderError> {
        check_engine(spec, ENGINE)?;
        let config = Props::merged(&self.base_config, &spec.config);
        self.apply_global_config(&config);

        let pass = self.registry.render_all(&spec.components, &mut self.surface);

        let png = self.surface.rasterize().map_err(|message| {
            RenderError::Backend {
                engine: ENGINE,
                message,
            }
        })?;
        let encoded = BASE64.encode(&png);

        let title = self.title.as_deref().unwrap_or("Figure");
        let mut page = HtmlPage::new(title);
        page.style(
            "body { font-family: sans-serif; margin: 2rem; }\n\
             figure { margin: 0; }\n\
             img { max-width: 100%; height: auto; }",
        );
        page.body(&format!(
            r#"<figure class="figure"><img src="data:image/png;base64,{encoded}" alt="{}"></figure>"#,
            escape_html(title),
        ));

        let path = output_path(&self.output_dir, &spec.filename, self.file_extension());
        write_output(&path, page.finish().as_bytes())?;
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

    fn shape() -> ComponentSpec {
        ComponentSpec::new(
            "Shape",
            Props::new()
                .with("kind", "rect")
                .with("x", 10.0)
                .with("y", 10.0)
                .with("width", 50.0)
                .with("height", 20.0),
        )
    }

    #[test]
    fn test_renders_embedded_png_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = RasterBackend::new(dir.path(), &Props::new());

        let spec = RenderSpec::new(ENGINE, "figure")
            .with_config(Props::new().with("title", "Layout"))
            .with_components(vec![shape()]);
        let doc = backend.render_spec(&spec).unwrap();

        assert_eq!(doc.path, dir.path().join("figure.html"));
        let html = std::fs::read_to_string(&doc.path).unwrap();
        assert!(html.contains("data:image/png;base64,"));
        assert!(html.contains(r#"alt="Layout""#));
        assert!(html.contains("<title>Layout</title>"));
    }

    #[test]
    fn test_config_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = RasterBackend::new(dir.path(), &Props::new());

        let spec = RenderSpec::new(ENGINE, "small")
            .with_config(Props::new().with("width", 64i64).with("height", 32i64))
            .with_components(vec![shape()]);
        backend.render_spec(&spec).unwrap();

        assert_eq!(backend.surface.width(), 64);
        assert_eq!(backend.surface.height(), 32);
    }

    #[test]
    fn test_failed_component_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = RasterBackend::new(dir.path(), &Props::new());

        let spec = RenderSpec::new(ENGINE, "partial").with_components(vec![
            ComponentSpec::new("Shape", Props::new().with("kind", "star")),
            shape(),
        ]);
        let doc = backend.render_spec(&spec).unwrap();

        assert_eq!(doc.warnings.len(), 1);
        assert!(doc.warnings[0].contains("unknown shape kind"));
        assert!(doc.path.exists());
    }

    #[test]
    fn test_surface_reset_between_documents() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = RasterBackend::new(dir.path(), &Props::new());

        let first = RenderSpec::new(ENGINE, "a")
            .with_config(Props::new().with("title", "First"))
            .with_components(vec![shape()]);
        backend.render_spec(&first).unwrap();

        let second = RenderSpec::new(ENGINE, "b").with_components(vec![shape()]);
        backend.render_spec(&second).unwrap();

        // Title from the first document must not leak into the second.
        assert!(!backend.surface.to_svg().contains("First"));
    }

    #[test]
    fn test_engine_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = RasterBackend::new(dir.path(), &Props::new());
        let err = backend
            .render_spec(&RenderSpec::new("tables", "x"))
            .unwrap_err();
        assert!(matches!(err, RenderError::EngineMismatch { .. }));
    }
}
