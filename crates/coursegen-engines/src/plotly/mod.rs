//! Interactive-chart backend.
//!
//! Produces a self-contained HTML page embedding the chart data and layout
//! as JSON plus a script-runtime reference to plotly.js. Traces accumulate
//! on the canvas in document order; interactive controls accumulate
//! separately and are merged into the layout only at persistence time, as
//! are subplot grid settings.

mod components;

use std::path::{Path, PathBuf};

use coursegen_render::{
    Component, ComponentRegistry, DocumentRenderer, HtmlPage, RenderContext, RenderError,
    RenderedDocument, check_engine, output_path, write_output,
};
use coursegen_spec::{PropValue, Props, RenderSpec};
use serde_json::json;

const ENGINE: &str = "plotly";

/// Script runtime reference embedded in every produced page.
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// An accumulated interactive control, merged into the layout at
/// persistence time.
pub struct Control {
    /// Control family: `dropdown`, `buttons`, or `slider`.
    pub kind: String,
    /// The control's layout entry.
    pub spec: PropValue,
}

/// Per-pass accumulation state for the chart backend.
#[derive(Default)]
pub struct ChartCanvas {
    /// Trace maps, in document order.
    pub traces: Vec<PropValue>,
    /// Controls, kept apart from traces until persistence.
    pub controls: Vec<Control>,
    /// Subplot grid (rows, cols), when declared.
    pub grid: Option<(u32, u32)>,
    /// Free-form per-pass store.
    pub context: RenderContext,
}

impl ChartCanvas {
    /// Axis name pair for a 1-based subplot cell index.
    #[must_use]
    pub fn axis_names(cell: u32) -> (String, String) {
        if cell <= 1 {
            ("x".to_owned(), "y".to_owned())
        } else {
            (format!("x{cell}"), format!("y{cell}"))
        }
    }
}

/// Interactive-chart backend producing `.html` pages.
pub struct PlotlyBackend {
    output_dir: PathBuf,
    base_config: Props,
    registry: ComponentRegistry<ChartCanvas>,
    canvas: ChartCanvas,
}

impl PlotlyBackend {
    /// Create a backend writing into `output_dir` with backend-wide config.
    #[must_use]
    pub fn new(output_dir: &Path, config: &Props) -> Self {
        let mut registry = ComponentRegistry::new();
        components::register_builtins(&mut registry);
        Self {
            output_dir: output_dir.to_path_buf(),
            base_config: config.clone(),
            registry,
            canvas: ChartCanvas::default(),
        }
    }

    /// Add or override a component implementation on this backend.
    pub fn register_component(&mut self, component: impl Component<ChartCanvas> + 'static) {
        self.registry.register(component);
    }

    /// Reset accumulation state for a new document.
    fn apply_global_config(&mut self) {
        self.canvas = ChartCanvas::default();
    }

    fn layout(&self, config: &Props) -> serde_json::Value {
        let mut layout = serde_json::Map::new();
        if let Some(title) = config.get("title").and_then(PropValue::as_str) {
            layout.insert("title".to_owned(), json!({ "text": title }));
        }
        if let Some(width) = config.get("width").and_then(PropValue::as_f64) {
            layout.insert("width".to_owned(), json!(width));
        }
        if let Some(height) = config.get("height").and_then(PropValue::as_f64) {
            layout.insert("height".to_owned(), json!(height));
        }
        if let Some(theme) = config.get("theme").and_then(PropValue::as_str) {
            let template = match theme {
                "dark" => "plotly_dark",
                "white" => "plotly_white",
                other => other,
            };
            layout.insert("template".to_owned(), json!(template));
        }
        if let Some((rows, cols)) = self.canvas.grid {
            layout.insert(
                "grid".to_owned(),
                json!({ "rows": rows, "columns": cols, "pattern": "independent" }),
            );
        }
        serde_json::Value::Object(layout)
    }

    /// Fold accumulated controls into the layout.
    fn merge_controls(&self, layout: &mut serde_json::Value) -> Result<(), RenderError> {
        let mut updatemenus = Vec::new();
        let mut sliders = Vec::new();
        for control in &self.canvas.controls {
            let spec = to_json(&control.spec)?;
            if control.kind == "slider" {
                sliders.push(spec);
            } else {
                updatemenus.push(spec);
            }
        }
        if let Some(object) = layout.as_object_mut() {
            if !updatemenus.is_empty() {
                object.insert("updatemenus".to_owned(), serde_json::Value::Array(updatemenus));
            }
            if !sliders.is_empty() {
                object.insert("sliders".to_owned(), serde_json::Value::Array(sliders));
            }
        }
        Ok(())
    }
}

fn to_json(value: &PropValue) -> Result<serde_json::Value, RenderError> {
    serde_json::to_value(value).map_err(|err| RenderError::Backend {
        engine: ENGINE,
        message: format!("serializing chart payload: {err}"),
    })
}

impl DocumentRenderer for PlotlyBackend {
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
        self.apply_global_config();

        let pass = self.registry.render_all(&spec.components, &mut self.canvas);

        let data = to_json(&PropValue::List(self.canvas.traces.clone()))?;
        let mut layout = self.layout(&config);
        self.merge_controls(&mut layout)?;

        let title = config
            .get("title")
            .and_then(PropValue::as_str)
            .unwrap_or("Chart");
        let mut page = HtmlPage::new(title);
        page.head(&format!(r#"<script src="{PLOTLY_CDN}"></script>"#));
        page.style("body { margin: 0; } #chart { width: 100%; height: 100vh; }");
        page.body(r#"<div id="chart"></div>"#);
        page.script(&format!(
            "const data = {data};\nconst layout = {layout};\nPlotly.newPlot(\"chart\", data, layout, {{ responsive: true }});"
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

    fn series(name: &str) -> ComponentSpec {
        ComponentSpec::new(
            "Series",
            Props::new()
                .with("kind", "line")
                .with("name", name)
                .with("y", vec![PropValue::Int(1), PropValue::Int(2)]),
        )
    }

    #[test]
    fn test_page_embeds_data_and_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = PlotlyBackend::new(dir.path(), &Props::new());

        let spec = RenderSpec::new(ENGINE, "chart")
            .with_config(Props::new().with("title", "Growth"))
            .with_components(vec![series("revenue")]);
        let doc = backend.render_spec(&spec).unwrap();

        let html = std::fs::read_to_string(&doc.path).unwrap();
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains(r#""name":"revenue""#));
        assert!(html.contains(r#""mode":"lines""#));
        assert!(html.contains(r#""text":"Growth""#));
        assert!(html.contains("Plotly.newPlot"));
    }

    #[test]
    fn test_controls_merged_at_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = PlotlyBackend::new(dir.path(), &Props::new());

        let entries = vec![PropValue::Map(
            [("label".to_owned(), PropValue::from("Show"))]
                .into_iter()
                .collect(),
        )];
        let control = ComponentSpec::new(
            "Control",
            Props::new().with("kind", "dropdown").with("entries", entries),
        );
        let spec =
            RenderSpec::new(ENGINE, "chart").with_components(vec![series("a"), control]);
        let doc = backend.render_spec(&spec).unwrap();

        let html = std::fs::read_to_string(&doc.path).unwrap();
        assert!(html.contains(r#""updatemenus""#));
        assert!(html.contains(r#""label":"Show""#));
    }

    #[test]
    fn test_grid_in_layout() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = PlotlyBackend::new(dir.path(), &Props::new());

        let grid = ComponentSpec::new(
            "Grid",
            Props::new().with("rows", 2i64).with("cols", 2i64),
        );
        let spec = RenderSpec::new(ENGINE, "chart").with_components(vec![grid, series("a")]);
        backend.render_spec(&spec).unwrap();

        let html = std::fs::read_to_string(dir.path().join("chart.html")).unwrap();
        assert!(html.contains(r#""pattern":"independent""#));
        assert!(html.contains(r#""rows":2"#));
    }

    #[test]
    fn test_theme_template() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = PlotlyBackend::new(dir.path(), &Props::new());

        let spec = RenderSpec::new(ENGINE, "chart")
            .with_config(Props::new().with("theme", "dark"))
            .with_components(vec![series("a")]);
        backend.render_spec(&spec).unwrap();

        let html = std::fs::read_to_string(dir.path().join("chart.html")).unwrap();
        assert!(html.contains(r#""template":"plotly_dark""#));
    }

    #[test]
    fn test_state_reset_between_documents() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = PlotlyBackend::new(dir.path(), &Props::new());

        let first = RenderSpec::new(ENGINE, "a").with_components(vec![series("one")]);
        let second = RenderSpec::new(ENGINE, "b").with_components(vec![series("two")]);
        backend.render_spec(&first).unwrap();
        backend.render_spec(&second).unwrap();

        let html = std::fs::read_to_string(dir.path().join("b.html")).unwrap();
        assert!(!html.contains(r#""name":"one""#));
        assert!(html.contains(r#""name":"two""#));
    }

    #[test]
    fn test_failed_series_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = PlotlyBackend::new(dir.path(), &Props::new());

        let bad = ComponentSpec::new("Series", Props::new().with("kind", "line"));
        let spec = RenderSpec::new(ENGINE, "chart").with_components(vec![bad, series("ok")]);
        let doc = backend.render_spec(&spec).unwrap();

        assert_eq!(doc.warnings.len(), 1);
        let html = std::fs::read_to_string(&doc.path).unwrap();
        assert!(html.contains(r#""name":"ok""#));
    }
}
