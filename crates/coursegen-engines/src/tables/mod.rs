//! Tabular-HTML backend.
//!
//! Renders table-variant components into one themed HTML page. Components
//! append their rendered fragments to the canvas's accumulating table
//! list; multiple tables coexist on one page. The page theme is resolved
//! once when global config is applied.

mod components;

use std::path::{Path, PathBuf};

use coursegen_render::{
    Component, ComponentRegistry, DocumentRenderer, HtmlPage, RenderContext, RenderError,
    RenderedDocument, check_engine, escape_html, output_path, write_output,
};
use coursegen_spec::{PropValue, Props, RenderSpec};

const ENGINE: &str = "tables";

/// Page theme, resolved once at global-config time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light bordered tables.
    #[default]
    Default,
    /// Dark background, light text.
    Dark,
    /// Borderless, whitespace-separated.
    Minimal,
}

impl Theme {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::Default),
            "dark" => Some(Self::Dark),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    fn css(self) -> &'static str {
        match self {
            Self::Default => {
                "body { font-family: sans-serif; margin: 2rem; color: #1f2328; }\n\
                 table { border-collapse: collapse; margin-bottom: 1.5rem; }\n\
                 th, td { border: 1px solid #d0d7de; padding: 0.4rem 0.8rem; text-align: left; }\n\
                 th { background: #f6f8fa; }\n\
                 caption { caption-side: top; font-weight: bold; padding: 0.4rem 0; text-align: left; }"
            }
            Self::Dark => {
                "body { font-family: sans-serif; margin: 2rem; background: #0d1117; color: #e6edf3; }\n\
                 table { border-collapse: collapse; margin-bottom: 1.5rem; }\n\
                 th, td { border: 1px solid #30363d; padding: 0.4rem 0.8rem; text-align: left; }\n\
                 th { background: #161b22; }\n\
                 caption { caption-side: top; font-weight: bold; padding: 0.4rem 0; text-align: left; }"
            }
            Self::Minimal => {
                "body { font-family: sans-serif; margin: 2rem; color: #1f2328; }\n\
                 table { border-collapse: collapse; margin-bottom: 1.5rem; }\n\
                 th, td { padding: 0.3rem 1rem 0.3rem 0; text-align: left; }\n\
                 th { border-bottom: 2px solid #1f2328; }\n\
                 caption { caption-side: top; font-weight: bold; padding: 0.4rem 0; text-align: left; }"
            }
        }
    }
}

/// Click-to-sort and live-filter behavior for `DataTable` components.
const TABLE_SCRIPT: &str = r#"function sortTable(th) {
  const table = th.closest("table");
  const tbody = table.tBodies[0];
  const index = Array.prototype.indexOf.call(th.parentNode.children, th);
  const ascending = th.dataset.dir !== "asc";
  th.dataset.dir = ascending ? "asc" : "desc";
  const rows = Array.from(tbody.rows);
  rows.sort((a, b) => {
    const x = a.cells[index].textContent.trim();
    const y = b.cells[index].textContent.trim();
    const nx = parseFloat(x), ny = parseFloat(y);
    const cmp = (!isNaN(nx) && !isNaN(ny)) ? nx - ny : x.localeCompare(y);
    return ascending ? cmp : -cmp;
  });
  rows.forEach(row => tbody.appendChild(row));
}
function filterTable(input) {
  const table = document.getElementById(input.dataset.target);
  const needle = input.value.toLowerCase();
  Array.from(table.tBodies[0].rows).forEach(row => {
    row.style.display = row.textContent.toLowerCase().includes(needle) ? "" : "none";
  });
}"#;

/// Per-pass accumulation state for the tables backend.
#[derive(Default)]
pub struct TableCanvas {
    /// Rendered table fragments, in document order.
    pub fragments: Vec<String>,
    /// Set when any table on the page needs the sort/filter script.
    pub wants_script: bool,
    /// Free-form per-pass store (table id counters).
    pub context: RenderContext,
}

/// Tabular-HTML backend producing `.html` pages of styled tables.
pub struct TablesBackend {
    output_dir: PathBuf,
    base_config: Props,
    registry: ComponentRegistry<TableCanvas>,
    canvas: TableCanvas,
    theme: Theme,
}

impl TablesBackend {
    /// Create a backend writing into `output_dir` with backend-wide config.
    #[must_use]
    pub fn new(output_dir: &Path, config: &Props) -> Self {
        let mut registry = ComponentRegistry::new();
        components::register_builtins(&mut registry);
        Self {
            output_dir: output_dir.to_path_buf(),
            base_config: config.clone(),
            registry,
            canvas: TableCanvas::default(),
            theme: Theme::default(),
        }
    }

    /// Add or override a component implementation on this backend.
    pub fn register_component(&mut self, component: impl Component<TableCanvas> + 'static) {
        self.registry.register(component);
    }

    /// Reset accumulation state and resolve the theme for a new document.
    fn apply_global_config(&mut self, config: &Props) {
        self.canvas = TableCanvas::default();
        self.theme = match config.get("theme").and_then(PropValue::as_str) {
            Some(name) => Theme::parse(name).unwrap_or_else(|| {
                tracing::warn!(theme = %name, "unknown table theme; using default");
                Theme::default()
            }),
            None => Theme::default(),
        };
    }
}

impl DocumentRenderer for TablesBackend {
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

        let pass = self.registry.render_all(&spec.components, &mut self.canvas);

        let title = config
            .get("title")
            .and_then(PropValue::as_str)
            .unwrap_or("Tables");
        let mut page = HtmlPage::new(title);
        page.style(self.theme.css());
        if config.contains("title") {
            page.body(&format!("<h1>{}</h1>", escape_html(title)));
        }
        for table in &self.canvas.fragments {
            page.body(table);
        }
        if self.canvas.wants_script {
            page.script(TABLE_SCRIPT);
        }

        let path = output_path(&self.output_dir, &spec.filename, self.file_extension());
        write_output(&path, page.finish().as_bytes())?;
        Ok(RenderedDocument {
            path,
            warnings: pass.warnings,
        })
    }
}
