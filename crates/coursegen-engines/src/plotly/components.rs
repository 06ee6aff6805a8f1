//! Built-in interactive-chart components.

use std::collections::BTreeMap;

use coursegen_render::{CHILDREN_PROP, Component, ComponentError, ComponentRegistry};
use coursegen_spec::{PropValue, Props};

use super::{ChartCanvas, Control};

pub(super) fn register_builtins(registry: &mut ComponentRegistry<ChartCanvas>) {
    registry.register(Series);
    registry.register(Grid);
    registry.register(ControlComponent);
    registry.register(Dashboard);
}

fn map_value(entries: Vec<(&str, PropValue)>) -> PropValue {
    PropValue::Map(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect(),
    )
}

fn positive_u32(props: &Props, key: &str) -> Result<u32, ComponentError> {
    let raw = props.i64_prop(key)?;
    u32::try_from(raw)
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| ComponentError::render(format!("`{key}` must be a positive integer")))
}

/// One data series; the fragment is the trace's index on the canvas so
/// composites can reposition it.
struct Series;

impl Component<ChartCanvas> for Series {
    fn tag(&self) -> &'static str {
        "Series"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["kind"]
    }

    fn render(
        &self,
        props: &Props,
        canvas: &mut ChartCanvas,
    ) -> Result<PropValue, ComponentError> {
        let kind = props.str_prop("kind")?;
        let mut trace: BTreeMap<String, PropValue> = BTreeMap::new();

        match kind {
            "scatter" | "line" => {
                let y = props.list_prop("y")?.to_vec();
                trace.insert("x".to_owned(), PropValue::List(x_or_indices(props, y.len())?));
                trace.insert("y".to_owned(), PropValue::List(y));
                trace.insert("type".to_owned(), PropValue::from("scatter"));
                let mode = props
                    .opt_str("mode")?
                    .unwrap_or(if kind == "line" { "lines" } else { "markers" });
                trace.insert("mode".to_owned(), PropValue::from(mode));
            }
            "bar" => {
                let y = props.list_prop("y")?.to_vec();
                trace.insert("x".to_owned(), PropValue::List(x_or_indices(props, y.len())?));
                trace.insert("y".to_owned(), PropValue::List(y));
                trace.insert("type".to_owned(), PropValue::from("bar"));
            }
            "pie" => {
                trace.insert(
                    "labels".to_owned(),
                    PropValue::List(props.list_prop("labels")?.to_vec()),
                );
                trace.insert(
                    "values".to_owned(),
                    PropValue::List(props.list_prop("values")?.to_vec()),
                );
                trace.insert("type".to_owned(), PropValue::from("pie"));
            }
            other => {
                return Err(ComponentError::render(format!(
                    "unknown series kind `{other}`"
                )));
            }
        }

        if let Some(name) = props.opt_str("name")? {
            trace.insert("name".to_owned(), PropValue::from(name));
        }

        if props.contains("row") || props.contains("col") {
            let Some((_, cols)) = canvas.grid else {
                return Err(ComponentError::render(
                    "`row`/`col` placement requires a Grid component first",
                ));
            };
            let row = positive_u32(props, "row")?;
            let col = positive_u32(props, "col")?;
            let cell = (row - 1) * cols + col;
            let (x_axis, y_axis) = ChartCanvas::axis_names(cell);
            trace.insert("xaxis".to_owned(), PropValue::String(x_axis));
            trace.insert("yaxis".to_owned(), PropValue::String(y_axis));
        }

        canvas.traces.push(PropValue::Map(trace));
        let index = i64::try_from(canvas.traces.len() - 1)
            .map_err(|_| ComponentError::render("trace index overflow"))?;
        Ok(PropValue::Int(index))
    }
}

/// Default x values are the point indices.
fn x_or_indices(props: &Props, len: usize) -> Result<Vec<PropValue>, ComponentError> {
    match props.opt_list("x")? {
        Some(x) => Ok(x.to_vec()),
        None => (0..len)
            .map(|i| {
                i64::try_from(i)
                    .map(PropValue::Int)
                    .map_err(|_| ComponentError::render("series too long"))
            })
            .collect(),
    }
}

/// Declares a rows × cols subplot grid.
struct Grid;

impl Component<ChartCanvas> for Grid {
    fn tag(&self) -> &'static str {
        "Grid"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["rows", "cols"]
    }

    fn render(
        &self,
        props: &Props,
        canvas: &mut ChartCanvas,
    ) -> Result<PropValue, ComponentError> {
        canvas.grid = Some((positive_u32(props, "rows")?, positive_u32(props, "cols")?));
        Ok(PropValue::Null)
    }
}

/// Interactive control, accumulated apart from the traces.
struct ControlComponent;

impl Component<ChartCanvas> for ControlComponent {
    fn tag(&self) -> &'static str {
        "Control"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["kind", "entries"]
    }

    fn render(
        &self,
        props: &Props,
        canvas: &mut ChartCanvas,
    ) -> Result<PropValue, ComponentError> {
        let kind = props.str_prop("kind")?;
        if !matches!(kind, "dropdown" | "buttons" | "slider") {
            return Err(ComponentError::render(format!(
                "unknown control kind `{kind}`"
            )));
        }

        let entries: Vec<PropValue> = props
            .list_prop("entries")?
            .iter()
            .map(control_entry)
            .collect::<Result<_, _>>()?;

        let spec = if kind == "slider" {
            map_value(vec![("steps", PropValue::List(entries))])
        } else {
            map_value(vec![
                ("type", PropValue::from(kind)),
                ("buttons", PropValue::List(entries)),
            ])
        };

        canvas.controls.push(Control {
            kind: kind.to_owned(),
            spec,
        });
        Ok(PropValue::Null)
    }
}

/// Normalize one control entry: `label` required, `method` defaults to
/// `restyle`, `args` to an empty list.
fn control_entry(entry: &PropValue) -> Result<PropValue, ComponentError> {
    let PropValue::Map(map) = entry else {
        return Err(ComponentError::render(format!(
            "control entry must be a map, got {}",
            entry.kind()
        )));
    };

    let Some(PropValue::String(label)) = map.get("label") else {
        return Err(ComponentError::render("control entry is missing `label`"));
    };
    let method = match map.get("method") {
        Some(PropValue::String(method)) => method.clone(),
        _ => "restyle".to_owned(),
    };
    let args = match map.get("args") {
        Some(PropValue::List(args)) => args.clone(),
        _ => Vec::new(),
    };

    Ok(map_value(vec![
        ("label", PropValue::from(label.clone())),
        ("method", PropValue::String(method)),
        ("args", PropValue::List(args)),
    ]))
}

/// Composite laying out child series on an auto-sized subplot grid,
/// row-major.
struct Dashboard;

impl Component<ChartCanvas> for Dashboard {
    fn tag(&self) -> &'static str {
        "Dashboard"
    }

    fn render(
        &self,
        props: &Props,
        canvas: &mut ChartCanvas,
    ) -> Result<PropValue, ComponentError> {
        let children = props.opt_list(CHILDREN_PROP)?.unwrap_or_default();
        let indices: Vec<usize> = children
            .iter()
            .filter_map(|fragment| match fragment {
                PropValue::Int(index) => usize::try_from(*index).ok(),
                _ => None,
            })
            .collect();
        if indices.is_empty() {
            return Err(ComponentError::render("Dashboard requires Series children"));
        }

        let count = u32::try_from(indices.len())
            .map_err(|_| ComponentError::render("too many dashboard panels"))?;
        let cols = match props.opt_i64("cols")? {
            Some(_) => positive_u32(props, "cols")?,
            None => near_square_cols(count),
        };
        let rows = match props.opt_i64("rows")? {
            Some(_) => positive_u32(props, "rows")?,
            None => count.div_ceil(cols),
        };
        if rows * cols < count {
            return Err(ComponentError::render(format!(
                "{rows}x{cols} grid cannot hold {count} panels"
            )));
        }
        canvas.grid = Some((rows, cols));

        for (cell, index) in (1..).zip(&indices) {
            let Some(PropValue::Map(trace)) = canvas.traces.get_mut(*index) else {
                return Err(ComponentError::render("dashboard child is not a trace"));
            };
            let (x_axis, y_axis) = ChartCanvas::axis_names(cell);
            trace.insert("xaxis".to_owned(), PropValue::String(x_axis));
            trace.insert("yaxis".to_owned(), PropValue::String(y_axis));
        }

        Ok(PropValue::Null)
    }
}

/// Smallest column count whose square covers `count` panels.
fn near_square_cols(count: u32) -> u32 {
    let mut cols = 1;
    while cols * cols < count {
        cols += 1;
    }
    cols
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(
        component: &dyn Component<ChartCanvas>,
        props: &Props,
        canvas: &mut ChartCanvas,
    ) -> Result<PropValue, ComponentError> {
        component.render(props, canvas)
    }

    fn get<'a>(trace: &'a PropValue, key: &str) -> Option<&'a PropValue> {
        match trace {
            PropValue::Map(map) => map.get(key),
            _ => None,
        }
    }

    #[test]
    fn test_line_series_defaults() {
        let mut canvas = ChartCanvas::default();
        let props = Props::new()
            .with("kind", "line")
            .with("y", vec![PropValue::Int(5), PropValue::Int(7)]);
        let fragment = render(&Series, &props, &mut canvas).unwrap();

        assert_eq!(fragment, PropValue::Int(0));
        let trace = &canvas.traces[0];
        assert_eq!(get(trace, "type"), Some(&PropValue::from("scatter")));
        assert_eq!(get(trace, "mode"), Some(&PropValue::from("lines")));
        // x defaults to point indices.
        assert_eq!(
            get(trace, "x"),
            Some(&PropValue::List(vec![PropValue::Int(0), PropValue::Int(1)]))
        );
    }

    #[test]
    fn test_pie_series_requires_labels_and_values() {
        let mut canvas = ChartCanvas::default();
        let props = Props::new().with("kind", "pie");
        assert!(render(&Series, &props, &mut canvas).is_err());

        let props = props
            .with("labels", vec![PropValue::from("a")])
            .with("values", vec![PropValue::Int(1)]);
        render(&Series, &props, &mut canvas).unwrap();
        assert_eq!(get(&canvas.traces[0], "type"), Some(&PropValue::from("pie")));
    }

    #[test]
    fn test_unknown_series_kind() {
        let mut canvas = ChartCanvas::default();
        let props = Props::new().with("kind", "violin");
        let err = render(&Series, &props, &mut canvas).unwrap_err();
        assert!(err.to_string().contains("unknown series kind"));
    }

    #[test]
    fn test_row_col_requires_grid() {
        let mut canvas = ChartCanvas::default();
        let props = Props::new()
            .with("kind", "bar")
            .with("y", vec![PropValue::Int(1)])
            .with("row", 1i64)
            .with("col", 2i64);
        let err = render(&Series, &props, &mut canvas).unwrap_err();
        assert!(err.to_string().contains("requires a Grid"));

        canvas.grid = Some((2, 2));
        render(&Series, &props, &mut canvas).unwrap();
        assert_eq!(get(&canvas.traces[0], "xaxis"), Some(&PropValue::from("x2")));
        assert_eq!(get(&canvas.traces[0], "yaxis"), Some(&PropValue::from("y2")));
    }

    #[test]
    fn test_control_entry_defaults() {
        let mut canvas = ChartCanvas::default();
        let entries = vec![PropValue::Map(
            [("label".to_owned(), PropValue::from("All"))]
                .into_iter()
                .collect(),
        )];
        let props = Props::new().with("kind", "dropdown").with("entries", entries);
        render(&ControlComponent, &props, &mut canvas).unwrap();

        assert_eq!(canvas.controls.len(), 1);
        assert_eq!(canvas.controls[0].kind, "dropdown");
        let PropValue::Map(spec) = &canvas.controls[0].spec else {
            panic!("expected map");
        };
        let Some(PropValue::List(buttons)) = spec.get("buttons") else {
            panic!("expected buttons");
        };
        assert_eq!(
            get(&buttons[0], "method"),
            Some(&PropValue::from("restyle"))
        );
    }

    #[test]
    fn test_slider_control_uses_steps() {
        let mut canvas = ChartCanvas::default();
        let entries = vec![PropValue::Map(
            [("label".to_owned(), PropValue::from("t=0"))]
                .into_iter()
                .collect(),
        )];
        let props = Props::new().with("kind", "slider").with("entries", entries);
        render(&ControlComponent, &props, &mut canvas).unwrap();

        let PropValue::Map(spec) = &canvas.controls[0].spec else {
            panic!("expected map");
        };
        assert!(spec.contains_key("steps"));
    }

    #[test]
    fn test_dashboard_assigns_cells_row_major() {
        let mut canvas = ChartCanvas::default();
        for name in ["a", "b", "c"] {
            let props = Props::new()
                .with("kind", "line")
                .with("name", name)
                .with("y", vec![PropValue::Int(1)]);
            render(&Series, &props, &mut canvas).unwrap();
        }

        let props = Props::new().with(
            CHILDREN_PROP,
            vec![PropValue::Int(0), PropValue::Int(1), PropValue::Int(2)],
        );
        render(&Dashboard, &props, &mut canvas).unwrap();

        // Three panels on a 2x2 near-square grid.
        assert_eq!(canvas.grid, Some((2, 2)));
        assert_eq!(get(&canvas.traces[0], "xaxis"), Some(&PropValue::from("x")));
        assert_eq!(get(&canvas.traces[1], "xaxis"), Some(&PropValue::from("x2")));
        assert_eq!(get(&canvas.traces[2], "xaxis"), Some(&PropValue::from("x3")));
    }

    #[test]
    fn test_dashboard_explicit_grid_too_small() {
        let mut canvas = ChartCanvas::default();
        for _ in 0..3 {
            let props = Props::new()
                .with("kind", "line")
                .with("y", vec![PropValue::Int(1)]);
            render(&Series, &props, &mut canvas).unwrap();
        }
        let props = Props::new()
            .with("rows", 1i64)
            .with("cols", 2i64)
            .with(
                CHILDREN_PROP,
                vec![PropValue::Int(0), PropValue::Int(1), PropValue::Int(2)],
            );
        let err = render(&Dashboard, &props, &mut canvas).unwrap_err();
        assert!(err.to_string().contains("cannot hold"));
    }

    #[test]
    fn test_dashboard_without_children() {
        let mut canvas = ChartCanvas::default();
        let err = render(&Dashboard, &Props::new(), &mut canvas).unwrap_err();
        assert!(err.to_string().contains("requires Series children"));
    }
}
