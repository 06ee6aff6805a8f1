//! Built-in drawing components.

use std::fmt::Write;

use coursegen_render::{Component, ComponentError, ComponentRegistry, escape_html};
use coursegen_spec::{PropValue, Props};

use super::surface::Surface;

/// Series colors cycled by `Plot` components without an explicit color.
const PALETTE: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];

pub(super) fn register_builtins(registry: &mut ComponentRegistry<Surface>) {
    registry.register(Shape);
    registry.register(Text);
    registry.register(Axis);
    registry.register(Plot);
    registry.register(Legend);
    registry.register(Annotation);
}

fn fmt_num(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round())
            .trim_end_matches(".0")
            .trim_end_matches('.')
            .to_owned()
    } else {
        format!("{value:.2}")
    }
}

/// Primitive vector shape.
struct Shape;

impl Component<Surface> for Shape {
    fn tag(&self) -> &'static str {
        "Shape"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["kind"]
    }

    fn default_props(&self) -> Props {
        Props::new()
            .with("fill", "#1f77b4")
            .with("stroke", "none")
            .with("stroke_width", 1.0)
            .with("opacity", 1.0)
    }

    fn render(&self, props: &Props, canvas: &mut Surface) -> Result<PropValue, ComponentError> {
        let kind = props.str_prop("kind")?;
        let fill = props.str_prop("fill")?;
        let stroke = props.str_prop("stroke")?;
        let stroke_width = props.f64_prop("stroke_width")?;
        let opacity = props.f64_prop("opacity")?;
        let paint = format!(
            r#"fill="{fill}" stroke="{stroke}" stroke-width="{stroke_width}" opacity="{opacity}""#
        );

        let element = match kind {
            "rect" => format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" {paint}/>"#,
                props.f64_prop("x")?,
                props.f64_prop("y")?,
                props.f64_prop("width")?,
                props.f64_prop("height")?,
            ),
            "circle" => format!(
                r#"<circle cx="{}" cy="{}" r="{}" {paint}/>"#,
                props.f64_prop("cx")?,
                props.f64_prop("cy")?,
                props.f64_prop("r")?,
            ),
            "ellipse" => format!(
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" {paint}/>"#,
                props.f64_prop("cx")?,
                props.f64_prop("cy")?,
                props.f64_prop("rx")?,
                props.f64_prop("ry")?,
            ),
            "line" => {
                let stroke = if stroke == "none" { "#1f2328" } else { stroke };
                format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{stroke_width}" opacity="{opacity}"/>"#,
                    props.f64_prop("x1")?,
                    props.f64_prop("y1")?,
                    props.f64_prop("x2")?,
                    props.f64_prop("y2")?,
                )
            }
            other => {
                return Err(ComponentError::render(format!(
                    "unknown shape kind `{other}`"
                )));
            }
        };

        canvas.push_element(&element);
        Ok(PropValue::Null)
    }
}

/// Free-standing text in pixel coordinates.
struct Text;

impl Component<Surface> for Text {
    fn tag(&self) -> &'static str {
        "Text"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["content", "x", "y"]
    }

    fn default_props(&self) -> Props {
        Props::new()
            .with("size", 14.0)
            .with("color", "#1f2328")
            .with("anchor", "start")
            .with("weight", "normal")
    }

    fn render(&self, props: &Props, canvas: &mut Surface) -> Result<PropValue, ComponentError> {
        canvas.push_element(&format!(
            r#"<text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="{}" font-weight="{}">{}</text>"#,
            props.f64_prop("x")?,
            props.f64_prop("y")?,
            props.f64_prop("size")?,
            props.str_prop("color")?,
            props.str_prop("anchor")?,
            props.str_prop("weight")?,
            escape_html(props.str_prop("content")?),
        ));
        Ok(PropValue::Null)
    }
}

/// Axes with ticks; publishes the data domain for later plots.
struct Axis;

impl Component<Surface> for Axis {
    fn tag(&self) -> &'static str {
        "Axis"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["x_range", "y_range"]
    }

    fn default_props(&self) -> Props {
        Props::new().with("ticks", 5i64).with("color", "#1f2328")
    }

    fn render(&self, props: &Props, canvas: &mut Surface) -> Result<PropValue, ComponentError> {
        let (x_min, x_max) = range(props, "x_range")?;
        let (y_min, y_max) = range(props, "y_range")?;
        let ticks = props.i64_prop("ticks")?.max(2);
        let color = props.str_prop("color")?.to_owned();

        canvas.context.set("axis.x_min", x_min);
        canvas.context.set("axis.x_max", x_max);
        canvas.context.set("axis.y_min", y_min);
        canvas.context.set("axis.y_max", y_max);

        let area = canvas.plot_area();
        let bottom = area.y + area.height;
        let right = area.x + area.width;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<line x1="{x}" y1="{bottom}" x2="{right}" y2="{bottom}" stroke="{color}"/>"#,
            x = area.x,
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{x}" y1="{y}" x2="{x}" y2="{bottom}" stroke="{color}"/>"#,
            x = area.x,
            y = area.y,
        );

        for step in 0..ticks {
            #[allow(clippy::cast_precision_loss)]
            let t = step as f64 / (ticks - 1) as f64;

            let x_value = x_min + t * (x_max - x_min);
            let (px, _) = canvas.map_with_domain(x_value, y_min, (x_min, x_max), (y_min, y_max));
            let _ = writeln!(
                svg,
                r#"<line x1="{px}" y1="{bottom}" x2="{px}" y2="{tick_end}" stroke="{color}"/>"#,
                tick_end = bottom + 5.0,
            );
            let _ = writeln!(
                svg,
                r#"<text x="{px}" y="{ty}" font-size="11" fill="{color}" text-anchor="middle">{label}</text>"#,
                ty = bottom + 18.0,
                label = fmt_num(x_value),
            );

            let y_value = y_min + t * (y_max - y_min);
            let (_, py) = canvas.map_with_domain(x_min, y_value, (x_min, x_max), (y_min, y_max));
            let _ = writeln!(
                svg,
                r#"<line x1="{tick_start}" y1="{py}" x2="{x}" y2="{py}" stroke="{color}"/>"#,
                tick_start = area.x - 5.0,
                x = area.x,
            );
            let _ = writeln!(
                svg,
                r#"<text x="{tx}" y="{ty}" font-size="11" fill="{color}" text-anchor="end">{label}</text>"#,
                tx = area.x - 8.0,
                ty = py + 4.0,
                label = fmt_num(y_value),
            );
        }

        if let Some(label) = props.opt_str("x_label")? {
            let _ = writeln!(
                svg,
                r#"<text x="{cx}" y="{cy}" font-size="13" fill="{color}" text-anchor="middle">{}</text>"#,
                escape_html(label),
                cx = area.x + area.width / 2.0,
                cy = bottom + 38.0,
            );
        }
        if let Some(label) = props.opt_str("y_label")? {
            let cx = area.x - 40.0;
            let cy = area.y + area.height / 2.0;
            let _ = writeln!(
                svg,
                r#"<text x="{cx}" y="{cy}" font-size="13" fill="{color}" text-anchor="middle" transform="rotate(-90 {cx} {cy})">{}</text>"#,
                escape_html(label),
            );
        }

        canvas.push_element(&svg);
        Ok(PropValue::Null)
    }
}

fn range(props: &Props, key: &str) -> Result<(f64, f64), ComponentError> {
    let values = props.f64_list(key)?;
    match values.as_slice() {
        [min, max] if min < max => Ok((*min, *max)),
        _ => Err(ComponentError::render(format!(
            "`{key}` must be a [min, max] pair with min < max"
        ))),
    }
}

/// Data series drawn into the plot area.
struct Plot;

impl Component<Surface> for Plot {
    fn tag(&self) -> &'static str {
        "Plot"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["kind", "y"]
    }

    fn render(&self, props: &Props, canvas: &mut Surface) -> Result<PropValue, ComponentError> {
        let kind = props.str_prop("kind")?;
        let y = props.f64_list("y")?;
        if y.is_empty() {
            return Err(ComponentError::render("`y` must not be empty"));
        }
        let x = match props.opt_list("x")? {
            Some(_) => {
                let x = props.f64_list("x")?;
                if x.len() != y.len() {
                    return Err(ComponentError::render(format!(
                        "{} x values for {} y values",
                        x.len(),
                        y.len()
                    )));
                }
                x
            }
            #[allow(clippy::cast_precision_loss)]
            None => (0..y.len()).map(|i| i as f64).collect(),
        };

        let color = match props.opt_str("color")? {
            Some(color) => color.to_owned(),
            None => {
                let n = canvas.context.next_counter("plot.series");
                let index = usize::try_from(n - 1).unwrap_or(0) % PALETTE.len();
                PALETTE[index].to_owned()
            }
        };

        // Fall back to the series' own extent when no axis published one.
        let x_domain = domain_or_extent(canvas, "axis.x_min", "axis.x_max", &x);
        let y_domain = domain_or_extent(canvas, "axis.y_min", "axis.y_max", &y);

        let points: Vec<(f64, f64)> = x
            .iter()
            .zip(&y)
            .map(|(&px, &py)| canvas.map_with_domain(px, py, x_domain, y_domain))
            .collect();

        let mut svg = String::new();
        match kind {
            "line" => {
                let path: Vec<String> = points
                    .iter()
                    .map(|(px, py)| format!("{px:.2},{py:.2}"))
                    .collect();
                let _ = writeln!(
                    svg,
                    r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="2"/>"#,
                    path.join(" "),
                );
            }
            "scatter" => {
                for (px, py) in &points {
                    let _ = writeln!(
                        svg,
                        r#"<circle cx="{px:.2}" cy="{py:.2}" r="3" fill="{color}"/>"#
                    );
                }
            }
            "bar" => {
                let area = canvas.plot_area();
                #[allow(clippy::cast_precision_loss)]
                let slot = area.width / y.len() as f64;
                let width = slot * 0.6;
                let baseline_y = y_domain.0.max(0.0);
                for (&vx, &vy) in x.iter().zip(&y) {
                    let (px, py) = canvas.map_with_domain(vx, vy, x_domain, y_domain);
                    let (_, base) =
                        canvas.map_with_domain(vx, baseline_y, x_domain, y_domain);
                    let top = py.min(base);
                    let height = (base - py).abs();
                    let _ = writeln!(
                        svg,
                        r#"<rect x="{x}" y="{top:.2}" width="{width:.2}" height="{height:.2}" fill="{color}"/>"#,
                        x = px - width / 2.0,
                    );
                }
            }
            other => {
                return Err(ComponentError::render(format!(
                    "unknown plot kind `{other}`"
                )));
            }
        }

        canvas.push_element(&svg);

        if let Some(label) = props.opt_str("label")? {
            canvas.context.push(
                "legend",
                Props::new().with("label", label).with("color", color),
            );
        }
        Ok(PropValue::Null)
    }
}

fn domain_or_extent(
    canvas: &Surface,
    min_key: &str,
    max_key: &str,
    values: &[f64],
) -> (f64, f64) {
    match (canvas.context.get_f64(min_key), canvas.context.get_f64(max_key)) {
        (Some(min), Some(max)) => (min, max),
        _ => {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if (max - min).abs() < f64::EPSILON {
                (min - 1.0, max + 1.0)
            } else {
                (min, max)
            }
        }
    }
}

/// Legend box fed by the entries plots registered in the context.
struct Legend;

impl Component<Surface> for Legend {
    fn tag(&self) -> &'static str {
        "Legend"
    }

    fn default_props(&self) -> Props {
        Props::new().with("position", "top-right")
    }

    fn render(&self, props: &Props, canvas: &mut Surface) -> Result<PropValue, ComponentError> {
        let entries: Vec<(String, String)> = match canvas.context.get("legend") {
            Some(PropValue::List(items)) => items
                .iter()
                .filter_map(|item| match item {
                    PropValue::Map(map) => Some((
                        map.get("label")?.as_str()?.to_owned(),
                        map.get("color")?.as_str()?.to_owned(),
                    )),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        if entries.is_empty() {
            return Err(ComponentError::render(
                "no legend entries; labelled Plot components must come first",
            ));
        }

        let area = canvas.plot_area();
        let x0 = match props.str_prop("position")? {
            "top-left" => area.x + 12.0,
            _ => area.x + area.width - 130.0,
        };
        let y0 = area.y + 12.0;

        let mut svg = String::new();
        for (row, (label, color)) in entries.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let y = y0 + row as f64 * 20.0;
            let _ = writeln!(
                svg,
                r#"<rect x="{x0}" y="{y}" width="12" height="12" fill="{color}"/>"#
            );
            let _ = writeln!(
                svg,
                r##"<text x="{tx}" y="{ty}" font-size="12" fill="#1f2328">{}</text>"##,
                escape_html(label),
                tx = x0 + 18.0,
                ty = y + 10.0,
            );
        }
        canvas.push_element(&svg);
        Ok(PropValue::Null)
    }
}

/// Text callout at a data point, with an optional pointer line.
struct Annotation;

impl Component<Surface> for Annotation {
    fn tag(&self) -> &'static str {
        "Annotation"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["content", "x", "y"]
    }

    fn default_props(&self) -> Props {
        Props::new().with("color", "#d62728")
    }

    fn render(&self, props: &Props, canvas: &mut Surface) -> Result<PropValue, ComponentError> {
        let x = props.f64_prop("x")?;
        let y = props.f64_prop("y")?;
        let color = props.str_prop("color")?;

        // Data coordinates when an axis published a domain, pixels otherwise.
        let (px, py) = canvas.map_point(x, y).unwrap_or((x, y));

        let mut svg = String::new();
        if let Some(target) = props.opt_list("arrow_to")? {
            let coords: Vec<f64> = target.iter().filter_map(PropValue::as_f64).collect();
            if let [tx, ty] = coords.as_slice() {
                let (ax, ay) = canvas.map_point(*tx, *ty).unwrap_or((*tx, *ty));
                let _ = writeln!(
                    svg,
                    r#"<line x1="{px}" y1="{py}" x2="{ax}" y2="{ay}" stroke="{color}" stroke-dasharray="4 2"/>"#
                );
            }
        }
        let _ = writeln!(
            svg,
            r#"<circle cx="{px}" cy="{py}" r="3" fill="{color}"/>"#
        );
        let _ = writeln!(
            svg,
            r#"<text x="{tx}" y="{ty}" font-size="12" fill="{color}">{}</text>"#,
            escape_html(props.str_prop("content")?),
            tx = px + 6.0,
            ty = py - 6.0,
        );
        canvas.push_element(&svg);
        Ok(PropValue::Null)
    }
}
