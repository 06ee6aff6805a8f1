//! Built-in table components.

use std::fmt::Write;

use coursegen_render::{Component, ComponentError, ComponentRegistry, escape_html};
use coursegen_spec::{PropValue, Props};

use super::TableCanvas;

pub(super) fn register_builtins(registry: &mut ComponentRegistry<TableCanvas>) {
    registry.register(BasicTable);
    registry.register(ComparisonTable);
    registry.register(DataTable);
    registry.register(SummaryTable);
}

fn push_fragment(canvas: &mut TableCanvas, html: String) -> PropValue {
    canvas.fragments.push(html.clone());
    PropValue::String(html)
}

fn cells(props: &Props, key: &str) -> Result<Vec<String>, ComponentError> {
    Ok(props
        .list_prop(key)?
        .iter()
        .map(ToString::to_string)
        .collect())
}

fn cell_rows(props: &Props, key: &str) -> Result<Vec<Vec<String>>, ComponentError> {
    props
        .list_prop(key)?
        .iter()
        .map(|row| match row {
            PropValue::List(items) => Ok(items.iter().map(ToString::to_string).collect()),
            other => Err(ComponentError::render(format!(
                "`{key}` row must be a list, got {}",
                other.kind()
            ))),
        })
        .collect()
}

fn write_caption(out: &mut String, caption: Option<&str>) {
    if let Some(caption) = caption {
        let _ = write!(out, "<caption>{}</caption>", escape_html(caption));
    }
}

fn write_header_row(out: &mut String, headers: &[String], attrs: &str) {
    out.push_str("<thead><tr>");
    for header in headers {
        let _ = write!(out, "<th{attrs}>{}</th>", escape_html(header));
    }
    out.push_str("</tr></thead>");
}

fn write_body_rows(out: &mut String, rows: &[Vec<String>]) {
    out.push_str("<tbody>");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", escape_html(cell));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody>");
}

struct BasicTable;

impl Component<TableCanvas> for BasicTable {
    fn tag(&self) -> &'static str {
        "BasicTable"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["headers", "rows"]
    }

    fn render(
        &self,
        props: &Props,
        canvas: &mut TableCanvas,
    ) -> Result<PropValue, ComponentError> {
        let headers = cells(props, "headers")?;
        let rows = cell_rows(props, "rows")?;

        let mut html = String::from("<table>");
        write_caption(&mut html, props.opt_str("caption")?);
        write_header_row(&mut html, &headers, "");
        write_body_rows(&mut html, &rows);
        html.push_str("</table>");
        Ok(push_fragment(canvas, html))
    }
}

/// Criteria down the side, items across the top.
struct ComparisonTable;

impl Component<TableCanvas> for ComparisonTable {
    fn tag(&self) -> &'static str {
        "ComparisonTable"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["criteria", "items", "values"]
    }

    fn render(
        &self,
        props: &Props,
        canvas: &mut TableCanvas,
    ) -> Result<PropValue, ComponentError> {
        let criteria = cells(props, "criteria")?;
        let items = cells(props, "items")?;
        let values = cell_rows(props, "values")?;

        if values.len() != criteria.len() {
            return Err(ComponentError::render(format!(
                "{} value rows for {} criteria",
                values.len(),
                criteria.len()
            )));
        }

        let mut html = String::from("<table>");
        write_caption(&mut html, props.opt_str("caption")?);
        html.push_str("<thead><tr><th></th>");
        for item in &items {
            let _ = write!(html, "<th>{}</th>", escape_html(item));
        }
        html.push_str("</tr></thead><tbody>");
        for (criterion, row) in criteria.iter().zip(&values) {
            let _ = write!(html, "<tr><th>{}</th>", escape_html(criterion));
            for cell in row {
                let _ = write!(html, "<td>{}</td>", escape_html(cell));
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");
        Ok(push_fragment(canvas, html))
    }
}

/// Sortable and/or filterable table.
struct DataTable;

impl Component<TableCanvas> for DataTable {
    fn tag(&self) -> &'static str {
        "DataTable"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["headers", "rows"]
    }

    fn default_props(&self) -> Props {
        Props::new().with("sortable", true).with("filterable", false)
    }

    fn render(
        &self,
        props: &Props,
        canvas: &mut TableCanvas,
    ) -> Result<PropValue, ComponentError> {
        let headers = cells(props, "headers")?;
        let rows = cell_rows(props, "rows")?;
        let sortable = props.bool_prop("sortable")?;
        let filterable = props.bool_prop("filterable")?;

        let id = format!("data-table-{}", canvas.context.next_counter("table_id"));
        let mut html = String::new();
        if filterable {
            let _ = write!(
                html,
                r#"<input class="table-filter" type="search" placeholder="Filter..." data-target="{id}" oninput="filterTable(this)">"#
            );
        }
        let _ = write!(html, r#"<table id="{id}">"#);
        write_caption(&mut html, props.opt_str("caption")?);
        let th_attrs = if sortable {
            r#" onclick="sortTable(this)" style="cursor: pointer""#
        } else {
            ""
        };
        write_header_row(&mut html, &headers, th_attrs);
        write_body_rows(&mut html, &rows);
        html.push_str("</table>");

        if sortable || filterable {
            canvas.wants_script = true;
        }
        Ok(push_fragment(canvas, html))
    }
}

/// Two-column label/value summary.
struct SummaryTable;

impl Component<TableCanvas> for SummaryTable {
    fn tag(&self) -> &'static str {
        "SummaryTable"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["entries"]
    }

    fn render(
        &self,
        props: &Props,
        canvas: &mut TableCanvas,
    ) -> Result<PropValue, ComponentError> {
        let entries: Vec<(String, String)> = props
            .list_prop("entries")?
            .iter()
            .map(|entry| match entry {
                PropValue::Map(map) => {
                    let label = map.get("label").map(ToString::to_string).ok_or_else(|| {
                        ComponentError::render("summary entry is missing `label`")
                    })?;
                    let value = map.get("value").map(ToString::to_string).ok_or_else(|| {
                        ComponentError::render("summary entry is missing `value`")
                    })?;
                    Ok((label, value))
                }
                other => Err(ComponentError::render(format!(
                    "summary entry must be a map, got {}",
                    other.kind()
                ))),
            })
            .collect::<Result<_, _>>()?;

        let mut html = String::from("<table class=\"summary\">");
        write_caption(&mut html, props.opt_str("title")?);
        html.push_str("<tbody>");
        for (label, value) in &entries {
            let _ = write!(
                html,
                "<tr><th>{}</th><td>{}</td></tr>",
                escape_html(label),
                escape_html(value)
            );
        }
        html.push_str("</tbody></table>");
        Ok(push_fragment(canvas, html))
    }
}
