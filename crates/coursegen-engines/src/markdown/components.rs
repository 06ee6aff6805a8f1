//! Built-in structured-text components.

use coursegen_markdown::MarkdownDocument;
use coursegen_render::{CHILDREN_PROP, Component, ComponentError, ComponentRegistry};
use coursegen_spec::{PropValue, Props};

use super::MarkdownCanvas;

pub(super) fn register_builtins(registry: &mut ComponentRegistry<MarkdownCanvas>) {
    registry.register(Heading);
    registry.register(Paragraph);
    registry.register(List);
    registry.register(CodeBlock);
    registry.register(Table);
    registry.register(Image);
    registry.register(Admonition);
    registry.register(Tabs);
    registry.register(Section);
    registry.register(Quiz);
    registry.register(Term);
}

fn fragment(doc: MarkdownDocument) -> PropValue {
    PropValue::String(doc.into_string())
}

/// Stringify a list prop whose items may be any scalar.
fn display_items(props: &Props, key: &str) -> Result<Vec<String>, ComponentError> {
    Ok(props
        .list_prop(key)?
        .iter()
        .map(ToString::to_string)
        .collect())
}

/// Collect the already-rendered child fragments as strings.
fn child_fragments(props: &Props) -> Result<Vec<String>, ComponentError> {
    Ok(props
        .opt_list(CHILDREN_PROP)?
        .unwrap_or_default()
        .iter()
        .filter_map(PropValue::as_str)
        .map(str::to_owned)
        .collect())
}

struct Heading;

impl Component<MarkdownCanvas> for Heading {
    fn tag(&self) -> &'static str {
        "Heading"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["content"]
    }

    fn default_props(&self) -> Props {
        Props::new().with("level", 2i64)
    }

    fn render(
        &self,
        props: &Props,
        _canvas: &mut MarkdownCanvas,
    ) -> Result<PropValue, ComponentError> {
        let level = u8::try_from(props.i64_prop("level")?.clamp(1, 6)).unwrap_or(6);
        let mut doc = MarkdownDocument::new();
        doc.heading(level, props.str_prop("content")?);
        Ok(fragment(doc))
    }
}

struct Paragraph;

impl Component<MarkdownCanvas> for Paragraph {
    fn tag(&self) -> &'static str {
        "Paragraph"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["content"]
    }

    fn render(
        &self,
        props: &Props,
        _canvas: &mut MarkdownCanvas,
    ) -> Result<PropValue, ComponentError> {
        let mut doc = MarkdownDocument::new();
        doc.paragraph(props.str_prop("content")?);
        Ok(fragment(doc))
    }
}

struct List;

impl Component<MarkdownCanvas> for List {
    fn tag(&self) -> &'static str {
        "List"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["items"]
    }

    fn default_props(&self) -> Props {
        Props::new().with("ordered", false)
    }

    fn render(
        &self,
        props: &Props,
        _canvas: &mut MarkdownCanvas,
    ) -> Result<PropValue, ComponentError> {
        let items = display_items(props, "items")?;
        let mut doc = MarkdownDocument::new();
        if props.bool_prop("ordered")? {
            doc.numbered_list(&items);
        } else {
            doc.bullet_list(&items);
        }
        Ok(fragment(doc))
    }
}

struct CodeBlock;

impl Component<MarkdownCanvas> for CodeBlock {
    fn tag(&self) -> &'static str {
        "CodeBlock"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["content"]
    }

    fn render(
        &self,
        props: &Props,
        _canvas: &mut MarkdownCanvas,
    ) -> Result<PropValue, ComponentError> {
        let mut doc = MarkdownDocument::new();
        doc.code_block(props.opt_str("language")?, props.str_prop("content")?);
        Ok(fragment(doc))
    }
}

struct Table;

impl Component<MarkdownCanvas> for Table {
    fn tag(&self) -> &'static str {
        "Table"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["headers", "rows"]
    }

    fn render(
        &self,
        props: &Props,
        _canvas: &mut MarkdownCanvas,
    ) -> Result<PropValue, ComponentError> {
        let headers = display_items(props, "headers")?;
        let rows = table_rows(props)?;
        let mut doc = MarkdownDocument::new();
        doc.table(&headers, &rows);
        Ok(fragment(doc))
    }
}

/// Rows are a list of lists of scalars.
fn table_rows(props: &Props) -> Result<Vec<Vec<String>>, ComponentError> {
    props
        .list_prop("rows")?
        .iter()
        .map(|row| match row {
            PropValue::List(cells) => Ok(cells.iter().map(ToString::to_string).collect()),
            other => Err(ComponentError::render(format!(
                "table row must be a list, got {}",
                other.kind()
            ))),
        })
        .collect()
}

struct Image;

impl Component<MarkdownCanvas> for Image {
    fn tag(&self) -> &'static str {
        "Image"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["src"]
    }

    fn default_props(&self) -> Props {
        Props::new().with("alt", "")
    }

    fn render(
        &self,
        props: &Props,
        _canvas: &mut MarkdownCanvas,
    ) -> Result<PropValue, ComponentError> {
        let mut doc = MarkdownDocument::new();
        doc.image(props.str_prop("src")?, props.str_prop("alt")?);
        Ok(fragment(doc))
    }
}

struct Admonition;

impl Component<MarkdownCanvas> for Admonition {
    fn tag(&self) -> &'static str {
        "Admonition"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["content"]
    }

    fn default_props(&self) -> Props {
        Props::new().with("kind", "note").with("collapsible", false)
    }

    fn render(
        &self,
        props: &Props,
        _canvas: &mut MarkdownCanvas,
    ) -> Result<PropValue, ComponentError> {
        let kind = props.str_prop("kind")?;
        let title = props.opt_str("title")?;
        let content = props.str_prop("content")?;
        let mut doc = MarkdownDocument::new();
        if props.bool_prop("collapsible")? {
            doc.details(kind, title, content);
        } else {
            doc.admonition(kind, title, content);
        }
        Ok(fragment(doc))
    }
}

/// Content tabs; children are rendered first and become the tab bodies.
struct Tabs;

impl Component<MarkdownCanvas> for Tabs {
    fn tag(&self) -> &'static str {
        "Tabs"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["titles"]
    }

    fn render(
        &self,
        props: &Props,
        _canvas: &mut MarkdownCanvas,
    ) -> Result<PropValue, ComponentError> {
        let titles = props.string_list("titles")?;
        let bodies = child_fragments(props)?;
        if bodies.is_empty() {
            return Err(ComponentError::render("Tabs requires children"));
        }
        if titles.len() != bodies.len() {
            return Err(ComponentError::render(format!(
                "Tabs has {} titles for {} children",
                titles.len(),
                bodies.len()
            )));
        }

        let mut doc = MarkdownDocument::new();
        for (title, body) in titles.iter().zip(&bodies) {
            doc.tab(title, body);
        }
        Ok(fragment(doc))
    }
}

/// Titled grouping; children fragments are spliced after the heading.
struct Section;

impl Component<MarkdownCanvas> for Section {
    fn tag(&self) -> &'static str {
        "Section"
    }

    fn default_props(&self) -> Props {
        Props::new().with("level", 2i64)
    }

    fn render(
        &self,
        props: &Props,
        _canvas: &mut MarkdownCanvas,
    ) -> Result<PropValue, ComponentError> {
        let mut doc = MarkdownDocument::new();
        if let Some(title) = props.opt_str("title")? {
            let level = u8::try_from(props.i64_prop("level")?.clamp(1, 6)).unwrap_or(6);
            doc.heading(level, title);
        }
        for body in child_fragments(props)? {
            doc.raw(&body);
        }
        Ok(fragment(doc))
    }
}

/// Question block with a collapsible answer.
struct Quiz;

impl Component<MarkdownCanvas> for Quiz {
    fn tag(&self) -> &'static str {
        "Quiz"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["question", "options", "answer"]
    }

    fn render(
        &self,
        props: &Props,
        canvas: &mut MarkdownCanvas,
    ) -> Result<PropValue, ComponentError> {
        let question = props.str_prop("question")?;
        let options = display_items(props, "options")?;
        let answer = props.i64_prop("answer")?;

        let correct = usize::try_from(answer)
            .ok()
            .and_then(|index| options.get(index))
            .ok_or_else(|| {
                ComponentError::render(format!(
                    "answer index {answer} out of range for {} options",
                    options.len()
                ))
            })?;

        let number = canvas.context.next_counter("quiz");
        let mut doc = MarkdownDocument::new();
        doc.paragraph(&format!("**Quiz {number}:** {question}"));
        doc.numbered_list(&options);

        let mut body = format!("**{correct}**");
        if let Some(explanation) = props.opt_str("explanation")? {
            body.push_str("\n\n");
            body.push_str(explanation);
        }
        doc.details("success", Some("Show answer"), &body);
        Ok(fragment(doc))
    }
}

/// Glossary tooltip via abbreviation definitions.
///
/// An explicit `definition` prop wins; otherwise the backend's knowledge
/// registry is consulted.
struct Term;

impl Component<MarkdownCanvas> for Term {
    fn tag(&self) -> &'static str {
        "Term"
    }

    fn required_props(&self) -> &'static [&'static str] {
        &["name"]
    }

    fn render(
        &self,
        props: &Props,
        canvas: &mut MarkdownCanvas,
    ) -> Result<PropValue, ComponentError> {
        let name = props.str_prop("name")?;
        let definition = match props.opt_str("definition")? {
            Some(definition) => definition.to_owned(),
            None => canvas
                .glossary
                .as_ref()
                .and_then(|glossary| glossary.term(name))
                .map(|entry| entry.definition)
                .ok_or_else(|| {
                    ComponentError::render(format!("term `{name}` not found in glossary"))
                })?,
        };

        let mut doc = MarkdownDocument::new();
        doc.abbreviation(name, &definition);
        Ok(fragment(doc))
    }
}
