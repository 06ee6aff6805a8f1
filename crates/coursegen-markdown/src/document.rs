//! Append-only markdown buffer.

use std::fmt::Write;

/// Indentation for bodies nested under MkDocs block markers.
const NESTED_INDENT: &str = "    ";

/// An append-only markdown document.
///
/// Blocks are accumulated in call order and separated by single blank
/// lines when the document is finished with [`into_string`](Self::into_string).
#[derive(Debug, Default)]
pub struct MarkdownDocument {
    blocks: Vec<String>,
}

impl MarkdownDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Append a pre-rendered markdown block verbatim.
    pub fn raw(&mut self, block: &str) {
        let trimmed = block.trim_end();
        if !trimmed.is_empty() {
            self.blocks.push(trimmed.to_owned());
        }
    }

    /// Append a YAML front-matter block. Meaningful only as the first call.
    pub fn front_matter(&mut self, metadata: &impl serde::Serialize) -> Result<(), serde_yaml::Error> {
        let yaml = serde_yaml::to_string(metadata)?;
        self.blocks.push(format!("---\n{yaml}---"));
        Ok(())
    }

    /// Append an ATX heading. Levels are clamped to 1..=6.
    pub fn heading(&mut self, level: u8, text: &str) {
        let level = usize::from(level.clamp(1, 6));
        self.blocks.push(format!("{} {}", "#".repeat(level), text));
    }

    /// Append a paragraph.
    pub fn paragraph(&mut self, text: &str) {
        self.raw(text);
    }

    /// Append an unordered list.
    pub fn bullet_list(&mut self, items: &[String]) {
        let block = items
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n");
        self.raw(&block);
    }

    /// Append an ordered list.
    pub fn numbered_list(&mut self, items: &[String]) {
        let block = items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {item}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");
        self.raw(&block);
    }

    /// Append a fenced code block.
    pub fn code_block(&mut self, language: Option<&str>, source: &str) {
        let lang = language.unwrap_or_default();
        self.blocks
            .push(format!("```{lang}\n{}\n```", source.trim_end()));
    }

    /// Append a pipe table.
    pub fn table(&mut self, headers: &[String], rows: &[Vec<String>]) {
        let mut block = String::new();
        let _ = writeln!(block, "| {} |", headers.join(" | "));
        let _ = writeln!(
            block,
            "|{}|",
            headers.iter().map(|_| " --- ").collect::<Vec<_>>().join("|")
        );
        for row in rows {
            let _ = writeln!(block, "| {} |", row.join(" | "));
        }
        self.raw(&block);
    }

    /// Append an image reference.
    pub fn image(&mut self, src: &str, alt: &str) {
        self.blocks.push(format!("![{alt}]({src})"));
    }

    /// Append a blockquote.
    pub fn blockquote(&mut self, text: &str) {
        let block = text
            .lines()
            .map(|line| format!("> {line}"))
            .collect::<Vec<_>>()
            .join("\n");
        self.raw(&block);
    }

    /// Append a thematic break.
    pub fn horizontal_rule(&mut self) {
        self.blocks.push("---".to_owned());
    }

    /// Append an MkDocs admonition: `!!! kind "Title"` with an indented
    /// body. Without a title MkDocs falls back to the capitalized kind.
    pub fn admonition(&mut self, kind: &str, title: Option<&str>, body: &str) {
        self.blocks.push(nested_block("!!!", kind, title, body));
    }

    /// Append an MkDocs collapsible details block (`??? kind "Title"`).
    pub fn details(&mut self, kind: &str, title: Option<&str>, body: &str) {
        self.blocks.push(nested_block("???", kind, title, body));
    }

    /// Append one MkDocs content tab (`=== "Title"`).
    pub fn tab(&mut self, title: &str, body: &str) {
        self.blocks
            .push(format!("=== \"{title}\"\n\n{}", indent(body)));
    }

    /// Append an abbreviation definition (`*[term]: definition`), the hook
    /// MkDocs uses to render hover tooltips.
    pub fn abbreviation(&mut self, term: &str, definition: &str) {
        self.blocks.push(format!("*[{term}]: {definition}"));
    }

    /// Finish the document: blocks joined by blank lines, trailing newline.
    #[must_use]
    pub fn into_string(self) -> String {
        if self.blocks.is_empty() {
            return String::new();
        }
        let mut out = self.blocks.join("\n\n");
        out.push('\n');
        out
    }
}

fn nested_block(marker: &str, kind: &str, title: Option<&str>, body: &str) -> String {
    let header = match title {
        Some(title) => format!("{marker} {kind} \"{title}\""),
        None => format!("{marker} {kind}"),
    };
    format!("{header}\n\n{}", indent(body))
}

fn indent(body: &str) -> String {
    body.trim_end()
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{NESTED_INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
