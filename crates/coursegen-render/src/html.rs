//! Shared HTML assembly helpers for the HTML-producing backends.

use std::fmt::Write;

/// Escape text for safe interpolation into HTML content or attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Minimal HTML5 page shell.
///
/// Backends accumulate body fragments and optional head/style/script
/// sections, then call [`finish`](Self::finish) once at persistence time.
#[derive(Debug, Default)]
pub struct HtmlPage {
    title: String,
    head: String,
    style: String,
    body: String,
    script: String,
}

impl HtmlPage {
    /// Start a page with the given `<title>`.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            title: escape_html(title),
            ..Self::default()
        }
    }

    /// Append raw markup to `<head>` (e.g. a script runtime reference).
    pub fn head(&mut self, markup: &str) {
        self.head.push_str(markup);
        self.head.push('\n');
    }

    /// Append CSS to the page's `<style>` block.
    pub fn style(&mut self, css: &str) {
        self.style.push_str(css);
        self.style.push('\n');
    }

    /// Append a body fragment.
    pub fn body(&mut self, markup: &str) {
        self.body.push_str(markup);
        self.body.push('\n');
    }

    /// Append JavaScript to the trailing `<script>` block.
    pub fn script(&mut self, js: &str) {
        self.script.push_str(js);
        self.script.push('\n');
    }

    /// Assemble the final document.
    #[must_use]
    pub fn finish(self) -> String {
        let mut out = String::with_capacity(
            self.head.len() + self.style.len() + self.body.len() + self.script.len() + 256,
        );
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(out, "<title>{}</title>", self.title);
        out.push_str(&self.head);
        if !self.style.is_empty() {
            let _ = write!(out, "<style>\n{}</style>\n", self.style);
        }
        out.push_str("</head>\n<body>\n");
        out.push_str(&self.body);
        if !self.script.is_empty() {
            let _ = write!(out, "<script>\n{}</script>\n", self.script);
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_page_assembly() {
        let mut page = HtmlPage::new("Report & Co");
        page.style("body { margin: 0; }");
        page.body("<p>hi</p>");
        page.script("console.log(1);");
        let html = page.finish();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Report &amp; Co</title>"));
        assert!(html.contains("<style>\nbody { margin: 0; }\n</style>"));
        assert!(html.contains("<p>hi</p>"));
        assert!(html.contains("<script>\nconsole.log(1);\n</script>"));
    }

    #[test]
    fn test_empty_sections_omitted() {
        let html = HtmlPage::new("t").finish();
        assert!(!html.contains("<style>"));
        assert!(!html.contains("<script>"));
    }
}
