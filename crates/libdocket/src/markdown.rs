//! Docstring rendering.
//!
//! Doc comments are CommonMark; they render to HTML fragments embedded in
//! the item pages. Raw HTML in docstrings is escaped.

use comrak::{Options, markdown_to_html};

/// Render a docstring to an HTML fragment.
pub(crate) fn docs_html(markdown: &str) -> String {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.footnotes = true;
    options.render.github_pre_lang = true;
    markdown_to_html(markdown, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paragraphs_and_code() {
        let html = docs_html("A draw service.\n\n```rust\nlet x = 1;\n```");
        assert!(html.contains("<p>A draw service.</p>"));
        assert!(html.contains("<pre lang=\"rust\">"));
    }

    #[test]
    fn renders_tables() {
        let html = docs_html("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn escapes_raw_html() {
        let html = docs_html("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
    }
}
