//! Syntax highlighting for declaration snippets.
//!
//! Snippets are emitted as classed HTML spans; the matching stylesheet is
//! generated once per run and written next to the other static assets.

use once_cell::sync::Lazy;
use syntect::{
    highlighting::ThemeSet,
    html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

use crate::error::{DocketError, Result};

/// Lazily loaded syntect syntax definitions including newline handling.
static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
/// Shared theme catalog for stylesheet generation.
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);
/// Cached lookup for the Rust syntax definition.
static RUST_SYNTAX: Lazy<Option<&'static SyntaxReference>> =
    Lazy::new(|| SYNTAX_SET.find_syntax_by_extension("rs"));

/// Theme the generated stylesheet is derived from.
const THEME: &str = "InspiredGitHub";
/// Class naming shared between the span generator and the stylesheet.
const CLASS_STYLE: ClassStyle = ClassStyle::Spaced;

/// Convert a declaration snippet to classed HTML spans.
pub(crate) fn highlight_decl(code: &str) -> Result<String> {
    let syntax = *RUST_SYNTAX
        .as_ref()
        .ok_or_else(|| DocketError::Highlight("Rust syntax not found".to_string()))?;
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, CLASS_STYLE);
    for line in LinesWithEndings::from(code) {
        generator
            .parse_html_for_line_which_includes_newline(line)
            .map_err(|e| DocketError::Highlight(e.to_string()))?;
    }
    Ok(generator.finalize())
}

/// Generate the stylesheet matching [`highlight_decl`] output.
pub(crate) fn theme_css() -> Result<String> {
    let theme = THEME_SET
        .themes
        .get(THEME)
        .ok_or_else(|| DocketError::Highlight(format!("theme {THEME} not found")))?;
    css_for_theme_with_class_style(theme, CLASS_STYLE)
        .map_err(|e| DocketError::Highlight(e.to_string()))
}
