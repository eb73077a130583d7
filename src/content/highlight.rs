use std::io;
use std::io::ErrorKind;

use lazy_static::lazy_static;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Every highlighted block uses this theme
pub const HIGHLIGHT_THEME: &str = "base16-ocean.dark";

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
}

/// Highlights `code` as `language`, returning a styled `<pre>` block.
/// Languages syntect doesn't know are highlighted as plain text.
pub fn highlight(code: &str, language: &str) -> io::Result<String> {
    let syntax = SYNTAX_SET
        .find_syntax_by_token(language)
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

    let Some(theme) = THEME_SET.themes.get(HIGHLIGHT_THEME) else {
        return Err(io::Error::new(ErrorKind::NotFound, format!("Missing highlight theme {}", HIGHLIGHT_THEME)));
    };

    highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme)
        .map_err(|e| io::Error::new(ErrorKind::InvalidData, format!("Error highlighting {} code: {}", language, e)))
}

pub fn is_known_language(language: &str) -> bool {
    SYNTAX_SET.find_syntax_by_token(language).is_some()
}
