//! Naive Code Beautifiers
//!
//! Regex-based re-indentation for the three editor languages. These are
//! plain string rewrites with no parsing: valid input in, re-indented text
//! out. Nothing here is shared state.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Language;

const INDENT: &str = "  ";

static TAG_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s*<").expect("valid regex"));
static CLOSING_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/\w").expect("valid regex"));
static OPENING_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<?\w[^>]*[^/]$").expect("valid regex"));

static CSS_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\{\s*").expect("valid regex"));
static CSS_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\}\s*").expect("valid regex"));
static JS_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\s*").expect("valid regex"));
static JS_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\}\s*").expect("valid regex"));
static STATEMENT_END: Lazy<Regex> = Lazy::new(|| Regex::new(r";\s*").expect("valid regex"));

/// Beautify `code` as `lang`
pub fn beautify(lang: Language, code: &str) -> String {
    match lang {
        Language::Html => beautify_html(code),
        Language::Css => beautify_css(code),
        Language::Js => beautify_js(code),
    }
}

/// One tag per line, indented by nesting depth
pub fn beautify_html(html: &str) -> String {
    let html = html.trim();
    if html.is_empty() {
        return String::new();
    }

    let mut formatted = String::with_capacity(html.len() * 2);
    let mut indent: i32 = 0;

    for node in TAG_GAP.split(html) {
        if CLOSING_TAG.is_match(node) {
            indent -= 1;
        }
        formatted.push_str(&INDENT.repeat(indent.max(0) as usize));
        formatted.push('<');
        formatted.push_str(node);
        formatted.push_str(">\n");
        if OPENING_TAG.is_match(node) && !node.starts_with("input") {
            indent += 1;
        }
    }

    // the first node keeps its own '<' and the last its own '>'
    let formatted = formatted.strip_prefix('<').unwrap_or(&formatted);
    let formatted = formatted.strip_suffix(">\n").unwrap_or(formatted);
    formatted.to_string()
}

/// One declaration per line, blank line between rules
pub fn beautify_css(css: &str) -> String {
    let css = CSS_OPEN.replace_all(css, " {\n  ");
    let css = STATEMENT_END.replace_all(&css, ";\n  ");
    CSS_CLOSE.replace_all(&css, "\n}\n\n").into_owned()
}

/// One statement per line, braces on their own lines
pub fn beautify_js(js: &str) -> String {
    let js = JS_OPEN.replace_all(js, " {\n  ");
    let js = STATEMENT_END.replace_all(&js, ";\n  ");
    JS_CLOSE.replace_all(&js, "\n}\n").into_owned()
}
