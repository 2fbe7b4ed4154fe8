//! Unit tests for the editor beautifiers

use codequest::beautify::{beautify, beautify_css, beautify_html, beautify_js};
use codequest::models::Language;

#[cfg(test)]
mod html_tests {
    use super::*;

    #[test]
    fn test_whitespace_between_tags_is_collapsed() {
        let out = beautify_html("<ul>\n   <li>a</li>   <li>b</li>\n</ul>");
        assert_eq!(out, "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>");
    }

    #[test]
    fn test_deep_nesting() {
        let out = beautify_html("<main><section><div><span>x</span></div></section></main>");
        let indents: Vec<usize> = out
            .lines()
            .map(|line| line.len() - line.trim_start().len())
            .collect();
        assert_eq!(indents, vec![0, 2, 4, 6, 4, 2, 0]);
    }

    #[test]
    fn test_self_closing_tag_does_not_indent() {
        let out = beautify_html("<div><br/><p>x</p></div>");
        assert_eq!(out, "<div>\n  <br/>\n  <p>x</p>\n</div>");
    }

    #[test]
    fn test_plain_text_is_kept() {
        assert_eq!(beautify_html("hello"), "hello");
    }
}

#[cfg(test)]
mod css_tests {
    use super::*;

    #[test]
    fn test_multiple_rules() {
        let out = beautify_css("a{color:red;}b{margin:0;}");
        assert_eq!(out, "a {\n  color:red;\n}\n\nb {\n  margin:0;\n}\n\n");
    }

    #[test]
    fn test_existing_whitespace_is_normalized() {
        assert_eq!(
            beautify_css("a   {   color:red;   }"),
            beautify_css("a{color:red;}")
        );
    }
}

#[cfg(test)]
mod js_tests {
    use super::*;

    #[test]
    fn test_statements_split() {
        assert_eq!(beautify_js("let a = 1;let b = 2;"), "let a = 1;\n  let b = 2;\n  ");
    }

    #[test]
    fn test_code_without_braces_or_semicolons_unchanged() {
        assert_eq!(beautify_js("console.log('x')"), "console.log('x')");
    }
}

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    #[test]
    fn test_each_language_uses_its_beautifier() {
        let html = "<div><p>x</p></div>";
        let css = "a{b:c;}";
        let js = "if(x){y();}";
        assert_eq!(beautify(Language::Html, html), beautify_html(html));
        assert_eq!(beautify(Language::Css, css), beautify_css(css));
        assert_eq!(beautify(Language::Js, js), beautify_js(js));
    }
}
