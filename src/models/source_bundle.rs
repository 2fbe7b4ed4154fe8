//! Source Bundle Model
//!
//! The three editable fragments (markup, style, script) captured at the
//! moment a run is triggered, plus the `Language` tag used by the editor
//! operations that act on a single fragment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Editor language, one per fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Markup fragment
    Html,
    /// Style fragment
    Css,
    /// Script fragment
    Js,
}

impl Language {
    /// All languages in editor tab order
    pub const ALL: [Language; 3] = [Language::Html, Language::Css, Language::Js];

    /// Upper-case label used in console notifications
    pub fn label(&self) -> &'static str {
        match self {
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Js => "JS",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Html => "html",
            Language::Css => "css",
            Language::Js => "js",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "markup" => Ok(Language::Html),
            "css" | "style" => Ok(Language::Css),
            "js" | "javascript" | "script" => Ok(Language::Js),
            _ => Err(Error::UnknownLanguage {
                name: s.to_string(),
            }),
        }
    }
}

/// The three source fragments of one playground snippet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBundle {
    /// Body markup
    pub markup: String,
    /// Stylesheet placed in the document head
    pub style: String,
    /// Script run after the instrumentation prologue
    pub script: String,
}

impl SourceBundle {
    /// Create a bundle from the three fragments
    pub fn new(
        markup: impl Into<String>,
        style: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            markup: markup.into(),
            style: style.into(),
            script: script.into(),
        }
    }

    /// True iff at least one fragment has non-whitespace content
    pub fn has_content(&self) -> bool {
        Language::ALL
            .iter()
            .any(|lang| !self.fragment(*lang).trim().is_empty())
    }

    /// Borrow the fragment for a language
    pub fn fragment(&self, lang: Language) -> &str {
        match lang {
            Language::Html => &self.markup,
            Language::Css => &self.style,
            Language::Js => &self.script,
        }
    }

    /// Mutable access to the fragment for a language
    pub fn fragment_mut(&mut self, lang: Language) -> &mut String {
        match lang {
            Language::Html => &mut self.markup,
            Language::Css => &mut self.style,
            Language::Js => &mut self.script,
        }
    }

    /// Empty all three fragments
    pub fn clear(&mut self) {
        self.markup.clear();
        self.style.clear();
        self.script.clear();
    }
}
