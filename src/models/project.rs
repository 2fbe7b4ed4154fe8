//! Saved Project Model
//!
//! A named snapshot of the three fragments. The persisted field names
//! (`html`, `css`, `js`) are kept stable for existing stores.

use serde::{Deserialize, Serialize};

use super::SourceBundle;

/// Number of markup characters kept as the card preview
pub const PREVIEW_CHARS: usize = 100;

/// Saved playground project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Creation time in epoch milliseconds, unique within a library
    pub id: i64,
    /// User-supplied name
    pub name: String,
    /// Markup fragment
    pub html: String,
    /// Style fragment
    pub css: String,
    /// Script fragment
    pub js: String,
    /// Leading slice of the markup for list rendering
    #[serde(default)]
    pub preview: String,
}

impl Project {
    /// Snapshot a bundle under `name`
    pub fn from_bundle(id: i64, name: &str, bundle: &SourceBundle) -> Self {
        Self {
            id,
            name: name.to_string(),
            html: bundle.markup.clone(),
            css: bundle.style.clone(),
            js: bundle.script.clone(),
            preview: bundle.markup.chars().take(PREVIEW_CHARS).collect(),
        }
    }

    /// Fragments of this project as a bundle
    pub fn to_bundle(&self) -> SourceBundle {
        SourceBundle::new(self.html.clone(), self.css.clone(), self.js.clone())
    }
}
