//! Small presentation helpers shared by the front-ends.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::record::{mime, FormatMap};

/// Cut `text` to at most `max` grapheme clusters, appending `...` if cut.
pub fn truncate_text(text: &str, max: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Head of the first subject (`"Fiction -- Romance"` -> `"Fiction"`).
pub fn main_subject(subjects: &[String]) -> String {
    match subjects.first() {
        Some(s) => s.split("--").next().unwrap_or("").trim().to_string(),
        None => "Uncategorized".to_string(),
    }
}

pub fn is_valid_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}

/// Best format a book is offered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookType {
    Epub,
    Mobi,
    Html,
    Txt,
    Other,
}

impl BookType {
    pub fn from_formats(formats: &FormatMap) -> Self {
        let has = |k: &str| formats.get(k).map_or(false, |v| !v.is_empty());
        if has(mime::EPUB) {
            BookType::Epub
        } else if has(mime::MOBI) {
            BookType::Mobi
        } else if has(mime::HTML) {
            BookType::Html
        } else if has(mime::PLAIN_TEXT) {
            BookType::Txt
        } else {
            BookType::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookType::Epub => "EPUB",
            BookType::Mobi => "MOBI",
            BookType::Html => "HTML",
            BookType::Txt => "TXT",
            BookType::Other => "Other",
        }
    }

    /// File extension for a saved download.
    pub fn extension(&self) -> &'static str {
        match self {
            BookType::Epub => "epub",
            BookType::Mobi => "mobi",
            BookType::Html => "html",
            BookType::Txt => "txt",
            BookType::Other => "bin",
        }
    }
}

impl std::fmt::Display for BookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
