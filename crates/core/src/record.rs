//! Catalog records: the wire shape returned by the index and the flat
//! display shape handed to front-ends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Content type -> URL, as published by the index for each book.
pub type FormatMap = BTreeMap<String, String>;

/// Content types the normalizer looks for in a [`FormatMap`].
pub mod mime {
    pub const JPEG: &str = "image/jpeg";
    pub const HTML: &str = "text/html";
    pub const PLAIN_TEXT: &str = "text/plain; charset=us-ascii";
    pub const EPUB: &str = "application/epub+zip";
    pub const MOBI: &str = "application/x-mobipocket-ebook";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    /// Negative for BCE.
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub death_year: Option<i32>,
}

/// A book exactly as the index describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub bookshelves: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub copyright: Option<bool>,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub formats: FormatMap,
    #[serde(default)]
    pub download_count: u64,
}

impl RawRecord {
    /// A record carrying only an id and title; every other field empty.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            authors: Vec::new(),
            subjects: Vec::new(),
            bookshelves: Vec::new(),
            languages: Vec::new(),
            copyright: None,
            media_type: String::new(),
            formats: FormatMap::new(),
            download_count: 0,
        }
    }
}

/// One page of the index listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<RawRecord>,
}

/// UI-ready book. Built once per raw record by [`crate::normalize::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub cover: String,
    /// Not supplied by the index; always 0.
    pub pages: u32,
    pub views: u64,
    /// First author's birth year, standing in for the publication year.
    pub year: i32,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_url: Option<String>,
    pub subjects: Vec<String>,
    pub formats: FormatMap,
}

/// Normalized page of results plus the pagination facts from the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub books: Vec<DisplayRecord>,
    pub has_more: bool,
    pub has_previous: bool,
    /// Total across all pages, as reported by the index.
    pub total: u64,
}

impl PageResult {
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
