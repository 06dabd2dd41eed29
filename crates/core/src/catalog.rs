//! Query contract for the remote catalog index.
//!
//! Everything in this module is transport-free: building request URLs,
//! decoding an envelope into a [`PageResult`], and the tagged outcome of a
//! single-book lookup. The HTTP client in [`client`] (feature `http`) and the
//! WASM bindings both sit on top of it.

#[cfg(feature = "http")]
pub mod client;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use url::Url;

use crate::error::CatalogError;
use crate::normalize::normalize;
use crate::record::{DisplayRecord, Envelope, PageResult, RawRecord};

pub const DEFAULT_BASE_URL: &str = "https://gutendex.com/books";

/// Fixed page size of the index.
pub const ITEMS_PER_PAGE: u32 = 32;

/// Which listing to ask the index for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum CatalogQuery {
    #[default]
    All,
    Search(String),
    Language(String),
    Topic(String),
    /// Same request as `All`; the page is re-sorted by views, descending.
    Popular,
}

impl CatalogQuery {
    /// Wording used in error messages ("Failed to <action>").
    pub fn action(&self) -> &'static str {
        match self {
            CatalogQuery::All => "fetch books",
            CatalogQuery::Search(_) => "search books",
            CatalogQuery::Language(_) => "fetch books by language",
            CatalogQuery::Topic(_) => "fetch books by topic",
            CatalogQuery::Popular => "fetch popular books",
        }
    }

    /// Request URL for `page` (1-based, not range-checked).
    pub fn url(&self, base: &Url, page: u32) -> Url {
        let mut url = base.clone();
        {
            let mut pairs = url.query_pairs_mut();
            match self {
                CatalogQuery::Search(text) => {
                    pairs.append_pair("search", &nfc(text));
                }
                CatalogQuery::Language(code) => {
                    pairs.append_pair("languages", code);
                }
                CatalogQuery::Topic(topic) => {
                    pairs.append_pair("topic", &nfc(topic));
                }
                CatalogQuery::All | CatalogQuery::Popular => {}
            }
            pairs.append_pair("page", &page.to_string());
        }
        url
    }

    pub fn sorts_by_views(&self) -> bool {
        matches!(self, CatalogQuery::Popular)
    }
}

fn nfc(s: &str) -> String {
    s.nfc().collect()
}

/// Parse and check an index base URL. Only http(s) bases are accepted.
pub fn parse_base_url(raw: &str) -> Result<Url, CatalogError> {
    let url = Url::parse(raw).map_err(|e| CatalogError::InvalidBaseUrl {
        url: raw.to_string(),
        detail: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CatalogError::InvalidBaseUrl {
            url: raw.to_string(),
            detail: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// `{base}/{id}`.
pub fn book_url(base: &Url, id: u64) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&id.to_string());
    }
    url
}

/// Normalize an envelope into a page, applying the popular sort when asked.
pub fn page_from_envelope(envelope: Envelope, query: &CatalogQuery) -> PageResult {
    let mut books: Vec<DisplayRecord> = envelope.results.into_iter().map(normalize).collect();
    if query.sorts_by_views() {
        // Stable: equal view counts keep index order.
        books.sort_by(|a, b| b.views.cmp(&a.views));
    }
    PageResult {
        books,
        has_more: envelope.next.is_some(),
        has_previous: envelope.previous.is_some(),
        total: envelope.count,
    }
}

/// Decode a listing body and normalize it.
pub fn parse_page(body: &str, query: &CatalogQuery) -> Result<PageResult, CatalogError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| CatalogError::Decode {
        action: query.action(),
        detail: e.to_string(),
    })?;
    Ok(page_from_envelope(envelope, query))
}

/// Decode a single-book body.
pub fn parse_book(body: &str) -> Result<DisplayRecord, CatalogError> {
    let raw: RawRecord = serde_json::from_str(body).map_err(|e| CatalogError::Decode {
        action: "fetch book",
        detail: e.to_string(),
    })?;
    Ok(normalize(raw))
}

/// Outcome of fetching one book by id.
///
/// Not-found and an unreachable index stay distinguishable here;
/// [`BookLookup::into_option`] collapses both into `None` for callers that
/// only care whether they got a book.
#[derive(Debug)]
pub enum BookLookup {
    Found(DisplayRecord),
    NotFound,
    Unavailable(CatalogError),
}

impl BookLookup {
    pub fn into_option(self) -> Option<DisplayRecord> {
        match self {
            BookLookup::Found(book) => Some(book),
            BookLookup::NotFound | BookLookup::Unavailable(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, BookLookup::Found(_))
    }
}
