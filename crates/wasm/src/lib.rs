//! WASM bindings for bookvibe.
//!
//! The page does the fetching; these functions build request URLs, turn
//! response bodies into display JSON, and keep the browse cursor.

use bookvibe_core::browse::{BrowseState, RequestTicket, RequestTracker};
use bookvibe_core::catalog::{self, CatalogQuery};
use bookvibe_core::normalize;
use bookvibe_core::record::RawRecord;
use bookvibe_core::zoom::Zoom;
use wasm_bindgen::prelude::*;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

/// Normalize one raw record (JSON) into a display record (JSON).
#[wasm_bindgen]
pub fn normalize_record(raw_json: &str) -> Result<String, JsValue> {
    normalize_record_inner(raw_json).map_err(js_err)
}

fn normalize_record_inner(raw_json: &str) -> Result<String, String> {
    let raw: RawRecord = serde_json::from_str(raw_json).map_err(|e| e.to_string())?;
    to_json(&normalize::normalize(raw))
}

/// Normalize a listing body. `query_json` is e.g. `{"mode":"popular"}` or
/// `{"mode":"search","value":"dickens"}`.
#[wasm_bindgen]
pub fn parse_page(body: &str, query_json: &str) -> Result<String, JsValue> {
    let query: CatalogQuery = serde_json::from_str(query_json).map_err(js_err)?;
    let page = catalog::parse_page(body, &query).map_err(js_err)?;
    to_json(&page).map_err(js_err)
}

/// Request URL for a listing page.
#[wasm_bindgen]
pub fn query_url(base_url: &str, query_json: &str, page: u32) -> Result<String, JsValue> {
    let base = catalog::parse_base_url(base_url).map_err(js_err)?;
    let query: CatalogQuery = serde_json::from_str(query_json).map_err(js_err)?;
    Ok(query.url(&base, page).to_string())
}

/// Request URL for a single book.
#[wasm_bindgen]
pub fn book_url(base_url: &str, id: u64) -> Result<String, JsValue> {
    let base = catalog::parse_base_url(base_url).map_err(js_err)?;
    Ok(catalog::book_url(&base, id).to_string())
}

#[wasm_bindgen]
pub fn language_name(code: &str) -> String {
    normalize::language_name(code).to_string()
}

/// Browse cursor plus stale-response filtering for one grid.
#[wasm_bindgen]
pub struct BrowseSession {
    base: String,
    state: BrowseState,
    tracker: RequestTracker,
}

#[wasm_bindgen]
impl BrowseSession {
    #[wasm_bindgen(constructor)]
    pub fn new(base_url: &str) -> BrowseSession {
        BrowseSession {
            base: base_url.to_string(),
            state: BrowseState::default(),
            tracker: RequestTracker::new(),
        }
    }

    /// Pick the mode from the grid inputs and go back to page 1.
    pub fn select(&mut self, search: Option<String>, language: Option<String>) {
        let query = BrowseState::select_mode(search.as_deref(), language.as_deref());
        self.change_query(query);
    }

    pub fn show_popular(&mut self) {
        self.change_query(CatalogQuery::Popular);
    }

    pub fn show_topic(&mut self, topic: &str) {
        self.change_query(CatalogQuery::Topic(topic.to_string()));
    }

    /// Start a request for the current page. Returns the ticket to pass to
    /// `accept`; any earlier ticket is now stale.
    pub fn begin(&mut self) -> u64 {
        self.tracker.issue().0
    }

    /// URL to fetch for the current mode and page.
    pub fn request_url(&self) -> Result<String, JsValue> {
        query_url_for(&self.base, &self.state).map_err(js_err)
    }

    /// Normalized page JSON, or `undefined` when `ticket` was superseded.
    pub fn accept(&mut self, ticket: u64, body: &str) -> Result<Option<String>, JsValue> {
        self.accept_inner(ticket, body).map_err(js_err)
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.state.next_page();
        if moved {
            self.tracker.invalidate();
        }
        moved
    }

    pub fn prev_page(&mut self) -> bool {
        let moved = self.state.prev_page();
        if moved {
            self.tracker.invalidate();
        }
        moved
    }

    pub fn set_page(&mut self, page: u32) {
        self.state.set_page(page);
        self.tracker.invalidate();
    }

    #[wasm_bindgen(getter)]
    pub fn page(&self) -> u32 {
        self.state.page
    }

    #[wasm_bindgen(getter)]
    pub fn has_more(&self) -> bool {
        self.state.has_more
    }

    pub fn total_pages(&self, per_page: u32) -> u64 {
        self.state.total_pages(per_page)
    }
}

impl BrowseSession {
    /// Responses for the previous mode are dropped from here on.
    fn change_query(&mut self, query: CatalogQuery) {
        self.state.set_query(query);
        self.tracker.invalidate();
    }

    fn accept_inner(&mut self, ticket: u64, body: &str) -> Result<Option<String>, String> {
        if !self.tracker.is_current(RequestTicket(ticket)) {
            return Ok(None);
        }
        let page = catalog::parse_page(body, &self.state.query).map_err(|e| e.to_string())?;
        self.state.apply(&page);
        to_json(&page).map(Some)
    }
}

fn query_url_for(base: &str, state: &BrowseState) -> Result<String, String> {
    let base = catalog::parse_base_url(base).map_err(|e| e.to_string())?;
    Ok(state.query.url(&base, state.page).to_string())
}

/// Reader zoom control.
#[wasm_bindgen]
#[derive(Default)]
pub struct ReaderZoom {
    zoom: Zoom,
}

#[wasm_bindgen]
impl ReaderZoom {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ReaderZoom {
        ReaderZoom::default()
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom.zoom_out()
    }

    pub fn reset(&mut self) {
        self.zoom.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn percent(&self) -> u32 {
        self.zoom.percent()
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f32 {
        self.zoom.scale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"count":40,"next":"https://gutendex.com/books?page=2","previous":null,
        "results":[{"id":1,"title":"A","download_count":1},{"id":2,"title":"B","download_count":9}]}"#;

    #[test]
    fn normalizes_bare_record() {
        let out = normalize_record_inner(r#"{"id":1,"title":"T"}"#).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["author"], "Unknown Author");
        assert_eq!(v["year"], 1900);
        assert!(v.get("downloadUrl").is_none());
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut session = BrowseSession::new("https://gutendex.com/books");
        let first = session.begin();
        session.select(Some("dickens".to_string()), None);
        let second = session.begin();

        assert_eq!(session.accept_inner(first, BODY).unwrap(), None);
        assert!(!session.has_more());

        let page = session.accept_inner(second, BODY).unwrap().unwrap();
        assert!(page.contains("\"hasMore\":true"));
        assert!(session.has_more());
        assert_eq!(session.total_pages(32), 2);
        assert!(session.next_page());
        assert_eq!(
            query_url_for("https://gutendex.com/books", &session.state).unwrap(),
            "https://gutendex.com/books?search=dickens&page=2"
        );
    }

    #[test]
    fn select_without_begin_drops_pending_response() {
        let mut session = BrowseSession::new("https://gutendex.com/books");
        let ticket = session.begin();
        session.select(Some("dickens".to_string()), None);

        assert_eq!(session.accept_inner(ticket, BODY).unwrap(), None);
        assert!(!session.has_more());
        assert_eq!(session.total_pages(32), 0);
    }

    #[test]
    fn show_popular_without_begin_drops_pending_response() {
        let mut session = BrowseSession::new("https://gutendex.com/books");
        let ticket = session.begin();
        session.show_popular();

        assert_eq!(session.accept_inner(ticket, BODY).unwrap(), None);
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn page_change_drops_pending_response() {
        let mut session = BrowseSession::new("https://gutendex.com/books");
        let first = session.begin();
        session.accept_inner(first, BODY).unwrap().unwrap();

        let pending = session.begin();
        assert!(session.next_page());
        assert_eq!(session.accept_inner(pending, BODY).unwrap(), None);

        let pending = session.begin();
        session.set_page(5);
        assert_eq!(session.accept_inner(pending, BODY).unwrap(), None);

        let pending = session.begin();
        assert!(session.prev_page());
        assert_eq!(session.accept_inner(pending, BODY).unwrap(), None);
        assert_eq!(session.page(), 4);
    }

    #[test]
    fn zoom_wrapper() {
        let mut z = ReaderZoom::new();
        assert!(z.zoom_in());
        assert_eq!(z.percent(), 125);
        z.reset();
        assert_eq!(z.percent(), 100);
    }
}
