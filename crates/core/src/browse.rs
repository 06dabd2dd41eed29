//! Caller-owned browse state: current query, page cursor, and a ticket
//! counter for discarding superseded responses.
//!
//! The client is stateless; front-ends keep one `BrowseState` and pass
//! `state.query` / `state.page` into each call.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogQuery;
use crate::record::PageResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseState {
    pub query: CatalogQuery,
    /// 1-based.
    pub page: u32,
    pub has_more: bool,
    pub total: u64,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self::new(CatalogQuery::All)
    }
}

impl BrowseState {
    pub fn new(query: CatalogQuery) -> Self {
        Self {
            query,
            page: 1,
            has_more: false,
            total: 0,
        }
    }

    /// Query mode for the grid inputs: search text wins over language,
    /// and with neither the full listing is shown.
    pub fn select_mode(search: Option<&str>, language: Option<&str>) -> CatalogQuery {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let language = language.map(str::trim).filter(|s| !s.is_empty());
        match (search, language) {
            (Some(text), _) => CatalogQuery::Search(text.to_string()),
            (None, Some(code)) => CatalogQuery::Language(code.to_string()),
            (None, None) => CatalogQuery::All,
        }
    }

    /// Switch mode and go back to page 1.
    pub fn set_query(&mut self, query: CatalogQuery) {
        self.query = query;
        self.page = 1;
        self.has_more = false;
        self.total = 0;
    }

    /// Advance when the last result said more pages exist.
    pub fn next_page(&mut self) -> bool {
        if self.has_more {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`. No upper bound; 0 is treated as 1.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Record pagination facts from a loaded page.
    pub fn apply(&mut self, result: &PageResult) {
        self.has_more = result.has_more;
        self.total = result.total;
    }

    pub fn total_pages(&self, per_page: u32) -> u64 {
        if per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(per_page))
    }
}

/// Identifies one issued request. Only the most recent ticket is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestTicket(pub u64);

/// Hands out tickets so late responses from superseded requests can be dropped.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request; every earlier ticket becomes stale.
    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    /// Retire the outstanding ticket without starting a new request.
    /// Call whenever the query or page changes.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }
}
