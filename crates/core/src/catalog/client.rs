//! Async HTTP client for the catalog index (Gutendex).
//!
//! Every call is an independent round trip: the client holds no cursor or
//! query state, does not retry, and does not de-duplicate overlapping calls.

use std::time::Duration;

use url::Url;

use crate::catalog::{book_url, parse_base_url, parse_book, parse_page, BookLookup, CatalogQuery};
use crate::config::ApiConfig;
use crate::error::CatalogError;
use crate::record::PageResult;

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Client for the public index with default settings.
    pub fn new() -> Result<Self, CatalogError> {
        Self::from_config(&ApiConfig::default())
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, CatalogError> {
        Self::from_config(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, CatalogError> {
        let base_url = parse_base_url(&config.base_url)?;
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        // No timeout unless configured; the transport default applies.
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder.build().map_err(|e| CatalogError::Transport {
            action: "build HTTP client",
            detail: e.to_string(),
        })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Run any listing query for a 1-based `page`.
    pub async fn query(&self, query: &CatalogQuery, page: u32) -> Result<PageResult, CatalogError> {
        let url = query.url(&self.base_url, page);
        tracing::debug!(%url, "Requesting catalog page");
        let result = match self.get_text(url, query.action()).await {
            Ok(body) => parse_page(&body, query),
            Err(e) => Err(e),
        };
        if let Err(ref e) = result {
            tracing::error!("{}", e);
        }
        result
    }

    pub async fn list(&self, page: u32) -> Result<PageResult, CatalogError> {
        self.query(&CatalogQuery::All, page).await
    }

    pub async fn search(&self, text: &str, page: u32) -> Result<PageResult, CatalogError> {
        self.query(&CatalogQuery::Search(text.to_string()), page).await
    }

    pub async fn by_language(&self, code: &str, page: u32) -> Result<PageResult, CatalogError> {
        self.query(&CatalogQuery::Language(code.to_string()), page).await
    }

    pub async fn by_topic(&self, topic: &str, page: u32) -> Result<PageResult, CatalogError> {
        self.query(&CatalogQuery::Topic(topic.to_string()), page).await
    }

    /// Listing page re-sorted by download count, most downloaded first.
    pub async fn popular(&self, page: u32) -> Result<PageResult, CatalogError> {
        self.query(&CatalogQuery::Popular, page).await
    }

    /// Fetch one book. Never fails: problems surface as `NotFound` or
    /// `Unavailable` and are logged.
    pub async fn fetch_book(&self, id: u64) -> BookLookup {
        let url = book_url(&self.base_url, id);
        tracing::debug!(%url, "Requesting book");
        let result = match self.get_text(url, "fetch book").await {
            Ok(body) => parse_book(&body),
            Err(e) => Err(e),
        };
        match result {
            Ok(book) => BookLookup::Found(book),
            Err(e) if e.is_not_found() => {
                tracing::warn!(id, "Book not found");
                BookLookup::NotFound
            }
            Err(e) => {
                tracing::warn!(id, "Error fetching book: {}", e);
                BookLookup::Unavailable(e)
            }
        }
    }

    /// Raw bytes behind a resolved download URL.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        const ACTION: &str = "download book";
        tracing::debug!(url, "Downloading");
        let resp = self.send(self.http.get(url), ACTION).await?;
        let bytes = resp.bytes().await.map_err(|e| CatalogError::Transport {
            action: ACTION,
            detail: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }

    async fn get_text(&self, url: Url, action: &'static str) -> Result<String, CatalogError> {
        let request = self.http.get(url).header(reqwest::header::ACCEPT, "application/json");
        let resp = self.send(request, action).await?;
        resp.text().await.map_err(|e| CatalogError::Transport {
            action,
            detail: e.to_string(),
        })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        action: &'static str,
    ) -> Result<reqwest::Response, CatalogError> {
        let resp = request.send().await.map_err(|e| CatalogError::Transport {
            action,
            detail: e.to_string(),
        })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                action,
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }
}
