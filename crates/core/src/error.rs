/// Errors from catalog queries against the remote index.
///
/// `action` is the generic wording for the operation that failed
/// ("fetch books", "search books", ...), so every variant renders as
/// `Failed to <action>: ...`.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to {action}: network error: {detail}")]
    Transport { action: &'static str, detail: String },

    #[error("Failed to {action}: index responded with status {status}")]
    Status { action: &'static str, status: u16 },

    #[error("Failed to {action}: malformed response: {detail}")]
    Decode { action: &'static str, detail: String },

    #[error("Invalid index URL {url}: {detail}")]
    InvalidBaseUrl { url: String, detail: String },
}

impl CatalogError {
    /// True when the index answered with 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Status { status: 404, .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
