pub mod browse;
pub mod catalog;
pub mod config;
pub mod display;
pub mod error;
pub mod filename;
pub mod normalize;
pub mod prefs;
pub mod record;
pub mod store;
pub mod zoom;

#[cfg(feature = "http")]
pub use catalog::client::CatalogClient;

pub mod prelude {
    pub use crate::catalog::{BookLookup, CatalogQuery};
    pub use crate::error::*;
    pub use crate::record::*;
}
