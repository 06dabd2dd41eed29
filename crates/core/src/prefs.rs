//! Per-device preferences: reading history, favorites, user settings.
//!
//! Values are JSON blobs in a [`BlobStore`]. Nothing here fails: a missing,
//! unreadable or unparsable value reads as the default, and a failed write
//! is logged and otherwise ignored.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::store::BlobStore;

pub const HISTORY_KEY: &str = "reading-history";
pub const FAVORITES_KEY: &str = "favorites";
pub const SETTINGS_KEY: &str = "user-settings";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Language code; empty means no preference.
    #[serde(default)]
    pub preferred_language: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
}

fn default_font_size() -> u32 {
    16
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            preferred_language: String::new(),
            theme: Theme::Light,
            font_size: default_font_size(),
        }
    }
}

impl UserSettings {
    /// Set a field from its string form (`preferred_language`, `theme`, `font_size`).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "preferred_language" => self.preferred_language = value.trim().to_string(),
            "theme" => self.theme = value.parse().map_err(|_| invalid())?,
            "font_size" => self.font_size = value.parse().map_err(|_| invalid())?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

pub struct Preferences<S> {
    store: S,
}

impl<S: BlobStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored value under `key`, or `default` when absent or unreadable.
    pub fn read_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!(key, "Error reading preference: {}", e);
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, "Discarding unparsable preference: {}", e);
                default
            }
        }
    }

    pub fn write<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, "Error encoding preference: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(key, &json) {
            tracing::warn!(key, "Error saving preference: {}", e);
        }
    }

    /// Book ids, most recently read first.
    pub fn history(&self) -> Vec<u64> {
        self.read_or(HISTORY_KEY, Vec::new())
    }

    /// Move `id` to the front of the history.
    pub fn record_read(&self, id: u64) -> Vec<u64> {
        let mut history = self.history();
        history.retain(|h| *h != id);
        history.insert(0, id);
        self.write(HISTORY_KEY, &history);
        history
    }

    pub fn clear_history(&self) {
        self.write(HISTORY_KEY, &Vec::<u64>::new());
    }

    pub fn favorites(&self) -> Vec<u64> {
        self.read_or(FAVORITES_KEY, Vec::new())
    }

    pub fn is_favorite(&self, id: u64) -> bool {
        self.favorites().contains(&id)
    }

    pub fn add_favorite(&self, id: u64) -> Vec<u64> {
        let mut favorites = self.favorites();
        if !favorites.contains(&id) {
            favorites.push(id);
            self.write(FAVORITES_KEY, &favorites);
        }
        favorites
    }

    pub fn remove_favorite(&self, id: u64) -> Vec<u64> {
        let mut favorites = self.favorites();
        let before = favorites.len();
        favorites.retain(|f| *f != id);
        if favorites.len() != before {
            self.write(FAVORITES_KEY, &favorites);
        }
        favorites
    }

    /// Returns whether `id` is a favorite afterwards.
    pub fn toggle_favorite(&self, id: u64) -> bool {
        if self.is_favorite(id) {
            self.remove_favorite(id);
            false
        } else {
            self.add_favorite(id);
            true
        }
    }

    pub fn settings(&self) -> UserSettings {
        self.read_or(SETTINGS_KEY, UserSettings::default())
    }

    pub fn save_settings(&self, settings: &UserSettings) {
        self.write(SETTINGS_KEY, settings);
    }
}
