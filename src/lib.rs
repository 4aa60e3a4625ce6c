//! # pinmap
//!
//! Data pipeline behind a tourism point-of-interest map.
//!
//! The library loads a GeoJSON feed of places, normalizes categories and
//! localized fields, derives the visible set from the selected categories,
//! ranks places against free-text search, and manages per-user favorites
//! behind an OAuth2 session. Rendering is left to whatever map widget hosts
//! it; the [`view`] module produces the marker and popup models that widget
//! consumes.

pub mod app;
pub mod auth;
pub mod category;
pub mod core;
pub mod data;
pub mod favorites;
pub mod http;
pub mod i18n;
pub mod prelude;
pub mod search;
pub mod sitemap;
pub mod spatial;
pub mod storage;
pub mod view;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::AppConfig,
    geo::{LatLng, LatLngBounds},
};

pub use data::{
    loader::{DataLoader, LoadReport, MapData},
    location::Location,
    normalize::normalize,
};

pub use category::{classifier::classify, registry::Category};

pub use search::{filter::visible, scoring::search};

pub use auth::session::SessionManager;
pub use favorites::client::FavoritesClient;
pub use i18n::language::{Language, LanguageStore};
pub use storage::preferences::PreferenceStore;

pub use app::TourMap;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, PinmapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum PinmapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Failed to fetch data after {attempts} attempts. Last error: {last_error}")]
    RetriesExhausted { attempts: usize, last_error: String },

    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PinmapError {
    /// Whether a failed request is worth repeating.
    ///
    /// Network and HTTP status failures are transient; malformed payloads
    /// and authentication problems are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Http { .. } | Self::Timeout { .. } | Self::Io(_)
        )
    }
}

impl From<url::ParseError> for PinmapError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}

/// Error type alias for convenience
pub type Error = PinmapError;
