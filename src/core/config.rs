//! Configuration for the feed loader, identity provider, favorites API and
//! companion site.
//!
//! Defaults point at the production deployment. [`AppConfig::from_env`]
//! overrides individual endpoints from `PINMAP_*` environment variables.

use crate::core::constants::{FEED_VERSION, GUIDE_FETCH_TIMEOUT_MS, INITIAL_BACKOFF_MS, MAX_FETCH_ATTEMPTS};
use crate::{Error, Result};
use std::time::Duration;
use url::Url;

const DEFAULT_GEOJSON_URL: &str =
    "https://s3geojsonnew.s3.ap-southeast-2.amazonaws.com/Geojson3.23.geojson";
const DEFAULT_AUTH_DOMAIN: &str = "ap-southeast-2usngbi9wi.auth.ap-southeast-2.amazoncognito.com";
const DEFAULT_CLIENT_ID: &str = "12nf22nqg8mpcq1q77nm5uqbls";
const DEFAULT_REDIRECT_URI: &str = "https://mop-okinawa.com";
const DEFAULT_API_ENDPOINT: &str = "https://fs9bcwy98j.execute-api.ap-southeast-2.amazonaws.com/dev";
const DEFAULT_SITE_URL: &str = "https://mop-okinawa.com";

/// Retry behaviour for idempotent fetches
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: usize,
    pub initial_delay_ms: u64,
    pub exponential_backoff: bool,
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16) as u32;
        let ms = if self.exponential_backoff {
            self.initial_delay_ms.saturating_mul(1u64 << exponent)
        } else {
            self.initial_delay_ms
        };
        Duration::from_millis(ms)
    }

    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay_ms: 0,
            exponential_backoff: false,
        }
    }

    pub fn for_testing() -> Self {
        Self {
            max_attempts: MAX_FETCH_ATTEMPTS,
            initial_delay_ms: 1,
            exponential_backoff: true,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_FETCH_ATTEMPTS,
            initial_delay_ms: INITIAL_BACKOFF_MS,
            exponential_backoff: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    /// Base URL of the GeoJSON feature collection
    pub url: String,
    /// Value of the `_v` cache-busting parameter
    pub version: String,
    pub retry: RetryPolicy,
    /// Per-attempt timeout; the map path runs without one
    pub timeout: Option<Duration>,
}

impl FeedConfig {
    /// Settings for the guide-data path: same feed, hard 10 second timeout.
    pub fn guide(&self) -> Self {
        Self {
            timeout: Some(Duration::from_millis(GUIDE_FETCH_TIMEOUT_MS)),
            ..self.clone()
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_GEOJSON_URL.to_string(),
            version: FEED_VERSION.to_string(),
            retry: RetryPolicy::default(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
    /// Hosted identity-provider domain, without scheme
    pub domain: String,
    pub client_id: String,
    pub redirect_uri: String,
}

impl AuthConfig {
    pub fn token_endpoint(&self) -> String {
        format!("https://{}/oauth2/token", self.domain)
    }

    /// Hosted login page that redirects back with `?code=...`
    pub fn login_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("https://{}/login", self.domain))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("scope", "email openid")
            .append_pair("redirect_uri", &self.redirect_uri);
        Ok(url)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_AUTH_DOMAIN.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FavoritesConfig {
    pub api_endpoint: String,
}

impl FavoritesConfig {
    pub fn favorites_url(&self) -> String {
        format!("{}/favorites", self.api_endpoint.trim_end_matches('/'))
    }
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub site_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub auth: AuthConfig,
    pub favorites: FavoritesConfig,
    pub site: SiteConfig,
}

impl AppConfig {
    /// Builds a configuration from defaults overridden by `PINMAP_*` variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("PINMAP_GEOJSON_URL") {
            config.feed.url = validate_feed_url(&url)?;
        }
        if let Some(domain) = lookup("PINMAP_AUTH_DOMAIN") {
            config.auth.domain = domain;
        }
        if let Some(client_id) = lookup("PINMAP_CLIENT_ID") {
            config.auth.client_id = client_id;
        }
        if let Some(redirect) = lookup("PINMAP_REDIRECT_URI") {
            config.auth.redirect_uri = redirect;
        }
        if let Some(endpoint) = lookup("PINMAP_API_ENDPOINT") {
            config.favorites.api_endpoint = endpoint;
        }
        if let Some(site) = lookup("PINMAP_SITE_URL") {
            config.site.site_url = site.trim_end_matches('/').to_string();
        }

        log::debug!("resolved configuration: feed={}", config.feed.url);
        Ok(config)
    }
}

/// Validates a feed URL, upgrading plain `http` to `https`.
pub fn validate_feed_url(raw: &str) -> Result<String> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| Error::InvalidUrl(format!("Invalid GeoJSON URL '{}': {}", raw, e)))?;

    match url.scheme() {
        "https" => {}
        "http" => {
            url.set_scheme("https")
                .map_err(|_| Error::InvalidUrl(format!("cannot upgrade '{}' to https", raw)))?;
        }
        other => {
            return Err(Error::InvalidUrl(format!(
                "unsupported scheme '{}' in GeoJSON URL",
                other
            )))
        }
    }

    Ok(url.to_string())
}
