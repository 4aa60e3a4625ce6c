use super::geojson::{parse_features, validate_collection};
use super::location::Location;
use super::normalize::normalize;
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::{FeedConfig, RetryPolicy};
use crate::http::{HttpRequest, HttpTransport};
use crate::i18n::{translate, Language};
use crate::{Error, Result};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Headers that keep intermediaries from serving a stale feed
pub const NO_CACHE_HEADERS: [(&str, &str); 4] = [
    (
        "Cache-Control",
        "no-store, no-cache, must-revalidate, proxy-revalidate, max-age=0",
    ),
    ("Pragma", "no-cache"),
    ("Expires", "0"),
    ("Surrogate-Control", "no-store"),
];

/// Sends `request` until it yields a JSON body, retrying transient failures.
///
/// Network errors and non-2xx statuses are retried up to
/// `policy.max_attempts` with the policy's backoff. A body that is not JSON
/// fails immediately. After the last attempt the error names the last cause.
///
/// Backoff waits use `tokio::time::sleep`, so a retrying call must run
/// inside a Tokio runtime with the timer enabled. This does not hold on
/// `wasm32` builds; use `RetryPolicy::no_retry()` there.
pub async fn fetch_json_with_retry(
    transport: &dyn HttpTransport,
    request: HttpRequest,
    policy: &RetryPolicy,
) -> Result<Value> {
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error: Option<Error> = None;

    for attempt in 1..=max_attempts {
        log::info!(
            "Fetching data (attempt {}/{}): {}",
            attempt,
            max_attempts,
            request.url
        );

        let result = match transport.send(request.clone()).await {
            Ok(response) => response.error_for_status(&request.url),
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => {
                let value: Value = response.json().map_err(|e| {
                    Error::InvalidData(format!("response from {} is not JSON: {}", request.url, e))
                })?;
                log::info!("Successfully fetched data on attempt {}", attempt);
                return Ok(value);
            }
            Err(e) if e.is_transient() => {
                log::warn!("Fetch attempt {} failed: {}", attempt, e);
                last_error = Some(e);
                if attempt < max_attempts {
                    let wait = policy.delay_after(attempt);
                    log::debug!("Waiting {}ms before retry...", wait.as_millis());
                    tokio::time::sleep(wait).await;
                }
            }
            Err(e) => return Err(e),
        }
    }

    log::error!("giving up on {} after {} attempts", request.url, max_attempts);
    Err(Error::RetriesExhausted {
        attempts: max_attempts,
        last_error: last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string()),
    })
}

/// Appends the `_v` version tag and `_t` timestamp to a feed URL
pub fn feed_url(base: &str, version: &str, now_ms: i64) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| Error::InvalidUrl(format!("Failed to create valid GeoJSON URL: {}", e)))?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "_v" && k != "_t")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        for (k, v) in &retained {
            query.append_pair(k, v);
        }
        query.append_pair("_v", version);
        query.append_pair("_t", &now_ms.to_string());
    }

    Ok(url)
}

/// Outcome of a successful load
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadReport {
    pub locations: Vec<Location>,
    /// Malformed features that were dropped
    pub skipped: usize,
}

impl LoadReport {
    pub fn is_partial(&self) -> bool {
        self.skipped > 0
    }
}

/// Map-view state of the feed
#[derive(Debug, Clone, PartialEq)]
pub enum MapData {
    Loading,
    Ready(LoadReport),
    Failed { message: String },
}

impl MapData {
    /// Currently usable locations; empty unless ready
    pub fn locations(&self) -> &[Location] {
        match self {
            Self::Ready(report) => &report.locations,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Advisory banner text: an error, or a partial-data notice
    pub fn banner(&self, language: Language) -> Option<String> {
        match self {
            Self::Failed { message } => Some(format!(
                "{}: {}",
                translate("message.loadFailed", language),
                message
            )),
            Self::Ready(report) if report.is_partial() => Some(format!(
                "{} ({})",
                translate("message.partialData", language),
                report.skipped
            )),
            _ => None,
        }
    }
}

/// Fetches and normalizes the location feed
#[derive(Clone)]
pub struct DataLoader {
    transport: Arc<dyn HttpTransport>,
    config: FeedConfig,
    clock: Arc<dyn Clock>,
}

impl DataLoader {
    pub fn new(transport: Arc<dyn HttpTransport>, config: FeedConfig) -> Self {
        Self::with_clock(transport, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        transport: Arc<dyn HttpTransport>,
        config: FeedConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Fetches the validated feature array from `base_url`
    pub async fn fetch_features(&self, base_url: &str) -> Result<Vec<Value>> {
        let url = feed_url(base_url, &self.config.version, self.clock.now_ms())?;

        let mut request = HttpRequest::get(url.as_str()).timeout(self.config.timeout);
        for (name, value) in NO_CACHE_HEADERS {
            request = request.header(name, value);
        }

        let payload =
            fetch_json_with_retry(self.transport.as_ref(), request, &self.config.retry).await?;
        validate_collection(payload)
    }

    /// Loads and normalizes every usable feature for `language`
    pub async fn load(&self, base_url: &str, language: Language) -> Result<LoadReport> {
        let features = self.fetch_features(base_url).await?;
        let (features, skipped) = parse_features(features);

        let locations: Vec<Location> = features
            .iter()
            .map(|feature| normalize(feature, language))
            .collect();

        if skipped > 0 {
            log::warn!(
                "loaded {} locations from {}, skipped {} malformed features",
                locations.len(),
                base_url,
                skipped
            );
        } else {
            log::info!("loaded {} locations from {}", locations.len(), base_url);
        }

        Ok(LoadReport { locations, skipped })
    }

    /// Like [`DataLoader::load`], degrading any failure to [`MapData::Failed`]
    pub async fn load_map_data(&self, base_url: &str, language: Language) -> MapData {
        match self.load(base_url, language).await {
            Ok(report) => MapData::Ready(report),
            Err(e) => {
                log::error!("Error fetching locations from {}: {}", base_url, e);
                MapData::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}
