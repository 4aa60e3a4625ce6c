use super::slug::slugify;
use crate::core::config::FeedConfig;
use crate::core::constants::USER_AGENT;
use crate::data::geojson::{validate_collection, RawFeature};
use crate::data::loader::fetch_json_with_retry;
use crate::http::{HttpRequest, HttpTransport};
use crate::Result;
use serde::Serialize;

/// One detail page of the guide site
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideItem {
    pub item_id: String,
    pub pin_id: String,
    pub slug: String,
    pub title: String,
    pub title_zh_tw: String,
    pub description_en: String,
    pub description_zh_tw: String,
    pub main_image_url: Option<String>,
}

impl GuideItem {
    /// `None` for features without an id
    pub fn from_feature(feature: &RawFeature) -> Option<Self> {
        let item_id = feature.text("id")?;
        let title = feature.text("title").unwrap_or_default();
        Some(Self {
            pin_id: feature.text("pin_id").unwrap_or_else(|| item_id.clone()),
            slug: slugify(&title),
            title,
            title_zh_tw: feature.text("title_zh_tw").unwrap_or_default(),
            description_en: feature.text("description_en").unwrap_or_default(),
            description_zh_tw: feature.text("description_zh_tw").unwrap_or_default(),
            main_image_url: feature.text("photo_url"),
            item_id,
        })
    }
}

async fn try_fetch(transport: &dyn HttpTransport, feed: &FeedConfig) -> Result<Vec<GuideItem>> {
    let config = feed.guide();
    let request = HttpRequest::get(config.url.as_str())
        .header("User-Agent", USER_AGENT)
        .timeout(config.timeout);

    let payload = fetch_json_with_retry(transport, request, &config.retry).await?;
    let items = validate_collection(payload)?
        .into_iter()
        .filter_map(|value| serde_json::from_value::<RawFeature>(value).ok())
        .filter_map(|feature| GuideItem::from_feature(&feature))
        .collect();
    Ok(items)
}

/// Fetches the guide items from the feed.
///
/// Uses the feed's retry policy with a 10 second timeout per attempt. Any
/// failure yields an empty list.
pub async fn fetch_guide_items(transport: &dyn HttpTransport, feed: &FeedConfig) -> Vec<GuideItem> {
    match try_fetch(transport, feed).await {
        Ok(items) => {
            log::info!("Found {} guide items", items.len());
            items
        }
        Err(e) => {
            log::error!("Failed to fetch guide data: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RetryPolicy;
    use crate::http::mock::ScriptedTransport;
    use serde_json::json;
    use std::time::Duration;

    fn feed() -> FeedConfig {
        FeedConfig {
            url: "https://feeds.example.com/pins.geojson".to_string(),
            retry: RetryPolicy::for_testing(),
            ..FeedConfig::default()
        }
    }

    #[tokio::test]
    async fn test_guide_items_skip_missing_ids() {
        let body = json!({
            "type": "FeatureCollection",
            "features": [
                {"properties": {"id": 1, "title": "Shuri Castle", "photo_url": "https://example.com/s.jpg"}},
                {"properties": {"title": "No Id"}},
                {"properties": {"id": "", "title": "Empty Id"}},
                {"properties": {"id": "3", "pin_id": "p3", "title": "Naha Airport"}, "geometry": null}
            ]
        });
        let transport = ScriptedTransport::always(200, body.to_string());

        let items = fetch_guide_items(&transport, &feed()).await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item_id, "1");
        assert_eq!(items[0].pin_id, "1");
        assert_eq!(items[0].slug, "shuri-castle");
        assert_eq!(items[0].main_image_url.as_deref(), Some("https://example.com/s.jpg"));
        assert_eq!(items[1].pin_id, "p3");

        let request = &transport.requests()[0];
        assert_eq!(request.header_value("user-agent"), Some(USER_AGENT));
        assert_eq!(request.timeout, Some(Duration::from_secs(10)));
    }

    #[tokio::test]
    async fn test_guide_failure_is_empty() {
        let transport = ScriptedTransport::always(500, "down");
        assert!(fetch_guide_items(&transport, &feed()).await.is_empty());
        assert_eq!(transport.request_count(), 3);

        let wrong_shape = ScriptedTransport::always(200, r#"{"type": "Feature"}"#);
        assert!(fetch_guide_items(&wrong_shape, &feed()).await.is_empty());
    }
}
