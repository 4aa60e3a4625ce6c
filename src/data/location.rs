use crate::category::registry::{self, Category};
use crate::core::geo::LatLng;
use crate::i18n::Language;
use serde::Serialize;

/// A field with a primary value and an optional Traditional Chinese variant
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LocalizedText {
    pub primary: String,
    pub zh_tw: Option<String>,
}

impl LocalizedText {
    pub fn new(primary: impl Into<String>, zh_tw: Option<String>) -> Self {
        Self {
            primary: primary.into(),
            zh_tw,
        }
    }

    /// The secondary variant for `ZhTw` when present, else the primary value
    pub fn get(&self, language: Language) -> &str {
        match (&self.zh_tw, language.is_secondary()) {
            (Some(zh_tw), true) if !zh_tw.is_empty() => zh_tw.as_str(),
            _ => self.primary.as_str(),
        }
    }
}

/// Per-language description variants
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Descriptions {
    pub default: String,
    pub en: Option<String>,
    pub zh_tw: Option<String>,
    pub ja: Option<String>,
    pub ko: Option<String>,
}

impl Descriptions {
    pub fn for_language(&self, language: Language) -> &str {
        let variant = match language {
            Language::En => &self.en,
            Language::ZhTw => &self.zh_tw,
        };
        variant
            .as_deref()
            .filter(|text| !text.is_empty())
            .unwrap_or(self.default.as_str())
    }
}

/// A normalized point of interest.
///
/// Built once per load cycle by [`crate::data::normalize::normalize`];
/// `category_id` is always a registry key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    /// Display identifier
    pub id: String,
    /// Key used by the favorites service
    pub pin_id: String,
    pub position: LatLng,
    pub title: LocalizedText,
    pub address: LocalizedText,
    pub description: Descriptions,
    pub category_id: &'static str,
    pub photo_url: Option<String>,
    pub affiliate_link: Option<String>,
    pub affiliate_link_tw: Option<String>,
    /// Language the location was normalized for
    pub language: Language,
}

impl Location {
    pub fn category(&self) -> &'static Category {
        registry::resolve(self.category_id)
    }

    /// Title in the language the location was normalized for
    pub fn display_title(&self) -> &str {
        self.title.get(self.language)
    }

    pub fn display_address(&self) -> &str {
        self.address.get(self.language)
    }

    pub fn title_for(&self, language: Language) -> &str {
        self.title.get(language)
    }

    pub fn address_for(&self, language: Language) -> &str {
        self.address.get(language)
    }

    pub fn description_for(&self, language: Language) -> &str {
        self.description.for_language(language)
    }

    /// Affiliate link for `language`; `ZhTw` prefers the `_tw` link
    pub fn affiliate_link_for(&self, language: Language) -> Option<&str> {
        match language {
            Language::ZhTw => self
                .affiliate_link_tw
                .as_deref()
                .or(self.affiliate_link.as_deref()),
            Language::En => self.affiliate_link.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Location {
        Location {
            id: "10".to_string(),
            pin_id: "pin-10".to_string(),
            position: LatLng::new(26.2, 127.7),
            title: LocalizedText::new("Tsuboya Pottery Street", Some("壺屋陶器街".to_string())),
            address: LocalizedText::new("Tsuboya, Naha", Some(String::new())),
            description: Descriptions {
                default: "やちむん通り".to_string(),
                en: Some("Pottery street".to_string()),
                ..Descriptions::default()
            },
            category_id: "1",
            photo_url: None,
            affiliate_link: Some("https://example.com/en".to_string()),
            affiliate_link_tw: None,
            language: Language::ZhTw,
        }
    }

    #[test]
    fn test_localized_fields() {
        let location = sample();
        assert_eq!(location.display_title(), "壺屋陶器街");
        assert_eq!(location.title_for(Language::En), "Tsuboya Pottery Street");
        // Empty secondary variant falls back to primary
        assert_eq!(location.display_address(), "Tsuboya, Naha");
    }

    #[test]
    fn test_description_fallback() {
        let location = sample();
        assert_eq!(location.description_for(Language::En), "Pottery street");
        assert_eq!(location.description_for(Language::ZhTw), "やちむん通り");
    }

    #[test]
    fn test_affiliate_link_fallback() {
        let mut location = sample();
        assert_eq!(location.affiliate_link_for(Language::ZhTw), Some("https://example.com/en"));
        location.affiliate_link_tw = Some("https://example.com/tw".to_string());
        assert_eq!(location.affiliate_link_for(Language::ZhTw), Some("https://example.com/tw"));
        assert_eq!(location.affiliate_link_for(Language::En), Some("https://example.com/en"));
    }
}
