//! Raw feature → [`Location`].

use super::geojson::RawFeature;
use super::location::{Descriptions, LocalizedText, Location};
use crate::category::{classifier, registry};
use crate::core::constants::DEFAULT_CATEGORY_ID;
use crate::i18n::Language;

/// Photo fields, in order of preference
const PHOTO_FIELDS: [&str; 4] = ["photo_url", "pic", "image_url", "image"];

/// Resolves the category id of a raw feature.
///
/// `original_data.category` wins over `category`; either must name a
/// registered category. Features carrying no category at all go through the
/// keyword classifier. The deployed web normalizer defaults those to "1"
/// instead.
pub fn resolve_category(raw: &RawFeature) -> &'static str {
    if let Some(original) = raw.nested_text("original_data", "category") {
        return registry::resolve(original.trim()).id;
    }

    if let Some(direct) = raw.text("category") {
        return match registry::lookup(direct.trim()) {
            Some(category) => category.id,
            None => DEFAULT_CATEGORY_ID,
        };
    }

    classifier::classify(
        &raw.text("title").unwrap_or_default(),
        &raw.text("description").unwrap_or_default(),
        &raw.text("address").unwrap_or_default(),
    )
}

/// Normalizes one feature for `language`.
///
/// Pure: the same feature and language always yield the same location.
/// Features without a usable point geometry are placed at the origin;
/// the loader filters those out before normalizing.
pub fn normalize(raw: &RawFeature, language: Language) -> Location {
    let id = raw.text("id").unwrap_or_default();
    let pin_id = raw.text("pin_id").unwrap_or_else(|| id.clone());

    Location {
        pin_id,
        position: raw.position().unwrap_or_default(),
        title: LocalizedText::new(
            raw.text("title").unwrap_or_default(),
            raw.text("title_zh_tw"),
        ),
        address: LocalizedText::new(
            raw.text("address").unwrap_or_default(),
            raw.first_text(&["address_zh-tw", "address_zh_tw"]),
        ),
        description: Descriptions {
            default: raw.text("description").unwrap_or_default(),
            en: raw.text("description_en"),
            zh_tw: raw.text("description_zh_tw"),
            ja: raw.text("description_ja"),
            ko: raw.text("description_ko"),
        },
        category_id: resolve_category(raw),
        photo_url: raw.first_text(&PHOTO_FIELDS),
        affiliate_link: raw.text("affiliate_link"),
        affiliate_link_tw: raw.text("affiliate_link_tw"),
        language,
        id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(properties: serde_json::Value) -> RawFeature {
        RawFeature::from_value(json!({
            "type": "Feature",
            "properties": properties,
            "geometry": {"type": "Point", "coordinates": [127.68, 26.21]}
        }))
        .unwrap()
    }

    #[test]
    fn test_explicit_category_is_kept() {
        for category in registry::all() {
            let raw = feature(json!({"id": "1", "title": "Anything", "category": category.id}));
            assert_eq!(normalize(&raw, Language::En).category_id, category.id);
        }
    }

    #[test]
    fn test_numeric_category() {
        let raw = feature(json!({"id": 5, "category": 5}));
        assert_eq!(normalize(&raw, Language::En).category_id, "5");
    }

    #[test]
    fn test_unknown_category_falls_back_to_default() {
        let raw = feature(json!({"id": "1", "title": "Okinawa Resort Hotel", "category": "7"}));
        assert_eq!(normalize(&raw, Language::En).category_id, "1");
    }

    #[test]
    fn test_original_data_category_wins() {
        let raw = feature(json!({
            "id": "1",
            "category": "3",
            "original_data": {"category": "5"}
        }));
        assert_eq!(normalize(&raw, Language::En).category_id, "5");
    }

    #[test]
    fn test_missing_category_uses_classifier() {
        let raw = feature(json!({"id": "1", "title": "Okinawa Resort Hotel"}));
        assert_eq!(normalize(&raw, Language::En).category_id, "3");

        let plain = feature(json!({"id": "2", "title": "Shuri Castle"}));
        assert_eq!(normalize(&plain, Language::En).category_id, "1");
    }

    #[test]
    fn test_photo_resolution_order() {
        let raw = feature(json!({"id": "1", "photo_url": "", "pic": "", "image_url": "b.jpg", "image": "c.jpg"}));
        assert_eq!(normalize(&raw, Language::En).photo_url.as_deref(), Some("b.jpg"));

        let raw = feature(json!({"id": "1", "photo_url": "a.jpg", "pic": "p.jpg"}));
        assert_eq!(normalize(&raw, Language::En).photo_url.as_deref(), Some("a.jpg"));

        let raw = feature(json!({"id": "1"}));
        assert_eq!(normalize(&raw, Language::En).photo_url, None);
    }

    #[test]
    fn test_localized_title_and_address() {
        let raw = feature(json!({
            "id": "1",
            "title": "Kokusai Street",
            "title_zh_tw": "國際通",
            "address": "Naha",
            "address_zh-tw": ""
        }));

        let zh = normalize(&raw, Language::ZhTw);
        assert_eq!(zh.display_title(), "國際通");
        assert_eq!(zh.display_address(), "Naha");

        let en = normalize(&raw, Language::En);
        assert_eq!(en.display_title(), "Kokusai Street");
    }

    #[test]
    fn test_pin_id_falls_back_to_id() {
        let raw = feature(json!({"id": 42}));
        assert_eq!(normalize(&raw, Language::En).pin_id, "42");

        let raw = feature(json!({"id": 42, "pin_id": "pin-abc"}));
        assert_eq!(normalize(&raw, Language::En).pin_id, "pin-abc");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let raw = feature(json!({"id": "9", "title": "Naha Airport", "category": "9"}));
        assert_eq!(normalize(&raw, Language::ZhTw), normalize(&raw, Language::ZhTw));
    }
}
