use crate::category::registry;
use crate::core::constants::{
    MARKER_ICON_ANCHOR, MARKER_ICON_SIZE, MARKER_POPUP_ANCHOR, MARKER_SHADOW_URL,
};
use crate::core::geo::LatLng;
use crate::data::location::Location;
use crate::i18n::Language;
use serde::Serialize;

/// Icon geometry shared by every category marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconSpec {
    pub icon_url: String,
    pub shadow_url: &'static str,
    pub size: (u32, u32),
    pub anchor: (u32, u32),
    pub popup_anchor: (i32, i32),
}

impl IconSpec {
    pub fn for_category(category_id: &str) -> Self {
        Self {
            icon_url: registry::resolve(category_id).marker_url(),
            shadow_url: MARKER_SHADOW_URL,
            size: MARKER_ICON_SIZE,
            anchor: MARKER_ICON_ANCHOR,
            popup_anchor: MARKER_POPUP_ANCHOR,
        }
    }
}

/// One pin on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerModel {
    pub id: String,
    pub pin_id: String,
    pub position: LatLng,
    pub icon: IconSpec,
    pub color: &'static str,
    /// Permanent title tooltip; `None` when marker titles are hidden
    pub label: Option<String>,
}

impl MarkerModel {
    pub fn from_location(location: &Location, language: Language, show_titles: bool) -> Self {
        let category = location.category();
        Self {
            id: location.id.clone(),
            pin_id: location.pin_id.clone(),
            position: location.position,
            icon: IconSpec::for_category(category.id),
            color: category.color,
            label: show_titles.then(|| location.title_for(language).to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::location::{Descriptions, LocalizedText};

    #[test]
    fn test_marker_label_follows_setting() {
        let location = Location {
            id: "7".to_string(),
            pin_id: "pin-7".to_string(),
            position: LatLng::new(26.2, 127.7),
            title: LocalizedText::new("Naha Airport", Some("那霸機場".to_string())),
            address: LocalizedText::default(),
            description: Descriptions::default(),
            category_id: "9",
            photo_url: None,
            affiliate_link: None,
            affiliate_link_tw: None,
            language: Language::En,
        };

        let shown = MarkerModel::from_location(&location, Language::ZhTw, true);
        assert_eq!(shown.label.as_deref(), Some("那霸機場"));
        assert_eq!(shown.color, "#8000ff");
        assert!(shown.icon.icon_url.ends_with("marker-icon-2x-violet.png"));

        let hidden = MarkerModel::from_location(&location, Language::En, false);
        assert_eq!(hidden.label, None);
    }
}
