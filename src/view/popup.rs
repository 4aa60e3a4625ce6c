use crate::core::constants::RESTAURANT_CATEGORY_ID;
use crate::core::geo::LatLng;
use crate::data::location::Location;
use crate::i18n::{translate, Language};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("invalid built-in pattern")
}

static HTML_TAG: Lazy<Regex> = Lazy::new(|| pattern(r"<[^>]+>"));
static HTML_ENTITY: Lazy<Regex> = Lazy::new(|| pattern(r"&[^;]+;"));
static BRACKETED: Lazy<Regex> = Lazy::new(|| pattern(r"\[.*?\]|［.*?］|【.*?】"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| pattern(r"\s+"));
static LINK: Lazy<Regex> = Lazy::new(|| pattern(r"\bhttps?://\S+\b"));

/// Strips markup, entities and bracketed editorial notes from a description
pub fn clean_description(description: &str) -> String {
    let text = HTML_TAG.replace_all(description, "");
    let text = HTML_ENTITY.replace_all(&text, "");
    let text = BRACKETED.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Links mentioned in an already cleaned description
pub fn description_links(cleaned: &str) -> Vec<String> {
    LINK.find_iter(cleaned).map(|m| m.as_str().to_string()).collect()
}

/// Google Maps directions to `destination`, from `origin` when known
pub fn directions_url(destination: &LatLng, origin: Option<&LatLng>) -> String {
    match origin {
        Some(origin) => format!(
            "https://www.google.com/maps/dir/?api=1&origin={},{}&destination={},{}",
            origin.lat, origin.lng, destination.lat, destination.lng
        ),
        None => format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}",
            destination.lat, destination.lng
        ),
    }
}

/// Translation key of the affiliate button for a category
pub fn action_label_key(category_id: &str) -> &'static str {
    if category_id == RESTAURANT_CATEGORY_ID {
        "action.seeDetails"
    } else {
        "action.bookNow"
    }
}

/// Content of the popup opened from a marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupModel {
    pub id: String,
    pub pin_id: String,
    pub title: String,
    pub address: String,
    pub category_name: String,
    pub category_icon_url: String,
    pub photo_url: Option<String>,
    pub description: String,
    pub links: Vec<String>,
    pub affiliate_link: Option<String>,
    /// Label of the affiliate button; present only with a link
    pub action_label: Option<String>,
    pub directions_url: String,
    pub directions_label: String,
    pub is_favorite: bool,
}

impl PopupModel {
    pub fn build(
        location: &Location,
        language: Language,
        user_position: Option<&LatLng>,
        is_favorite: bool,
    ) -> Self {
        let category = location.category();
        let description = clean_description(location.description_for(language));
        let affiliate_link = location.affiliate_link_for(language).map(str::to_string);
        let action_label = affiliate_link
            .as_ref()
            .map(|_| translate(action_label_key(category.id), language).to_string());

        Self {
            id: location.id.clone(),
            pin_id: location.pin_id.clone(),
            title: location.title_for(language).to_string(),
            address: location.address_for(language).to_string(),
            category_name: translate(category.name_key, language).to_string(),
            category_icon_url: category.marker_url(),
            photo_url: location.photo_url.clone(),
            links: description_links(&description),
            description,
            affiliate_link,
            action_label,
            directions_url: directions_url(&location.position, user_position),
            directions_label: translate("action.direction", language).to_string(),
            is_favorite,
        }
    }
}
