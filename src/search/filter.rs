use crate::data::location::Location;
use crate::storage::preferences::Preferences;
use fxhash::FxHashSet;

/// Locations whose category is selected, in input order.
///
/// An empty selection shows nothing.
pub fn visible<'a, S>(locations: &'a [Location], selected: &S) -> Vec<&'a Location>
where
    S: SelectedCategories + ?Sized,
{
    locations
        .iter()
        .filter(|location| selected.is_selected(location.category_id))
        .collect()
}

/// Anything that can answer "is this category selected?"
pub trait SelectedCategories {
    fn is_selected(&self, category_id: &str) -> bool;
}

impl SelectedCategories for FxHashSet<String> {
    fn is_selected(&self, category_id: &str) -> bool {
        self.contains(category_id)
    }
}

impl SelectedCategories for [String] {
    fn is_selected(&self, category_id: &str) -> bool {
        self.iter().any(|id| id == category_id)
    }
}

impl SelectedCategories for [&str] {
    fn is_selected(&self, category_id: &str) -> bool {
        self.contains(&category_id)
    }
}

/// The user's category filter, persisted as `selectedCategories`.
///
/// Keeps the order in which categories were selected so the persisted
/// list stays stable across toggles.
#[derive(Debug, Clone)]
pub struct CategorySelection {
    ids: Vec<String>,
    preferences: Preferences,
}

impl CategorySelection {
    /// Reads the persisted selection
    pub fn load(preferences: Preferences) -> Self {
        let mut ids: Vec<String> = Vec::new();
        for id in preferences.selected_categories() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { ids, preferences }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, category_id: &str) -> bool {
        self.ids.iter().any(|id| id == category_id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flips one category and persists; returns whether it is now selected
    pub fn toggle(&mut self, category_id: &str) -> bool {
        let selected = if let Some(pos) = self.ids.iter().position(|id| id == category_id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(category_id.to_string());
            true
        };
        self.persist();
        selected
    }

    /// Ensures a category is selected, e.g. when a search result is chosen
    pub fn select(&mut self, category_id: &str) {
        if !self.contains(category_id) {
            self.ids.push(category_id.to_string());
            self.persist();
        }
    }

    fn persist(&self) {
        log::debug!("selected categories: {:?}", self.ids);
        self.preferences.set_selected_categories(&self.ids);
    }
}

impl SelectedCategories for CategorySelection {
    fn is_selected(&self, category_id: &str) -> bool {
        self.contains(category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::data::location::{Descriptions, LocalizedText};
    use crate::i18n::Language;
    use crate::storage::PreferenceStore;

    fn location(id: &str, category_id: &'static str) -> Location {
        Location {
            id: id.to_string(),
            pin_id: id.to_string(),
            position: LatLng::new(26.2, 127.7),
            title: LocalizedText::new(id, None),
            address: LocalizedText::default(),
            description: Descriptions::default(),
            category_id,
            photo_url: None,
            affiliate_link: None,
            affiliate_link_tw: None,
            language: Language::En,
        }
    }

    #[test]
    fn test_empty_selection_shows_nothing() {
        let locations = vec![location("a", "1"), location("b", "4")];
        let none: FxHashSet<String> = FxHashSet::default();
        assert!(visible(&locations, &none).is_empty());
    }

    #[test]
    fn test_visible_membership() {
        let locations = vec![location("a", "1"), location("b", "4"), location("c", "9")];
        let selected: &[&str] = &["4", "9"];
        let ids: Vec<&str> = visible(&locations, selected)
            .into_iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_selection_toggle_persists() {
        let preferences = Preferences::new(PreferenceStore::in_memory(), "https://example.com/a.geojson");
        let mut selection = CategorySelection::load(preferences.clone());
        assert_eq!(selection.ids(), ["1", "4", "9"]);

        assert!(!selection.toggle("4"));
        assert!(selection.toggle("5"));
        assert_eq!(preferences.selected_categories(), vec!["1", "9", "5"]);

        selection.select("5");
        selection.select("2");
        assert_eq!(CategorySelection::load(preferences).ids(), ["1", "9", "5", "2"]);
    }
}
