use crate::core::constants::DEFAULT_CATEGORY_ID;
use serde::Serialize;

const MARKER_BASE: &str = "https://raw.githubusercontent.com/pointhi/leaflet-color-markers/master/img";

/// Static display metadata for one point-of-interest classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    /// Canonical English name
    pub name: &'static str,
    /// Translation key of the localized name
    pub name_key: &'static str,
    /// Swatch color as `#rrggbb`
    pub color: &'static str,
    /// Marker color name; see [`Category::marker_url`]
    pub marker: &'static str,
}

impl Category {
    pub fn marker_url(&self) -> String {
        format!("{}/marker-icon-2x-{}.png", MARKER_BASE, self.marker)
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_CATEGORY_ID
    }
}

/// The seven fixed categories, in display order
pub static CATEGORIES: [Category; 7] = [
    Category {
        id: "1",
        name: "Tourist Attractions",
        name_key: "category.touristAttractions",
        color: "#ff0000",
        marker: "red",
    },
    Category {
        id: "2",
        name: "Activity",
        name_key: "category.activity",
        color: "#00ff00",
        marker: "green",
    },
    Category {
        id: "3",
        name: "Hotels",
        name_key: "category.hotels",
        color: "#e3f26f",
        marker: "gold",
    },
    Category {
        id: "4",
        name: "Restaurant",
        name_key: "category.restaurant",
        color: "#ff9933",
        marker: "orange",
    },
    Category {
        id: "5",
        name: "Beaches",
        name_key: "category.beaches",
        color: "#00ffff",
        marker: "blue",
    },
    Category {
        id: "6",
        name: "Hospitals",
        name_key: "category.hospitals",
        color: "#ffffff",
        marker: "grey",
    },
    Category {
        id: "9",
        name: "Naha Airport",
        name_key: "category.nahaAirport",
        color: "#8000ff",
        marker: "violet",
    },
];

pub fn all() -> &'static [Category] {
    &CATEGORIES
}

pub fn lookup(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

pub fn is_known(id: &str) -> bool {
    lookup(id).is_some()
}

pub fn default_category() -> &'static Category {
    // The default id is always registered
    lookup(DEFAULT_CATEGORY_ID).unwrap_or(&CATEGORIES[0])
}

/// Registry entry for `id`, or the default category when unknown
pub fn resolve(id: &str) -> &'static Category {
    lookup(id).unwrap_or_else(default_category)
}
