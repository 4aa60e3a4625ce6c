//! Prelude module for common pinmap types
//!
//! `use pinmap::prelude::*;` brings in the application facade, the data
//! model and the seams needed to wire them up.

pub use crate::app::TourMap;

pub use crate::core::{
    clock::{Clock, FixedClock, SystemClock},
    config::{AppConfig, AuthConfig, FavoritesConfig, FeedConfig, RetryPolicy, SiteConfig},
    geo::{LatLng, LatLngBounds},
};

pub use crate::data::{
    loader::{DataLoader, LoadReport, MapData},
    location::Location,
};

pub use crate::category::registry::Category;
pub use crate::search::{
    filter::{CategorySelection, SelectedCategories},
    scoring::SearchHit,
};

pub use crate::auth::session::{LandingOutcome, SessionManager, SessionState};
pub use crate::favorites::{FavoriteStatus, FavoritesClient};

pub use crate::http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use crate::i18n::{Language, LanguageStore};
pub use crate::spatial::LocationIndex;
pub use crate::storage::{Environment, FileStorage, MemoryStorage, PreferenceStore, Preferences};
pub use crate::view::{MarkerModel, PopupModel, Toast, ToastKind};

pub use crate::{Error as PinmapError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
