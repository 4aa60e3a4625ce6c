//! The map application, minus the widget that draws it.

use crate::auth::session::{LandingOutcome, SessionManager};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::AppConfig;
use crate::core::geo::LatLng;
use crate::data::loader::{DataLoader, MapData};
use crate::data::location::Location;
use crate::favorites::{FavoriteStatus, FavoritesClient};
use crate::http::HttpTransport;
use crate::i18n::{Language, LanguageStore};
use crate::search::filter::{self, CategorySelection};
use crate::search::scoring::{self, SearchHit};
use crate::spatial::LocationIndex;
use crate::storage::preferences::{PreferenceStore, Preferences};
use crate::view::{MarkerModel, PopupModel, Toast};
use crate::{Error, Result};
use std::sync::Arc;
use url::Url;

/// Owns every piece of state behind the map view.
///
/// Preferences, language and session live in the preference store; the
/// loaded locations, their spatial index and the favorite snapshot live
/// here and are replaced on [`TourMap::reload`].
pub struct TourMap {
    config: AppConfig,
    preferences: Preferences,
    language: LanguageStore,
    selection: CategorySelection,
    loader: DataLoader,
    session: SessionManager,
    favorites: FavoritesClient,
    data: MapData,
    index: LocationIndex,
    favorite_status: FavoriteStatus,
}

impl TourMap {
    pub fn new(config: AppConfig, transport: Arc<dyn HttpTransport>, store: PreferenceStore) -> Self {
        Self::with_clock(config, transport, store, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: AppConfig,
        transport: Arc<dyn HttpTransport>,
        store: PreferenceStore,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let preferences = Preferences::new(store.clone(), config.feed.url.clone());
        let language = LanguageStore::new(store.clone());
        let selection = CategorySelection::load(preferences.clone());
        let loader = DataLoader::with_clock(transport.clone(), config.feed.clone(), clock.clone());
        let session = SessionManager::new(transport.clone(), store, config.auth.clone(), clock);
        let favorites = FavoritesClient::new(transport, session.clone(), config.favorites.clone());

        Self {
            config,
            preferences,
            language,
            selection,
            loader,
            session,
            favorites,
            data: MapData::Loading,
            index: LocationIndex::default(),
            favorite_status: FavoriteStatus::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn language_store(&self) -> &LanguageStore {
        &self.language
    }

    pub fn language(&self) -> Language {
        self.language.current()
    }

    pub fn set_language(&self, language: Language) {
        self.language.set(language);
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn data(&self) -> &MapData {
        &self.data
    }

    pub fn locations(&self) -> &[Location] {
        self.data.locations()
    }

    pub fn selection(&self) -> &CategorySelection {
        &self.selection
    }

    pub fn favorite_status(&self) -> &FavoriteStatus {
        &self.favorite_status
    }

    /// Advisory banner for failed or partial loads
    pub fn banner(&self) -> Option<String> {
        self.data.banner(self.language())
    }

    /// Processes the landing URL, then loads the favorites of a signed-in user
    pub async fn handle_landing(&mut self, landing_url: &str) -> Result<LandingOutcome> {
        let outcome = self.session.handle_landing(landing_url).await?;
        if !matches!(outcome, LandingOutcome::Anonymous) {
            self.refresh_favorites().await;
        }
        Ok(outcome)
    }

    pub fn login_url(&self) -> Result<Url> {
        self.session.login_url()
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.favorite_status.clear();
    }

    /// Loads the feed from the configured (or overridden) URL.
    ///
    /// Failures end up in [`MapData::Failed`] rather than as an error.
    pub async fn reload(&mut self) -> &MapData {
        self.data = MapData::Loading;
        let url = self.preferences.geojson_url();
        self.data = self.loader.load_map_data(&url, self.language()).await;
        self.index = LocationIndex::build(self.data.locations());

        if self.session.state().is_authenticated() && !self.locations().is_empty() {
            self.refresh_favorites().await;
        }
        &self.data
    }

    /// Locations of the selected categories
    pub fn visible(&self) -> Vec<&Location> {
        filter::visible(self.locations(), &self.selection)
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        scoring::search(self.locations(), query, self.language())
    }

    /// Opens a search result, selecting its category so it is on the map
    pub fn select_search_result(&mut self, id: &str) -> Option<&Location> {
        let category_id = self
            .data
            .locations()
            .iter()
            .find(|location| location.id == id)?
            .category_id;
        self.selection.select(category_id);
        self.location(id)
    }

    pub fn toggle_category(&mut self, category_id: &str) -> bool {
        self.selection.toggle(category_id)
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations().iter().find(|location| location.id == id)
    }

    /// Up to `n` locations nearest to `position`, with their distance in meters
    pub fn nearby(&self, position: &LatLng, n: usize) -> Vec<(&Location, f64)> {
        let locations = self.locations();
        self.index
            .nearest(position, n)
            .into_iter()
            .map(|neighbor| (&locations[neighbor.slot], neighbor.distance_m))
            .collect()
    }

    /// Loaded locations the user has marked as favorite
    pub fn favorite_locations(&self) -> Vec<&Location> {
        self.locations()
            .iter()
            .filter(|location| self.favorite_status.is_favorite(&location.pin_id))
            .collect()
    }

    /// Re-fetches the favorite snapshot; anonymous users get an empty one
    pub async fn refresh_favorites(&mut self) {
        let pins = self.favorites.list().await;
        self.favorite_status.set_all(pins);
    }

    /// Adds or removes a favorite and returns the toast to show
    pub async fn toggle_favorite(&mut self, pin_id: &str) -> Toast {
        let language = self.language();
        if !self.session.state().is_authenticated() {
            return Toast::login_required(language);
        }

        let currently_favorite = self.favorite_status.is_favorite(pin_id);
        match self.favorites.toggle(pin_id, currently_favorite).await {
            Ok(toggle) => {
                self.favorite_status.mark(pin_id, toggle.is_favorite());
                Toast::success(toggle.message_key(), language)
            }
            Err(Error::NotAuthenticated) => Toast::login_required(language),
            Err(e) => {
                log::warn!("favorite toggle for {} failed: {}", pin_id, e);
                Toast::error(language)
            }
        }
    }

    /// Markers of the visible set
    pub fn markers(&self) -> Vec<MarkerModel> {
        let language = self.language();
        let show_titles = self.preferences.show_marker_titles();
        self.visible()
            .into_iter()
            .map(|location| MarkerModel::from_location(location, language, show_titles))
            .collect()
    }

    pub fn popup(&self, id: &str, user_position: Option<&LatLng>) -> Option<PopupModel> {
        let location = self.location(id)?;
        Some(PopupModel::build(
            location,
            self.language(),
            user_position,
            self.favorite_status.is_favorite(&location.pin_id),
        ))
    }
}
