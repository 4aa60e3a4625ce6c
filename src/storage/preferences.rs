use super::backend::{MemoryStorage, StorageBackend};
use crate::core::constants::DEFAULT_SELECTED_CATEGORIES;
use crate::i18n::language::Language;
use fxhash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Persisted keys
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const ID_TOKEN: &str = "id_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const TOKEN_EXPIRY: &str = "token_expiry";
    pub const SUB: &str = "sub";
    pub const LANGUAGE: &str = "language";
    pub const SELECTED_CATEGORIES: &str = "selectedCategories";
    pub const SHOW_MARKER_TITLES: &str = "showMarkerTitles";
    pub const GEOJSON_URL: &str = "geojsonUrl";
    pub const HAS_SEEN_WELCOME: &str = "hasSeenWelcome";

    /// Keys that make up an authenticated session
    pub const SESSION: [&str; 5] = [ACCESS_TOKEN, ID_TOKEN, REFRESH_TOKEN, TOKEN_EXPIRY, SUB];
}

/// Where the application is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    /// Local or sandboxed preview deployment; nothing is persisted
    Preview,
}

impl Environment {
    pub fn from_hostname(hostname: &str) -> Self {
        let host = hostname.to_ascii_lowercase();
        if host == "localhost" || host.contains("stackblitz") || host.contains("webcontainer") {
            Self::Preview
        } else {
            Self::Production
        }
    }

    pub fn is_preview(&self) -> bool {
        matches!(self, Self::Preview)
    }
}

struct StoreInner {
    backend: Arc<dyn StorageBackend>,
    environment: Environment,
    /// Values set during a preview session
    session: Mutex<FxHashMap<String, serde_json::Value>>,
}

/// Typed JSON key-value store over a [`StorageBackend`].
///
/// Never fails towards its caller: serialization and storage errors are
/// logged and the default is used instead. Cheap to clone; clones share the
/// same backend.
#[derive(Clone)]
pub struct PreferenceStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("environment", &self.inner.environment)
            .finish()
    }
}

impl PreferenceStore {
    pub fn new(backend: Arc<dyn StorageBackend>, environment: Environment) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                backend,
                environment,
                session: Mutex::new(FxHashMap::default()),
            }),
        }
    }

    /// Production store kept in memory, mostly for tests
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Environment::Production)
    }

    pub fn environment(&self) -> Environment {
        self.inner.environment
    }

    /// Reads `key`, writing `default` through when nothing is stored yet.
    pub fn get<T>(&self, key: &str, default: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        if self.inner.environment.is_preview() {
            return self
                .session_value(key)
                .and_then(|value| serde_json::from_value(value).ok())
                .unwrap_or(default);
        }

        match self.inner.backend.get_item(key) {
            Ok(Some(text)) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    log::error!("Error reading '{}' from storage: {}", key, e);
                    default
                }
            },
            Ok(None) => {
                self.write(key, &default);
                default
            }
            Err(e) => {
                log::error!("Error reading '{}' from storage: {}", key, e);
                default
            }
        }
    }

    /// Reads `key` without writing anything back
    pub fn get_optional<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        if self.inner.environment.is_preview() {
            return self
                .session_value(key)
                .and_then(|value| serde_json::from_value(value).ok());
        }

        match self.inner.backend.get_item(key) {
            Ok(Some(text)) => serde_json::from_str(&text)
                .map_err(|e| log::error!("Error reading '{}' from storage: {}", key, e))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                log::error!("Error reading '{}' from storage: {}", key, e);
                None
            }
        }
    }

    pub fn set<T>(&self, key: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        if self.inner.environment.is_preview() {
            match serde_json::to_value(value) {
                Ok(json) => {
                    if let Ok(mut session) = self.inner.session.lock() {
                        session.insert(key.to_string(), json);
                    }
                }
                Err(e) => log::error!("Error setting '{}': {}", key, e),
            }
            return;
        }

        self.write(key, value);
    }

    pub fn remove(&self, key: &str) {
        if self.inner.environment.is_preview() {
            if let Ok(mut session) = self.inner.session.lock() {
                session.remove(key);
            }
            return;
        }

        if let Err(e) = self.inner.backend.remove_item(key) {
            log::error!("Error removing '{}' from storage: {}", key, e);
        }
    }

    fn write<T>(&self, key: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        let result = serde_json::to_string(value)
            .map_err(crate::Error::from)
            .and_then(|text| self.inner.backend.set_item(key, &text));

        if let Err(e) = result {
            log::error!("Error writing '{}' to storage: {}", key, e);
        }
    }

    fn session_value(&self, key: &str) -> Option<serde_json::Value> {
        self.inner.session.lock().ok()?.get(key).cloned()
    }
}

/// Typed accessors for the user preference keys
#[derive(Debug, Clone)]
pub struct Preferences {
    store: PreferenceStore,
    default_geojson_url: String,
}

impl Preferences {
    pub fn new(store: PreferenceStore, default_geojson_url: impl Into<String>) -> Self {
        Self {
            store,
            default_geojson_url: default_geojson_url.into(),
        }
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    pub fn language(&self) -> Language {
        self.store.get(keys::LANGUAGE, Language::default())
    }

    pub fn set_language(&self, language: Language) {
        self.store.set(keys::LANGUAGE, &language);
    }

    pub fn selected_categories(&self) -> Vec<String> {
        let default: Vec<String> = DEFAULT_SELECTED_CATEGORIES
            .iter()
            .map(|id| id.to_string())
            .collect();
        self.store.get(keys::SELECTED_CATEGORIES, default)
    }

    pub fn set_selected_categories(&self, ids: &[String]) {
        self.store.set(keys::SELECTED_CATEGORIES, ids);
    }

    pub fn show_marker_titles(&self) -> bool {
        self.store.get(keys::SHOW_MARKER_TITLES, true)
    }

    pub fn set_show_marker_titles(&self, show: bool) {
        self.store.set(keys::SHOW_MARKER_TITLES, &show);
    }

    pub fn geojson_url(&self) -> String {
        self.store
            .get(keys::GEOJSON_URL, self.default_geojson_url.clone())
    }

    /// Developer override of the data source
    pub fn set_geojson_url(&self, url: &str) -> crate::Result<()> {
        let url = crate::core::config::validate_feed_url(url)?;
        self.store.set(keys::GEOJSON_URL, &url);
        Ok(())
    }

    /// Drops the developer override so the configured feed is used again
    pub fn reset_geojson_url(&self) {
        self.store.remove(keys::GEOJSON_URL);
    }

    pub fn has_seen_welcome(&self) -> bool {
        self.store.get(keys::HAS_SEEN_WELCOME, false)
    }

    pub fn mark_welcome_seen(&self) {
        self.store.set(keys::HAS_SEEN_WELCOME, &true);
    }
}
