use super::translations;
use crate::storage::preferences::{keys, PreferenceStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

/// Supported display languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    En,
    /// Traditional Chinese; also the secondary language for feed fields
    #[serde(rename = "zh-TW", alias = "zh-tw")]
    ZhTw,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::ZhTw];

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::ZhTw => "zh-TW",
        }
    }

    /// Whether feed fields should prefer their `_zh_tw` variants
    pub fn is_secondary(&self) -> bool {
        matches!(self, Self::ZhTw)
    }

    /// Translation key of the language's display name
    pub fn name_key(&self) -> &'static str {
        match self {
            Self::En => "language.english",
            Self::ZhTw => "language.traditionalChinese",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::ZhTw
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "zh-tw" | "zh_tw" => Ok(Self::ZhTw),
            other => Err(crate::Error::Config(format!("unsupported language '{}'", other))),
        }
    }
}

/// Shared, observable current-language value.
///
/// Every consumer holds a clone of the same store; changing the language
/// persists it and notifies all subscribers.
#[derive(Debug, Clone)]
pub struct LanguageStore {
    sender: Arc<watch::Sender<Language>>,
    store: PreferenceStore,
}

impl LanguageStore {
    /// Loads the persisted language (default `zh-TW`)
    pub fn new(store: PreferenceStore) -> Self {
        let initial = store.get(keys::LANGUAGE, Language::default());
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
            store,
        }
    }

    pub fn current(&self) -> Language {
        *self.sender.borrow()
    }

    pub fn set(&self, language: Language) {
        self.store.set(keys::LANGUAGE, &language);
        let previous = self.sender.send_replace(language);
        if previous != language {
            log::info!("language changed: {} -> {}", previous, language);
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.sender.subscribe()
    }

    /// Translates `key` into the current language
    pub fn t(&self, key: &str) -> String {
        translations::translate(key, self.current()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_serde_codes() {
        assert_eq!(serde_json::to_string(&Language::ZhTw).unwrap(), "\"zh-TW\"");
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
        let parsed: Language = serde_json::from_str("\"zh-tw\"").unwrap();
        assert_eq!(parsed, Language::ZhTw);
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert!("ko".parse::<Language>().is_err());
    }

    #[test]
    fn test_store_persists_language() {
        let prefs = PreferenceStore::in_memory();
        let store = LanguageStore::new(prefs.clone());
        assert_eq!(store.current(), Language::ZhTw);

        store.set(Language::En);
        assert_eq!(store.current(), Language::En);
        assert_eq!(LanguageStore::new(prefs).current(), Language::En);
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let store = LanguageStore::new(PreferenceStore::in_memory());
        let mut first = store.subscribe();
        let mut second = store.clone().subscribe();

        store.set(Language::En);

        first.changed().await.unwrap();
        second.changed().await.unwrap();
        assert_eq!(*first.borrow(), Language::En);
        assert_eq!(*second.borrow(), Language::En);
        assert_eq!(store.t("nav.search"), "Search");
    }
}
