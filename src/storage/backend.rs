use crate::{Error, Result};
use fxhash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persistent string key-value storage, shaped after browser `localStorage`
pub trait StorageBackend: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

fn poisoned() -> Error {
    Error::Storage("storage lock poisoned".to_string())
}

/// Volatile storage living only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<FxHashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.lock().map_err(|_| poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock().map_err(|_| poisoned())?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.lock().map_err(|_| poisoned())?;
        items.remove(key);
        Ok(())
    }
}

/// Storage persisted as a single JSON object file.
///
/// The whole file is rewritten on every mutation; it holds a handful of
/// small keys.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<FxHashMap<String, String>>,
}

impl FileStorage {
    /// Opens (or lazily creates) the storage file at `path`.
    ///
    /// A file that is not a JSON object of strings is moved aside to
    /// `<path>.corrupt` and the storage starts empty. Only I/O failures
    /// other than a missing file are returned.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let items = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => FxHashMap::default(),
            Ok(text) => match serde_json::from_str(&text) {
                Ok(items) => items,
                Err(e) => {
                    log::warn!("storage file {} is corrupt, starting empty: {}", path.display(), e);
                    let aside = corrupt_path(&path);
                    if let Err(e) = std::fs::rename(&path, &aside) {
                        log::warn!("could not move {} aside: {}", path.display(), e);
                    }
                    FxHashMap::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FxHashMap::default(),
            Err(e) => return Err(e.into()),
        };

        log::debug!("opened storage file {} ({} keys)", path.display(), items.len());
        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, items: &FxHashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".corrupt");
    PathBuf::from(name)
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.lock().map_err(|_| poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock().map_err(|_| poisoned())?;
        items.insert(key.to_string(), value.to_string());
        self.flush(&items)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.lock().map_err(|_| poisoned())?;
        if items.remove(key).is_some() {
            self.flush(&items)?;
        }
        Ok(())
    }
}

#[cfg(feature = "wasm")]
pub use browser::BrowserStorage;

#[cfg(feature = "wasm")]
mod browser {
    use super::StorageBackend;
    use crate::{Error, Result};
    use wasm_bindgen::JsValue;

    fn js_error(e: JsValue) -> Error {
        Error::Storage(format!("{:?}", e))
    }

    /// `window.localStorage`
    ///
    /// `web_sys::Storage` is not `Send`, so the handle is looked up on every
    /// call instead of being stored.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BrowserStorage;

    impl BrowserStorage {
        fn storage() -> Result<web_sys::Storage> {
            let window =
                web_sys::window().ok_or_else(|| Error::Storage("no window".to_string()))?;
            window
                .local_storage()
                .map_err(js_error)?
                .ok_or_else(|| Error::Storage("localStorage unavailable".to_string()))
        }

        /// Hostname of the page, used for preview detection
        pub fn hostname() -> Option<String> {
            web_sys::window()?.location().hostname().ok()
        }
    }

    impl StorageBackend for BrowserStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            Self::storage()?.get_item(key).map_err(js_error)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            Self::storage()?.set_item(key, value).map_err(js_error)
        }

        fn remove_item(&self, key: &str) -> Result<()> {
            Self::storage()?.remove_item(key).map_err(js_error)
        }
    }
}
