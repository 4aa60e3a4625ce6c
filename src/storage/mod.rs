//! Local preference storage
//!
//! A typed JSON layer ([`preferences::PreferenceStore`]) over pluggable
//! string storage backends: in-memory, a JSON file on disk, or the browser's
//! `localStorage` when built with the `wasm` feature.

pub mod backend;
pub mod preferences;

pub use backend::{FileStorage, MemoryStorage, StorageBackend};
#[cfg(feature = "wasm")]
pub use backend::BrowserStorage;
pub use preferences::{keys, Environment, PreferenceStore, Preferences};
