pub mod language;
pub mod translations;

pub use language::{Language, LanguageStore};
pub use translations::translate;
