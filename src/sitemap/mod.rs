//! `sitemap.xml` for the companion guide site

pub mod generator;
pub mod guide;
pub mod slug;

pub use generator::{build, entries, generate, SitemapEntry};
pub use guide::{fetch_guide_items, GuideItem};
pub use slug::slugify;
