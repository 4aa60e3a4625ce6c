//! Visible-set filtering and scored free-text search

pub mod filter;
pub mod scoring;

pub use filter::{visible, CategorySelection};
pub use scoring::{search, SearchHit};
