//! Per-user favorites kept by the remote favorites service

pub mod client;
pub mod status;

pub use client::{FavoriteToggle, FavoritesClient};
pub use status::FavoriteStatus;
