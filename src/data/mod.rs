//! Feed model, normalization and loading
//!
//! Raw upstream features ([`geojson`]) are turned into canonical
//! [`location::Location`]s by [`normalize`], and [`loader`] fetches the
//! feed with retry and backoff.

pub mod geojson;
pub mod loader;
pub mod location;
pub mod normalize;

pub use loader::{DataLoader, LoadReport, MapData};
pub use location::Location;
pub use normalize::normalize;
