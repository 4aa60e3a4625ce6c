//! Spatial lookups over loaded locations

pub mod index;

pub use index::{LocationIndex, Neighbor};
