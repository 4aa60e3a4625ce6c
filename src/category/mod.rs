pub mod classifier;
pub mod registry;

pub use classifier::classify;
pub use registry::{Category, CATEGORIES};
