//! Render-ready models for whatever map widget hosts the data.
//!
//! Nothing here draws; markers, popups and toasts are plain values the
//! widget turns into its own elements.

pub mod marker;
pub mod popup;
pub mod toast;

pub use marker::{IconSpec, MarkerModel};
pub use popup::{clean_description, directions_url, PopupModel};
pub use toast::{Toast, ToastKind};
