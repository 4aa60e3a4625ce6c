//! Core constants for the data pipeline, session handling and search.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Attempts made for a feed fetch before giving up.
pub const MAX_FETCH_ATTEMPTS: usize = 3;

/// First backoff delay; doubles after every failed attempt.
pub const INITIAL_BACKOFF_MS: u64 = 1_000;

/// Hard per-attempt timeout on the guide-data path.
pub const GUIDE_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Tokens expiring within this window are refreshed before use.
pub const TOKEN_REFRESH_WINDOW_MS: i64 = 5 * 60 * 1000;

/// Version tag appended to feed URLs as `_v`.
pub const FEED_VERSION: &str = "3.23";

/// Category used when upstream data carries no usable category.
pub const DEFAULT_CATEGORY_ID: &str = "1";

/// Categories selected on first launch.
pub const DEFAULT_SELECTED_CATEGORIES: [&str; 3] = ["1", "4", "9"];

/// Maximum number of search suggestions returned.
pub const MAX_SEARCH_RESULTS: usize = 10;

/// User agent sent with every outgoing request.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; MOP-Guide/1.0)";

/// Search weights for a single query term.
pub mod weights {
    pub const TITLE_EXACT: u32 = 100;
    pub const TITLE_CONTAINS: u32 = 50;
    pub const TITLE_PREFIX: u32 = 25;
    pub const ADDRESS_CONTAINS: u32 = 30;
    pub const ADDRESS_PREFIX: u32 = 15;
    pub const DESCRIPTION_CONTAINS: u32 = 20;
    pub const KANA_TITLE: u32 = 40;
    pub const KANA_ADDRESS: u32 = 20;
    pub const KANA_DESCRIPTION: u32 = 10;
}

/// Marker icon default size (regular PNG).
pub const MARKER_ICON_SIZE: (u32, u32) = (25, 41);

/// Anchor inside the icon (hot-spot) in pixel coords.
pub const MARKER_ICON_ANCHOR: (u32, u32) = (12, 41);

/// Popup anchor relative to the icon anchor.
pub const MARKER_POPUP_ANCHOR: (i32, i32) = (1, -34);

/// Shadow drawn beneath every marker icon.
pub const MARKER_SHADOW_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet/0.7.7/images/marker-shadow.png";

/// Initial map center, over the main island of Okinawa.
pub const MAP_CENTER: (f64, f64) = (26.4377575, 128.0118961);

/// How long a toast stays on screen.
pub const TOAST_DURATION_MS: u64 = 3_000;

/// Category whose popup links to details rather than bookings.
pub const RESTAURANT_CATEGORY_ID: &str = "4";
