use super::language::Language;

/// (key, English, Traditional Chinese)
const TRANSLATIONS: &[(&str, &str, &str)] = &[
    // Header
    ("header.title", "MOP Okinawa", "MOP 沖繩"),
    ("header.login", "Log in / Sign up", "登入 / 註冊"),
    // Navigation
    ("nav.weather", "Weather", "天氣"),
    ("nav.favorites", "Favorites", "我的最愛"),
    ("nav.search", "Search", "搜尋"),
    ("nav.feedback", "Feedback", "意見回饋"),
    ("nav.settings", "Settings", "設定"),
    ("nav.rentalCars", "Rental Cars", "租車"),
    ("nav.filter", "Filter", "篩選"),
    // Categories
    ("category.touristAttractions", "Tourist Attractions", "觀光景點"),
    ("category.activity", "Activity", "活動"),
    ("category.hotels", "Hotels", "飯店"),
    ("category.restaurant", "Restaurant", "餐廳"),
    ("category.beaches", "Beaches", "海灘"),
    ("category.hospitals", "Hospitals", "醫院"),
    ("category.nahaAirport", "Naha Airport", "那霸機場"),
    // Actions
    ("action.close", "Close", "關閉"),
    ("action.bookNow", "See Plans", "查看詳情"),
    ("action.details", "Details", "詳細資訊"),
    ("action.seeDetails", "See Details", "查看詳情"),
    ("action.direction", "Direction", "路線"),
    ("action.guideBook", "Guide Book", "旅遊指南"),
    // Messages
    ("message.loadingData", "Loading data...", "載入資料中..."),
    ("message.addedToFavorites", "Added to favorites!", "已加入收藏！"),
    ("message.removedFromFavorites", "Removed from favorites", "已從收藏中移除"),
    ("message.loginToAddFavorites", "Please log in to add favorites", "請登入以新增收藏"),
    ("message.favoriteFailed", "Failed to update favorites", "更新收藏失敗"),
    ("message.loadFailed", "Failed to load data", "資料載入失敗"),
    ("message.partialData", "Some locations could not be loaded", "部分地點無法載入"),
    ("message.noResults", "No locations found", "找不到地點"),
    // Language names
    ("language.english", "English", "English"),
    ("language.traditionalChinese", "繁體中文", "繁體中文"),
    // Settings
    ("settings.title", "Settings", "設定"),
    ("settings.showMarkerTitles", "Show Marker Titles", "顯示標記標題"),
    (
        "settings.showMarkerTitlesDescription",
        "Display location names above map markers",
        "在地圖標記上方顯示地點名稱",
    ),
    ("settings.termsOfUse", "Terms of Use", "服務條款"),
];

/// Looks up `key` for `language`; unknown keys are returned unchanged.
pub fn translate<'a>(key: &'a str, language: Language) -> &'a str {
    match TRANSLATIONS.iter().find(|(k, _, _)| *k == key) {
        Some((_, en, zh_tw)) => match language {
            Language::En => *en,
            Language::ZhTw => *zh_tw,
        },
        None => {
            log::warn!("Translation missing for key: {}", key);
            key
        }
    }
}

pub fn has_key(key: &str) -> bool {
    TRANSLATIONS.iter().any(|(k, _, _)| *k == key)
}
