//! Keyword classifier for features that arrive without a category.
//!
//! Rules are evaluated top to bottom and the first match wins, so a listing
//! that mentions both lodging and dining vocabulary is classified as a hotel.

use crate::core::constants::DEFAULT_CATEGORY_ID;

/// One classification rule
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub category_id: &'static str,
    pub keywords: &'static [&'static str],
}

impl Rule {
    /// `text` must already be lowercased
    fn matches(&self, text: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| text.contains(&keyword.to_lowercase()))
    }
}

const HOTELS: Rule = Rule {
    category_id: "3",
    keywords: &[
        "ホテル", "旅館", "民宿", "hotel", "resort", "inn", "lodge", "宿", "泊", "stay", "ステイ",
        "宿泊", "コテージ", "cottage", "villa", "ヴィラ", "リゾート",
    ],
};

const RESTAURANTS: Rule = Rule {
    category_id: "4",
    keywords: &[
        "レストラン", "restaurant", "カフェ", "cafe", "食堂", "dining", "料理", "居酒屋", "バー",
        "bar", "焼肉", "寿司", "sushi", "うどん", "そば", "定食", "食事", "ダイニング", "軽食",
        "キッチン", "kitchen", "屋台", "食事処", "茶屋",
    ],
};

const ACTIVITIES: Rule = Rule {
    category_id: "2",
    keywords: &[
        "アクティビティ", "activity", "ツアー", "tour", "スポーツ", "体験", "experience",
        "アドベンチャー", "adventure", "ダイビング", "diving", "シュノーケル", "snorkel",
        "サーフィン", "surf", "カヤック", "kayak", "釣り", "fishing", "クルーズ", "cruise", "遊覧",
        "レンタル", "rental", "マリン", "marine", "スクール", "school", "レッスン", "lesson",
    ],
};

/// Rules in priority order
pub const RULES: [Rule; 3] = [HOTELS, RESTAURANTS, ACTIVITIES];

/// Infers a category id from free text; falls back to tourist attraction.
pub fn classify(title: &str, description: &str, address: &str) -> &'static str {
    let text = format!("{} {} {}", title, description, address).to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.matches(&text))
        .map(|rule| rule.category_id)
        .unwrap_or(DEFAULT_CATEGORY_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotel_keyword() {
        assert_eq!(classify("Okinawa Resort Hotel", "", ""), "3");
        assert_eq!(classify("瀬底ビーチホテル", "", ""), "3");
    }

    #[test]
    fn test_hotel_wins_over_restaurant() {
        assert_eq!(
            classify("Harbor View", "Rooftop restaurant inside the hotel", ""),
            "3"
        );
    }

    #[test]
    fn test_restaurant_and_activity() {
        assert_eq!(classify("Blue Seal Cafe", "", ""), "4");
        assert_eq!(classify("Kerama Snorkel Tours", "", ""), "2");
        assert_eq!(classify("", "", "沖縄県那覇市 居酒屋通り"), "4");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("SUSHI GEN", "", ""), "4");
    }

    #[test]
    fn test_fallback_to_tourist_attraction() {
        assert_eq!(classify("Shuri Castle", "A UNESCO World Heritage site", "Naha"), "1");
        assert_eq!(classify("", "", ""), "1");
    }
}
