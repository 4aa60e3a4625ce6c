//! Weighted free-text search over loaded locations.

use crate::core::constants::{weights, MAX_SEARCH_RESULTS};
use crate::data::location::Location;
use crate::i18n::Language;

const KATAKANA_START: u32 = 0x30A1;
const KATAKANA_END: u32 = 0x30F6;
const HIRAGANA_START: u32 = 0x3041;
const HIRAGANA_END: u32 = 0x3096;
const KANA_OFFSET: u32 = 0x60;

/// A ranked search result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    pub location: &'a Location,
    pub score: u32,
}

fn shift_range(text: &str, start: u32, end: u32, shift: impl Fn(u32) -> u32) -> String {
    text.chars()
        .map(|ch| {
            let code = ch as u32;
            if (start..=end).contains(&code) {
                char::from_u32(shift(code)).unwrap_or(ch)
            } else {
                ch
            }
        })
        .collect()
}

/// Katakana → hiragana; everything else unchanged
pub fn to_hiragana(text: &str) -> String {
    shift_range(text, KATAKANA_START, KATAKANA_END, |c| c - KANA_OFFSET)
}

/// Hiragana → katakana; everything else unchanged
pub fn to_katakana(text: &str) -> String {
    shift_range(text, HIRAGANA_START, HIRAGANA_END, |c| c + KANA_OFFSET)
}

/// Lowercased query terms; empty for a blank query
pub fn terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Searchable text of one location, lowercased once per query
struct Haystack {
    title: String,
    address: String,
    description: String,
}

impl Haystack {
    fn new(location: &Location, language: Language) -> Self {
        Self {
            title: location.title_for(language).to_lowercase(),
            address: location.address_for(language).to_lowercase(),
            description: location.description.default.to_lowercase(),
        }
    }

    fn score_term(&self, term: &str) -> u32 {
        let mut score = 0;

        if self.title == term {
            score += weights::TITLE_EXACT;
        } else if self.title.contains(term) {
            score += weights::TITLE_CONTAINS;
        }
        if self.address.contains(term) {
            score += weights::ADDRESS_CONTAINS;
        }
        if self.description.contains(term) {
            score += weights::DESCRIPTION_CONTAINS;
        }

        if self.title.starts_with(term) {
            score += weights::TITLE_PREFIX;
        }
        if self.address.starts_with(term) {
            score += weights::ADDRESS_PREFIX;
        }

        // Script-normalized forms of the term, checked against every field
        let hiragana = to_hiragana(term);
        let katakana = to_katakana(term);
        let kana_match = |field: &str| field.contains(&hiragana) || field.contains(&katakana);

        if kana_match(&self.title) {
            score += weights::KANA_TITLE;
        }
        if kana_match(&self.address) {
            score += weights::KANA_ADDRESS;
        }
        if kana_match(&self.description) {
            score += weights::KANA_DESCRIPTION;
        }

        score
    }
}

/// Total score of `location` over all `terms`
pub fn score(location: &Location, terms: &[String], language: Language) -> u32 {
    let haystack = Haystack::new(location, language);
    terms.iter().map(|term| haystack.score_term(term)).sum()
}

/// Ranks `locations` against `query`.
///
/// Title and address are the fields localized for `language`. Locations
/// that score zero are dropped; ties keep input order. At most
/// [`MAX_SEARCH_RESULTS`] hits are returned.
pub fn search<'a>(locations: &'a [Location], query: &str, language: Language) -> Vec<SearchHit<'a>> {
    let terms = terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit<'a>> = locations
        .iter()
        .filter_map(|location| {
            let score = score(location, &terms, language);
            (score > 0).then_some(SearchHit { location, score })
        })
        .collect();

    // sort_by is stable
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(MAX_SEARCH_RESULTS);

    log::debug!("search {:?}: {} hits", query, hits.len());
    hits
}
