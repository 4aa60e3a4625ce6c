use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("invalid slug pattern"));
// ASCII word characters only, so non-Latin titles slug to nothing
static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\-]+").expect("invalid slug pattern"));
static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"--+").expect("invalid slug pattern"));

/// URL slug of a guide item title
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let text = WHITESPACE.replace_all(lowered.trim(), "-");
    let text = NON_WORD.replace_all(&text, "");
    let text = HYPHEN_RUN.replace_all(&text, "-");
    text.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Shuri Castle"), "shuri-castle");
        assert_eq!(slugify("  Cape Manzamo (万座毛)  "), "cape-manzamo");
        assert_eq!(slugify("A & W -- Makiminato!"), "a-w-makiminato");
        assert_eq!(slugify("首里城"), "");
        assert_eq!(slugify("snake_case_title"), "snake_case_title");
    }
}
