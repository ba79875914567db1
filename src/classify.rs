// Category scoring by keyword-profile overlap.
//
// Each known genre has a profile of characteristic words. Categories the
// engine has no profile for fall back to a profile made of the label's own
// tokens ("space opera" -> {space, opera}). A text's raw score for a category
// is the number of distinct profile words it contains; the distribution is
// additively smoothed so that categories with no signal still get a share
// and the weights always sum to 1.0.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::text;

/// Additive smoothing applied to every category's match count.
const SMOOTHING: f64 = 0.5;

/// Built-in genre profiles, keyed by lowercase category label.
fn builtin_profile(category: &str) -> Option<&'static [&'static str]> {
    let words: &'static [&'static str] = match category {
        "fantasy" => &[
            "magic", "wizard", "mage", "dragon", "elf", "elves", "sorcerer", "spell", "legend",
            "kingdom", "sword", "quest", "knight", "enchanted", "witch", "prophecy",
        ],
        "sci-fi" | "scifi" | "science fiction" => &[
            "technology", "future", "space", "robot", "android", "planet", "alien", "galaxy",
            "starship", "laser", "cyborg", "orbit", "colony", "quantum", "ai", "time",
        ],
        "mystery" => &[
            "mystery", "detective", "clue", "truth", "case", "investigation", "crime", "murder",
            "suspect", "secret", "evidence", "alibi", "witness", "puzzle",
        ],
        "romance" => &[
            "love", "romance", "romantic", "heart", "kiss", "sweet", "date", "lover", "wedding",
            "passion", "longing", "embrace", "darling",
        ],
        "history" | "historical" => &[
            "history", "ancient", "dynasty", "empire", "emperor", "civilization", "war",
            "revolution", "throne", "court", "century", "general", "conquest",
        ],
        "wuxia" | "martial arts" => &[
            "sect", "martial", "master", "disciple", "sword", "qi", "technique", "cultivation",
            "jianghu", "clan", "hero", "kungfu",
        ],
        "urban" => &[
            "city", "office", "company", "apartment", "street", "phone", "car", "boss", "salary",
            "subway", "downtown", "career",
        ],
        "horror" => &[
            "ghost", "blood", "scream", "haunted", "terror", "corpse", "shadow", "demon",
            "nightmare", "darkness", "dread",
        ],
        _ => return None,
    };
    Some(words)
}

fn profile_for(category: &str) -> HashSet<String> {
    let key = category.trim().to_lowercase();
    match builtin_profile(&key) {
        Some(words) => words.iter().map(|w| (*w).to_string()).collect(),
        None => text::tokenize(&key).into_iter().collect(),
    }
}

/// Loose match so plurals and simple inflections count ("dragons" ~ "dragon").
fn token_matches(token: &str, keyword: &str) -> bool {
    token == keyword
        || (keyword.len() >= 4 && token.starts_with(keyword) && token.len() <= keyword.len() + 3)
}

/// Score `text` against each category. Weights are non-negative and sum to
/// 1.0; an empty category list gives an empty map. Duplicate labels collapse.
pub fn classify_text<S: AsRef<str>>(text: &str, categories: &[S]) -> BTreeMap<String, f64> {
    if categories.is_empty() {
        return BTreeMap::new();
    }

    let tokens: HashSet<String> = text::tokenize(text).into_iter().collect();

    let mut raw: BTreeMap<String, f64> = BTreeMap::new();
    for category in categories {
        let label = category.as_ref().to_string();
        if raw.contains_key(&label) {
            continue;
        }
        let profile = profile_for(&label);
        let matches = profile
            .iter()
            .filter(|keyword| tokens.iter().any(|t| token_matches(t, keyword)))
            .count();
        raw.insert(label, matches as f64 + SMOOTHING);
    }

    let total: f64 = raw.values().sum();
    let scores: BTreeMap<String, f64> = raw.into_iter().map(|(c, s)| (c, s / total)).collect();

    debug!(categories = scores.len(), "Classified text");
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fantasy_text_prefers_fantasy() {
        let scores = classify_text(
            "The young wizard set out on a quest to find the dragon",
            &["fantasy", "sci-fi", "mystery"],
        );
        assert!(scores["fantasy"] > scores["sci-fi"]);
        assert!(scores["fantasy"] > scores["mystery"]);
    }

    #[test]
    fn test_no_signal_is_uniform() {
        let scores = classify_text("zzz qqq", &["fantasy", "romance"]);
        assert!((scores["fantasy"] - 0.5).abs() < 1e-12);
        assert!((scores["romance"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_category_uses_label_tokens() {
        let scores = classify_text("a long sea voyage aboard the ship", &["sea adventure", "fantasy"]);
        assert!(scores["sea adventure"] > scores["fantasy"]);
    }

    #[test]
    fn test_plural_matches_profile() {
        assert!(token_matches("dragons", "dragon"));
        assert!(!token_matches("ai", "aim"));
    }
}
