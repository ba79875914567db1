// Plot development prediction from a trained word-vector model.
//
// The chapters are pooled into one context vector: each chapter's mean word
// vector, weighted by position so later chapters count more. Three kinds of
// candidates are scored against that context:
//
//   <archetype>     cosine to the mean vector of the archetype's seed words
//   concept:<term>  the nearest non-stop-word vocabulary terms
//   rising:<term>   terms whose per-chapter frequency is trending upward
//
// Every score is in [0, 1]. Nothing known to the model means no candidates.

use std::collections::BTreeMap;

use tracing::debug;

use super::model::WordVectorModel;
use crate::text;
use crate::vector::dense_cosine;

/// Plot archetypes and the seed words that stand for them.
const ARCHETYPES: &[(&str, &[&str])] = &[
    (
        "confrontation",
        &["fight", "battle", "attack", "enemy", "war", "sword", "duel", "clash"],
    ),
    (
        "discovery",
        &["discover", "secret", "truth", "find", "reveal", "hidden", "found", "learn"],
    ),
    (
        "journey",
        &["journey", "travel", "road", "path", "quest", "sail", "wander", "leave"],
    ),
    (
        "romance",
        &["love", "heart", "kiss", "marry", "beloved", "embrace", "together"],
    ),
    (
        "betrayal",
        &["betray", "traitor", "lie", "deceive", "treachery", "trust", "lies"],
    ),
    (
        "loss",
        &["death", "die", "dead", "grief", "mourn", "lost", "funeral", "tears"],
    ),
    (
        "mystery",
        &["mystery", "strange", "unknown", "clue", "shadow", "vanish", "puzzle"],
    ),
    (
        "triumph",
        &["victory", "win", "triumph", "crown", "celebrate", "glory", "succeed"],
    ),
];

/// Candidates reported per kind (concepts, rising terms).
const CANDIDATES_PER_KIND: usize = 5;

/// Predict likely plot developments from the chapters written so far.
///
/// Returns an empty map when no chapter token is in the model's vocabulary.
pub fn predict_plot_development<S: AsRef<str>>(
    model: &WordVectorModel,
    chapters: &[S],
) -> BTreeMap<String, f64> {
    let mut predictions = BTreeMap::new();

    let tokenized: Vec<Vec<String>> = chapters
        .iter()
        .map(|c| text::tokenize(c.as_ref()))
        .collect();

    let Some(context) = context_vector(model, &tokenized) else {
        debug!(chapters = chapters.len(), "No chapter tokens known to the model");
        return predictions;
    };

    for (archetype, seeds) in ARCHETYPES {
        let Some(anchor) = model.mean_vector(*seeds) else {
            continue;
        };
        let score = dense_cosine(&context, &anchor);
        if score > 0.0 {
            predictions.insert((*archetype).to_string(), score);
        }
    }

    for (term, score) in model.nearest(&context, CANDIDATES_PER_KIND, text::is_stop_word) {
        predictions.insert(format!("concept:{term}"), score.clamp(0.0, 1.0));
    }

    for (term, score) in rising_terms(model, &tokenized) {
        predictions.insert(format!("rising:{term}"), score);
    }

    debug!(
        chapters = chapters.len(),
        candidates = predictions.len(),
        "Scored plot candidates"
    );
    predictions
}

/// Recency-weighted mean of chapter vectors: chapter i gets weight i + 1.
/// Chapters with no known tokens are skipped.
fn context_vector(model: &WordVectorModel, chapters: &[Vec<String>]) -> Option<Vec<f64>> {
    let mut sum = vec![0.0; model.dimensions()];
    let mut total_weight = 0.0;

    for (i, tokens) in chapters.iter().enumerate() {
        if let Some(mean) = model.mean_vector(tokens) {
            let weight = (i + 1) as f64;
            for (s, v) in sum.iter_mut().zip(&mean) {
                *s += weight * v;
            }
            total_weight += weight;
        }
    }

    if total_weight == 0.0 {
        return None;
    }
    for s in &mut sum {
        *s /= total_weight;
    }
    Some(sum)
}

/// Terms whose relative frequency grows across chapters, strongest first.
///
/// The trend is the least-squares slope of the term's per-chapter share,
/// divided by its mean share so rare and common terms compare fairly, then
/// squashed into [0, 1) with r / (1 + r). Needs at least two chapters.
fn rising_terms(model: &WordVectorModel, chapters: &[Vec<String>]) -> Vec<(String, f64)> {
    let n = chapters.len();
    if n < 2 {
        return Vec::new();
    }

    let mut shares: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (i, tokens) in chapters.iter().enumerate() {
        if tokens.is_empty() {
            continue;
        }
        let per_token = 1.0 / tokens.len() as f64;
        for token in tokens {
            if text::is_stop_word(token) || !model.contains(token) {
                continue;
            }
            shares.entry(token.as_str()).or_insert_with(|| vec![0.0; n])[i] += per_token;
        }
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let x_var: f64 = (0..n).map(|x| (x as f64 - x_mean).powi(2)).sum();

    let mut rising: Vec<(String, f64)> = shares
        .into_iter()
        .filter_map(|(term, ys)| {
            let y_mean = ys.iter().sum::<f64>() / n as f64;
            let covariance: f64 = ys
                .iter()
                .enumerate()
                .map(|(x, y)| (x as f64 - x_mean) * (y - y_mean))
                .sum();
            let relative = covariance / x_var / y_mean;
            (relative > 0.0).then(|| (term.to_string(), relative / (1.0 + relative)))
        })
        .collect();

    rising.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    rising.truncate(CANDIDATES_PER_KIND);
    rising
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> WordVectorModel {
        WordVectorModel::new(
            2,
            vec!["battle".into(), "sword".into(), "love".into(), "kiss".into()],
            vec![1, 1, 1, 1],
            vec![
                vec![1.0, 0.0],
                vec![0.9, 0.1],
                vec![0.0, 1.0],
                vec![0.1, 0.9],
            ],
        )
    }

    #[test]
    fn test_unknown_chapters_predict_nothing() {
        assert!(predict_plot_development(&model(), &["nothing familiar here"]).is_empty());
    }

    #[test]
    fn test_war_chapters_favor_confrontation() {
        let predictions = predict_plot_development(&model(), &["the battle", "a sword and battle"]);
        let confrontation = predictions["confrontation"];
        let romance = predictions.get("romance").copied().unwrap_or(0.0);
        assert!(confrontation > romance, "got {confrontation} vs {romance}");
    }

    #[test]
    fn test_scores_in_unit_range() {
        let predictions = predict_plot_development(&model(), &["battle love", "kiss kiss love"]);
        for (label, score) in &predictions {
            assert!((0.0..=1.0).contains(score), "{label} scored {score}");
        }
    }

    #[test]
    fn test_rising_term_detected() {
        let chapters = vec![
            vec!["battle".to_string(), "sword".to_string()],
            vec!["battle".to_string(), "kiss".to_string()],
            vec!["kiss".to_string(), "kiss".to_string()],
        ];
        let rising = rising_terms(&model(), &chapters);
        assert_eq!(rising[0].0, "kiss");
        assert!(rising.iter().all(|(t, _)| t != "battle" && t != "sword"));
    }

    #[test]
    fn test_single_chapter_has_no_trend() {
        assert!(rising_terms(&model(), &[vec!["kiss".to_string()]]).is_empty());
    }
}
