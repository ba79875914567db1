// Weighted Jaccard similarity between two topic sets.
//
// For each keyword in either set we take the minimum and maximum weight
// across both sides:
//
//   sum(min(weight_a, weight_b)) / sum(max(weight_a, weight_b))
//
// 0.0 means no shared keywords, 1.0 means identical keyword weighting.
// Structure analysis uses this for its chapter-to-chapter topic shift.

use std::collections::{HashMap, HashSet};

use super::result::{keyword_weights, TopicResult};

/// Weighted Jaccard similarity between two topic lists, in [0, 1].
pub fn weighted_jaccard(topics_a: &[TopicResult], topics_b: &[TopicResult]) -> f64 {
    jaccard_from_weights(&keyword_weights(topics_a), &keyword_weights(topics_b))
}

/// Weighted Jaccard from raw keyword weight maps.
pub fn jaccard_from_weights(
    weights_a: &HashMap<String, f64>,
    weights_b: &HashMap<String, f64>,
) -> f64 {
    let all_keys: HashSet<&String> = weights_a.keys().chain(weights_b.keys()).collect();

    if all_keys.is_empty() {
        return 0.0;
    }

    let mut min_sum = 0.0;
    let mut max_sum = 0.0;

    for key in all_keys {
        let a = weights_a.get(key).copied().unwrap_or(0.0);
        let b = weights_b.get(key).copied().unwrap_or(0.0);
        min_sum += a.min(b);
        max_sum += a.max(b);
    }

    if max_sum == 0.0 {
        0.0
    } else {
        min_sum / max_sum
    }
}
