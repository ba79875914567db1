// TF-IDF keyword topics grouped by co-occurrence.
//
// Uses the `keyword_extraction` crate to rank keywords across the document's
// sentences (each sentence is a separate TF-IDF document, so words spread
// evenly across the text are downweighted), then greedily groups keywords
// that appear in the same sentences into topics.

use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use tracing::{debug, info};

use super::result::TopicResult;
use super::traits::TopicExtractor;
use crate::error::{require_positive, Result};
use crate::text;

/// Co-occurrence topic extractor: the lightweight alternative to LDA.
pub struct CooccurrenceExtractor {
    /// How many top keywords to rank before grouping
    pub top_n_keywords: usize,
    /// Keywords per topic (the seed plus its strongest neighbors)
    pub keywords_per_topic: usize,
}

impl Default for CooccurrenceExtractor {
    fn default() -> Self {
        Self {
            top_n_keywords: 60,
            keywords_per_topic: 5,
        }
    }
}

/// Rank keywords across `documents` by TF-IDF, stop words removed.
///
/// Empty input (or input made only of stop words) gives an empty list.
pub fn extract_keywords<S: AsRef<str>>(documents: &[S], n: usize) -> Vec<(String, f32)> {
    let documents: Vec<String> = documents
        .iter()
        .map(|d| d.as_ref().to_string())
        .filter(|d| !d.trim().is_empty())
        .collect();
    if documents.is_empty() || n == 0 {
        return Vec::new();
    }

    let stop_words: Vec<String> = text::stop_words().iter().cloned().collect();
    let params = TfIdfParams::UnprocessedDocuments(&documents, &stop_words, None);
    let tfidf = TfIdf::new(params);
    tfidf.get_ranked_word_scores(n)
}

impl TopicExtractor for CooccurrenceExtractor {
    fn extract(&self, text: &str, k: usize) -> Result<Vec<TopicResult>> {
        require_positive("k", k)?;

        let sentences: Vec<String> = text::sentences(text)
            .into_iter()
            .map(str::to_string)
            .collect();
        if sentences.is_empty() {
            debug!("No sentences to extract topics from");
            return Ok(Vec::new());
        }

        let ranked = extract_keywords(&sentences, self.top_n_keywords);
        if ranked.is_empty() {
            debug!(sentences = sentences.len(), "TF-IDF produced no keywords");
            return Ok(Vec::new());
        }

        info!(
            keywords = ranked.len(),
            top_keyword = &ranked[0].0,
            top_score = ranked[0].1,
            "Extracted TF-IDF keywords"
        );

        Ok(group_keywords(&ranked, &sentences, k, self.keywords_per_topic))
    }
}

/// Group keywords into topics based on co-occurrence in sentences.
///
/// For each keyword pair, count the sentences containing both. Then build
/// topics greedily: start from the highest-scored unassigned keyword and pull
/// in its most co-occurring unassigned neighbors.
fn group_keywords(
    ranked: &[(String, f32)],
    sentences: &[String],
    max_topics: usize,
    keywords_per_topic: usize,
) -> Vec<TopicResult> {
    let keywords: Vec<&str> = ranked.iter().map(|(w, _)| w.as_str()).collect();

    // For each sentence, which keywords appear in it
    let sentence_keywords: Vec<Vec<usize>> = sentences
        .iter()
        .map(|sentence| {
            let tokens = text::tokenize(sentence);
            keywords
                .iter()
                .enumerate()
                .filter(|(_, kw)| tokens.iter().any(|t| t == *kw))
                .map(|(i, _)| i)
                .collect()
        })
        .collect();

    let n = keywords.len();
    let mut cooccurrence = vec![vec![0u32; n]; n];
    for sk in &sentence_keywords {
        for &i in sk {
            for &j in sk {
                if i != j {
                    cooccurrence[i][j] += 1;
                }
            }
        }
    }

    let mut assigned = vec![false; n];
    let mut groups: Vec<(Vec<String>, f64)> = Vec::new();
    let total_score: f64 = ranked.iter().map(|(_, s)| *s as f64).sum();

    for seed_idx in 0..n {
        if groups.len() >= max_topics {
            break;
        }
        if assigned[seed_idx] {
            continue;
        }

        assigned[seed_idx] = true;
        let mut members = vec![seed_idx];
        let mut group_score = ranked[seed_idx].1 as f64;

        let mut candidates: Vec<(usize, u32)> = (0..n)
            .filter(|&i| !assigned[i] && cooccurrence[seed_idx][i] > 0)
            .map(|i| (i, cooccurrence[seed_idx][i]))
            .collect();
        // Stable sort keeps TF-IDF rank order among equal counts
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        for (idx, _count) in candidates
            .into_iter()
            .take(keywords_per_topic.saturating_sub(1))
        {
            assigned[idx] = true;
            group_score += ranked[idx].1 as f64;
            members.push(idx);
        }

        let group_keywords: Vec<String> = members.iter().map(|&i| ranked[i].0.clone()).collect();
        let weight = if total_score > 0.0 {
            group_score / total_score
        } else {
            0.0
        };
        groups.push((group_keywords, weight));
    }

    // Normalize over the topics actually kept
    let weight_sum: f64 = groups.iter().map(|(_, w)| w).sum();
    if weight_sum > 0.0 {
        for (_, w) in &mut groups {
            *w /= weight_sum;
        }
    }

    groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    groups
        .into_iter()
        .enumerate()
        .map(|(topic_id, (keywords, weight))| TopicResult {
            topic_id,
            keywords,
            weight,
        })
        .collect()
}
