// TopicResult: one latent topic extracted from a document.
//
// A topic is an ordered keyword list (most significant first) plus a weight
// for how prominent the topic is in the document. Weights are relative
// prominence; they are not required to sum to 1 across topics.

use std::collections::HashMap;

use colored::Colorize;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicResult {
    pub topic_id: usize,
    /// Keywords in descending significance
    pub keywords: Vec<String>,
    /// Relative prominence within the document (0.0 to 1.0)
    pub weight: f64,
}

impl TopicResult {
    /// Short human-readable label from the first three keywords.
    pub fn label(&self) -> String {
        let words: Vec<&str> = self.keywords.iter().take(3).map(String::as_str).collect();
        words.join(" / ")
    }
}

/// Flatten topics into keyword -> weight, spreading each topic's weight
/// evenly over its keywords. Used for topic overlap between documents.
pub fn keyword_weights(topics: &[TopicResult]) -> HashMap<String, f64> {
    let mut weights = HashMap::new();
    for topic in topics {
        let per_keyword = topic.weight / topic.keywords.len().max(1) as f64;
        for keyword in &topic.keywords {
            *weights.entry(keyword.clone()).or_insert(0.0) += per_keyword;
        }
    }
    weights
}

/// Print topics as a bar chart in the terminal.
pub fn display(topics: &[TopicResult]) {
    println!("\n{}", format!("=== Topics ({}) ===", topics.len()).bold());
    println!();

    if topics.is_empty() {
        println!("  No topics found. The text may be empty or too uniform.");
        return;
    }

    for topic in topics {
        let bar = crate::output::bar(topic.weight, 20);
        let colored_bar = if topic.weight >= 0.25 {
            bar.bright_green()
        } else if topic.weight >= 0.10 {
            bar.bright_yellow()
        } else {
            bar.bright_blue()
        };

        println!(
            "  {:>2}. {:<40} {} {:.2}",
            topic.topic_id,
            topic.label().bold(),
            colored_bar,
            topic.weight
        );
        println!("      Keywords: {}", topic.keywords.join(", ").dimmed());
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_weights() {
        let topics = vec![
            TopicResult {
                topic_id: 0,
                keywords: vec!["a".to_string(), "b".to_string()],
                weight: 0.6,
            },
            TopicResult {
                topic_id: 1,
                keywords: vec!["c".to_string()],
                weight: 0.4,
            },
        ];

        let weights = keyword_weights(&topics);
        assert!((weights["a"] - 0.3).abs() < 0.001);
        assert!((weights["b"] - 0.3).abs() < 0.001);
        assert!((weights["c"] - 0.4).abs() < 0.001);
    }

    #[test]
    fn test_label_uses_first_three_keywords() {
        let topic = TopicResult {
            topic_id: 0,
            keywords: ["magic", "tower", "mage", "scroll"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            weight: 1.0,
        };
        assert_eq!(topic.label(), "magic / tower / mage");
    }
}
