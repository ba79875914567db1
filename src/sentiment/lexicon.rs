// Lexicon-based sentiment scorer.
//
// Each token is looked up in a word -> polarity lexicon. Matched cues are
// adjusted for context (a negator in the three preceding tokens flips the
// sign, an intensifier right before scales it by 1.5) and then split into a
// positive mass and a negative mass. The score is the net polarity mapped
// onto [0, 1]:
//
//   score = 0.5 + 0.5 * (positive - negative) / (positive + negative)
//
// No matched cue at all gives exactly 0.5 / neutral.
//
// Chinese prose has no spaces, so runs of CJK ideographs are segmented by
// forward maximum matching against the known cues (lexicon words, negators,
// intensifiers). Characters that start no known cue become one-char segments,
// and the negation/intensifier rules then apply to segments like any token.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use tracing::{debug, info, warn};

use super::traits::{SentimentResult, SentimentScorer, DEFAULT_EPSILON};
use crate::error::{AnalyticsError, Result};
use crate::text;

/// Multiplier for a cue directly preceded by an intensifier.
const INTENSIFIER_BOOST: f64 = 1.5;

/// How many preceding tokens a negator reaches.
const NEGATION_WINDOW: usize = 3;

const BUILTIN_LEXICON: &[(&str, f64)] = &[
    // positive
    ("excellent", 3.0),
    ("wonderful", 3.0),
    ("amazing", 3.0),
    ("brilliant", 3.0),
    ("fantastic", 3.0),
    ("great", 2.0),
    ("good", 2.0),
    ("nice", 1.0),
    ("love", 3.0),
    ("loved", 3.0),
    ("loves", 3.0),
    ("like", 1.0),
    ("liked", 2.0),
    ("enjoy", 2.0),
    ("enjoyed", 2.0),
    ("happy", 3.0),
    ("joy", 3.0),
    ("delight", 3.0),
    ("delightful", 3.0),
    ("beautiful", 3.0),
    ("hope", 1.0),
    ("hopeful", 2.0),
    ("brave", 2.0),
    ("triumph", 3.0),
    ("victory", 3.0),
    ("success", 2.0),
    ("successful", 2.0),
    ("satisfied", 2.0),
    ("exciting", 2.0),
    ("gripping", 2.0),
    ("warm", 1.0),
    ("kind", 1.0),
    ("peace", 2.0),
    ("glad", 2.0),
    ("best", 3.0),
    // negative
    ("terrible", -3.0),
    ("awful", -3.0),
    ("horrible", -3.0),
    ("bad", -2.0),
    ("poor", -2.0),
    ("boring", -2.0),
    ("dull", -2.0),
    ("disappointing", -2.0),
    ("disappointed", -2.0),
    ("disappointment", -2.0),
    ("hate", -4.0),
    ("hated", -4.0),
    ("sad", -3.0),
    ("sorrow", -3.0),
    ("grief", -3.0),
    ("pain", -3.0),
    ("painful", -3.0),
    ("angry", -3.0),
    ("anger", -3.0),
    ("fear", -3.0),
    ("afraid", -2.0),
    ("dread", -3.0),
    ("worst", -3.0),
    ("failure", -2.0),
    ("failed", -2.0),
    ("death", -2.0),
    ("betrayal", -3.0),
    ("cruel", -3.0),
    ("despair", -4.0),
    ("worried", -2.0),
    ("miserable", -3.0),
    // pre-segmented Chinese
    ("喜欢", 3.0),
    ("爱", 4.0),
    ("高兴", 3.0),
    ("开心", 3.0),
    ("快乐", 3.0),
    ("幸福", 4.0),
    ("欢乐", 3.0),
    ("满意", 2.0),
    ("精彩", 3.0),
    ("优秀", 3.0),
    ("讨厌", -3.0),
    ("恨", -4.0),
    ("悲伤", -3.0),
    ("难过", -3.0),
    ("痛苦", -4.0),
    ("失望", -2.0),
    ("愤怒", -3.0),
    ("恐惧", -3.0),
    ("糟糕", -3.0),
    ("失败", -2.0),
    ("感动", 3.0),
    ("温暖", 2.0),
    ("无聊", -2.0),
    ("绝望", -4.0),
];

fn is_negator(token: &str) -> bool {
    matches!(
        token,
        "not"
            | "no"
            | "never"
            | "nothing"
            | "hardly"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "weren't"
            | "don't"
            | "didn't"
            | "doesn't"
            | "won't"
            | "can't"
            | "cannot"
            | "without"
            | "不"
            | "没"
            | "没有"
            | "别"
            | "未"
            | "并非"
    )
}

/// Longest negator or intensifier, in chars.
const LONGEST_MODIFIER: usize = 2;

fn is_cjk(c: char) -> bool {
    matches!(c as u32, 0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xF900..=0xFAFF | 0x20000..=0x2A6DF)
}

fn is_intensifier(token: &str) -> bool {
    matches!(
        token,
        "very"
            | "extremely"
            | "really"
            | "so"
            | "truly"
            | "incredibly"
            | "deeply"
            | "非常"
            | "很"
            | "太"
            | "十分"
            | "特别"
            | "极其"
    )
}

/// Sentiment scorer backed by a word lexicon.
pub struct LexiconScorer {
    lexicon: HashMap<String, f64>,
    epsilon: f64,
    /// Longest CJK cue in chars, bounding the segmentation lookahead
    longest_cjk_cue: usize,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl LexiconScorer {
    /// Scorer with the built-in lexicon and the given neutral-band epsilon.
    pub fn new(epsilon: f64) -> Self {
        let lexicon: HashMap<String, f64> = BUILTIN_LEXICON
            .iter()
            .map(|(word, score)| ((*word).to_string(), *score))
            .collect();
        let longest_cjk_cue = lexicon
            .keys()
            .map(|w| cjk_len(w))
            .max()
            .unwrap_or(0)
            .max(LONGEST_MODIFIER);
        Self {
            lexicon,
            epsilon,
            longest_cjk_cue,
        }
    }

    /// Merge `word score` lines over the current lexicon.
    ///
    /// Lines starting with `#` and blank lines are skipped. Malformed lines
    /// are logged and skipped rather than failing the whole load.
    pub fn merge_from_reader<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut added = 0;
        for line in reader.lines() {
            let line = line.map_err(|e| AnalyticsError::Lexicon(e.to_string()))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            let parsed = match parts.as_slice() {
                [word, score] => score.parse::<f64>().ok().map(|s| (*word, s)),
                _ => None,
            };

            match parsed {
                Some((word, score)) if score.is_finite() => {
                    if let Some(word) = text::normalize_token(word) {
                        self.longest_cjk_cue = self.longest_cjk_cue.max(cjk_len(&word));
                        self.lexicon.insert(word, score);
                        added += 1;
                    }
                }
                _ => warn!(line = trimmed, "Skipping malformed lexicon line"),
            }
        }
        Ok(added)
    }

    /// Merge a lexicon file over the built-in lexicon.
    pub fn merge_from_file(&mut self, path: &Path) -> Result<usize> {
        let file = std::fs::File::open(path).map_err(|e| {
            AnalyticsError::Lexicon(format!("cannot open {}: {e}", path.display()))
        })?;
        let added = self.merge_from_reader(std::io::BufReader::new(file))?;
        info!(
            path = %path.display(),
            added,
            total = self.lexicon.len(),
            "Loaded sentiment lexicon"
        );
        Ok(added)
    }

    pub fn lexicon_len(&self) -> usize {
        self.lexicon.len()
    }

    fn is_cue(&self, word: &str) -> bool {
        self.lexicon.contains_key(word) || is_negator(word) || is_intensifier(word)
    }

    /// Whitespace tokens, with CJK runs segmented into known cues.
    ///
    /// Tokens without ideographs pass through unchanged. A token containing
    /// them is split at punctuation; each CJK run is then cut greedily into
    /// the longest known cue at every position, falling back to one char.
    fn cue_tokens(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        for token in text::tokenize(text) {
            if !token.chars().any(is_cjk) {
                out.push(token);
                continue;
            }

            let mut word = String::new();
            let mut run: Vec<char> = Vec::new();
            for c in token.chars() {
                if is_cjk(c) {
                    if !word.is_empty() {
                        out.push(std::mem::take(&mut word));
                    }
                    run.push(c);
                    continue;
                }
                self.segment_run(&run, &mut out);
                run.clear();
                if c.is_alphanumeric() {
                    word.push(c);
                } else if !word.is_empty() {
                    out.push(std::mem::take(&mut word));
                }
            }
            self.segment_run(&run, &mut out);
            if !word.is_empty() {
                out.push(word);
            }
        }
        out
    }

    /// Forward maximum matching over one run of ideographs.
    fn segment_run(&self, run: &[char], out: &mut Vec<String>) {
        let mut start = 0;
        while start < run.len() {
            let longest = self.longest_cjk_cue.min(run.len() - start);
            let end = (2..=longest)
                .rev()
                .map(|len| start + len)
                .find(|&end| self.is_cue(&run[start..end].iter().collect::<String>()))
                .unwrap_or(start + 1);
            out.push(run[start..end].iter().collect());
            start = end;
        }
    }

    /// Positive and negative cue mass for a token sequence.
    fn polarity_mass(&self, tokens: &[String]) -> (f64, f64) {
        let mut positive = 0.0;
        let mut negative = 0.0;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.lexicon.get(token.as_str()) else {
                continue;
            };

            let negated = (1..=NEGATION_WINDOW).any(|k| i >= k && is_negator(&tokens[i - k]));
            let intensified = i >= 1 && is_intensifier(&tokens[i - 1]);

            let mut value = if negated { -base } else { base };
            if intensified {
                value *= INTENSIFIER_BOOST;
            }

            if value > 0.0 {
                positive += value;
            } else {
                negative -= value;
            }
        }

        (positive, negative)
    }
}

fn cjk_len(word: &str) -> usize {
    if word.chars().any(is_cjk) {
        word.chars().count()
    } else {
        0
    }
}

impl SentimentScorer for LexiconScorer {
    fn score_text(&self, text: &str) -> SentimentResult {
        let tokens = self.cue_tokens(text);
        let (positive, negative) = self.polarity_mass(&tokens);
        let mass = positive + negative;

        if mass <= 0.0 {
            return SentimentResult::neutral();
        }

        let score = 0.5 + 0.5 * (positive - negative) / mass;
        debug!(positive, negative, score, "Scored sentiment");
        SentimentResult::from_score(score, self.epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::traits::SentimentLabel;

    #[test]
    fn test_negation_flips_polarity() {
        let scorer = LexiconScorer::default();
        let r = scorer.score_text("the ending was not good");
        assert!(r.score < 0.5, "got {}", r.score);
    }

    #[test]
    fn test_mixed_cues_resolve_by_net_polarity() {
        let scorer = LexiconScorer::default();
        // excellent (+3) vs boring (-2)
        let r = scorer.score_text("an excellent start but a boring middle");
        assert!((r.score - 0.6).abs() < 1e-12, "got {}", r.score);
        assert_eq!(r.sentiment, SentimentLabel::Positive);
    }

    #[test]
    fn test_balanced_cues_are_neutral() {
        let scorer = LexiconScorer::default();
        let r = scorer.score_text("good and bad");
        assert_eq!(r.score, 0.5);
        assert_eq!(r.sentiment, SentimentLabel::Neutral);
    }

    #[test]
    fn test_segments_unspaced_chinese_into_cues() {
        let scorer = LexiconScorer::default();
        let tokens = scorer.cue_tokens("我非常喜欢这本书，情节精彩。");
        assert_eq!(
            tokens,
            vec!["我", "非常", "喜欢", "这", "本", "书", "情", "节", "精彩"]
        );
    }

    #[test]
    fn test_mixed_script_token_keeps_latin_word() {
        let scorer = LexiconScorer::default();
        assert_eq!(scorer.cue_tokens("ok喜欢"), vec!["ok", "喜欢"]);
    }

    #[test]
    fn test_merged_long_cue_extends_lookahead() {
        let mut scorer = LexiconScorer::default();
        scorer.merge_from_reader("扣人心弦 3\n".as_bytes()).unwrap();
        assert_eq!(scorer.cue_tokens("情节扣人心弦"), vec!["情", "节", "扣人心弦"]);
    }

    #[test]
    fn test_merge_from_reader_skips_comments_and_garbage() {
        let mut scorer = LexiconScorer::default();
        let input = "# custom words\n\nluminous 2.5\nbroken line here\ngloomy -2\nodd notanumber\n";
        let added = scorer.merge_from_reader(input.as_bytes()).unwrap();
        assert_eq!(added, 2);
        assert!(scorer.score_text("a luminous tale").score > 0.5);
        assert!(scorer.score_text("a gloomy tale").score < 0.5);
    }
}
