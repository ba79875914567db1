// Unit tests for sentiment scoring.
//
// Tests the threshold policy, the neutral default, contextual modifiers
// (negation, intensifiers), Chinese cues, and lexicon file loading.

use std::io::Write;

use novelscope::sentiment::lexicon::LexiconScorer;
use novelscope::sentiment::traits::{
    SentimentLabel, SentimentResult, SentimentScorer, DEFAULT_EPSILON,
};
use novelscope::AnalyticsError;

// ============================================================
// Threshold policy
// ============================================================

#[test]
fn labels_follow_strict_thresholds() {
    let eps = DEFAULT_EPSILON;
    assert_eq!(SentimentLabel::from_score(0.9, eps), SentimentLabel::Positive);
    assert_eq!(SentimentLabel::from_score(0.1, eps), SentimentLabel::Negative);
    assert_eq!(SentimentLabel::from_score(0.5, eps), SentimentLabel::Neutral);
    assert_eq!(SentimentLabel::from_score(0.53, eps), SentimentLabel::Neutral);
    assert_eq!(SentimentLabel::from_score(0.47, eps), SentimentLabel::Neutral);
}

#[test]
fn result_clamps_out_of_range_scores() {
    let r = SentimentResult::from_score(1.7, DEFAULT_EPSILON);
    assert_eq!(r.score, 1.0);
    assert_eq!(r.sentiment, SentimentLabel::Positive);
}

#[test]
fn label_serializes_lowercase() {
    let json = serde_json::to_string(&SentimentResult::neutral()).unwrap();
    assert_eq!(json, r#"{"score":0.5,"sentiment":"neutral"}"#);
}

// ============================================================
// LexiconScorer
// ============================================================

#[test]
fn no_cues_is_exactly_neutral() {
    let scorer = LexiconScorer::default();
    for text in ["", "   ", "The ship left the harbor at dawn.", "12345"] {
        let r = scorer.score_text(text);
        assert_eq!(r.score, 0.5, "{text:?} got {}", r.score);
        assert_eq!(r.sentiment, SentimentLabel::Neutral);
    }
}

#[test]
fn positive_text_scores_above_half() {
    let r = LexiconScorer::default().score_text("This book is excellent! I loved it.");
    assert!(r.score > 0.5, "got {}", r.score);
    assert_eq!(r.sentiment, SentimentLabel::Positive);
}

#[test]
fn negative_text_scores_below_half() {
    let r = LexiconScorer::default().score_text("Terrible pacing and a boring, awful ending.");
    assert!(r.score < 0.5, "got {}", r.score);
    assert_eq!(r.sentiment, SentimentLabel::Negative);
}

#[test]
fn negator_reaches_three_tokens_back() {
    let scorer = LexiconScorer::default();
    assert!(scorer.score_text("it was not really very good").score < 0.5);
    // four tokens back is out of reach
    assert!(scorer.score_text("not that it was good").score > 0.5);
}

#[test]
fn intensifier_strengthens_a_mixed_text() {
    let scorer = LexiconScorer::default();
    let plain = scorer.score_text("good but bad").score;
    let boosted = scorer.score_text("very good but bad").score;
    assert!(boosted > plain, "boosted {boosted} vs plain {plain}");
}

#[test]
fn chinese_cues_are_recognized() {
    let scorer = LexiconScorer::default();
    assert_eq!(scorer.score_text("我 很 喜欢 这 本 书").sentiment, SentimentLabel::Positive);
    assert_eq!(scorer.score_text("结局 让 人 失望").sentiment, SentimentLabel::Negative);
    assert_eq!(scorer.score_text("我 不 喜欢").sentiment, SentimentLabel::Negative);
}

#[test]
fn unspaced_chinese_prose_is_scored() {
    let scorer = LexiconScorer::default();

    let praise = scorer.score_text("我非常喜欢这本书，情节精彩。");
    assert_eq!(praise.sentiment, SentimentLabel::Positive, "got {}", praise.score);

    let complaint = scorer.score_text("这个故事太糟糕了，让人失望。");
    assert_eq!(complaint.sentiment, SentimentLabel::Negative, "got {}", complaint.score);

    let negated = scorer.score_text("我不喜欢这个结局。");
    assert!(negated.score < 0.5, "got {}", negated.score);
}

#[test]
fn unspaced_chinese_matches_spaced_form() {
    let scorer = LexiconScorer::default();
    assert_eq!(
        scorer.score_text("我非常喜欢这本书").score,
        scorer.score_text("我 非常 喜欢 这本 书").score
    );
}

#[test]
fn score_batch_preserves_order() {
    let scorer = LexiconScorer::default();
    let texts = vec!["wonderful".to_string(), "awful".to_string(), "table".to_string()];
    let results = scorer.score_batch(&texts);
    assert_eq!(
        results.iter().map(|r| r.sentiment).collect::<Vec<_>>(),
        vec![
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral
        ]
    );
}

#[test]
fn wider_epsilon_widens_neutral_band() {
    // excellent (+3) vs boring (-2) scores 0.6
    let text = "an excellent start but a boring middle";
    assert_eq!(
        LexiconScorer::new(0.05).score_text(text).sentiment,
        SentimentLabel::Positive
    );
    assert_eq!(
        LexiconScorer::new(0.2).score_text(text).sentiment,
        SentimentLabel::Neutral
    );
}

// ============================================================
// Lexicon files
// ============================================================

#[test]
fn lexicon_file_overrides_builtin_words() {
    let path = std::env::temp_dir().join("novelscope-test-lexicon.txt");
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# genre words").unwrap();
        writeln!(file, "grimdark -2.5").unwrap();
        writeln!(file, "good -1").unwrap();
    }

    let mut scorer = LexiconScorer::default();
    let added = scorer.merge_from_file(&path).unwrap();
    assert_eq!(added, 2);
    assert!(scorer.score_text("a grimdark saga").score < 0.5);
    assert!(scorer.score_text("good").score < 0.5);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_lexicon_file_is_lexicon_error() {
    let mut scorer = LexiconScorer::default();
    let err = scorer
        .merge_from_file(std::path::Path::new("/nonexistent/lexicon.txt"))
        .unwrap_err();
    assert!(matches!(err, AnalyticsError::Lexicon(_)));
}
