// Novel structure analysis: splitting a chapter sequence into narrative
// sections.
//
// Sections are sized from fixed proportions that depend on the novel's length.
// Each section gets at least one chapter and leaves one chapter for every
// section after it while chapters last. The last section absorbs any
// remainder, and sections that would be empty are dropped, so the kept
// sections always tile chapters 1..=n in order.
//
// Alongside the layout come two per-chapter series: the sentiment curve, and
// the topic shift between consecutive chapters (1 - weighted Jaccard overlap
// of their topic keywords).

use serde::Serialize;
use tracing::debug;

use crate::sentiment::traits::SentimentScorer;
use crate::topics::overlap::weighted_jaccard;
use crate::topics::traits::TopicExtractor;

/// Topics extracted per chapter for the topic-shift series.
const TOPICS_PER_CHAPTER: usize = 3;

const MAIN_SECTIONS: [&str; 5] = ["Opening", "Setup", "Development", "Climax", "Resolution"];

const SHORT_MAIN: [f64; 5] = [0.2, 0.15, 0.3, 0.25, 0.1];
const MEDIUM_MAIN: [f64; 5] = [0.15, 0.2, 0.35, 0.2, 0.1];
const LONG_MAIN: [f64; 5] = [0.1, 0.15, 0.4, 0.25, 0.1];

/// Below this many chapters the detail view uses the simplified sections.
const DETAIL_THRESHOLD: usize = 12;

const SIMPLE_DETAIL_SECTIONS: [&str; 4] = ["Cause", "Course", "Turn", "Outcome"];
const SIMPLE_DETAIL: [f64; 4] = [0.25, 0.35, 0.25, 0.15];

const FULL_DETAIL_SECTIONS: [&str; 12] = [
    "Character introduction",
    "World setting",
    "Initial conflict",
    "Rising action",
    "Secondary conflict",
    "Relationship development",
    "Main conflict",
    "Crisis",
    "Turning point",
    "Climax",
    "Resolution",
    "Ending",
];
const FULL_DETAIL: [f64; 12] = [
    0.05, 0.05, 0.08, 0.12, 0.08, 0.12, 0.12, 0.1, 0.08, 0.08, 0.06, 0.06,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureSection {
    pub name: String,
    /// 1-based, inclusive
    pub start_chapter: usize,
    /// 1-based, inclusive
    pub end_chapter: usize,
    pub chapter_count: usize,
    /// chapter_count / total chapters
    pub share: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NovelStructure {
    pub main_structure: Vec<StructureSection>,
    pub detail_structure: Vec<StructureSection>,
    pub total_chapters: usize,
    /// Sentiment score per chapter, in chapter order
    pub sentiment_curve: Vec<f64>,
    /// Topic shift from chapter i+1 to chapter i+2 at index i, in [0, 1];
    /// one entry fewer than there are chapters
    pub topic_shift: Vec<f64>,
}

/// Analyze the structure of a novel given its chapters in order.
///
/// An empty chapter list gives an empty structure.
pub fn analyze_novel_structure<S: AsRef<str>>(
    chapters: &[S],
    scorer: &dyn SentimentScorer,
    topics: &dyn TopicExtractor,
) -> NovelStructure {
    let total = chapters.len();
    if total == 0 {
        return NovelStructure::default();
    }

    let main_proportions = if total <= 10 {
        &SHORT_MAIN
    } else if total <= 30 {
        &MEDIUM_MAIN
    } else {
        &LONG_MAIN
    };
    let main_structure = allocate(total, &MAIN_SECTIONS, main_proportions);

    let detail_structure = if total < DETAIL_THRESHOLD {
        allocate(total, &SIMPLE_DETAIL_SECTIONS, &SIMPLE_DETAIL)
    } else {
        allocate(total, &FULL_DETAIL_SECTIONS, &FULL_DETAIL)
    };

    let sentiment_curve = chapters
        .iter()
        .map(|c| scorer.score_text(c.as_ref()).score)
        .collect();

    let topic_shift = topic_shifts(chapters, topics);

    debug!(
        chapters = total,
        main_sections = main_structure.len(),
        detail_sections = detail_structure.len(),
        "Analyzed novel structure"
    );

    NovelStructure {
        main_structure,
        detail_structure,
        total_chapters: total,
        sentiment_curve,
        topic_shift,
    }
}

/// How much the topic keywords change between consecutive chapters.
///
/// Two chapters with no topics at all count as no shift.
pub fn topic_shifts<S: AsRef<str>>(
    chapters: &[S],
    extractor: &dyn TopicExtractor,
) -> Vec<f64> {
    let per_chapter: Vec<_> = chapters
        .iter()
        .map(|c| {
            extractor
                .extract(c.as_ref(), TOPICS_PER_CHAPTER)
                .unwrap_or_default()
        })
        .collect();

    per_chapter
        .windows(2)
        .map(|pair| {
            if pair[0].is_empty() && pair[1].is_empty() {
                0.0
            } else {
                1.0 - weighted_jaccard(&pair[0], &pair[1])
            }
        })
        .collect()
}

/// Lay sections over chapters 1..=total by proportion.
fn allocate(total: usize, names: &[&str], proportions: &[f64]) -> Vec<StructureSection> {
    let mut sections = Vec::with_capacity(names.len());
    let mut start = 0;

    for (i, (name, proportion)) in names.iter().zip(proportions).enumerate() {
        let wanted = ((total as f64 * proportion).round() as usize).max(1);
        let remaining = names.len() - 1 - i;
        let end = if remaining == 0 {
            total
        } else {
            (start + wanted)
                .min(total.saturating_sub(remaining))
                .max(start + 1)
                .min(total)
        };
        if end <= start {
            continue;
        }

        let chapter_count = end - start;
        sections.push(StructureSection {
            name: (*name).to_string(),
            start_chapter: start + 1,
            end_chapter: end,
            chapter_count,
            share: chapter_count as f64 / total as f64,
        });
        start = end;
    }

    sections
}
