// Colored terminal output for analysis results.
//
// This module handles all terminal-specific formatting: colors, tables and
// bars. The CLI picks between these and plain JSON.

use std::collections::BTreeMap;

use colored::{ColoredString, Colorize};

use super::{bar, truncate_chars};
use crate::clustering::{group_by_cluster, ClusterResult};
use crate::sentiment::traits::{SentimentLabel, SentimentResult};
use crate::structure::{NovelStructure, StructureSection};
use crate::style::{ComplexityMetrics, WritingStyle};

const BAR_WIDTH: usize = 20;

fn header(title: &str) {
    println!("\n{}", format!("=== {title} ===").bold());
    println!();
}

fn colorize_score(score: f64) -> ColoredString {
    let text = format!("{score:.3}");
    if score >= 0.66 {
        text.bright_green()
    } else if score >= 0.33 {
        text.bright_yellow()
    } else {
        text.bright_blue()
    }
}

pub fn display_similarity(score: f64) {
    header("Similarity");
    println!("  {} {}", bar(score, BAR_WIDTH), colorize_score(score));
}

pub fn display_relatedness(references: &[String], scores: &[f64]) {
    header(&format!("Relatedness ({} references)", scores.len()));
    for (reference, score) in references.iter().zip(scores) {
        println!(
            "  {} {}  {}",
            bar(*score, BAR_WIDTH),
            colorize_score(*score),
            truncate_chars(reference, 60).dimmed()
        );
    }
}

/// Print clusters grouped by id, each member with a short preview.
pub fn display_clusters(results: &[ClusterResult]) {
    let groups = group_by_cluster(results);
    header(&format!(
        "Clusters ({} texts, {} clusters)",
        results.len(),
        groups.len()
    ));

    for (cluster_id, members) in &groups {
        println!("  {} ({} texts)", format!("Cluster {cluster_id}").bold(), members.len());
        for &i in members {
            println!("    {:>3}. {}", i + 1, truncate_chars(&results[i].text, 70));
        }
        println!();
    }
}

pub fn display_classification(scores: &BTreeMap<String, f64>) {
    header("Classification");
    if scores.is_empty() {
        println!("  No categories given.");
        return;
    }

    let mut ranked: Vec<(&String, &f64)> = scores.iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (category, weight) in ranked {
        println!(
            "  {:<20} {} {}",
            category,
            bar(*weight, BAR_WIDTH),
            colorize_score(*weight)
        );
    }
}

pub fn display_sentiment(result: &SentimentResult) {
    header("Sentiment");
    let label = match result.sentiment {
        SentimentLabel::Positive => result.sentiment.as_str().green().bold(),
        SentimentLabel::Neutral => result.sentiment.as_str().dimmed(),
        SentimentLabel::Negative => result.sentiment.as_str().red().bold(),
    };
    println!("  {} {:.3}  {}", bar(result.score, BAR_WIDTH), result.score, label);
}

pub fn display_keywords(keywords: &[(String, f32)]) {
    header(&format!("Keywords ({})", keywords.len()));
    if keywords.is_empty() {
        println!("  No keywords found.");
        return;
    }
    for (i, (keyword, score)) in keywords.iter().enumerate() {
        println!("  {:>3}. {:<24} {:.4}", i + 1, keyword.bold(), score);
    }
}

pub fn display_writing_style(style: &WritingStyle) {
    header("Writing Style");
    println!("  Avg sentence length:   {:.1} chars", style.avg_sentence_length);
    println!("  Avg paragraph length:  {:.1} chars", style.avg_paragraph_length);
    println!("  Dialogue frequency:    {:.3}", style.dialogue_frequency);
    println!("  Vocabulary richness:   {:.3}", style.vocabulary_richness);
    println!("  Exclamations/sentence: {:.3}", style.exclamation_rate);
    println!("  Questions/sentence:    {:.3}", style.question_rate);
}

pub fn display_complexity(metrics: &ComplexityMetrics) {
    header("Text Complexity");
    println!("  Vocabulary diversity:  {:.3}", metrics.vocabulary_diversity);
    println!("  Avg sentence length:   {:.1} tokens", metrics.avg_sentence_length);
    println!("  Long sentence ratio:   {:.3}", metrics.long_sentence_ratio);
    println!(
        "  Overall:               {} {}",
        bar(metrics.overall_complexity, BAR_WIDTH),
        colorize_score(metrics.overall_complexity)
    );
}

fn display_sections(title: &str, sections: &[StructureSection]) {
    println!("  {}", title.bold());
    for section in sections {
        println!(
            "    {:<26} ch. {:>3}-{:<3} {} {:.0}%",
            section.name,
            section.start_chapter,
            section.end_chapter,
            bar(section.share, BAR_WIDTH),
            section.share * 100.0
        );
    }
    println!();
}

pub fn display_structure(structure: &NovelStructure) {
    header(&format!("Novel Structure ({} chapters)", structure.total_chapters));
    if structure.total_chapters == 0 {
        println!("  No chapters given.");
        return;
    }

    display_sections("Main structure", &structure.main_structure);
    display_sections("Detail structure", &structure.detail_structure);

    println!("  {}", "Sentiment curve".bold());
    for (i, score) in structure.sentiment_curve.iter().enumerate() {
        println!("    ch. {:>3} {} {:.3}", i + 1, bar(*score, BAR_WIDTH), score);
    }

    if !structure.topic_shift.is_empty() {
        println!("  {}", "Topic shift".bold());
        for (i, shift) in structure.topic_shift.iter().enumerate() {
            println!("    ch. {:>3}->{:<3} {} {:.3}", i + 1, i + 2, bar(*shift, BAR_WIDTH), shift);
        }
    }
}

pub fn display_predictions(predictions: &BTreeMap<String, f64>) {
    header("Plot Predictions");
    if predictions.is_empty() {
        println!("  No prediction available. Train a model with `novelscope train` first.");
        return;
    }

    let mut ranked: Vec<(&String, &f64)> = predictions.iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (label, score) in ranked {
        let label = if let Some(term) = label.strip_prefix("concept:") {
            format!("{} {term}", "concept".dimmed())
        } else if let Some(term) = label.strip_prefix("rising:") {
            format!("{} {term}", "rising ".yellow())
        } else {
            label.bold().to_string()
        };
        println!("  {:<32} {} {}", label, bar(*score, BAR_WIDTH), colorize_score(*score));
    }
}
