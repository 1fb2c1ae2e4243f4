//! Word, sentence and paragraph statistics plus two readability estimates.
//!
//! Two readability formulas coexist on purpose: `flesch_readability` feeds
//! the optimization report, `simple_readability` feeds the on-page scorer's
//! content analysis. They produce different numbers for the same text.

use crate::models::TextMetrics;

pub fn metrics(content: &str) -> TextMetrics {
    TextMetrics {
        word_count: word_count(content),
        sentence_count: sentence_count(content),
        paragraph_count: paragraph_count(content),
        syllable_estimate: syllable_estimate(content),
        readability_score: flesch_readability(content),
    }
}

pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Never returns 0 so it can be used as a divisor.
pub fn sentence_count(content: &str) -> usize {
    content
        .split(['.', '!', '?'])
        .filter(|segment| !segment.trim().is_empty())
        .count()
        .max(1)
}

pub fn paragraph_count(content: &str) -> usize {
    content
        .replace("\r\n", "\n")
        .split("\n\n")
        .filter(|paragraph| !paragraph.trim().is_empty())
        .count()
}

/// One syllable per three characters, at least one per word.
pub fn syllable_estimate(content: &str) -> usize {
    content
        .split_whitespace()
        .map(|word| (word.chars().count() / 3).max(1))
        .sum()
}

/// Flesch reading-ease score, rounded and clamped to 0..=100.
pub fn flesch_readability(content: &str) -> u8 {
    let words = word_count(content);
    if words == 0 {
        return 0;
    }

    let words = words as f64;
    let sentences = sentence_count(content) as f64;
    let syllables = syllable_estimate(content) as f64;

    let score = 206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words);
    score.round().clamp(0.0, 100.0) as u8
}

/// Sentence-length-only readability: `100 - (avg_words_per_sentence - 10) * 2`.
pub fn simple_readability(content: &str) -> f64 {
    let words = word_count(content);
    if words == 0 {
        return 0.0;
    }

    let avg_words_per_sentence = words as f64 / sentence_count(content) as f64;
    (100.0 - (avg_words_per_sentence - 10.0) * 2.0).clamp(0.0, 100.0)
}
