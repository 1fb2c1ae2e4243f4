//! Keyword statistics: term weighting, density and in-text positions.

use crate::models::{KeywordPosition, KeywordReport};
use crate::text_metrics;
use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};
use scraper::{Html, Selector};
use std::collections::HashMap;

pub const MAX_TOP_KEYWORDS: usize = 10;
pub const MAX_POSITIONS: usize = 5;
const CONTEXT_CHARS: usize = 20;
const MIN_TERM_CHARS: usize = 4;
const USER_KEYWORD_BONUS: f64 = 2.0;

static STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));
static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("body selector should be valid"));

// Only stopwords longer than three characters matter; shorter terms are
// dropped by length first.
const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "also", "among", "because", "been", "before",
    "being", "below", "between", "both", "cannot", "could", "does", "doing", "down", "during",
    "each", "even", "every", "from", "further", "have", "having", "here", "hers", "herself",
    "himself", "into", "itself", "just", "more", "most", "myself", "once", "only", "other",
    "ought", "ours", "ourselves", "over", "same", "should", "some", "such", "than", "that",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "under", "until", "very", "were", "what", "when", "where", "which", "while",
    "whom", "will", "with", "would", "your", "yours", "yourself", "yourselves",
];

/// Single-document TF-IDF collapses to term frequency scaled by this constant.
fn single_document_idf() -> f64 {
    1.0 + (1.0f64 / 2.0).ln()
}

/// Returns the visible body text of an HTML fragment or document.
///
/// Plain text and markdown pass through unchanged apart from entity decoding.
pub fn extract_text(content: &str) -> String {
    let document = Html::parse_document(content);
    document
        .select(&BODY_SELECTOR)
        .next()
        .map(|body| body.text().collect::<String>())
        .unwrap_or_default()
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
}

fn is_root_term(term: &str) -> bool {
    STEMMER.stem(term) == term
}

fn is_candidate(term: &str) -> bool {
    term.chars().count() >= MIN_TERM_CHARS && !STOPWORDS.contains(&term) && is_root_term(term)
}

/// Ranks the most important terms of `content`, boosting `explicit_keywords`.
///
/// `explicit_keywords` is a comma-separated, case-insensitive list. Ties keep
/// the order in which terms first appear.
pub fn analyze_keywords(content: &str, explicit_keywords: Option<&str>) -> KeywordReport {
    let text = extract_text(content);
    let lowered = text.to_lowercase();
    let idf = single_document_idf();

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut weights: Vec<(String, f64)> = Vec::new();

    for term in tokenize(&lowered).filter(|t| is_candidate(t)) {
        match index.get(term) {
            Some(&i) => weights[i].1 += idf,
            None => {
                index.insert(term.to_string(), weights.len());
                weights.push((term.to_string(), idf));
            }
        }
    }

    let user_keywords = explicit_keywords
        .into_iter()
        .flat_map(|csv| csv.split(','))
        .map(|kw| kw.trim().to_lowercase())
        .filter(|kw| !kw.is_empty());

    for kw in user_keywords {
        match index.get(&kw) {
            Some(&i) => weights[i].1 += USER_KEYWORD_BONUS,
            None => {
                index.insert(kw.clone(), weights.len());
                weights.push((kw, USER_KEYWORD_BONUS));
            }
        }
    }

    weights.sort_by(|a, b| b.1.total_cmp(&a.1));
    let top_keywords: Vec<String> = weights
        .into_iter()
        .take(MAX_TOP_KEYWORDS)
        .map(|(term, _)| term)
        .collect();

    let keyword_density = top_keywords
        .first()
        .map(|kw| keyword_density(&text, kw))
        .unwrap_or(0.0);

    tracing::debug!(
        terms = top_keywords.len(),
        density = keyword_density,
        "Keyword analysis complete"
    );

    KeywordReport {
        top_keywords,
        keyword_density,
        content_length: text.chars().count(),
        word_count: text_metrics::word_count(&text),
    }
}

/// Percentage of words containing `keyword`, rounded to two decimals.
pub fn keyword_density(content: &str, keyword: &str) -> f64 {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return 0.0;
    }

    let lowered = content.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }

    let hits = words.iter().filter(|w| w.contains(&keyword)).count();
    round2(hits as f64 / words.len() as f64 * 100.0)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// Single-char folding keeps folded offsets aligned with the original text.
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn folded_chars(s: &str) -> Vec<char> {
    s.chars().map(fold).collect()
}

/// First occurrences of `keyword` (case-insensitive) with 20 characters of
/// context on each side. Offsets are in characters.
pub fn keyword_positions(content: &str, keyword: &str) -> Vec<KeywordPosition> {
    let needle = folded_chars(keyword);
    if needle.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = content.chars().collect();
    let haystack: Vec<char> = chars.iter().copied().map(fold).collect();
    let mut positions = Vec::new();
    let mut pos = 0;

    while positions.len() < MAX_POSITIONS && pos + needle.len() <= haystack.len() {
        if haystack[pos..pos + needle.len()] == needle[..] {
            let start = pos.saturating_sub(CONTEXT_CHARS);
            let end = (pos + needle.len() + CONTEXT_CHARS).min(chars.len());
            positions.push(KeywordPosition {
                position: pos,
                context: chars[start..end].iter().collect(),
            });
        }
        pos += 1;
    }

    positions
}

/// Non-overlapping, case-insensitive occurrences of `keyword` in `content`.
pub fn count_occurrences(content: &str, keyword: &str) -> usize {
    let needle = folded_chars(keyword);
    if needle.is_empty() {
        return 0;
    }

    let haystack = folded_chars(content);
    let mut count = 0;
    let mut pos = 0;
    while pos + needle.len() <= haystack.len() {
        if haystack[pos..pos + needle.len()] == needle[..] {
            count += 1;
            pos += needle.len();
        } else {
            pos += 1;
        }
    }
    count
}

/// The first non-empty entry of a comma-separated keyword list.
pub fn primary_keyword(keywords: &str) -> Option<String> {
    keywords
        .split(',')
        .map(str::trim)
        .find(|kw| !kw.is_empty())
        .map(str::to_lowercase)
}
