use crate::error::{Result, SeoError};
use crate::keywords::{self, round2};
use crate::models::{
    AnalysisInput, ContentAnalysis, DescriptionAnalysis, KeywordAnalysis, LengthAnalysis,
    OverallAnalysis, TitleAnalysis,
};
use crate::suggestions::generate_suggestions;
use crate::text_metrics;
use once_cell::sync::Lazy;
use regex::Regex;

pub const TITLE_IDEAL: std::ops::RangeInclusive<usize> = 40..=60;
pub const DESCRIPTION_IDEAL: std::ops::RangeInclusive<usize> = 120..=160;
pub const DESCRIPTION_FALLBACK_CHARS: usize = 160;
const DENSITY_IDEAL_MIN: f64 = 0.5;
const DENSITY_IDEAL_MAX: f64 = 2.5;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#+\s+.+").expect("heading regex should be valid"));
static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[.*?\]\(.*?\)").expect("image regex should be valid"));

/// Scores markdown content for on-page SEO.
///
/// Only empty content or an empty title is rejected. Everything else,
/// however poor, produces a score.
pub fn score_page(input: &AnalysisInput) -> Result<OverallAnalysis> {
    if input.content.trim().is_empty() {
        return Err(SeoError::invalid_input("content must not be empty"));
    }
    if input.title.trim().is_empty() {
        return Err(SeoError::invalid_input("title must not be empty"));
    }

    let primary = input
        .keywords
        .as_deref()
        .and_then(keywords::primary_keyword);

    let title_analysis = analyze_title(&input.title, primary.as_deref());

    let description = match input.meta_description.as_deref() {
        Some(desc) if !desc.is_empty() => desc.to_string(),
        _ => input
            .content
            .chars()
            .take(DESCRIPTION_FALLBACK_CHARS)
            .collect(),
    };
    let description_analysis = analyze_description(&description, primary.as_deref());

    let content_analysis = analyze_content(&input.content);

    let keyword_analysis = primary
        .as_deref()
        .map(|kw| analyze_keyword(&input.content, kw, content_analysis.word_count));

    let overall_score = overall_score(
        &title_analysis,
        &description_analysis,
        keyword_analysis.as_ref(),
        &content_analysis,
    );

    let suggestions = generate_suggestions(
        &title_analysis,
        &description_analysis,
        keyword_analysis.as_ref(),
        &content_analysis,
    );

    let analysis_id = format!("seo-{}", uuid::Uuid::new_v4());

    tracing::debug!(
        analysis_id = %analysis_id,
        overall_score,
        title_score = title_analysis.score,
        description_score = description_analysis.score,
        words = content_analysis.word_count,
        "Scored page"
    );

    Ok(OverallAnalysis {
        analysis_id,
        overall_score,
        title_analysis,
        description_analysis,
        keyword_analysis,
        content_analysis,
        suggestions,
    })
}

fn contains_keyword(text: &str, keyword: Option<&str>) -> bool {
    keyword.is_some_and(|kw| text.to_lowercase().contains(&kw.to_lowercase()))
}

fn capped_score(value: f64) -> u8 {
    value.floor().clamp(0.0, 100.0) as u8
}

pub fn analyze_title(title: &str, keyword: Option<&str>) -> TitleAnalysis {
    let length = title.chars().count();
    LengthAnalysis {
        length,
        ideal: TITLE_IDEAL.contains(&length),
        contains_keyword: contains_keyword(title, keyword),
        score: capped_score(length as f64 * 1.5),
    }
}

pub fn analyze_description(description: &str, keyword: Option<&str>) -> DescriptionAnalysis {
    let length = description.chars().count();
    LengthAnalysis {
        length,
        ideal: DESCRIPTION_IDEAL.contains(&length),
        contains_keyword: contains_keyword(description, keyword),
        score: capped_score(length as f64 * 0.625),
    }
}

/// Unrounded keyword density as a percentage of `word_count`.
pub fn density_percent(count: usize, word_count: usize) -> f64 {
    if word_count == 0 {
        0.0
    } else {
        count as f64 / word_count as f64 * 100.0
    }
}

pub fn analyze_keyword(content: &str, keyword: &str, word_count: usize) -> KeywordAnalysis {
    let count = keywords::count_occurrences(content, keyword);
    let density = density_percent(count, word_count);

    KeywordAnalysis {
        keyword: keyword.to_string(),
        count,
        density: round2(density),
        ideal: (DENSITY_IDEAL_MIN..=DENSITY_IDEAL_MAX).contains(&density),
        positions: keywords::keyword_positions(content, keyword),
        score: capped_score(density * 40.0),
    }
}

/// Markdown structure signals: headings, images, paragraphs and readability.
pub fn analyze_content(content: &str) -> ContentAnalysis {
    let headings: Vec<&str> = HEADING_RE.find_iter(content).map(|m| m.as_str()).collect();

    ContentAnalysis {
        word_count: text_metrics::word_count(content),
        paragraph_count: text_metrics::paragraph_count(content),
        heading_count: headings.len(),
        has_h1: headings.iter().any(|h| h.starts_with("# ")),
        image_count: IMAGE_RE.find_iter(content).count(),
        readability_score: text_metrics::simple_readability(content),
    }
}

/// Weighted composite of the sub-scores. The raw sum is not normalized and
/// can exceed 100 before clamping.
pub fn overall_score(
    title: &TitleAnalysis,
    description: &DescriptionAnalysis,
    keyword: Option<&KeywordAnalysis>,
    content: &ContentAnalysis,
) -> u8 {
    let keyword_score = keyword.map(|k| k.score).unwrap_or(0) as f64;
    let length_score = (content.word_count as f64 * 0.1).min(100.0);

    let raw = title.score as f64 * 0.3
        + description.score as f64 * 0.2
        + keyword_score * 0.2
        + length_score * 0.2
        + if content.has_h1 { 20.0 } else { 0.0 }
        + if content.image_count > 0 { 10.0 } else { 0.0 };

    raw.round().clamp(0.0, 100.0) as u8
}
