//! Turns analysis findings into remediation hints.

use crate::error::{Result, SeoError};
use crate::keywords::analyze_keywords;
use crate::models::{
    ContentAnalysis, CurrentSeoData, DescriptionAnalysis, KeywordAnalysis, KeywordReport,
    OptimizationInput, OptimizationReport, OptimizationSuggestion, OptimizedMetadata,
    SuggestionPriority, SuggestionType, TitleAnalysis,
};
use crate::scorer::{DESCRIPTION_IDEAL, TITLE_IDEAL, density_percent};
use crate::text_metrics;

pub const ALL_GOOD: &str = "Your content looks good from an SEO point of view!";

const MIN_WORDS: usize = 300;
const MIN_OPTIMIZED_WORDS: usize = 800;
const LOW_DENSITY: f64 = 0.5;
const META_DESCRIPTION_CHARS: usize = 140;
const SUGGESTED_DESCRIPTION_CHARS: usize = 160;

/// Evaluates the on-page rules in a fixed order. Never returns an empty list.
pub fn generate_suggestions(
    title: &TitleAnalysis,
    description: &DescriptionAnalysis,
    keyword: Option<&KeywordAnalysis>,
    content: &ContentAnalysis,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !title.ideal {
        suggestions.push(if title.length < *TITLE_IDEAL.start() {
            "Your title is short. Try to bring it to 40-60 characters.".to_string()
        } else {
            "Your title is long. Try to keep it under 60 characters.".to_string()
        });
    }

    if keyword.is_some() && !title.contains_keyword {
        suggestions.push("Include the primary keyword in the title.".to_string());
    }

    if !description.ideal {
        suggestions.push(if description.length < *DESCRIPTION_IDEAL.start() {
            "Your meta description is short. Try to bring it to 120-160 characters.".to_string()
        } else {
            "Your meta description is long. Try to keep it under 160 characters.".to_string()
        });
    }

    if content.word_count < MIN_WORDS {
        suggestions.push("Your content is short. Try to write at least 300 words.".to_string());
    }

    if !content.has_h1 {
        suggestions.push("Use an H1 heading in your content.".to_string());
    }

    if content.image_count == 0 {
        suggestions.push("Add at least one image to your content.".to_string());
    }

    if let Some(keyword) = keyword {
        if !keyword.ideal {
            // The stored density is rounded; the low/high split must agree with `ideal`.
            let density = density_percent(keyword.count, content.word_count);
            suggestions.push(if density < LOW_DENSITY {
                "Your keyword density is low. Try to bring it to 0.5-2.5%.".to_string()
            } else {
                "Your keyword density is high. Avoid overusing the keyword.".to_string()
            });
        }

        if keyword.positions.is_empty() {
            suggestions.push("Use the keyword in your content.".to_string());
        }
    }

    if suggestions.is_empty() {
        suggestions.push(ALL_GOOD.to_string());
    }

    suggestions
}

fn quoted_keyword(keyword: Option<&String>) -> String {
    keyword
        .map(|kw| format!("\"{}\"", kw))
        .unwrap_or_else(|| "your main keyword".to_string())
}

/// Prioritized optimization hints. High-priority entries come first; each
/// priority group keeps its insertion order.
pub fn generate_optimization_suggestions(
    content: &str,
    title: &str,
    keyword_analysis: &KeywordReport,
    current_seo: Option<&CurrentSeoData>,
) -> Vec<OptimizationSuggestion> {
    let top = &keyword_analysis.top_keywords;
    let primary = quoted_keyword(top.first());
    let mut suggestions = Vec::new();

    if title.chars().count() < *TITLE_IDEAL.start() {
        suggestions.push(OptimizationSuggestion {
            suggestion_type: SuggestionType::Title,
            priority: SuggestionPriority::High,
            message: "Title is short (at least 40 characters recommended)".to_string(),
            suggestion: format!("Try extending the title with the keyword {}", primary),
        });
    }

    if keyword_analysis.word_count < MIN_OPTIMIZED_WORDS {
        suggestions.push(OptimizationSuggestion {
            suggestion_type: SuggestionType::Content,
            priority: SuggestionPriority::Medium,
            message: format!(
                "Your content has {} words (at least 800 recommended)",
                keyword_analysis.word_count
            ),
            suggestion: "Write more about the topic or add practical examples".to_string(),
        });
    }

    if keyword_analysis.keyword_density < LOW_DENSITY {
        suggestions.push(OptimizationSuggestion {
            suggestion_type: SuggestionType::Keyword,
            priority: SuggestionPriority::High,
            message: "Primary keyword density is low".to_string(),
            suggestion: format!("Use {} more often, naturally, in the content", primary),
        });
    }

    if let Some(current) = current_seo {
        if is_blank(current.meta_title.as_deref()) {
            suggestions.push(OptimizationSuggestion {
                suggestion_type: SuggestionType::Metadata,
                priority: SuggestionPriority::High,
                message: "SEO title (meta title) is not set".to_string(),
                suggestion: format!("Consider using \"{} | {}\"", title, top.join(", ")),
            });
        }

        if is_blank(current.meta_description.as_deref()) {
            let ideal: String = content.chars().take(SUGGESTED_DESCRIPTION_CHARS).collect();
            suggestions.push(OptimizationSuggestion {
                suggestion_type: SuggestionType::Metadata,
                priority: SuggestionPriority::Medium,
                message: "Meta description is not set".to_string(),
                suggestion: format!("Consider using this description: \"{}\"", ideal),
            });
        }
    }

    prioritize(suggestions)
}

/// Stable partition: all high-priority entries, then all medium ones.
fn prioritize(suggestions: Vec<OptimizationSuggestion>) -> Vec<OptimizationSuggestion> {
    let (mut high, medium): (Vec<_>, Vec<_>) = suggestions
        .into_iter()
        .partition(|s| s.priority == SuggestionPriority::High);
    high.extend(medium);
    high
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Fills in missing metadata from the title, content and ranked keywords.
pub fn generate_optimized_metadata(
    title: &str,
    content: &str,
    keyword_analysis: &KeywordReport,
    current_seo: Option<&CurrentSeoData>,
    site_name: Option<&str>,
) -> OptimizedMetadata {
    let top = &keyword_analysis.top_keywords;
    let focus_keyword = top.first().cloned();

    let meta_title = current_seo
        .and_then(|c| c.meta_title.clone())
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| {
            [Some(title), focus_keyword.as_deref(), site_name]
                .into_iter()
                .flatten()
                .filter(|part| !part.trim().is_empty())
                .collect::<Vec<_>>()
                .join(" | ")
        });

    let meta_description = current_seo
        .and_then(|c| c.meta_description.clone())
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| {
            let head: String = content.chars().take(META_DESCRIPTION_CHARS).collect();
            format!("{}...", head)
        });

    OptimizedMetadata {
        meta_title,
        meta_description,
        focus_keyword,
        secondary_keywords: top.iter().skip(1).take(2).cloned().collect(),
    }
}

/// Keyword ranking, metadata proposals and prioritized hints for one draft.
pub fn optimize(input: &OptimizationInput, site_name: Option<&str>) -> Result<OptimizationReport> {
    if input.content.trim().is_empty() {
        return Err(SeoError::invalid_input("content must not be empty"));
    }

    let keyword_analysis = analyze_keywords(&input.content, input.keywords.as_deref());
    let current = input.current_seo.as_ref();

    let suggestions =
        generate_optimization_suggestions(&input.content, &input.title, &keyword_analysis, current);
    let optimized_metadata = generate_optimized_metadata(
        &input.title,
        &input.content,
        &keyword_analysis,
        current,
        site_name,
    );

    tracing::info!(
        keywords = ?keyword_analysis.top_keywords,
        suggestions = suggestions.len(),
        "Optimization complete"
    );

    let stats = text_metrics::metrics(&input.content);

    Ok(OptimizationReport {
        readability_score: stats.readability_score,
        text_metrics: stats,
        keyword_analysis,
        optimized_metadata,
        suggestions,
    })
}
