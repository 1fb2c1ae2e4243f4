use rust_stemmers::{Algorithm, Stemmer};
use seolens::keywords::{MAX_TOP_KEYWORDS, analyze_keywords};
use seolens::models::{
    CurrentSeoData, KeywordReport, OptimizationInput, SuggestionPriority, SuggestionType,
};
use seolens::suggestions::{
    generate_optimization_suggestions, generate_optimized_metadata, optimize,
};

fn report(top: &[&str], density: f64, word_count: usize) -> KeywordReport {
    KeywordReport {
        top_keywords: top.iter().map(|s| s.to_string()).collect(),
        keyword_density: density,
        content_length: word_count * 5,
        word_count,
    }
}

fn no_current_seo() -> CurrentSeoData {
    CurrentSeoData {
        meta_title: None,
        meta_description: Some("   ".to_string()),
    }
}

#[test]
fn test_high_priority_first_stable() {
    let suggestions = generate_optimization_suggestions(
        "Short content.",
        "Short title",
        &report(&["rust", "memory"], 0.1, 100),
        Some(&no_current_seo()),
    );

    let kinds: Vec<(SuggestionType, SuggestionPriority)> = suggestions
        .iter()
        .map(|s| (s.suggestion_type, s.priority))
        .collect();

    // Insertion order: title(H), content(M), keyword(H), meta title(H), meta description(M)
    assert_eq!(
        kinds,
        vec![
            (SuggestionType::Title, SuggestionPriority::High),
            (SuggestionType::Keyword, SuggestionPriority::High),
            (SuggestionType::Metadata, SuggestionPriority::High),
            (SuggestionType::Content, SuggestionPriority::Medium),
            (SuggestionType::Metadata, SuggestionPriority::Medium),
        ]
    );
}

#[test]
fn test_suggestion_messages_quote_primary_keyword() {
    let suggestions = generate_optimization_suggestions(
        "Short content.",
        "Short title",
        &report(&["rust", "memory"], 0.1, 100),
        None,
    );

    assert_eq!(suggestions.len(), 3);
    assert!(suggestions[0].suggestion.contains("\"rust\""));
    assert!(suggestions[2].message.contains("100 words"));
}

#[test]
fn test_no_keywords_falls_back_to_generic_wording() {
    let suggestions =
        generate_optimization_suggestions("Short content.", "Short title", &report(&[], 0.0, 2), None);
    assert!(suggestions[0].suggestion.contains("your main keyword"));
}

#[test]
fn test_metadata_checks_need_current_seo() {
    let long_title = "A sufficiently long title for the optimization rules";
    let suggestions =
        generate_optimization_suggestions("content", long_title, &report(&["rust"], 1.0, 900), None);
    assert!(suggestions.is_empty());

    let current = CurrentSeoData {
        meta_title: Some("Stored".to_string()),
        meta_description: Some("Stored description".to_string()),
    };
    let suggestions = generate_optimization_suggestions(
        "content",
        long_title,
        &report(&["rust"], 1.0, 900),
        Some(&current),
    );
    assert!(suggestions.is_empty());
}

#[test]
fn test_meta_title_suggestion_joins_keywords() {
    let suggestions = generate_optimization_suggestions(
        "content",
        "A sufficiently long title for the optimization rules",
        &report(&["rust", "memory", "safety"], 1.0, 900),
        Some(&CurrentSeoData::default()),
    );

    let meta_title = suggestions
        .iter()
        .find(|s| s.priority == SuggestionPriority::High)
        .expect("meta title suggestion expected");
    assert!(
        meta_title
            .suggestion
            .contains("A sufficiently long title for the optimization rules | rust, memory, safety")
    );
}

#[test]
fn test_optimized_metadata_generated() {
    let content = "c".repeat(200);
    let meta = generate_optimized_metadata(
        "My Post",
        &content,
        &report(&["rust", "memory", "safety", "ownership"], 1.0, 1),
        None,
        Some("Dev Blog"),
    );

    assert_eq!(meta.meta_title, "My Post | rust | Dev Blog");
    assert_eq!(meta.meta_description, format!("{}...", "c".repeat(140)));
    assert_eq!(meta.focus_keyword.as_deref(), Some("rust"));
    assert_eq!(meta.secondary_keywords, vec!["memory", "safety"]);
}

#[test]
fn test_optimized_metadata_keeps_current_values() {
    let current = CurrentSeoData {
        meta_title: Some("Existing title".to_string()),
        meta_description: Some("Existing description".to_string()),
    };
    let meta = generate_optimized_metadata("My Post", "content", &report(&[], 0.0, 1), Some(&current), None);

    assert_eq!(meta.meta_title, "Existing title");
    assert_eq!(meta.meta_description, "Existing description");
    assert!(meta.focus_keyword.is_none());
    assert!(meta.secondary_keywords.is_empty());
}

#[test]
fn test_optimized_title_without_keywords_or_site() {
    let meta = generate_optimized_metadata("My Post", "short", &report(&[], 0.0, 1), None, None);
    assert_eq!(meta.meta_title, "My Post");
    assert_eq!(meta.meta_description, "short...");
}

#[test]
fn test_optimize_report() {
    let content = "Ownership is the core concept of memory management. \
        Ownership rules are checked by the compiler. Borrowing complements ownership.";
    let input = OptimizationInput {
        content: content.to_string(),
        title: "Understanding Ownership".to_string(),
        keywords: Some("Compiler".to_string()),
        current_seo: None,
    };

    let report = optimize(&input, None).unwrap();
    let keywords = &report.keyword_analysis;

    // The user keyword bonus outweighs three plain occurrences
    assert_eq!(keywords.top_keywords[0], "compiler");
    assert_eq!(keywords.top_keywords[1], "ownership");
    assert_eq!(keywords.word_count, 18);
    assert_eq!(keywords.keyword_density, 5.56);
    assert_eq!(
        report.optimized_metadata.focus_keyword.as_deref(),
        Some("compiler")
    );
    assert_eq!(
        report.optimized_metadata.meta_title,
        "Understanding Ownership | compiler"
    );
    assert!(report.readability_score <= 100);
    assert_eq!(report.text_metrics.word_count, 18);
    assert_eq!(report.text_metrics.sentence_count, 3);
    assert_eq!(report.text_metrics.paragraph_count, 1);
    assert_eq!(report.text_metrics.readability_score, report.readability_score);

    let first_medium = report
        .suggestions
        .iter()
        .position(|s| s.priority == SuggestionPriority::Medium)
        .unwrap_or(report.suggestions.len());
    assert!(
        report.suggestions[first_medium..]
            .iter()
            .all(|s| s.priority == SuggestionPriority::Medium)
    );
}

#[test]
fn test_optimize_rejects_empty_content() {
    let input = OptimizationInput {
        content: "  ".to_string(),
        title: "Title".to_string(),
        ..Default::default()
    };
    assert!(optimize(&input, None).is_err());
}

#[test]
fn test_keyword_ranking_skips_inflected_forms() {
    let html = "<html><body><p>Caching strategies: caching layers, caching policies.</p></body></html>";
    let report = analyze_keywords(html, Some("CDN"));

    assert_eq!(report.top_keywords, vec!["cdn"]);
    assert_eq!(report.word_count, 6);
    assert_eq!(report.keyword_density, 0.0);
}

#[test]
fn test_top_keywords_capped_at_ten() {
    let vocabulary = [
        "rust", "cargo", "tokio", "async", "thread", "mutex", "borrow", "trait", "macro",
        "struct", "match", "heap", "stack", "lock", "crab",
    ];
    let stemmer = Stemmer::create(Algorithm::English);
    assert!(vocabulary.iter().all(|word| stemmer.stem(word) == *word));

    let html = format!("<html><body><p>{}</p></body></html>", vocabulary.join(" "));
    let report = analyze_keywords(&html, Some("Ferris, ownership, lifetimes"));

    assert_eq!(report.top_keywords.len(), MAX_TOP_KEYWORDS);
    assert_eq!(
        report.top_keywords[..3],
        ["ferris", "ownership", "lifetimes"]
    );
    assert_eq!(report.top_keywords[3..], vocabulary[..7]);
}
