use seolens::error::SeoError;
use seolens::models::AnalysisInput;
use seolens::scorer::{analyze_content, analyze_keyword, score_page};
use seolens::suggestions::ALL_GOOD;

fn input(content: &str, title: &str) -> AnalysisInput {
    AnalysisInput {
        content: content.to_string(),
        title: title.to_string(),
        meta_description: None,
        keywords: None,
    }
}

#[test]
fn test_ideal_title_length() {
    let title = "a".repeat(45);
    let analysis = score_page(&input("Some body text here.", &title)).unwrap();

    assert_eq!(analysis.title_analysis.length, 45);
    assert!(analysis.title_analysis.ideal);
    assert_eq!(analysis.title_analysis.score, 67);
}

#[test]
fn test_long_title_score_is_capped() {
    let title = "t".repeat(200);
    let analysis = score_page(&input("Body.", &title)).unwrap();

    assert!(!analysis.title_analysis.ideal);
    assert_eq!(analysis.title_analysis.score, 100);
}

#[test]
fn test_description_falls_back_to_content() {
    let content = "abcd ".repeat(40);
    assert_eq!(content.chars().count(), 200);

    let analysis = score_page(&input(&content, "A title")).unwrap();

    assert_eq!(analysis.description_analysis.length, 160);
    assert!(analysis.description_analysis.ideal);
    assert_eq!(analysis.description_analysis.score, 100);
}

#[test]
fn test_explicit_description_is_used() {
    let mut page = input("Body text.", "A title");
    page.meta_description = Some("d".repeat(100));

    let analysis = score_page(&page).unwrap();
    assert_eq!(analysis.description_analysis.length, 100);
    assert_eq!(analysis.description_analysis.score, 62);
}

#[test]
fn test_h1_detection() {
    let with_h1 = analyze_content("# Heading\n\nSome text.");
    assert!(with_h1.has_h1);
    assert_eq!(with_h1.heading_count, 1);

    let without_h1 = analyze_content("## Heading\n\nSome text.");
    assert!(!without_h1.has_h1);
    assert_eq!(without_h1.heading_count, 1);
}

#[test]
fn test_content_structure() {
    let content = "# Title\n\nFirst paragraph.\n\n## Section\n\n![diagram](d.png) and ![](e.png)";
    let analysis = analyze_content(content);

    assert_eq!(analysis.heading_count, 2);
    assert_eq!(analysis.image_count, 2);
    assert_eq!(analysis.paragraph_count, 4);
}

#[test]
fn test_overall_score_weights() {
    let mut page = input(&"word ".repeat(10), "Short title");
    page.meta_description = Some("d".repeat(100));

    let analysis = score_page(&page).unwrap();

    // 16 * 0.3 + 62 * 0.2 + 10 words * 0.1 * 0.2 = 17.4
    assert_eq!(analysis.title_analysis.score, 16);
    assert_eq!(analysis.description_analysis.score, 62);
    assert_eq!(analysis.overall_score, 17);
    assert!(analysis.keyword_analysis.is_none());
}

#[test]
fn test_overall_score_is_clamped() {
    let content = format!("# Rust\n\n![img](a.png)\n\n{}", "rust word ".repeat(1500));
    let mut page = input(&content, &"r".repeat(60));
    page.meta_description = Some("m".repeat(160));
    page.keywords = Some("rust".to_string());

    let analysis = score_page(&page).unwrap();
    assert_eq!(analysis.overall_score, 100);
}

#[test]
fn test_keyword_analysis() {
    let content = format!("rust {}", "word ".repeat(99));
    let analysis = analyze_keyword(&content, "rust", 100);

    assert_eq!(analysis.count, 1);
    assert_eq!(analysis.density, 1.0);
    assert!(analysis.ideal);
    assert_eq!(analysis.score, 40);
    assert_eq!(analysis.positions.len(), 1);
    assert_eq!(analysis.positions[0].position, 0);
}

#[test]
fn test_keyword_positions_are_capped() {
    let content = "seo ".repeat(20);
    let analysis = analyze_keyword(&content, "seo", 20);

    assert_eq!(analysis.count, 20);
    assert_eq!(analysis.positions.len(), 5);
    let offsets: Vec<usize> = analysis.positions.iter().map(|p| p.position).collect();
    assert_eq!(offsets, vec![0, 4, 8, 12, 16]);
    assert_eq!(analysis.score, 100);
}

#[test]
fn test_density_grows_with_occurrences() {
    let filler = "word ".repeat(96);
    let mut last = -1.0;
    for n in 0..4 {
        let content = format!("{}{}", "rust ".repeat(n), filler);
        let words = n + 96;
        let density = analyze_keyword(&content, "rust", words).density;
        assert!(density > last, "density should increase with occurrences");
        last = density;
    }
}

#[test]
fn test_density_just_under_ideal_is_reported_low() {
    let mut page = input(&format!("rust {}", "word ".repeat(200)), "Rust");
    page.keywords = Some("rust".to_string());
    let analysis = score_page(&page).unwrap();

    let keyword = analysis.keyword_analysis.unwrap();
    assert_eq!(keyword.density, 0.5);
    assert!(!keyword.ideal);
    assert!(
        analysis
            .suggestions
            .iter()
            .any(|s| s.contains("keyword density is low"))
    );
    assert!(
        !analysis
            .suggestions
            .iter()
            .any(|s| s.contains("keyword density is high"))
    );
}

#[test]
fn test_primary_keyword_is_first_entry() {
    let mut page = input("Learn Rust and Go today.", "Rust for beginners");
    page.keywords = Some(" , Rust , go".to_string());

    let analysis = score_page(&page).unwrap();
    let keyword = analysis.keyword_analysis.expect("keyword analysis expected");
    assert_eq!(keyword.keyword, "rust");
    assert!(analysis.title_analysis.contains_keyword);
}

#[test]
fn test_scoring_is_deterministic() {
    let mut page = input("# Heading\n\nSome content about rust.", "Rust content title");
    page.keywords = Some("rust".to_string());

    let first = score_page(&page).unwrap();
    let mut second = score_page(&page).unwrap();

    assert_ne!(first.analysis_id, second.analysis_id);
    assert!(first.analysis_id.starts_with("seo-"));
    second.analysis_id = first.analysis_id.clone();
    assert_eq!(first, second);
}

#[test]
fn test_suggestions_never_empty() {
    let content = format!(
        "# Rust\n\n![rust logo](rust.png)\n\n{}",
        "rust systems programming language guide ".repeat(75)
    );
    let mut page = input(&content, "Rust Systems Programming: A Practical Guide 2024");
    page.meta_description = Some(format!("Rust {}", "x".repeat(125)));
    page.keywords = Some("rust".to_string());

    let analysis = score_page(&page).unwrap();
    assert!(!analysis.suggestions.is_empty());
    for s in &analysis.suggestions {
        assert!(!s.is_empty());
    }
}

#[test]
fn test_all_good_suggestion() {
    let body = "programming language guide ".repeat(100);
    let content = format!("# Rust\n\n![rust logo](rust.png)\n\nrust {}", body);
    let mut page = input(&content, "Rust Systems Programming: A Practical Guide");
    page.meta_description = Some(format!("Rust {}", "x".repeat(125)));
    page.keywords = Some("rust".to_string());

    let analysis = score_page(&page).unwrap();
    let keyword = analysis.keyword_analysis.as_ref().unwrap();
    // Heading, image alt, image path and body
    assert_eq!(keyword.count, 4);
    assert!(keyword.ideal);
    assert_eq!(analysis.suggestions, vec![ALL_GOOD.to_string()]);
}

#[test]
fn test_suggestion_order() {
    let mut page = input(&"word ".repeat(10), "Short title");
    page.meta_description = Some("d".repeat(100));

    let analysis = score_page(&page).unwrap();
    assert_eq!(analysis.suggestions.len(), 5);
    assert!(analysis.suggestions[0].contains("title is short"));
    assert!(analysis.suggestions[1].contains("meta description is short"));
    assert!(analysis.suggestions[2].contains("at least 300 words"));
    assert!(analysis.suggestions[3].contains("H1"));
    assert!(analysis.suggestions[4].contains("image"));
}

#[test]
fn test_empty_content_rejected() {
    let err = score_page(&input("   ", "A title")).unwrap_err();
    assert!(matches!(err, SeoError::InvalidInput(_)));

    let err = score_page(&input("Body", "")).unwrap_err();
    assert!(matches!(err, SeoError::InvalidInput(_)));
}

#[test]
fn test_boundary_validation() {
    let short = input("short content", "A valid title");
    assert!(short.validate().is_err());

    let content = "x".repeat(100);
    assert!(input(&content, "Too short").validate().is_err());
    assert!(input(&content, "Long enough").validate().is_ok());

    let mut long_desc = input(&content, "Long enough");
    long_desc.meta_description = Some("d".repeat(161));
    assert!(long_desc.validate().is_err());
}
