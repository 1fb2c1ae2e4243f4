use seolens::auditor::{
    LinkHealth, MAX_BROKEN_LINKS, SampledLinkHealth, StatusLinkHealth, audit_document,
    internal_links,
};
use seolens::error::SeoError;
use seolens::models::{AuditOptions, DocumentSnapshot, IssueSeverity, IssueType};
use std::collections::HashMap;

const ALL_AUDITS: AuditOptions = AuditOptions {
    content: true,
    technical: true,
    links: true,
};

fn snapshot(html: &str) -> DocumentSnapshot {
    DocumentSnapshot::new(
        "https://example.com/blog/post",
        html,
        [("Content-Encoding", "gzip"), ("Cache-Control", "no-cache")],
        120,
    )
}

fn has_issue(issues: &[seolens::models::Issue], severity: IssueSeverity, text: &str) -> bool {
    issues
        .iter()
        .any(|i| i.severity == severity && i.message.contains(text))
}

#[test]
fn test_content_audit_issues() {
    let title = "T".repeat(70);
    let html = format!(
        r#"<html><head><title>{}</title></head>
        <body>
            <h1>First</h1><h1>Second</h1><h2>Sub</h2>
            <img src="a.png" alt="A diagram"><img src="b.png"><img src="c.png" alt="  ">
            <p>Only a few words.</p>
        </body></html>"#,
        title
    );

    let result = audit_document(&snapshot(&html), ALL_AUDITS, &SampledLinkHealth).unwrap();
    let content = result.content.expect("content audit expected");

    assert_eq!(content.title_length, 70);
    assert_eq!(content.headings.h1, vec!["First", "Second"]);
    assert_eq!(content.headings.h2, vec!["Sub"]);
    assert_eq!(content.images_count, 3);
    assert_eq!(content.images_without_alt_count, 2);
    assert_eq!(content.meta_description_length, 0);

    let issues = &content.issues;
    assert!(issues.iter().all(|i| i.issue_type == IssueType::Content));
    assert!(has_issue(issues, IssueSeverity::Medium, "Title is too long (70 chars)"));
    assert!(has_issue(issues, IssueSeverity::Medium, "missing a meta description"));
    assert!(has_issue(issues, IssueSeverity::Medium, "multiple H1 tags (2)"));
    assert!(has_issue(issues, IssueSeverity::Medium, "2 image(s) missing alt text"));
    assert!(has_issue(issues, IssueSeverity::Medium, "thin"));
}

#[test]
fn test_missing_title_and_h1_are_high() {
    let html = "<html><head></head><body><p>Hello</p></body></html>";
    let result = audit_document(&snapshot(html), ALL_AUDITS, &SampledLinkHealth).unwrap();
    let content = result.content.unwrap();

    assert!(content.title.is_empty());
    assert!(has_issue(&content.issues, IssueSeverity::High, "missing a title"));
    assert!(has_issue(&content.issues, IssueSeverity::High, "missing an H1"));
}

#[test]
fn test_well_formed_page_has_no_content_issues() {
    let body = "word ".repeat(320);
    let html = format!(
        r#"<html><head>
            <title>A well sized page title</title>
            <meta name="description" content="{}">
        </head><body><h1>Heading</h1><img src="a.png" alt="Alt"><p>{}</p></body></html>"#,
        "d".repeat(130),
        body
    );

    let result = audit_document(&snapshot(&html), ALL_AUDITS, &SampledLinkHealth).unwrap();
    let content = result.content.unwrap();
    assert!(content.issues.is_empty(), "unexpected: {:?}", content.issues);
    assert_eq!(content.meta_description_length, 130);
}

#[test]
fn test_technical_audit() {
    let html = r#"<html><head>
        <meta name="robots" content="NOINDEX, follow">
    </head><body></body></html>"#;
    let mut snap = snapshot(html);
    snap.load_time_ms = 4500;

    let result = audit_document(&snap, ALL_AUDITS, &SampledLinkHealth).unwrap();
    let technical = result.technical.expect("technical audit expected");

    assert_eq!(technical.load_time_ms, 4500);
    assert!(!technical.is_responsive);
    assert!(!technical.has_canonical);
    assert!(!technical.indexing_allowed);
    assert_eq!(technical.headers.content_encoding.as_deref(), Some("gzip"));
    assert_eq!(technical.headers.cache_control.as_deref(), Some("no-cache"));

    let issues = &technical.issues;
    assert_eq!(issues.len(), 4);
    assert!(issues.iter().all(|i| i.issue_type == IssueType::Technical));
    assert!(has_issue(issues, IssueSeverity::High, "load time"));
    assert!(has_issue(issues, IssueSeverity::High, "viewport"));
    assert!(has_issue(issues, IssueSeverity::Medium, "canonical"));
    assert!(has_issue(issues, IssueSeverity::High, "noindex"));
    assert_eq!(result.performance.load_time_ms, 4500);
}

#[test]
fn test_technical_audit_clean_page() {
    let html = r#"<html><head>
        <meta name="viewport" content="width=device-width">
        <link rel="canonical" href="https://example.com/blog/post">
    </head><body></body></html>"#;
    let snap = DocumentSnapshot::new("https://example.com/", html, Vec::<(String, String)>::new(), 10);

    let result = audit_document(&snap, ALL_AUDITS, &SampledLinkHealth).unwrap();
    let technical = result.technical.unwrap();

    assert!(technical.is_responsive);
    assert!(technical.has_canonical);
    assert!(technical.indexing_allowed);
    assert!(technical.headers.content_encoding.is_none());
    assert!(technical.issues.is_empty());
}

#[test]
fn test_disabled_audits_are_absent() {
    let html = "<html><body><a href='/x'>x</a></body></html>";

    let result = audit_document(&snapshot(html), AuditOptions::default(), &SampledLinkHealth).unwrap();
    assert!(result.content.is_some());
    assert!(result.technical.is_some());
    assert!(result.links.is_none());

    let only_links = AuditOptions {
        content: false,
        technical: false,
        links: true,
    };
    let result = audit_document(&snapshot(html), only_links, &SampledLinkHealth).unwrap();
    assert!(result.content.is_none());
    assert!(result.technical.is_none());
    assert!(result.links.is_some());
}

#[test]
fn test_link_classification() {
    let html = r##"<html><body>
        <a href="/about">About</a>
        <a href="contact">Contact</a>
        <a href="https://example.com:8443/admin">Other port</a>
        <a href="https://other.org/" rel="nofollow">Other</a>
        <a href="#section">Jump</a>
        <a href="javascript:void(0)">Script</a>
        <a href="">Empty</a>
    </body></html>"##;

    let links = internal_links(&snapshot(html)).unwrap();
    let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://example.com/about", "https://example.com/blog/contact"]
    );

    let options = AuditOptions {
        content: false,
        technical: false,
        links: true,
    };
    let result = audit_document(&snapshot(html), options, &StatusLinkHealth::default()).unwrap();
    let audit = result.links.unwrap();

    assert_eq!(audit.total_links, 4);
    assert_eq!(audit.internal_links, 2);
    assert_eq!(audit.external_links, 2);
    assert_eq!(audit.nofollow_links, 1);
    assert!(audit.broken_links.is_empty());
    assert!(audit.issues.is_empty());
}

/// The sampled policy is a placeholder: it marks every 10th internal link
/// broken without probing anything.
#[test]
fn test_sampled_placeholder_policy_caps_broken_links() {
    let anchors: String = (0..45)
        .map(|i| format!("<a href=\"/page-{}\">Page {}</a>", i, i))
        .collect();
    let html = format!("<html><body>{}</body></html>", anchors);

    let options = AuditOptions {
        content: false,
        technical: false,
        links: true,
    };
    let result = audit_document(&snapshot(&html), options, &SampledLinkHealth).unwrap();
    let audit = result.links.unwrap();

    assert_eq!(audit.internal_links, 45);
    assert_eq!(audit.broken_links.len(), MAX_BROKEN_LINKS);
    assert_eq!(
        audit.broken_links,
        vec![
            "https://example.com/page-0",
            "https://example.com/page-10",
            "https://example.com/page-20"
        ]
    );
    assert!(has_issue(&audit.issues, IssueSeverity::High, "3 broken"));
    assert_eq!(audit.issues[0].issue_type, IssueType::Links);
}

#[test]
fn test_status_policy() {
    let html = r#"<html><body>
        <a href="/ok">ok</a><a href="/gone">gone</a><a href="/down">down</a><a href="/new">new</a>
    </body></html>"#;
    let snap = snapshot(html);
    let links = internal_links(&snap).unwrap();

    let statuses = HashMap::from([
        ("https://example.com/ok".to_string(), Some(200)),
        ("https://example.com/gone".to_string(), Some(410)),
        ("https://example.com/down".to_string(), None),
    ]);
    let policy = StatusLinkHealth::new(statuses);

    let broken: Vec<&str> = policy
        .broken_links(&links)
        .into_iter()
        .map(|l| l.href.as_str())
        .collect();
    assert_eq!(broken, vec!["/gone", "/down"]);
}

#[test]
fn test_invalid_snapshot_url() {
    let snap = DocumentSnapshot::new("not a url", "<html></html>", Vec::<(String, String)>::new(), 0);
    let err = audit_document(&snap, ALL_AUDITS, &SampledLinkHealth).unwrap_err();
    assert!(matches!(err, SeoError::InvalidUrl(_)));
}

#[test]
fn test_issue_serialization() {
    let html = "<html><body></body></html>";
    let result = audit_document(&snapshot(html), ALL_AUDITS, &SampledLinkHealth).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    let first = &json["content"]["issues"][0];
    assert_eq!(first["type"], "content");
    assert_eq!(first["severity"], "high");
    assert!(json["technical"]["indexingAllowed"].as_bool().unwrap());
}
