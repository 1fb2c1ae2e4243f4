use crate::error::{Result, SeoError};
use crate::models::{
    AuditOptions, AuditResult, ContentAudit, DocumentSnapshot, Headings, Image, Issue,
    IssueSeverity, IssueType, Link, LinksAudit, Performance, SelectedHeaders, TechnicalAudit,
};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use url::Url;

pub const MAX_TITLE_CHARS: usize = 60;
pub const MIN_BODY_WORDS: usize = 300;
pub const SLOW_LOAD_MS: u64 = 3000;
pub const MAX_BROKEN_LINKS: usize = 3;

// Cached selectors to avoid repeated parsing
static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("body selector should be valid"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector should be valid"));
static META_DESC_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[name='description']").expect("meta description selector should be valid")
});
static META_VIEWPORT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[name='viewport']").expect("meta viewport selector should be valid")
});
static META_ROBOTS_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[name='robots']").expect("meta robots selector should be valid")
});
static CANONICAL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("link[rel='canonical']").expect("canonical selector should be valid")
});
static H1_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1").expect("h1 selector should be valid"));
static H2_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2").expect("h2 selector should be valid"));
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("img selector should be valid"));
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("a[href] selector should be valid"));

/// Decides which internal links count as broken.
pub trait LinkHealth {
    /// Returns the suspect links among `internal`, in document order.
    fn broken_links<'a>(&self, internal: &'a [Link]) -> Vec<&'a Link>;
}

/// Placeholder policy that flags every 10th internal link (0th, 10th, ...)
/// without any network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampledLinkHealth;

impl LinkHealth for SampledLinkHealth {
    fn broken_links<'a>(&self, internal: &'a [Link]) -> Vec<&'a Link> {
        internal.iter().step_by(10).collect()
    }
}

/// Flags links whose probed status is >= 400 or that could not be reached.
/// Links that were never probed are assumed healthy.
#[derive(Debug, Clone, Default)]
pub struct StatusLinkHealth {
    statuses: HashMap<String, Option<u16>>,
}

impl StatusLinkHealth {
    pub fn new(statuses: HashMap<String, Option<u16>>) -> Self {
        Self { statuses }
    }

    fn is_broken(&self, url: &str) -> bool {
        match self.statuses.get(url) {
            Some(Some(code)) => *code >= 400,
            Some(None) => true,
            None => false,
        }
    }
}

impl LinkHealth for StatusLinkHealth {
    fn broken_links<'a>(&self, internal: &'a [Link]) -> Vec<&'a Link> {
        internal.iter().filter(|l| self.is_broken(&l.url)).collect()
    }
}

fn parse_page_url(snapshot: &DocumentSnapshot) -> Result<Url> {
    Url::parse(&snapshot.url).map_err(|e| SeoError::InvalidUrl(format!("{}: {}", snapshot.url, e)))
}

/// Runs the enabled sub-audits over an already-fetched page.
pub fn audit_document(
    snapshot: &DocumentSnapshot,
    options: AuditOptions,
    link_health: &dyn LinkHealth,
) -> Result<AuditResult> {
    let page_url = parse_page_url(snapshot)?;
    let document = Html::parse_document(&snapshot.html);

    let content = options.content.then(|| content_audit(&document));
    let technical = options.technical.then(|| technical_audit(&document, snapshot));
    let links = options
        .links
        .then(|| links_audit(&document, &page_url, link_health));

    let result = AuditResult {
        url: snapshot.url.clone(),
        content,
        technical,
        links,
        performance: Performance {
            load_time_ms: snapshot.load_time_ms,
        },
    };

    tracing::info!(
        url = %snapshot.url,
        issues = result.issues().count(),
        load_time_ms = snapshot.load_time_ms,
        "Audit complete"
    );

    Ok(result)
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn first_attr(document: &Html, selector: &Selector, attr: &str) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn content_audit(document: &Html) -> ContentAudit {
    let body_text = document
        .select(&BODY_SELECTOR)
        .next()
        .map(|body| body.text().collect::<String>())
        .unwrap_or_default();
    let word_count = body_text.split_whitespace().count();

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(element_text)
        .unwrap_or_default();
    let meta_description =
        first_attr(document, &META_DESC_SELECTOR, "content").unwrap_or_default();

    let headings = Headings {
        h1: document.select(&H1_SELECTOR).map(element_text).collect(),
        h2: document.select(&H2_SELECTOR).map(element_text).collect(),
    };

    let images: Vec<Image> = document
        .select(&IMG_SELECTOR)
        .map(|el| Image {
            src: el.value().attr("src").map(str::to_string),
            alt: el.value().attr("alt").map(str::to_string),
        })
        .collect();
    let images_without_alt_count = images
        .iter()
        .filter(|img| img.alt.as_deref().is_none_or(|alt| alt.trim().is_empty()))
        .count();

    let mut issues = Vec::new();
    let title_length = title.chars().count();

    if title.is_empty() {
        issues.push(Issue::new(
            IssueType::Content,
            IssueSeverity::High,
            "Page is missing a title tag",
            "Add a compelling title that contains the primary keyword",
        ));
    } else if title_length > MAX_TITLE_CHARS {
        issues.push(Issue::new(
            IssueType::Content,
            IssueSeverity::Medium,
            format!("Title is too long ({} chars)", title_length),
            "Shorten the title to under 60 characters",
        ));
    }

    if meta_description.is_empty() {
        issues.push(Issue::new(
            IssueType::Content,
            IssueSeverity::Medium,
            "Page is missing a meta description",
            "Write an engaging meta description of 120-160 characters",
        ));
    }

    match headings.h1.len() {
        0 => issues.push(Issue::new(
            IssueType::Content,
            IssueSeverity::High,
            "Page is missing an H1 tag",
            "Add one H1 heading that contains the primary keyword",
        )),
        1 => {}
        n => issues.push(Issue::new(
            IssueType::Content,
            IssueSeverity::Medium,
            format!("Page has multiple H1 tags ({})", n),
            "Keep a single main H1 heading on the page",
        )),
    }

    if images_without_alt_count > 0 {
        issues.push(Issue::new(
            IssueType::Content,
            IssueSeverity::Medium,
            format!("{} image(s) missing alt text", images_without_alt_count),
            "Add descriptive alt text to every image",
        ));
    }

    if word_count < MIN_BODY_WORDS {
        issues.push(Issue::new(
            IssueType::Content,
            IssueSeverity::Medium,
            format!("Page content is thin ({} words)", word_count),
            "Expand the content to at least 300 words",
        ));
    }

    ContentAudit {
        word_count,
        title,
        title_length,
        meta_description_length: meta_description.chars().count(),
        meta_description,
        headings,
        images_count: images.len(),
        images_without_alt_count,
        issues,
    }
}

pub fn technical_audit(document: &Html, snapshot: &DocumentSnapshot) -> TechnicalAudit {
    let viewport = first_attr(document, &META_VIEWPORT_SELECTOR, "content");
    let canonical = first_attr(document, &CANONICAL_SELECTOR, "href");
    let robots = first_attr(document, &META_ROBOTS_SELECTOR, "content");
    let noindex = robots
        .as_deref()
        .is_some_and(|r| r.to_ascii_lowercase().contains("noindex"));

    let mut issues = Vec::new();

    if snapshot.load_time_ms > SLOW_LOAD_MS {
        issues.push(Issue::new(
            IssueType::Technical,
            IssueSeverity::High,
            format!("Page load time is too long ({} ms)", snapshot.load_time_ms),
            "Optimize images and enable caching and compression",
        ));
    }

    if viewport.is_none() {
        issues.push(Issue::new(
            IssueType::Technical,
            IssueSeverity::High,
            "Page is missing a viewport meta tag",
            "Add a viewport meta tag to support mobile devices",
        ));
    }

    if canonical.is_none() {
        issues.push(Issue::new(
            IssueType::Technical,
            IssueSeverity::Medium,
            "Page is missing a canonical link",
            "Add a canonical link to avoid duplicate content",
        ));
    }

    if noindex {
        issues.push(Issue::new(
            IssueType::Technical,
            IssueSeverity::High,
            "Page has a noindex robots directive",
            "Remove the noindex directive if the page should be indexed",
        ));
    }

    TechnicalAudit {
        load_time_ms: snapshot.load_time_ms,
        is_responsive: viewport.is_some(),
        has_canonical: canonical.is_some(),
        indexing_allowed: !noindex,
        headers: SelectedHeaders {
            content_encoding: snapshot.header("content-encoding").map(str::to_string),
            cache_control: snapshot.header("cache-control").map(str::to_string),
        },
        issues,
    }
}

/// Checks if a URL is external by comparing host and port with the page URL
fn is_external_url(url: &Url, page_url: &Url) -> bool {
    url.host_str() != page_url.host_str()
        || url.port_or_known_default() != page_url.port_or_known_default()
}

/// Collects auditable anchors, skipping fragment-only and `javascript:` links.
pub fn collect_links(document: &Html, page_url: &Url) -> Vec<Link> {
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|el| {
            let href = el.value().attr("href")?.trim();
            if href.is_empty()
                || href.starts_with('#')
                || href.to_ascii_lowercase().starts_with("javascript:")
            {
                return None;
            }

            let (url, is_external) = match page_url.join(href) {
                Ok(absolute) => {
                    let external = is_external_url(&absolute, page_url);
                    (absolute.to_string(), external)
                }
                Err(_) => (href.to_string(), true),
            };

            let nofollow = el.value().attr("rel").is_some_and(|rel| {
                rel.split_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("nofollow"))
            });

            Some(Link {
                href: href.to_string(),
                url,
                text: element_text(el),
                is_external,
                nofollow,
            })
        })
        .collect()
}

/// Parses the snapshot and returns its internal links.
pub fn internal_links(snapshot: &DocumentSnapshot) -> Result<Vec<Link>> {
    let page_url = parse_page_url(snapshot)?;
    let document = Html::parse_document(&snapshot.html);
    Ok(collect_links(&document, &page_url)
        .into_iter()
        .filter(|l| !l.is_external)
        .collect())
}

pub fn links_audit(document: &Html, page_url: &Url, link_health: &dyn LinkHealth) -> LinksAudit {
    let links = collect_links(document, page_url);
    let (internal, external): (Vec<Link>, Vec<Link>) =
        links.iter().cloned().partition(|l| !l.is_external);
    let nofollow_links = links.iter().filter(|l| l.nofollow).count();

    let broken_links: Vec<String> = link_health
        .broken_links(&internal)
        .into_iter()
        .take(MAX_BROKEN_LINKS)
        .map(|l| l.url.clone())
        .collect();

    let mut issues = Vec::new();
    if !broken_links.is_empty() {
        issues.push(Issue::new(
            IssueType::Links,
            IssueSeverity::High,
            format!("{} broken internal link(s) found", broken_links.len()),
            "Fix or remove the broken links",
        ));
    }

    LinksAudit {
        total_links: links.len(),
        internal_links: internal.len(),
        external_links: external.len(),
        nofollow_links,
        broken_links,
        issues,
    }
}
