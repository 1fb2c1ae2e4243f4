use crate::error::{Result, SeoError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Content submitted for on-page scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    pub content: String,
    pub title: String,
    pub meta_description: Option<String>,
    pub keywords: Option<String>,
}

impl AnalysisInput {
    /// Request-level bounds enforced before content reaches the scorer.
    pub fn validate(&self) -> Result<()> {
        validate_content_and_title(&self.content, &self.title)?;
        if let Some(desc) = &self.meta_description
            && desc.chars().count() > 160
        {
            return Err(SeoError::invalid_input(
                "meta description must be at most 160 characters",
            ));
        }
        Ok(())
    }
}

fn validate_content_and_title(content: &str, title: &str) -> Result<()> {
    if content.chars().count() < 100 {
        return Err(SeoError::invalid_input(
            "content must be at least 100 characters",
        ));
    }
    let title_len = title.chars().count();
    if !(10..=100).contains(&title_len) {
        return Err(SeoError::invalid_input(format!(
            "title must be between 10 and 100 characters (got {})",
            title_len
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetrics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub syllable_estimate: usize,
    pub readability_score: u8,
}

/// Length-based analysis shared by the title and the meta description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthAnalysis {
    pub length: usize,
    pub ideal: bool,
    pub contains_keyword: bool,
    pub score: u8,
}

pub type TitleAnalysis = LengthAnalysis;
pub type DescriptionAnalysis = LengthAnalysis;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordPosition {
    pub position: usize,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordAnalysis {
    pub keyword: String,
    pub count: usize,
    pub density: f64,
    pub ideal: bool,
    pub positions: Vec<KeywordPosition>,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    pub word_count: usize,
    pub paragraph_count: usize,
    pub heading_count: usize,
    pub has_h1: bool,
    pub image_count: usize,
    pub readability_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallAnalysis {
    pub analysis_id: String,
    pub overall_score: u8,
    pub title_analysis: TitleAnalysis,
    pub description_analysis: DescriptionAnalysis,
    pub keyword_analysis: Option<KeywordAnalysis>,
    pub content_analysis: ContentAnalysis,
    pub suggestions: Vec<String>,
}

/// Term-weighting result for a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordReport {
    pub top_keywords: Vec<String>,
    pub keyword_density: f64,
    pub content_length: usize,
    pub word_count: usize,
}

// ---------------------------------------------------------------------------
// Audits
// ---------------------------------------------------------------------------

/// One fetched page at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub url: String,
    pub html: String,
    /// Header names are stored lowercased.
    pub response_headers: BTreeMap<String, String>,
    pub load_time_ms: u64,
}

impl DocumentSnapshot {
    pub fn new<I, K, V>(url: &str, html: &str, headers: I, load_time_ms: u64) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let response_headers = headers
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
            .collect();
        Self {
            url: url.to_string(),
            html: html.to_string(),
            response_headers,
            load_time_ms,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.response_headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditOptions {
    pub content: bool,
    pub technical: bool,
    pub links: bool,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            content: true,
            technical: true,
            links: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Content,
    Technical,
    Links,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: IssueSeverity,
    pub message: String,
    pub suggestion: String,
}

impl Issue {
    pub fn new(
        issue_type: IssueType,
        severity: IssueSeverity,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            issue_type,
            severity,
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub src: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAudit {
    pub word_count: usize,
    pub title: String,
    pub title_length: usize,
    pub meta_description: String,
    pub meta_description_length: usize,
    pub headings: Headings,
    pub images_count: usize,
    pub images_without_alt_count: usize,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedHeaders {
    pub content_encoding: Option<String>,
    pub cache_control: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalAudit {
    pub load_time_ms: u64,
    pub is_responsive: bool,
    pub has_canonical: bool,
    pub indexing_allowed: bool,
    pub headers: SelectedHeaders,
    pub issues: Vec<Issue>,
}

/// An anchor that survived link filtering, resolved against the page URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub href: String,
    pub url: String,
    pub text: String,
    pub is_external: bool,
    pub nofollow: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinksAudit {
    pub total_links: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub nofollow_links: usize,
    pub broken_links: Vec<String>,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub load_time_ms: u64,
}

/// Disabled sub-audits stay `None` so "not run" differs from "no issues".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub url: String,
    pub content: Option<ContentAudit>,
    pub technical: Option<TechnicalAudit>,
    pub links: Option<LinksAudit>,
    pub performance: Performance,
}

impl AuditResult {
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        let content = self.content.iter().flat_map(|a| a.issues.iter());
        let technical = self.technical.iter().flat_map(|a| a.issues.iter());
        let links = self.links.iter().flat_map(|a| a.issues.iter());
        content.chain(technical).chain(links)
    }
}

// ---------------------------------------------------------------------------
// Optimization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSeoData {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationInput {
    pub content: String,
    pub title: String,
    pub keywords: Option<String>,
    pub current_seo: Option<CurrentSeoData>,
}

impl OptimizationInput {
    pub fn validate(&self) -> Result<()> {
        validate_content_and_title(&self.content, &self.title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Title,
    Content,
    Keyword,
    Metadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPriority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationSuggestion {
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub priority: SuggestionPriority,
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedMetadata {
    pub meta_title: String,
    pub meta_description: String,
    pub focus_keyword: Option<String>,
    pub secondary_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationReport {
    pub keyword_analysis: KeywordReport,
    pub optimized_metadata: OptimizedMetadata,
    pub suggestions: Vec<OptimizationSuggestion>,
    pub readability_score: u8,
    pub text_metrics: TextMetrics,
}

// ---------------------------------------------------------------------------
// Health checks and monitoring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Post,
    Page,
    Category,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Post => "POST",
            EntityKind::Page => "PAGE",
            EntityKind::Category => "CATEGORY",
        }
    }

    /// Public URL prefix the site serves this kind under.
    pub fn path_prefix(&self) -> &'static str {
        match self {
            EntityKind::Post => "/posts/",
            EntityKind::Page => "/pages/",
            EntityKind::Category => "/categories/",
        }
    }
}

/// A stored post, page or category as handed over by the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    pub kind: EntityKind,
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub no_index: bool,
}

impl EntityRecord {
    pub fn public_path(&self) -> String {
        format!("{}{}", self.kind.path_prefix(), self.slug)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthIssue {
    pub entity_kind: EntityKind,
    pub entity_id: String,
    pub message: String,
    pub severity: HealthSeverity,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStats {
    pub entities_without_meta_title: usize,
    pub duplicate_content: usize,
    pub entities_without_alt_text: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub issues: Vec<HealthIssue>,
    pub stats: HealthStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeverityFilter {
    #[default]
    All,
    Errors,
    Warnings,
}

impl SeverityFilter {
    pub fn matches(&self, severity: HealthSeverity) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::Errors => severity == HealthSeverity::Error,
            SeverityFilter::Warnings => severity == HealthSeverity::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorFilter {
    pub days: u32,
    pub severity: SeverityFilter,
    pub entity_kind: Option<EntityKind>,
}

impl Default for MonitorFilter {
    fn default() -> Self {
        Self {
            days: 30,
            severity: SeverityFilter::All,
            entity_kind: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSummary {
    pub filter: MonitorFilter,
    pub issues: Vec<HealthIssue>,
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub by_entity: BTreeMap<EntityKind, usize>,
    pub common_issues: BTreeMap<String, usize>,
}
