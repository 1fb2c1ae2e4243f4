//! Health-check heuristics over stored entities and the monitoring summary
//! built from the issues they raise.
//!
//! The caller loads entities and persists the returned issues; nothing here
//! touches storage.

use crate::error::{Result, SeoError};
use crate::models::{
    EntityRecord, HealthIssue, HealthReport, HealthSeverity, HealthStats, MonitorFilter,
    MonitorSummary,
};
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use std::collections::{BTreeMap, HashSet};

pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.8;
pub const MAX_META_TITLE_ISSUES: usize = 50;
pub const MAX_DUPLICATE_ISSUES: usize = 20;
pub const MAX_ALT_TEXT_ISSUES: usize = 20;
pub const MAX_MONITORED_ISSUES: usize = 100;
const TITLE_HINT_CHARS: usize = 30;

static MARKDOWN_IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!\[(.*?)\]\(.*?\)").expect("markdown image regex should be valid")
});

fn issue(
    record: &EntityRecord,
    severity: HealthSeverity,
    message: &str,
    details: serde_json::Value,
    now: DateTime<Utc>,
) -> HealthIssue {
    HealthIssue {
        entity_kind: record.kind,
        entity_id: record.id.clone(),
        message: message.to_string(),
        severity,
        details,
        created_at: now,
    }
}

pub fn missing_meta_title(record: &EntityRecord, now: DateTime<Utc>) -> Option<HealthIssue> {
    let missing = record
        .meta_title
        .as_deref()
        .is_none_or(|t| t.trim().is_empty());
    if !missing {
        return None;
    }

    let hint: String = record.title.chars().take(TITLE_HINT_CHARS).collect();
    Some(issue(
        record,
        HealthSeverity::Warning,
        "Entity has no SEO title",
        json!({ "suggestion": format!("Use '{}...' as the SEO title", hint) }),
        now,
    ))
}

pub fn missing_alt_text(record: &EntityRecord, now: DateTime<Utc>) -> Option<HealthIssue> {
    let without_alt = MARKDOWN_IMAGE_RE
        .captures_iter(&record.content)
        .filter(|caps| caps.get(1).is_none_or(|alt| alt.as_str().trim().is_empty()))
        .count();
    if without_alt == 0 {
        return None;
    }

    Some(issue(
        record,
        HealthSeverity::Warning,
        "Image without alt text",
        json!({ "images": without_alt }),
        now,
    ))
}

/// Per-entity checks that need no other entity for context.
pub fn check_entity(record: &EntityRecord, now: DateTime<Utc>) -> Vec<HealthIssue> {
    [missing_meta_title(record, now), missing_alt_text(record, now)]
        .into_iter()
        .flatten()
        .collect()
}

/// Word trigrams the way PostgreSQL's pg_trgm builds them: lowercase
/// alphanumeric words, padded with two spaces in front and one behind.
pub fn trigrams(text: &str) -> HashSet<[char; 3]> {
    let lowered = text.to_lowercase();
    let mut set = HashSet::new();
    for word in lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let padded: Vec<char> = "  ".chars().chain(word.chars()).chain([' ']).collect();
        for window in padded.windows(3) {
            set.insert([window[0], window[1], window[2]]);
        }
    }
    set
}

/// Jaccard similarity of two trigram sets, 0.0 when both are empty.
pub fn similarity(a: &HashSet<[char; 3]>, b: &HashSet<[char; 3]>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Flags every entity whose content is more similar than `threshold` to at
/// least one other entity.
pub fn find_duplicate_content(
    records: &[EntityRecord],
    threshold: f64,
    now: DateTime<Utc>,
) -> Vec<HealthIssue> {
    let grams: Vec<HashSet<[char; 3]>> = records.iter().map(|r| trigrams(&r.content)).collect();
    let mut issues = Vec::new();

    for (i, record) in records.iter().enumerate() {
        if issues.len() >= MAX_DUPLICATE_ISSUES {
            break;
        }
        let duplicates = (0..records.len())
            .filter(|&j| j != i && similarity(&grams[i], &grams[j]) > threshold)
            .count();
        if duplicates > 0 {
            issues.push(issue(
                record,
                HealthSeverity::Error,
                "Duplicate content detected",
                json!({ "duplicates": duplicates, "slug": record.slug }),
                now,
            ));
        }
    }

    issues
}

/// Runs every health heuristic over the given entities.
pub fn run_health_check(
    records: &[EntityRecord],
    duplicate_threshold: f64,
    now: DateTime<Utc>,
) -> HealthReport {
    let meta_title: Vec<HealthIssue> = records
        .iter()
        .filter_map(|r| missing_meta_title(r, now))
        .take(MAX_META_TITLE_ISSUES)
        .collect();
    let duplicates = find_duplicate_content(records, duplicate_threshold, now);
    let alt_text: Vec<HealthIssue> = records
        .iter()
        .filter_map(|r| missing_alt_text(r, now))
        .take(MAX_ALT_TEXT_ISSUES)
        .collect();

    let stats = HealthStats {
        entities_without_meta_title: meta_title.len(),
        duplicate_content: duplicates.len(),
        entities_without_alt_text: alt_text.len(),
    };

    tracing::info!(
        entities = records.len(),
        issues_found = stats.entities_without_meta_title
            + stats.duplicate_content
            + stats.entities_without_alt_text,
        "Health check complete"
    );

    HealthReport {
        issues: meta_title
            .into_iter()
            .chain(duplicates)
            .chain(alt_text)
            .collect(),
        stats,
    }
}

/// Aggregates recorded issues for the monitoring view.
///
/// Error and warning totals ignore the severity filter so the view can show
/// both counts while listing only one kind.
pub fn summarize(
    issues: &[HealthIssue],
    filter: MonitorFilter,
    now: DateTime<Utc>,
) -> Result<MonitorSummary> {
    if !(1..=365).contains(&filter.days) {
        return Err(SeoError::invalid_input(format!(
            "days must be between 1 and 365 (got {})",
            filter.days
        )));
    }

    let since = now - Duration::days(i64::from(filter.days));
    let in_window: Vec<&HealthIssue> = issues
        .iter()
        .filter(|i| i.created_at >= since)
        .filter(|i| filter.entity_kind.is_none_or(|kind| i.entity_kind == kind))
        .collect();

    let errors = in_window
        .iter()
        .filter(|i| i.severity == HealthSeverity::Error)
        .count();
    let warnings = in_window
        .iter()
        .filter(|i| i.severity == HealthSeverity::Warning)
        .count();

    let mut selected: Vec<HealthIssue> = in_window
        .into_iter()
        .filter(|i| filter.severity.matches(i.severity))
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    selected.truncate(MAX_MONITORED_ISSUES);

    let mut by_entity = BTreeMap::new();
    let mut common_issues = BTreeMap::new();
    for i in &selected {
        *by_entity.entry(i.entity_kind).or_insert(0) += 1;
        *common_issues.entry(i.message.clone()).or_insert(0) += 1;
    }

    Ok(MonitorSummary {
        filter,
        total: selected.len(),
        issues: selected,
        errors,
        warnings,
        by_entity,
        common_issues,
    })
}
