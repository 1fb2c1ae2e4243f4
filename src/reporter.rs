use crate::models::{
    AuditResult, HealthReport, HealthSeverity, Issue, IssueSeverity, MonitorSummary,
    OptimizationReport, OverallAnalysis, SuggestionPriority,
};
use anyhow::{Context, Result};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// Timestamped wrapper written for `--output json` and `--save`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report<T> {
    pub kind: String,
    pub timestamp: String,
    pub result: T,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthOutput {
    pub report: HealthReport,
    pub summary: MonitorSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCheck {
    pub path: String,
    pub allowed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotsOutput {
    pub content: String,
    pub noindex_paths: Vec<String>,
    pub sitemaps: Vec<String>,
    pub checks: Vec<PathCheck>,
}

pub struct Reporter;

impl Reporter {
    pub fn wrap<T>(kind: &str, result: T) -> Report<T> {
        Report {
            kind: kind.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            result,
        }
    }

    pub fn summarize_issues<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> IssueSummary {
        let mut summary = IssueSummary::default();
        for issue in issues {
            summary.total += 1;
            match issue.severity {
                IssueSeverity::High => summary.high += 1,
                IssueSeverity::Medium => summary.medium += 1,
                IssueSeverity::Low => summary.low += 1,
            }
        }
        summary
    }

    fn header(title: &str) {
        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", title.bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();
    }

    fn footer() {
        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    fn score(value: u8) -> ColoredString {
        let text = value.to_string();
        if value >= 80 {
            text.bright_green()
        } else if value >= 50 {
            text.yellow()
        } else {
            text.bright_red()
        }
    }

    fn check(ok: bool) -> ColoredString {
        if ok { "yes".bright_green() } else { "no".bright_red() }
    }

    fn print_issue(issue: &Issue) {
        let severity_str = match issue.severity {
            IssueSeverity::High => "HIGH  ".bright_red(),
            IssueSeverity::Medium => "MEDIUM".yellow(),
            IssueSeverity::Low => "LOW   ".bright_cyan(),
        };
        println!("      [{}] {}", severity_str, issue.message);
        println!("               {}", issue.suggestion.dimmed());
    }

    pub fn print_analysis(analysis: &OverallAnalysis) {
        Self::header("SEO Analysis");

        println!(
            "{}: {}",
            "Overall Score".bright_white().bold(),
            Self::score(analysis.overall_score)
        );
        println!(
            "{}: {}",
            "Analysis ID".bright_white().bold(),
            analysis.analysis_id.dimmed()
        );
        println!();

        let title = &analysis.title_analysis;
        println!("{}", "Title".bright_yellow().bold().underline());
        println!("  Length:          {}", title.length);
        println!("  Ideal (40-60):   {}", Self::check(title.ideal));
        println!("  Has keyword:     {}", Self::check(title.contains_keyword));
        println!("  Score:           {}", Self::score(title.score));
        println!();

        let desc = &analysis.description_analysis;
        println!("{}", "Meta Description".bright_yellow().bold().underline());
        println!("  Length:          {}", desc.length);
        println!("  Ideal (120-160): {}", Self::check(desc.ideal));
        println!("  Score:           {}", Self::score(desc.score));
        println!();

        if let Some(kw) = &analysis.keyword_analysis {
            println!("{}", "Keyword".bright_yellow().bold().underline());
            println!("  Keyword:         {}", kw.keyword.bright_white());
            println!("  Occurrences:     {}", kw.count);
            println!("  Density:         {:.2}%", kw.density);
            println!("  Ideal (0.5-2.5): {}", Self::check(kw.ideal));
            println!("  Score:           {}", Self::score(kw.score));
            for pos in &kw.positions {
                println!("    @{:<6} ...{}...", pos.position, pos.context.dimmed());
            }
            println!();
        }

        let content = &analysis.content_analysis;
        println!("{}", "Content".bright_yellow().bold().underline());
        println!("  Words:           {}", content.word_count);
        println!("  Paragraphs:      {}", content.paragraph_count);
        println!("  Headings:        {}", content.heading_count);
        println!("  Has H1:          {}", Self::check(content.has_h1));
        println!("  Images:          {}", content.image_count);
        println!("  Readability:     {:.1}", content.readability_score);
        println!();

        println!("{}", "Suggestions".bright_yellow().bold().underline());
        for suggestion in &analysis.suggestions {
            println!("  - {}", suggestion);
        }

        Self::footer();
    }

    pub fn print_optimization(report: &OptimizationReport) {
        Self::header("SEO Optimization");

        let kw = &report.keyword_analysis;
        println!("{}", "Keywords".bright_yellow().bold().underline());
        println!("  Top keywords:    {}", kw.top_keywords.join(", "));
        println!("  Density:         {:.2}%", kw.keyword_density);
        println!("  Words:           {}", kw.word_count);
        println!("  Characters:      {}", kw.content_length);
        println!("  Sentences:       {}", report.text_metrics.sentence_count);
        println!("  Paragraphs:      {}", report.text_metrics.paragraph_count);
        println!("  Readability:     {}", Self::score(report.readability_score));
        println!();

        let meta = &report.optimized_metadata;
        println!("{}", "Optimized Metadata".bright_yellow().bold().underline());
        println!("  Meta title:       {}", meta.meta_title.bright_white());
        println!("  Meta description: {}", meta.meta_description);
        if let Some(focus) = &meta.focus_keyword {
            println!("  Focus keyword:    {}", focus.bright_green());
        }
        if !meta.secondary_keywords.is_empty() {
            println!("  Secondary:        {}", meta.secondary_keywords.join(", "));
        }
        println!();

        if !report.suggestions.is_empty() {
            println!("{}", "Suggestions".bright_yellow().bold().underline());
            for s in &report.suggestions {
                let priority = match s.priority {
                    SuggestionPriority::High => "HIGH  ".bright_red(),
                    SuggestionPriority::Medium => "MEDIUM".yellow(),
                };
                println!("  [{}] {}", priority, s.message);
                println!("           {}", s.suggestion.dimmed());
            }
        }

        Self::footer();
    }

    pub fn print_audit(result: &AuditResult) {
        Self::header("SEO Audit");

        let summary = Self::summarize_issues(result.issues());
        println!("{}: {}", "URL".bright_white().bold(), result.url);
        println!(
            "{}: {} ms",
            "Load time".bright_white().bold(),
            result.performance.load_time_ms
        );
        println!(
            "{}: {} ({} high, {} medium, {} low)",
            "Issues".bright_white().bold(),
            summary.total,
            if summary.high > 0 {
                summary.high.to_string().bright_red()
            } else {
                summary.high.to_string().bright_green()
            },
            summary.medium.to_string().yellow(),
            summary.low.to_string().bright_cyan()
        );
        println!();

        if let Some(content) = &result.content {
            println!("{}", "Content".bright_yellow().bold().underline());
            println!("  Title:           {} ({} chars)", content.title, content.title_length);
            println!(
                "  Description:     {} chars",
                content.meta_description_length
            );
            println!("  Words:           {}", content.word_count);
            println!(
                "  H1 / H2:         {} / {}",
                content.headings.h1.len(),
                content.headings.h2.len()
            );
            println!(
                "  Images:          {} ({} without alt)",
                content.images_count, content.images_without_alt_count
            );
            Self::print_issues(&content.issues);
        }

        if let Some(technical) = &result.technical {
            println!("{}", "Technical".bright_yellow().bold().underline());
            println!("  Responsive:      {}", Self::check(technical.is_responsive));
            println!("  Canonical:       {}", Self::check(technical.has_canonical));
            println!("  Indexable:       {}", Self::check(technical.indexing_allowed));
            println!(
                "  Encoding:        {}",
                technical
                    .headers
                    .content_encoding
                    .as_deref()
                    .unwrap_or("none")
            );
            println!(
                "  Cache-Control:   {}",
                technical.headers.cache_control.as_deref().unwrap_or("none")
            );
            Self::print_issues(&technical.issues);
        }

        if let Some(links) = &result.links {
            println!("{}", "Links".bright_yellow().bold().underline());
            println!("  Total:           {}", links.total_links);
            println!("  Internal:        {}", links.internal_links);
            println!("  External:        {}", links.external_links);
            println!("  Nofollow:        {}", links.nofollow_links);
            for broken in &links.broken_links {
                println!("  {} {}", "Broken:".bright_red(), broken);
            }
            Self::print_issues(&links.issues);
        }

        Self::footer();
    }

    fn print_issues(issues: &[Issue]) {
        if issues.is_empty() {
            println!("    {}", "No issues".bright_green());
        } else {
            println!("    Issues:");
            for issue in issues {
                Self::print_issue(issue);
            }
        }
        println!();
    }

    pub fn print_health(output: &HealthOutput) {
        Self::header("SEO Health Check");

        let stats = &output.report.stats;
        println!("{}", "Checks".bright_yellow().bold().underline());
        println!("  Without SEO title:   {}", stats.entities_without_meta_title);
        println!("  Duplicate content:   {}", stats.duplicate_content);
        println!("  Without alt text:    {}", stats.entities_without_alt_text);
        println!();

        let summary = &output.summary;
        println!(
            "{} (last {} days)",
            "Monitoring".bright_yellow().bold().underline(),
            summary.filter.days
        );
        println!("  Listed:   {}", summary.total);
        println!(
            "  Errors:   {}",
            if summary.errors > 0 {
                summary.errors.to_string().bright_red()
            } else {
                summary.errors.to_string().bright_green()
            }
        );
        println!(
            "  Warnings: {}",
            if summary.warnings > 0 {
                summary.warnings.to_string().yellow()
            } else {
                summary.warnings.to_string().bright_green()
            }
        );
        for (kind, count) in &summary.by_entity {
            println!("  {:<9} {}", kind.as_str(), count);
        }
        println!();

        for issue in &summary.issues {
            let severity_str = match issue.severity {
                HealthSeverity::Error => "ERROR".bright_red(),
                HealthSeverity::Warning => "WARN ".yellow(),
            };
            println!(
                "  [{}] {} {}: {}",
                severity_str,
                issue.entity_kind.as_str(),
                issue.entity_id.bright_white(),
                issue.message
            );
        }

        Self::footer();
    }

    pub fn print_robots(output: &RobotsOutput) {
        print!("{}", output.content);
        if !output.checks.is_empty() {
            println!();
            for check in &output.checks {
                let verdict = if check.allowed {
                    "allowed".bright_green()
                } else {
                    "blocked".bright_red()
                };
                println!("{} {}", verdict, check.path);
            }
        }
    }

    pub fn save_json_report<T: Serialize>(report: &T, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(filename)
            .with_context(|| format!("Failed to create report file: {}", filename))?;
        file.write_all(json.as_bytes())?;
        eprintln!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}
