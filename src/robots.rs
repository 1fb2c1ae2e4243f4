use crate::error::{Result, SeoError};
use crate::models::EntityRecord;
use std::collections::HashMap;

pub const MAX_CUSTOM_ROBOTS_CHARS: usize = 5000;

pub const DEFAULT_ROBOTS_TXT: &str = "# Default robots.txt
User-agent: *
Allow: /
Disallow: /admin/
Disallow: /dashboard/
";

/// Rejects custom robots.txt content the site would refuse to store.
pub fn validate_custom_robots(content: &str) -> Result<()> {
    let len = content.chars().count();
    if len > MAX_CUSTOM_ROBOTS_CHARS {
        return Err(SeoError::invalid_input(format!(
            "robots.txt must be at most {} characters (got {})",
            MAX_CUSTOM_ROBOTS_CHARS, len
        )));
    }
    Ok(())
}

/// Public paths of every entity marked `no_index`.
pub fn noindex_paths(records: &[EntityRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.no_index)
        .map(EntityRecord::public_path)
        .collect()
}

/// Builds robots.txt from the custom (or default) rules, one `Disallow`
/// per no-index path, and the sitemap location.
pub fn generate_robots_txt(
    custom: Option<&str>,
    noindex_paths: &[String],
    sitemap_url: &str,
) -> String {
    let base = custom
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(DEFAULT_ROBOTS_TXT);

    let mut out = base.trim().to_string();
    out.push('\n');

    if !noindex_paths.is_empty() {
        out.push_str("\n# NoIndex Routes\n");
        for path in noindex_paths {
            out.push_str(&format!("Disallow: {}\n", path));
        }
    }

    out.push_str(&format!("\nSitemap: {}\n", sitemap_url));

    tracing::debug!(
        noindex_count = noindex_paths.len(),
        custom = custom.is_some(),
        "Generated robots.txt"
    );

    out
}

/// Represents a robots.txt rule (either Allow or Disallow)
#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    pattern: String,
    is_allow: bool,
}

/// Parsed robots.txt rules, used to confirm what a generated file blocks.
#[derive(Debug, Default)]
pub struct RobotsRules {
    /// Rules grouped by user-agent (lowercased)
    groups: HashMap<String, Vec<Rule>>,
    sitemaps: Vec<String>,
}

impl RobotsRules {
    pub fn parse(content: &str) -> Self {
        let mut parsed = Self::default();
        let mut current_agents: Vec<String> = Vec::new();
        let mut current_rules: Vec<Rule> = Vec::new();

        for line in content.lines() {
            // Strip trailing comments
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let field = field.trim().to_lowercase();
            let value = value.trim();

            match field.as_str() {
                "user-agent" => {
                    // Consecutive user-agent lines share one group
                    if !current_rules.is_empty() {
                        parsed.flush(&current_agents, &current_rules);
                        current_agents.clear();
                        current_rules.clear();
                    }
                    current_agents.push(value.to_lowercase());
                }
                "disallow" | "allow" if !value.is_empty() => {
                    current_rules.push(Rule {
                        pattern: value.to_string(),
                        is_allow: field == "allow",
                    });
                }
                "sitemap" => parsed.sitemaps.push(value.to_string()),
                _ => {
                    // Ignore other directives (Crawl-delay, Host, etc.)
                }
            }
        }

        parsed.flush(&current_agents, &current_rules);
        parsed
    }

    fn flush(&mut self, agents: &[String], rules: &[Rule]) {
        for agent in agents {
            self.groups
                .entry(agent.clone())
                .or_default()
                .extend(rules.iter().cloned());
        }
    }

    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// Checks if `path` may be crawled by `user_agent`
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        self.groups
            .get(&user_agent.to_lowercase())
            .or_else(|| self.groups.get("*"))
            .is_none_or(|rules| check_rules(rules, path))
    }
}

/// Longest matching pattern wins; ties go to the later rule.
fn check_rules(rules: &[Rule], path: &str) -> bool {
    let mut allowed = true;
    let mut most_specific_length = 0;

    for rule in rules {
        if path_matches(&rule.pattern, path) && rule.pattern.len() >= most_specific_length {
            most_specific_length = rule.pattern.len();
            allowed = rule.is_allow;
        }
    }

    allowed
}

/// Checks if a path matches a pattern (supports * and $ wildcards)
fn path_matches(pattern: &str, path: &str) -> bool {
    let (pattern, must_end) = match pattern.strip_suffix('$') {
        Some(stripped) => (stripped, true),
        None => (pattern, false),
    };

    if !pattern.contains('*') {
        return if must_end {
            path == pattern
        } else {
            path.starts_with(pattern)
        };
    }

    let pattern_chars: Vec<char> = pattern.chars().collect();
    let path_chars: Vec<char> = path.chars().collect();
    wildcard_match(&pattern_chars, &path_chars, must_end)
}

fn wildcard_match(pattern: &[char], path: &[char], must_end: bool) -> bool {
    match pattern.split_first() {
        None => !must_end || path.is_empty(),
        Some((&'*', rest)) => (0..=path.len()).any(|i| wildcard_match(rest, &path[i..], must_end)),
        Some((c, rest)) => path
            .split_first()
            .is_some_and(|(p, path_rest)| p == c && wildcard_match(rest, path_rest, must_end)),
    }
}
