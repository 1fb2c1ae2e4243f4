use crate::models::{EntityKind, SeverityFilter};
use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DAYS: u32 = 30;

#[derive(Parser, Debug, Clone)]
#[command(name = "seolens")]
#[command(about = "Content scoring, on-page audits and SEO health checks", long_about = None)]
pub struct Cli {
    /// Output format: text or json
    #[arg(short, long, global = true, default_value = "text")]
    pub output: String,

    /// Save the JSON report to a file
    #[arg(short, long, global = true)]
    pub save: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Score markdown content for on-page SEO
    Analyze(AnalyzeArgs),

    /// Rank keywords and propose optimized metadata
    Optimize(OptimizeArgs),

    /// Fetch a page and audit its HTML, technical signals and links
    Audit(AuditArgs),

    /// Run health checks over exported posts, pages and categories
    Health(HealthArgs),

    /// Generate robots.txt from entity no-index flags
    Robots(RobotsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Markdown file to analyze, or - for stdin
    #[arg(short, long)]
    pub file: String,

    /// Title of the content
    #[arg(short, long)]
    pub title: String,

    /// Meta description (defaults to the first 160 characters of content)
    #[arg(short, long)]
    pub description: Option<String>,

    /// Comma-separated keywords; the first one is the primary keyword
    #[arg(short, long)]
    pub keywords: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    /// Content file (markdown or HTML), or - for stdin
    #[arg(short, long)]
    pub file: String,

    /// Title of the content
    #[arg(short, long)]
    pub title: String,

    /// Comma-separated keywords to boost
    #[arg(short, long)]
    pub keywords: Option<String>,

    /// Meta title currently stored for the content
    #[arg(long)]
    pub meta_title: Option<String>,

    /// Meta description currently stored for the content
    #[arg(long)]
    pub meta_description: Option<String>,

    /// Site name appended to generated meta titles
    #[arg(long)]
    pub site_name: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    /// The URL to audit
    #[arg(value_name = "URL")]
    pub url: String,

    /// Skip the content audit
    #[arg(long)]
    pub skip_content: bool,

    /// Skip the technical audit
    #[arg(long)]
    pub skip_technical: bool,

    /// Run the links audit
    #[arg(long)]
    pub links: bool,

    /// Probe internal links over HTTP instead of sampling them
    #[arg(long)]
    pub check_links: bool,

    /// Request timeout in seconds (default: 30)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// User agent sent with audit requests
    #[arg(long)]
    pub user_agent: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct HealthArgs {
    /// Entity export file (JSON, TOML, or YAML)
    #[arg(short, long)]
    pub entities: String,

    /// Only summarize issues from the last N days (1-365)
    #[arg(long, default_value_t = DEFAULT_DAYS)]
    pub days: u32,

    /// Which issues to list
    #[arg(long, value_enum, default_value_t = SeverityArg::All)]
    pub severity: SeverityArg,

    /// Restrict the summary to one entity type
    #[arg(long, value_enum)]
    pub entity_type: Option<EntityArg>,

    /// Trigram similarity above which content counts as duplicate
    #[arg(long)]
    pub threshold: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct RobotsArgs {
    /// Entity export file whose no-index entries are disallowed
    #[arg(short, long)]
    pub entities: Option<String>,

    /// Custom robots.txt to use instead of the default rules
    #[arg(long)]
    pub custom: Option<String>,

    /// Sitemap URL announced at the end of robots.txt
    #[arg(long)]
    pub sitemap_url: Option<String>,

    /// Paths to check against the generated rules
    #[arg(long)]
    pub check: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityArg {
    All,
    Errors,
    Warnings,
}

impl From<SeverityArg> for SeverityFilter {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::All => SeverityFilter::All,
            SeverityArg::Errors => SeverityFilter::Errors,
            SeverityArg::Warnings => SeverityFilter::Warnings,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityArg {
    Post,
    Page,
    Category,
}

impl From<EntityArg> for EntityKind {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::Post => EntityKind::Post,
            EntityArg::Page => EntityKind::Page,
            EntityArg::Category => EntityKind::Category,
        }
    }
}
