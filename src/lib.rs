pub mod auditor;
pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod http_client;
pub mod keywords;
pub mod link_checker;
pub mod models;
pub mod reporter;
pub mod robots;
pub mod scorer;
pub mod suggestions;
pub mod text_metrics;

use anyhow::{Context, Result};
use auditor::{LinkHealth, SampledLinkHealth};
use cli::{AnalyzeArgs, AuditArgs, Cli, Command, HealthArgs, OptimizeArgs, RobotsArgs};
use config::Config;
use link_checker::LinkChecker;
use models::{AnalysisInput, AuditOptions, CurrentSeoData, MonitorFilter, OptimizationInput};
use reporter::{HealthOutput, PathCheck, Reporter, RobotsOutput};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the stderr tracing subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "seolens=debug" } else { "seolens=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when running under tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub async fn run(args: Cli) -> Result<()> {
    let config = Config::resolve(&args)?;
    let args = config.merge_with_cli(&args);

    init_logging(args.verbose);

    match &args.command {
        Command::Analyze(cmd) => run_analyze(&args, cmd),
        Command::Optimize(cmd) => run_optimize(&args, cmd),
        Command::Audit(cmd) => run_audit(&args, cmd).await,
        Command::Health(cmd) => run_health(&args, cmd),
        Command::Robots(cmd) => run_robots(&args, cmd),
    }
}

fn read_content(file: &str) -> Result<String> {
    if file == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read content from stdin")?;
        return Ok(content);
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read content file: {}", file))
}

fn emit<T: Serialize>(args: &Cli, kind: &str, result: &T, print_text: fn(&T)) -> Result<()> {
    let report = Reporter::wrap(kind, result);

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(result),
    }

    if let Some(filename) = &args.save {
        Reporter::save_json_report(&report, filename)?;
    }

    Ok(())
}

fn run_analyze(args: &Cli, cmd: &AnalyzeArgs) -> Result<()> {
    let input = AnalysisInput {
        content: read_content(&cmd.file)?,
        title: cmd.title.clone(),
        meta_description: cmd.description.clone(),
        keywords: cmd.keywords.clone(),
    };
    input.validate()?;

    let analysis = scorer::score_page(&input)?;
    emit(args, "analysis", &analysis, Reporter::print_analysis)
}

fn run_optimize(args: &Cli, cmd: &OptimizeArgs) -> Result<()> {
    let current_seo = (cmd.meta_title.is_some() || cmd.meta_description.is_some()).then(|| {
        CurrentSeoData {
            meta_title: cmd.meta_title.clone(),
            meta_description: cmd.meta_description.clone(),
        }
    });

    let input = OptimizationInput {
        content: read_content(&cmd.file)?,
        title: cmd.title.clone(),
        keywords: cmd.keywords.clone(),
        current_seo,
    };
    input.validate()?;

    let report = suggestions::optimize(&input, cmd.site_name.as_deref())?;
    emit(args, "optimization", &report, Reporter::print_optimization)
}

async fn run_audit(args: &Cli, cmd: &AuditArgs) -> Result<()> {
    if !cmd.url.starts_with("http://") && !cmd.url.starts_with("https://") {
        anyhow::bail!("URL must start with http:// or https://");
    }

    let user_agent = cmd
        .user_agent
        .as_deref()
        .unwrap_or(http_client::DEFAULT_USER_AGENT);
    let client = http_client::build_http_client(cmd.timeout, user_agent)?;
    let snapshot = http_client::fetch_snapshot(&client, &cmd.url).await?;

    let options = AuditOptions {
        content: !cmd.skip_content,
        technical: !cmd.skip_technical,
        links: cmd.links,
    };

    let link_health: Box<dyn LinkHealth> = if options.links && cmd.check_links {
        let internal = auditor::internal_links(&snapshot)?;
        tracing::debug!(count = internal.len(), "Probing internal links");
        Box::new(LinkChecker::with_client(client).link_health(&internal).await)
    } else {
        Box::new(SampledLinkHealth)
    };

    let result = auditor::audit_document(&snapshot, options, link_health.as_ref())?;
    emit(args, "audit", &result, Reporter::print_audit)
}

fn run_health(args: &Cli, cmd: &HealthArgs) -> Result<()> {
    let records = config::load_entities(Path::new(&cmd.entities))?;
    let now = chrono::Utc::now();

    let threshold = cmd.threshold.unwrap_or(health::DEFAULT_DUPLICATE_THRESHOLD);
    let report = health::run_health_check(&records, threshold, now);

    let filter = MonitorFilter {
        days: cmd.days,
        severity: cmd.severity.into(),
        entity_kind: cmd.entity_type.map(Into::into),
    };
    let summary = health::summarize(&report.issues, filter, now)?;

    let output = HealthOutput { report, summary };
    emit(args, "health", &output, Reporter::print_health)
}

fn run_robots(args: &Cli, cmd: &RobotsArgs) -> Result<()> {
    let sitemap_url = cmd
        .sitemap_url
        .as_deref()
        .context("A sitemap URL is required (--sitemap-url or sitemap_url in config)")?;

    let records = match &cmd.entities {
        Some(path) => config::load_entities(Path::new(path))?,
        None => Vec::new(),
    };

    let custom = match &cmd.custom {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read custom robots.txt: {}", path))?;
            robots::validate_custom_robots(&content)?;
            Some(content)
        }
        None => None,
    };

    let noindex_paths = robots::noindex_paths(&records);
    let content = robots::generate_robots_txt(custom.as_deref(), &noindex_paths, sitemap_url);

    let rules = robots::RobotsRules::parse(&content);
    let checks = cmd
        .check
        .iter()
        .map(|path| PathCheck {
            path: path.clone(),
            allowed: rules.is_allowed(path, "*"),
        })
        .collect();

    let sitemaps = rules.sitemaps().to_vec();

    let output = RobotsOutput {
        content,
        noindex_paths,
        sitemaps,
        checks,
    };
    emit(args, "robots", &output, Reporter::print_robots)
}
