use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Command, DEFAULT_TIMEOUT_SECS};
use crate::models::EntityRecord;

/// Configuration file structure
/// All fields are optional to allow partial configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Output format: text or json
    pub output: Option<String>,

    /// Save report to file
    pub save: Option<String>,

    /// Verbose output
    pub verbose: Option<bool>,

    /// Request timeout for audits and link probes, in seconds
    pub timeout_secs: Option<u64>,

    /// User agent sent with audit requests
    pub user_agent: Option<String>,

    /// Site name appended to generated meta titles
    pub site_name: Option<String>,

    /// Sitemap URL announced in generated robots.txt
    pub sitemap_url: Option<String>,

    /// Probe internal links over HTTP during link audits
    pub check_links: Option<bool>,

    /// Trigram similarity above which content counts as duplicate
    pub duplicate_threshold: Option<f64>,
}

/// Configuration file format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

/// Reads and deserializes a JSON, TOML, or YAML file chosen by extension
fn read_structured<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", what, path.display()))?;

    let format = ConfigFormat::from_path(path)
        .with_context(|| format!("Unsupported {} file format: {}", what, path.display()))?;

    let value = match format {
        ConfigFormat::Json => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON {}: {}", what, path.display()))?,
        ConfigFormat::Toml => toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML {}: {}", what, path.display()))?,
        ConfigFormat::Yaml => serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML {}: {}", what, path.display()))?,
    };

    Ok(value)
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        read_structured(path, "config")
    }

    /// Get the default configuration file paths to check (in order of priority)
    /// Returns paths in order: current directory, user config directory
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
            for ext in format.extensions() {
                paths.push(PathBuf::from(format!("seolens.{}", ext)));
            }
        }

        // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(config_home) = config_home {
            let seolens_config_dir = config_home.join("seolens");
            for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
                for ext in format.extensions() {
                    paths.push(seolens_config_dir.join(format!("config.{}", ext)));
                }
            }
        }

        paths
    }

    /// Try to load configuration from default paths
    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }

    /// The explicit `--config` file if given, else the first default file, else defaults
    pub fn resolve(cli: &Cli) -> Result<Self> {
        match &cli.config {
            Some(path) => Self::from_file(Path::new(path)),
            None => Ok(Self::from_default_paths()?.unwrap_or_default()),
        }
    }

    /// Merge this configuration with CLI arguments
    /// CLI arguments take precedence over config file values
    pub fn merge_with_cli(&self, cli: &Cli) -> Cli {
        let command = match &cli.command {
            Command::Audit(args) => {
                let mut args = args.clone();
                if args.timeout == DEFAULT_TIMEOUT_SECS {
                    args.timeout = self.timeout_secs.unwrap_or(args.timeout);
                }
                args.user_agent = args.user_agent.or_else(|| self.user_agent.clone());
                args.check_links = args.check_links || self.check_links.unwrap_or(false);
                Command::Audit(args)
            }
            Command::Optimize(args) => {
                let mut args = args.clone();
                args.site_name = args.site_name.or_else(|| self.site_name.clone());
                Command::Optimize(args)
            }
            Command::Health(args) => {
                let mut args = args.clone();
                args.threshold = args.threshold.or(self.duplicate_threshold);
                Command::Health(args)
            }
            Command::Robots(args) => {
                let mut args = args.clone();
                args.sitemap_url = args.sitemap_url.or_else(|| self.sitemap_url.clone());
                Command::Robots(args)
            }
            other => other.clone(),
        };

        Cli {
            output: if cli.output != "text" {
                cli.output.clone()
            } else {
                self.output.clone().unwrap_or_else(|| cli.output.clone())
            },
            save: cli.save.clone().or_else(|| self.save.clone()),
            verbose: cli.verbose || self.verbose.unwrap_or(false),
            config: cli.config.clone(),
            command,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntityFile {
    List(Vec<EntityRecord>),
    Wrapped { entities: Vec<EntityRecord> },
}

/// Loads exported entities: either a bare list or an `entities` table
pub fn load_entities(path: &Path) -> Result<Vec<EntityRecord>> {
    let file: EntityFile = read_structured(path, "entities")?;
    Ok(match file {
        EntityFile::List(entities) | EntityFile::Wrapped { entities } => entities,
    })
}
