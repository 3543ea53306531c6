//! Configuration management for protanno
//!
//! This module handles loading and validating configuration from environment variables,
//! files, and command-line arguments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::{Source, MISSING_SEQUENCE};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP transport configuration
    pub transport: TransportConfig,

    /// Crawl scheduling configuration
    pub crawl: CrawlConfig,

    /// Annotation sources, in crawl order
    pub sources: Vec<Source>,

    /// Sequence backfill configuration
    pub sequence: SequenceConfig,

    /// Highlighting configuration
    pub highlight: HighlightConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Transport-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Rate limit (requests per second)
    pub rate_limit: u32,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent string
    pub user_agent: String,

    /// Retries on 429/5xx responses, 0 disables retrying
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds
    pub base_delay_ms: u64,
}

/// Scheduler configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Upper bound for one outstanding query; unset means wait indefinitely
    pub query_timeout_secs: Option<u64>,
}

/// Sequence lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// DAS sequence endpoint
    pub url: String,

    /// Value stored when a lookup fails
    pub fallback: String,
}

/// Which text fields are passed through the highlighter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enabled: bool,
    pub case_insensitive: bool,
    pub names: bool,
    pub keywords: bool,
    pub positional: bool,
    pub notes: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            rate_limit: 5,
            request_timeout_secs: 30,
            user_agent: format!("protanno/{}", env!("CARGO_PKG_VERSION")),
            max_retries: 0,
            base_delay_ms: 1000,
        }
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            url: String::from("http://www.ebi.ac.uk/das-srv/uniprot/das/uniprot/sequence"),
            fallback: String::from(MISSING_SEQUENCE),
        }
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            case_insensitive: true,
            names: true,
            keywords: true,
            positional: true,
            notes: true,
        }
    }
}

impl LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    ///
    /// Verbose mode forces debug output for this crate regardless of `level`.
    pub fn filter_directive(&self, verbose: bool) -> String {
        if verbose {
            String::from("protanno=debug,info")
        } else {
            format!("protanno={},warn", self.level)
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

/// The DAS sources queried when none are configured
pub fn default_sources() -> Vec<Source> {
    vec![
        Source::new(
            "SuperFamily 1.75",
            "http://supfam.org/SUPERFAMILY/cgi-bin/das/up/features",
        ),
        Source::new(
            "UniProt",
            "http://www.ebi.ac.uk/das-srv/uniprot/das/uniprot/features",
        ),
        Source::new(
            "GO",
            "http://www.ebi.ac.uk/das-srv/uniprot/das/uniprot-goa/features",
        ),
        Source::new("Pfam", "http://das.sanger.ac.uk/das/pfam/features"),
    ]
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let rate_limit = std::env::var("PROTANNO_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.transport.rate_limit);

        let request_timeout_secs = std::env::var("PROTANNO_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.transport.request_timeout_secs);

        let max_retries = std::env::var("PROTANNO_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.transport.max_retries);

        let user_agent = std::env::var("PROTANNO_USER_AGENT")
            .unwrap_or_else(|_| defaults.transport.user_agent.clone());

        let query_timeout_secs = std::env::var("PROTANNO_QUERY_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok());

        let sequence_url = std::env::var("PROTANNO_SEQUENCE_URL")
            .unwrap_or_else(|_| defaults.sequence.url.clone());

        let log_level =
            std::env::var("PROTANNO_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format =
            std::env::var("PROTANNO_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            transport: TransportConfig {
                rate_limit,
                request_timeout_secs,
                user_agent,
                max_retries,
                ..defaults.transport
            },
            crawl: CrawlConfig { query_timeout_secs },
            sources: defaults.sources,
            sequence: SequenceConfig {
                url: sequence_url,
                ..defaults.sequence
            },
            highlight: defaults.highlight,
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load `path` if given, the environment otherwise, then validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::from_env()?,
        };
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.transport.rate_limit == 0 {
            anyhow::bail!("rate_limit must be greater than 0");
        }

        if self.crawl.query_timeout_secs == Some(0) {
            anyhow::bail!("query_timeout_secs must be positive when set");
        }

        if self.sources.is_empty() {
            anyhow::bail!("at least one annotation source must be configured");
        }

        for (i, source) in self.sources.iter().enumerate() {
            if source.name.trim().is_empty() {
                anyhow::bail!("source #{i} has an empty name");
            }
            if self.sources[..i].iter().any(|s| s.name == source.name) {
                anyhow::bail!("duplicate source name: {}", source.name);
            }
            url::Url::parse(&source.url)
                .with_context(|| format!("invalid URL for source {}", source.name))?;
        }

        url::Url::parse(&self.sequence.url).context("invalid sequence URL")?;

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("log format must be text or json");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.transport.request_timeout_secs)
    }

    /// Get the optional per-query timeout
    #[must_use]
    pub fn query_timeout(&self) -> Option<Duration> {
        self.crawl.query_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            crawl: CrawlConfig::default(),
            sources: default_sources(),
            sequence: SequenceConfig::default(),
            highlight: HighlightConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
