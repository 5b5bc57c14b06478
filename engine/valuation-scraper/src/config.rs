use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the market value scraper
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Target site configuration
    pub site: SiteConfig,

    /// HTTP client configuration
    pub http: HttpConfig,

    /// Cache file locations
    pub cache: CacheConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host, without trailing slash
    pub base_url: String,

    /// Competition overview path; the season id is appended as `saison_id`
    pub competition_path: String,

    /// User agent sent with every request
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Retry configuration
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,

    /// Upper bound for a single retry delay in milliseconds
    pub max_delay_ms: u64,

    /// Backoff multiplier
    pub backoff_multiplier: f64,

    /// HTTP statuses that are retried
    pub retry_statuses: Vec<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding the cache files
    pub dir: PathBuf,

    pub links_file: String,
    pub attributes_file: String,
    pub valuations_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.transfermarkt.co.uk".to_string(),
            competition_path: "/premier-league/startseite/wettbewerb/GB1/plus/".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/47.0.2526.106 Safari/537.36".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30, retry: RetryConfig::default() }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 300,
            max_delay_ms: 10_000,
            backoff_multiplier: 2.0,
            retry_statuses: vec![500, 502, 503, 504],
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./cache"),
            links_file: "links.bin".to_string(),
            attributes_file: "player_attributes.bin".to_string(),
            valuations_file: "market_values.bin".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl SiteConfig {
    /// Competition overview page for a season
    pub fn season_index_url(&self, year: i32) -> String {
        format!("{}{}?saison_id={}", self.base_url, self.competition_path, year)
    }

    /// Prefix site-relative links with the base URL
    pub fn absolute(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("{}{}", self.base_url, link)
        }
    }

    /// Market value history page for a profile link
    pub fn market_value_url(&self, profile_link: &str) -> String {
        self.absolute(&profile_link.replace("profil", "marktwertverlauf"))
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (zero-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt as i32);
        let millis = (self.initial_delay_ms as f64 * factor).min(self.max_delay_ms as f64);
        Duration::from_millis(millis as u64)
    }

    pub fn is_retryable(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }
}

impl CacheConfig {
    pub fn links_path(&self) -> PathBuf {
        self.dir.join(&self.links_file)
    }

    pub fn attributes_path(&self) -> PathBuf {
        self.dir.join(&self.attributes_file)
    }

    pub fn valuations_path(&self) -> PathBuf {
        self.dir.join(&self.valuations_file)
    }
}

impl ScraperConfig {
    /// Load configuration from defaults, an optional TOML file and
    /// `SCRAPER__<SECTION>__<KEY>` environment variables, in that order
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder().add_source(
            config::Config::try_from(&Self::default())
                .context("Failed to build default configuration")?,
        );

        if let Some(path) = file {
            tracing::debug!("Loading configuration from file: {:?}", path);
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SCRAPER").prefix_separator("__").separator("__").try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.site.base_url.starts_with("http://") && !self.site.base_url.starts_with("https://")
        {
            anyhow::bail!("Invalid base URL: {}", self.site.base_url);
        }

        if self.site.base_url.ends_with('/') {
            anyhow::bail!("Base URL must not end with '/': {}", self.site.base_url);
        }

        if self.http.retry.backoff_multiplier < 1.0 {
            anyhow::bail!(
                "Backoff multiplier must be at least 1.0, got {}",
                self.http.retry.backoff_multiplier
            );
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "json" | "pretty" | "compact" => {}
            _ => anyhow::bail!("Invalid log format: {}", self.logging.format),
        }

        Ok(())
    }
}
