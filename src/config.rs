//! Startup configuration for a scraper run
//!
//! The command line (or environment) is validated once into an immutable
//! [`Config`], which is then handed to the crawler and the store. Any problem
//! here is fatal: nothing is crawled with a half-valid configuration.

use crate::crawler::CrawlerConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

/// Error type for configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is empty
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    /// The base URL does not parse or cannot serve as a base
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// Value as given
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The database directory cannot be created or written
    #[error("Output directory {path} is not writable: {source}")]
    UnwritableOutput {
        /// Directory that was checked
        path: PathBuf,
        /// Underlying filesystem error
        #[source]
        source: std::io::Error,
    },
}

/// Validated settings for one run
#[derive(Debug, Clone)]
pub struct Config {
    /// Listing root and base for relative links
    pub base_url: Url,

    /// Location of the incidents database file
    pub database_path: PathBuf,

    /// Maximum number of listing pages to visit
    pub max_pages: u32,

    /// Pause between page fetches
    pub request_delay: Duration,

    /// Print per-page status lines and debug logs
    pub verbose: bool,
}

impl Config {
    /// Validate raw settings
    pub fn new(
        base_url: &str,
        database_path: impl Into<PathBuf>,
        max_pages: u32,
        request_delay_secs: u64,
        verbose: bool,
    ) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url)?;

        let database_path = database_path.into();
        if database_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing("DATABASE_FILE_PATH"));
        }

        Ok(Self {
            base_url,
            database_path,
            max_pages,
            request_delay: Duration::from_secs(request_delay_secs),
            verbose,
        })
    }

    /// Crawler settings derived from this configuration
    pub fn crawler_config(&self) -> CrawlerConfig {
        CrawlerConfig::builder()
            .base_url(self.base_url.clone())
            .max_pages(self.max_pages)
            .delay(self.request_delay)
            .build()
    }

    /// Create the database's parent directory and check it accepts writes
    #[instrument(skip(self), fields(path = %self.database_path.display()))]
    pub fn prepare_output_dir(&self) -> Result<(), ConfigError> {
        let dir = match self.database_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        ensure_writable_dir(dir)?;
        info!(dir = %dir.display(), "Output directory is writable");
        Ok(())
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::Missing("BASE_URL"));
    }

    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

/// Scratch file created to confirm the database directory is writable
const WRITE_PROBE: &str = ".avherald-write-probe";

fn ensure_writable_dir(dir: &Path) -> Result<(), ConfigError> {
    let unwritable = |source| ConfigError::UnwritableOutput {
        path: dir.to_path_buf(),
        source,
    };

    fs::create_dir_all(dir).map_err(unwritable)?;

    let probe = dir.join(WRITE_PROBE);
    fs::File::create(&probe).map_err(unwritable)?;
    if let Err(e) = fs::remove_file(&probe) {
        warn!(path = %probe.display(), error = %e, "Failed to remove write probe");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_valid_config() {
        let config = Config::new("https://avherald.com/", "data/incidents.sqlite", 3, 3, false)
            .unwrap();

        assert_eq!(config.base_url.as_str(), "https://avherald.com/");
        assert_eq!(config.database_path, PathBuf::from("data/incidents.sqlite"));
        assert_eq!(config.request_delay, Duration::from_secs(3));

        let crawler = config.crawler_config();
        assert_eq!(crawler.base_url, config.base_url);
        assert_eq!(crawler.max_pages, 3);
        assert_eq!(crawler.delay, Duration::from_secs(3));
    }

    #[test]
    fn test_missing_settings() {
        assert!(matches!(
            Config::new("  ", "incidents.sqlite", 1, 0, false),
            Err(ConfigError::Missing("BASE_URL"))
        ));
        assert!(matches!(
            Config::new("https://avherald.com/", "", 1, 0, false),
            Err(ConfigError::Missing("DATABASE_FILE_PATH"))
        ));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            Config::new("avherald.com", "incidents.sqlite", 1, 0, false),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            Config::new("mailto:someone@example.com", "incidents.sqlite", 1, 0, false),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_prepare_output_dir_creates_parents() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested/output/incidents.sqlite");
        let config = Config::new("https://avherald.com/", &db_path, 1, 0, false).unwrap();

        config.prepare_output_dir().unwrap();

        assert!(db_path.parent().unwrap().is_dir());
        assert!(!db_path.parent().unwrap().join(WRITE_PROBE).exists());
    }

    #[test]
    fn test_prepare_output_dir_rejects_file_parent() {
        let temp_dir = tempdir().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let config = Config::new(
            "https://avherald.com/",
            blocker.join("incidents.sqlite"),
            1,
            0,
            false,
        )
        .unwrap();

        assert!(matches!(
            config.prepare_output_dir(),
            Err(ConfigError::UnwritableOutput { .. })
        ));
    }
}
