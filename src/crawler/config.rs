//! # Crawler Configuration Module
//!
//! Configuration for one crawl run over the incident listing: where to
//! start, how many listing pages to visit, how long to pause between them and
//! how requests identify themselves. It uses a builder pattern for flexible
//! configuration.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: The immutable configuration handed to the crawler
//! - `CrawlerConfigBuilder`: Builder pattern implementation for easier configuration

use std::time::Duration;
use url::Url;

/// Site root of The Aviation Herald listing
pub const DEFAULT_BASE_URL: &str = "https://avherald.com/";

/// Browser-like user agent; the site rejects obvious bots
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Listing root; the first page fetched and the base for relative links
    pub base_url: Url,

    /// Maximum number of listing pages to visit
    pub max_pages: u32,

    /// Pause between two consecutive page fetches
    pub delay: Duration,

    /// User agent to use for requests
    pub user_agent: String,

    /// Timeout for a single page fetch
    pub timeout: Duration,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            max_pages: 3,
            delay: Duration::from_secs(3),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the listing root
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.config.base_url = base_url;
        self
    }

    /// Set the maximum number of pages to crawl
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set the pause between requests
    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.delay = delay;
        self
    }

    /// Set the pause between requests in whole seconds
    pub fn delay_secs(self, secs: u64) -> Self {
        self.delay(Duration::from_secs(secs))
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }
}
