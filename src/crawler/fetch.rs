//! HTTP fetching of listing pages

use crate::crawler::CrawlerConfig;
use crate::crawler::error::{CrawlError, FetchError};
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::{debug, instrument};

/// Fetches listing pages with a fixed user agent and timeout
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: ReqwestClient,
}

impl PageFetcher {
    /// Create a fetcher sending `user_agent` and giving up after `timeout`
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, CrawlError> {
        let client = ReqwestClient::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Create a fetcher from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        Self::new(&config.user_agent, config.timeout)
    }

    /// Fetch one page and return its body as text.
    ///
    /// Any status outside 2xx is reported as [`FetchError::Request`].
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        debug!(bytes = body.len(), "Fetched page content");
        Ok(body)
    }
}
