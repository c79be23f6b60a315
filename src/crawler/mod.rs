//! # Incident Listing Crawler Module
//!
//! This module walks the paginated incident listing of The Aviation Herald,
//! one page at a time, and feeds every headline it finds into the incident
//! store. It is the driving loop of the scraper.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: start URL, page budget, politeness delay, user agent, timeout
//! - `PageFetcher`: HTTP GET with a fixed user agent and timeout
//! - `PageExtractor`: headline and next-page extraction from listing markup
//! - `Crawler`: the fetch → extract → persist → follow loop
//! - `CrawlSummary` / `PageReport`: what a run and each page produced
//!
//! ## Behavior
//!
//! Pages are visited strictly in sequence. The loop stops when the page
//! budget is spent, when a page has no next link, or when a fetch fails; a
//! failed fetch counts as a visited page with no incidents. The delay is only
//! awaited when another page will actually be fetched.

mod config;
mod error;
mod extraction;
mod fetch;

pub use config::{CrawlerConfig, CrawlerConfigBuilder, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
pub use error::{CrawlError, FetchError};
pub use extraction::{ExtractedPage, PageExtractor};
pub use fetch::PageFetcher;

use crate::store::{IncidentStore, InsertOutcome};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Why a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `max_pages` pages were visited
    PageBudgetExhausted,

    /// The last visited page had no next page link
    NoNextPage,

    /// The last visited page could not be fetched
    FetchFailed,
}

/// What one visited page produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    /// 1-based position of the page in this run
    pub page_number: u32,

    /// Page that was fetched
    pub url: Url,

    /// Headlines extracted from the page
    pub found: usize,

    /// Inserted and skipped counts for this page
    pub outcome: InsertOutcome,

    /// Link to the following page, if any
    pub next_page: Option<Url>,

    /// Fetch failure message when the page could not be retrieved
    pub fetch_error: Option<String>,
}

/// Totals of a finished crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Pages visited, including a page whose fetch failed
    pub pages_visited: u32,

    /// New incidents written to the store
    pub inserted: usize,

    /// Duplicates and news items that were not written
    pub skipped: usize,

    /// Terminal condition of the run
    pub stop_reason: StopReason,
}

/// Sequential crawler over the incident listing
#[derive(Debug, Clone)]
pub struct Crawler {
    config: CrawlerConfig,
    fetcher: PageFetcher,
    extractor: PageExtractor,
}

impl Crawler {
    /// Create a crawler from its collaborators
    pub fn new(config: CrawlerConfig, fetcher: PageFetcher, extractor: PageExtractor) -> Self {
        Self {
            config,
            fetcher,
            extractor,
        }
    }

    /// Create a crawler whose fetcher and extractor follow `config`
    pub fn from_config(config: CrawlerConfig) -> Result<Self, CrawlError> {
        let fetcher = PageFetcher::from_config(&config)?;
        let extractor = PageExtractor::new(config.base_url.clone())?;
        Ok(Self::new(config, fetcher, extractor))
    }

    /// Crawl from the base URL and persist every new incident into `store`.
    ///
    /// Each visited page is reported on `progress` when a sender is given.
    /// Fetch failures end the run normally; store failures abort it.
    #[instrument(skip_all, fields(start = %self.config.base_url, max_pages = self.config.max_pages))]
    pub async fn run(
        &self,
        store: &IncidentStore,
        progress: Option<mpsc::Sender<PageReport>>,
    ) -> Result<CrawlSummary, CrawlError> {
        let mut current = Some(self.config.base_url.clone());
        let mut pages_visited = 0u32;
        let mut totals = InsertOutcome::default();
        let mut last_fetch_failed = false;

        while pages_visited < self.config.max_pages {
            let Some(url) = current.take() else {
                break;
            };
            let page_number = pages_visited + 1;
            info!(page = page_number, %url, "Scraping page");

            let (page, fetch_error) = match self.fetcher.fetch(url.as_str()).await {
                Ok(html) => (self.extractor.extract(&html), None),
                Err(e) => {
                    if e.is_timeout() {
                        warn!(%url, "Request timed out, skipping this page");
                    } else {
                        warn!(%url, error = %e, "Fetch failed, skipping this page");
                    }
                    (ExtractedPage::default(), Some(e))
                }
            };

            let outcome = store.insert_all(&page.incidents).await?;
            info!(
                page = page_number,
                found = page.incidents.len(),
                inserted = outcome.inserted,
                skipped = outcome.skipped,
                "Stored page incidents"
            );

            pages_visited = page_number;
            totals += outcome;
            last_fetch_failed = fetch_error.is_some();
            current = page.next_page;

            if let Some(sender) = &progress {
                let report = PageReport {
                    page_number,
                    url,
                    found: page.incidents.len(),
                    outcome,
                    next_page: current.clone(),
                    fetch_error: fetch_error.map(|e| e.to_string()),
                };
                if sender.send(report).await.is_err() {
                    debug!("Progress receiver dropped");
                }
            }

            if current.is_some() && pages_visited < self.config.max_pages {
                debug!(delay = ?self.config.delay, "Pausing before next page");
                tokio::time::sleep(self.config.delay).await;
            }
        }

        let stop_reason = if last_fetch_failed {
            StopReason::FetchFailed
        } else if current.is_none() {
            StopReason::NoNextPage
        } else {
            StopReason::PageBudgetExhausted
        };

        let summary = CrawlSummary {
            pages_visited,
            inserted: totals.inserted,
            skipped: totals.skipped,
            stop_reason,
        };
        info!(?summary, "Crawl finished");
        Ok(summary)
    }
}
