//! Error types for the crawler module

use crate::error::Error as ParserError;
use crate::store::DbError;
use thiserror::Error;

/// Error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTML selector compilation error
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),

    /// Headline parser could not be prepared
    #[error("Headline parser error: {0}")]
    Parser(#[from] ParserError),

    /// Persisting extracted incidents failed
    #[error("Storage error: {0}")]
    Store(#[from] DbError),
}

/// Failure to fetch a single listing page.
///
/// Both variants are recoverable: the crawler abandons the page and ends
/// the run instead of retrying.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout
    #[error("Request timed out for {url}")]
    Timeout {
        /// Page that timed out
        url: String,
    },

    /// Network failure, non-success status or unreadable body
    #[error("Error fetching URL {url}: {source}")]
    Request {
        /// Page that failed
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Classify a client error for the given page
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// Whether the failure was a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}
