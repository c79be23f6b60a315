//! # avherald - Incremental Aviation Herald Incident Scraper
//!
//! This crate crawls the paginated incident listing of
//! [The Aviation Herald](https://avherald.com), turns every headline into a
//! structured [`Incident`] and stores the new ones in a local libsql
//! database keyed by title. Running it again only adds what was not seen
//! before.
//!
//! ## Features
//!
//! - Headline parsing: cause, date, location and a cleaned title from one
//!   loosely structured sentence
//! - Category detection from the listing row icon
//! - Pagination through the listing's "next" link with a page budget and a
//!   politeness delay
//! - Idempotent persistence: one row per title, news items filtered out
//! - Structured logging with tracing
//!
//! ## Example
//!
//! ```rust,no_run
//! use avherald::crawler::{Crawler, CrawlerConfig};
//! use avherald::store::IncidentStore;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = IncidentStore::open("data/incidents.sqlite").await?;
//!     let crawler = Crawler::from_config(CrawlerConfig::builder().max_pages(2).build())?;
//!
//!     let summary = crawler.run(&store, None).await?;
//!     println!("{} new incidents", summary.inserted);
//!     Ok(())
//! }
//! ```

mod error;
mod incident;

pub mod config;
pub mod crawler;
pub mod parser;
pub mod store;

pub use error::Error;
pub use incident::{Incident, NEWS_CATEGORY, UNKNOWN_CATEGORY};
