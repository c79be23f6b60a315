//! # avherald CLI Application
//!
//! Entry point of the scraper. One invocation performs one crawl run:
//!
//! 1. Parse and validate the configuration (flags or environment)
//! 2. Make sure the database directory exists and is writable
//! 3. Open the incident store, creating its table on first use
//! 4. Crawl the listing and persist new incidents
//! 5. Report per-page progress and final totals
//!
//! ```sh
//! BASE_URL=https://avherald.com/ DATABASE_FILE_PATH=data/incidents.sqlite avherald -p 2 -v
//! ```

mod telemetry;

use avherald::config::Config;
use avherald::crawler::{Crawler, CrawlSummary, PageReport, StopReason};
use avherald::store::IncidentStore;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrape aviation incidents from The Aviation Herald into a local database", long_about = None)]
struct Cli {
    /// Listing page to start from; relative links resolve against it
    #[arg(short, long, env = "BASE_URL")]
    base_url: String,

    /// Database file for scraped incidents
    #[arg(short, long, env = "DATABASE_FILE_PATH")]
    database: PathBuf,

    /// Maximum number of listing pages to visit
    #[arg(short = 'p', long, env = "MAX_PAGES", default_value = "3")]
    max_pages: u32,

    /// Delay between page requests in seconds
    #[arg(short = 'r', long, env = "REQUEST_DELAY_SECONDS", default_value = "3")]
    delay: u64,

    /// Print per-page details
    #[arg(short, long, env = "SHOW_DETAILS")]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _otel = telemetry::init_tracing_subscriber(cli.verbose)?;

    let config = Config::new(
        &cli.base_url,
        cli.database,
        cli.max_pages,
        cli.delay,
        cli.verbose,
    )?;
    config.prepare_output_dir()?;

    scrape(config).await
}

#[instrument(skip_all, fields(database = %config.database_path.display()))]
async fn scrape(config: Config) -> anyhow::Result<()> {
    let store = IncidentStore::open(&config.database_path).await?;
    let crawler = Crawler::from_config(config.crawler_config())?;

    let (progress_sender, progress_receiver) = mpsc::channel(16);
    let reporter = if config.verbose {
        tokio::spawn(print_page_details(progress_receiver, config.clone()))
    } else {
        let progress_bar = ProgressBar::new(u64::from(config.max_pages));
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} pages {msg}")?
                .progress_chars("##-"),
        );
        progress_bar.set_message("Scraping...");
        tokio::spawn(track_pages(progress_receiver, progress_bar))
    };

    let summary = crawler.run(&store, Some(progress_sender)).await?;

    // The reporter ends once the crawler has dropped its sender
    if let Err(e) = reporter.await {
        warn!(error = %e, "Progress reporter task failed");
    }

    let total = store.count().await?;
    print_summary(&summary, &config, total);
    info!(?summary, total, "Scrape complete");

    Ok(())
}

async fn print_page_details(mut receiver: mpsc::Receiver<PageReport>, config: Config) {
    while let Some(report) = receiver.recv().await {
        println!("\n--- Scraping Page {} ---", report.page_number);
        println!("Scraped {}", report.url);

        if let Some(error) = &report.fetch_error {
            println!("Error: {}. Skipping this page.", error);
        } else if report.found == 0 {
            println!("No incidents inserted from this page.");
        } else {
            println!("Found {} headlines on this page.", report.found);
            println!(
                "Inserted {} incidents from this page into the database.",
                report.outcome.inserted
            );
            println!(
                "Skipped {} incidents (already in database or news).",
                report.outcome.skipped
            );
        }

        match &report.next_page {
            Some(next) => {
                println!("Found next page link: {}", next);
                if report.page_number < config.max_pages {
                    println!("Pausing for {} second(s)...", config.request_delay.as_secs());
                }
            }
            None if report.fetch_error.is_none() => {
                println!("No 'next.jpg' link found on this page.");
            }
            None => {}
        }
    }
}

async fn track_pages(mut receiver: mpsc::Receiver<PageReport>, progress_bar: ProgressBar) {
    while let Some(report) = receiver.recv().await {
        progress_bar.inc(1);
        progress_bar.set_message(format!(
            "page {}: +{} new, {} skipped",
            report.page_number, report.outcome.inserted, report.outcome.skipped
        ));
    }
    progress_bar.finish_and_clear();
}

fn print_summary(summary: &CrawlSummary, config: &Config, total: u64) {
    println!("\n--- Finished Scraping ---");
    let ending = match summary.stop_reason {
        StopReason::PageBudgetExhausted => "page limit reached",
        StopReason::NoNextPage => "last page reached",
        StopReason::FetchFailed => "stopped after a failed request",
    };
    println!(
        "Scraped a total of {} pages ({}) and stored {} new incidents into {}.",
        summary.pages_visited,
        ending,
        summary.inserted,
        config.database_path.display()
    );
    println!(
        "Skipped {} incidents; the database now holds {} incidents.",
        summary.skipped, total
    );
}
