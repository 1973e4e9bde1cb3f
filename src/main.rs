//! # WebMD Sentence Scraper
//!
//! Walks a list of article links, renders each page in a headless browser,
//! and appends every body sentence that mentions one of the configured
//! keywords to a CSV file as `link,sentence,author`.
//!
//! ## Usage
//!
//! ```sh
//! webmd_sentence_scraper -i links.txt -o output/black.csv
//! ```
//!
//! ## Architecture
//!
//! The application is a single sequential pipeline:
//! 1. **Ledger**: Collect links already present in the output file
//! 2. **Fetching**: Load each remaining link, dismiss the popup, expand the article, read byline and body
//! 3. **Extraction**: Keep the body sentences that contain a keyword
//! 4. **Output**: Append one flushed CSV row per sentence, pausing between links
//!
//! Reruns skip links that already have rows, so an interrupted run can simply
//! be started again.

use clap::Parser;
use std::error::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod extract;
mod fetcher;
mod filter;
mod ledger;
mod links;
mod models;
mod outputs;
mod pipeline;
mod utils;

use cli::{Backend, Cli};
use config::{ScraperConfig, load_config};
use fetcher::chrome::ChromeDriver;
use fetcher::html::HttpDriver;
use filter::RuleFilter;
use ledger::Ledger;
use links::LinkSource;
use outputs::csv_file::CsvSink;
use pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("scraper starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = match &args.config {
        Some(path) => load_config(path).await?,
        None => ScraperConfig::default(),
    };
    args.apply_overrides(&mut config);
    config.validate()?;
    info!(
        keywords = ?config.keywords,
        link_form = ?config.link_form,
        backend = ?args.backend,
        filter = args.filter,
        "Configuration ready"
    );

    let sentence_filter = if args.filter {
        Some(RuleFilter::from_rules(&config.filter)?)
    } else {
        None
    };

    let ledger = Ledger::load(&args.output, config.link_form)?;
    let links = LinkSource::open(&args.input)?;
    let mut sink = CsvSink::open_append(&args.output).await?;

    let summary = match args.backend {
        Backend::Chrome => {
            let driver = ChromeDriver::new(config.window_size, args.chrome_path.clone());
            Pipeline::new(driver, config, sentence_filter)
                .run(links, &ledger, &mut sink, shutdown_signal())
                .await?
        }
        Backend::Http => {
            let driver = HttpDriver::new()?;
            Pipeline::new(driver, config, sentence_filter)
                .run(links, &ledger, &mut sink, shutdown_signal())
                .await?
        }
    };

    debug!(rows_flushed = sink.rows(), "Output file closed");
    for (link, reason) in &summary.failures {
        warn!(%link, %reason, "Link failed this run; it will be retried next run");
    }

    let elapsed = start_time.elapsed();
    info!(
        links_read = summary.links_read,
        already_scraped = summary.already_scraped,
        failed = summary.failed,
        scraped = summary.scraped,
        sentences_matched = summary.sentences_matched,
        rows_written = summary.rows_written,
        interrupted = summary.interrupted,
        ?elapsed,
        "Execution complete"
    );

    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C; interruption disabled");
        std::future::pending::<()>().await;
    }
}
