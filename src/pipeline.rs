//! The scraping pipeline: links in, CSV rows out.
//!
//! For each input line the pipeline checks the ledger, fetches the article,
//! normalizes the byline, optionally filters the matched sentences, and appends
//! one row per surviving sentence. Links are handled strictly one at a time
//! with a fixed pause after every fetch.
//!
//! A failed fetch only skips its link. The run itself stops early on a read
//! error from the input, a write error on the output, or the shutdown signal.

use crate::config::ScraperConfig;
use crate::extract::KeywordMatcher;
use crate::fetcher::{PageDriver, fetch_article};
use crate::filter::SentenceFilter;
use crate::ledger::Ledger;
use crate::models::{LinkOutcome, OutputRow, RunSummary};
use crate::outputs::csv_file::CsvSink;
use crate::utils::{normalize_byline, truncate_for_log};
use std::error::Error;
use std::future::Future;
use std::io::{self, Write};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

pub struct Pipeline<D, F> {
    driver: D,
    config: ScraperConfig,
    matcher: KeywordMatcher,
    /// `None` writes every matched sentence.
    filter: Option<F>,
}

impl<D, F> Pipeline<D, F>
where
    D: PageDriver,
    F: SentenceFilter,
{
    pub fn new(driver: D, config: ScraperConfig, filter: Option<F>) -> Self {
        let matcher = KeywordMatcher::new(&config.keywords);
        debug!(keywords = ?matcher.keywords(), "Keyword matcher ready");
        Self {
            driver,
            config,
            matcher,
            filter,
        }
    }

    #[cfg(test)]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Process every input line until the input ends or `shutdown` resolves.
    ///
    /// When `shutdown` fires mid-link, that link's work is dropped (which
    /// releases its page session) and the summary is marked interrupted.
    #[instrument(level = "info", skip_all)]
    pub async fn run<I, W, S>(
        &self,
        links: I,
        ledger: &Ledger,
        sink: &mut CsvSink<W>,
        shutdown: S,
    ) -> Result<RunSummary, Box<dyn Error>>
    where
        I: IntoIterator<Item = io::Result<String>>,
        W: Write,
        S: Future<Output = ()>,
    {
        let mut summary = RunSummary::default();
        tokio::pin!(shutdown);

        for (index, line) in links.into_iter().enumerate() {
            let link = line?;
            summary.links_read += 1;

            if link.trim().is_empty() {
                debug!(index, "Blank input line; nothing to fetch");
                continue;
            }

            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    warn!(index, link = %link.trim(), "Interrupted; abandoning current link");
                    summary.interrupted = true;
                    break;
                }
                res = self.process_link(index, &link, ledger, sink) => res?,
            };
            summary.record(&link, &outcome);
        }

        Ok(summary)
    }

    /// Handle one input line.
    ///
    /// Returns `Err` only when a row cannot be written; fetch failures come
    /// back as [`LinkOutcome::Failed`].
    pub async fn process_link<W: Write>(
        &self,
        index: usize,
        link: &str,
        ledger: &Ledger,
        sink: &mut CsvSink<W>,
    ) -> Result<LinkOutcome, Box<dyn Error>> {
        if ledger.has_seen(link) {
            info!(
                link = %link.trim(),
                rows = ledger.rows_for(link),
                "Skipping link because it has already been scraped"
            );
            return Ok(LinkOutcome::AlreadyScraped);
        }

        info!(index, link = %link.trim(), "Processing link");
        let outcome = match fetch_article(&self.driver, link, &self.config, &self.matcher).await {
            Ok(article) => {
                debug!(
                    popup_closed = article.steps.close_popup.is_done(),
                    expanded = article.steps.expand_view_all.is_done(),
                    author_read = article.steps.read_authors.is_done(),
                    "Page steps"
                );
                let author = normalize_byline(&article.author_text);
                let stored_link = self.config.link_form.key(link);
                let mut written = 0;
                for sentence in &article.sentences {
                    if let Some(filter) = &self.filter {
                        if !filter.should_select(sentence) {
                            debug!(sentence = %truncate_for_log(sentence, 80), "Filtered out");
                            continue;
                        }
                    }
                    sink.write_row(&OutputRow {
                        link: stored_link.to_string(),
                        sentence: sentence.clone(),
                        author: Some(author.clone()),
                    })?;
                    written += 1;
                }
                info!(matched = article.sentences.len(), written, %author, "Link scraped");
                LinkOutcome::Scraped {
                    matched: article.sentences.len(),
                    written,
                }
            }
            Err(e) => {
                error!(link = %link.trim(), error = %e, "Fetch failed; skipping link");
                LinkOutcome::Failed(e.to_string())
            }
        };

        sleep(self.config.link_delay()).await;

        if index % self.config.progress_interval == 0 {
            info!(processed = index, "Processed {index} links");
        }

        Ok(outcome)
    }
}
