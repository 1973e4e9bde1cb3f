//! Data models for scraped articles and the rows derived from them.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleData`]: The transient result of fetching one article
//! - [`StepOutcome`] / [`StepReport`]: Tagged results of the best-effort page steps
//! - [`OutputRow`]: One persisted `(link, sentence, author)` CSV row
//! - [`LinkOutcome`]: What happened to a single input link during a run
//! - [`RunSummary`]: Counters reported when a run finishes

use std::fmt;

/// Literal author text used when the byline element cannot be read.
pub const MISSING_AUTHOR: &str = "NONE";

/// Result of a single best-effort page interaction.
///
/// Steps such as dismissing a popup are allowed to fail without aborting the
/// fetch. Instead of only logging the failure, the cause is kept here so
/// callers (and tests) can ask what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome<T> {
    /// The step completed and produced a value.
    Done(T),
    /// The step failed; the string holds the underlying cause.
    Skipped(String),
}

impl<T> StepOutcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, StepOutcome::Done(_))
    }

    /// The failure cause, if the step was skipped.
    pub fn reason(&self) -> Option<&str> {
        match self {
            StepOutcome::Done(_) => None,
            StepOutcome::Skipped(reason) => Some(reason),
        }
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for StepOutcome<T> {
    fn from(res: Result<T, E>) -> Self {
        match res {
            Ok(v) => StepOutcome::Done(v),
            Err(e) => StepOutcome::Skipped(e.to_string()),
        }
    }
}

/// Per-step report for the best-effort interactions of one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Clicking the newsletter popup's close control.
    pub close_popup: StepOutcome<()>,
    /// Clicking the first child of the "view all" control.
    pub expand_view_all: StepOutcome<()>,
    /// Reading the author byline text.
    pub read_authors: StepOutcome<String>,
}

/// Everything extracted from one article page.
///
/// Not persisted as a unit; only the [`OutputRow`]s derived from it are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleData {
    /// Keyword-bearing sentences, trimmed, in body order.
    pub sentences: Vec<String>,
    /// Raw byline text, or [`MISSING_AUTHOR`] when it could not be read.
    pub author_text: String,
    /// How each best-effort step went.
    pub steps: StepReport,
}

/// One row of the output CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub link: String,
    pub sentence: String,
    pub author: Option<String>,
}

impl OutputRow {
    /// Column values in file order. A missing author is written as an empty field.
    pub fn as_record(&self) -> [&str; 3] {
        [
            &self.link,
            &self.sentence,
            self.author.as_deref().unwrap_or(""),
        ]
    }
}

/// What the pipeline did with a single input link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The link is already in the output file; nothing was fetched.
    AlreadyScraped,
    /// The fetch raised; no rows were written for the link.
    Failed(String),
    /// The article was fetched and rows were appended.
    Scraped {
        /// Sentences that matched a keyword.
        matched: usize,
        /// Rows actually written after the optional result filter.
        written: usize,
    },
}

/// Counters for a whole run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub links_read: usize,
    pub already_scraped: usize,
    pub failed: usize,
    pub scraped: usize,
    pub sentences_matched: usize,
    pub rows_written: usize,
    /// `(link, reason)` for every failed fetch; these are retried next run.
    pub failures: Vec<(String, String)>,
    /// Set when the run stopped early on Ctrl-C.
    pub interrupted: bool,
}

impl RunSummary {
    pub fn record(&mut self, link: &str, outcome: &LinkOutcome) {
        match outcome {
            LinkOutcome::AlreadyScraped => self.already_scraped += 1,
            LinkOutcome::Failed(reason) => {
                self.failed += 1;
                self.failures.push((link.trim().to_string(), reason.clone()));
            }
            LinkOutcome::Scraped { matched, written } => {
                self.scraped += 1;
                self.sentences_matched += matched;
                self.rows_written += written;
            }
        }
    }
}
