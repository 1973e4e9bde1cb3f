//! Command-line interface definitions.
//!
//! Flags select the input and output files and the page backend; they also
//! override the matching fields of the YAML config file.

use crate::config::{LinkForm, ScraperConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How article pages are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Headless Chromium; runs page scripts and performs real clicks.
    Chrome,
    /// Plain HTTP download of the static HTML.
    Http,
}

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Scrape with the default keywords
/// webmd_sentence_scraper -i links.txt -o output/black.csv
///
/// # Custom keywords, result filter, and a specific Chromium binary
/// webmd_sentence_scraper -i links.txt -o out.csv -k hispanic -k latino --filter \
///     --chrome-path /usr/bin/chromium
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Text file with one article URL per line
    #[arg(short, long)]
    pub input: PathBuf,

    /// CSV file results are appended to
    #[arg(short, long)]
    pub output: PathBuf,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Chromium/Chrome executable (auto-detected when omitted)
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Run matched sentences through the result filter before writing
    #[arg(short, long)]
    pub filter: bool,

    /// Page backend
    #[arg(long, value_enum, default_value_t = Backend::Chrome)]
    pub backend: Backend,

    /// Keyword to select sentences by; repeat for several (replaces configured keywords)
    #[arg(short = 'k', long = "keyword")]
    pub keywords: Vec<String>,

    /// How links are written to and matched against the output file
    #[arg(long, value_enum)]
    pub link_form: Option<LinkForm>,
}

impl Cli {
    /// Apply flag values on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut ScraperConfig) {
        if !self.keywords.is_empty() {
            config.keywords = self.keywords.clone();
        }
        if let Some(form) = self.link_form {
            config.link_form = form;
        }
    }
}
