//! Runtime configuration for the scraper.
//!
//! Every knob has a default matching the WebMD layout the scraper was written
//! for, so running without a config file works out of the box. A YAML file can
//! override any subset of fields:
//!
//! ```yaml
//! keywords: ["african", "black"]
//! window_size: "1920,1080"
//! link_delay_ms: 2000
//! settle_delay_ms: 250
//! progress_interval: 10
//! link_form: raw
//! selectors:
//!   popup_close_id: webmdHoverClose
//!   view_all_class: view-all
//!   authors_class: authors
//!   body_class: article-body
//! filter:
//!   min_words: 4
//!   exclude_patterns: ["(?i)^source:"]
//! ```

use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};

/// All settings consumed by the pipeline, injected at startup.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScraperConfig {
    /// Substrings that make a sentence relevant (matched case-insensitively).
    pub keywords: Vec<String>,
    /// Browser viewport, written as `"width,height"`.
    pub window_size: WindowSize,
    /// Pause after each fetched link.
    pub link_delay_ms: u64,
    /// Pause after expanding the "view all" control.
    pub settle_delay_ms: u64,
    /// Log a progress line every this many input lines.
    pub progress_interval: usize,
    /// How links are written to and matched against the output file.
    pub link_form: LinkForm,
    pub selectors: Selectors,
    pub filter: FilterRules,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            keywords: vec!["african".to_string(), "black".to_string()],
            window_size: WindowSize::default(),
            link_delay_ms: 2000,
            settle_delay_ms: 250,
            progress_interval: 10,
            link_form: LinkForm::Raw,
            selectors: Selectors::default(),
            filter: FilterRules::default(),
        }
    }
}

impl ScraperConfig {
    pub fn link_delay(&self) -> Duration {
        Duration::from_millis(self.link_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err("at least one non-empty keyword is required".into());
        }
        if self.progress_interval == 0 {
            return Err("progress_interval must be greater than zero".into());
        }
        Ok(())
    }
}

/// Element locators for the article page.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Selectors {
    /// `id` of the newsletter popup's close button.
    pub popup_close_id: String,
    /// Class of the container whose first child expands the full article.
    pub view_all_class: String,
    /// Class of the byline element.
    pub authors_class: String,
    /// Class of the article body element.
    pub body_class: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            popup_close_id: "webmdHoverClose".to_string(),
            view_all_class: "view-all".to_string(),
            authors_class: "authors".to_string(),
            body_class: "article-body".to_string(),
        }
    }
}

/// Rules for the optional result filter (`--filter`).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FilterRules {
    /// Sentences with fewer whitespace-separated words are dropped.
    pub min_words: usize,
    /// Sentences matching any of these regular expressions are dropped.
    pub exclude_patterns: Vec<String>,
}

/// Whether links keep the input file's raw line (newline included) or are trimmed.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LinkForm {
    #[default]
    Raw,
    Trimmed,
}

impl LinkForm {
    /// The identity of an input line under this form.
    pub fn key<'a>(&self, line: &'a str) -> &'a str {
        match self {
            LinkForm::Raw => line,
            LinkForm::Trimmed => line.trim(),
        }
    }
}

/// Browser window dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.width, self.height)
    }
}

impl FromStr for WindowSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(',')
            .ok_or_else(|| format!("window size {s:?} is not in \"width,height\" form"))?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("bad window width {w:?}: {e}"))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("bad window height {h:?}: {e}"))?;
        if width == 0 || height == 0 {
            return Err(format!("window size {s:?} must be non-zero"));
        }
        Ok(Self { width, height })
    }
}

impl TryFrom<String> for WindowSize {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Load a [`ScraperConfig`] from a YAML file.
///
/// Fields absent from the file keep their defaults.
#[instrument(level = "info", skip_all, fields(%path))]
pub async fn load_config(path: &str) -> Result<ScraperConfig, Box<dyn Error>> {
    let raw = fs::read_to_string(path).await?;
    let config = parse_config(&raw)?;
    info!(keywords = ?config.keywords, window_size = %config.window_size, "Loaded configuration");
    Ok(config)
}

/// Parse YAML text into a validated [`ScraperConfig`].
pub fn parse_config(raw: &str) -> Result<ScraperConfig, Box<dyn Error>> {
    // An empty document deserializes to unit, not to a map.
    let config = if raw.trim().is_empty() {
        ScraperConfig::default()
    } else {
        serde_yaml::from_str::<ScraperConfig>(raw)?
    };
    config.validate()?;
    Ok(config)
}
