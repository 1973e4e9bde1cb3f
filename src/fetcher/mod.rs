//! Article page fetching.
//!
//! Fetching one article is a fixed sequence of page interactions:
//!
//! 1. Open a fresh page session on the trimmed link
//! 2. Close the newsletter popup (best effort)
//! 3. Click the first child of the "view all" control, then let the page settle (best effort)
//! 4. Read the author byline, falling back to `"NONE"` (best effort)
//! 5. Read the article body (required; failure aborts the fetch)
//! 6. Keep the body sentences that mention a keyword
//! 7. Close the session, whether or not the steps above succeeded
//!
//! # Backends
//!
//! | Backend | Module | Notes |
//! |---------|--------|-------|
//! | Headless Chromium | [`chrome`] | Renders JavaScript; clicks are real |
//! | Plain HTTP | [`html`] | Static HTML only; clicks succeed when the element exists |

pub mod chrome;
pub mod html;

use crate::config::ScraperConfig;
use crate::extract::{KeywordMatcher, relevant_sentences};
use crate::models::{ArticleData, MISSING_AUTHOR, StepOutcome, StepReport};
use std::error::Error;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Opens page sessions for article links.
#[allow(async_fn_in_trait)]
pub trait PageDriver {
    type Page: ArticlePage;

    /// Start a session and navigate it to `url`.
    async fn open(&self, url: &str) -> Result<Self::Page, Box<dyn Error>>;
}

/// The DOM operations the fetcher needs from a loaded page.
#[allow(async_fn_in_trait)]
pub trait ArticlePage {
    /// Click the element with the given `id`.
    async fn click_by_id(&self, id: &str) -> Result<(), Box<dyn Error>>;

    /// Click the first child element of the first element with `class`.
    async fn click_first_child(&self, class: &str) -> Result<(), Box<dyn Error>>;

    /// Rendered text of the first element with `class`.
    async fn text_by_class(&self, class: &str) -> Result<String, Box<dyn Error>>;

    /// Release the session and everything it holds.
    async fn close(self) -> Result<(), Box<dyn Error>>;
}

/// Fetch one article and extract its keyword sentences.
///
/// Links that do not parse as URLs fail before any session is opened. The
/// page session is closed on both the success and the failure path; a failed
/// close is logged and does not change the result.
#[instrument(level = "info", skip_all, fields(url = %link.trim()))]
pub async fn fetch_article<D: PageDriver>(
    driver: &D,
    link: &str,
    config: &ScraperConfig,
    matcher: &KeywordMatcher,
) -> Result<ArticleData, Box<dyn Error>> {
    let url = link.trim();
    Url::parse(url).map_err(|e| format!("invalid link {url:?}: {e}"))?;
    let page = driver.open(url).await?;
    let result = read_article(&page, config, matcher).await;
    if let Err(e) = page.close().await {
        warn!(error = %e, "Failed to close page session");
    }
    result
}

async fn read_article<P: ArticlePage>(
    page: &P,
    config: &ScraperConfig,
    matcher: &KeywordMatcher,
) -> Result<ArticleData, Box<dyn Error>> {
    let selectors = &config.selectors;

    let close_popup: StepOutcome<()> = page.click_by_id(&selectors.popup_close_id).await.into();
    if let Some(reason) = close_popup.reason() {
        warn!(%reason, "Could not close popup");
    }

    let expand_view_all: StepOutcome<()> =
        page.click_first_child(&selectors.view_all_class).await.into();
    match expand_view_all.reason() {
        None => sleep(config.settle_delay()).await,
        Some(reason) => warn!(%reason, "Could not click View All button"),
    }

    let read_authors: StepOutcome<String> =
        page.text_by_class(&selectors.authors_class).await.into();
    let author_text = match &read_authors {
        StepOutcome::Done(text) => text.clone(),
        StepOutcome::Skipped(reason) => {
            warn!(%reason, "Could not get the author");
            MISSING_AUTHOR.to_string()
        }
    };

    let body = page.text_by_class(&selectors.body_class).await?;
    let sentences = relevant_sentences(&body, matcher);
    debug!(
        body_bytes = body.len(),
        popup_closed = close_popup.is_done(),
        expanded = expand_view_all.is_done(),
        "Read article body"
    );
    info!(matched = sentences.len(), "Extracted keyword sentences");

    Ok(ArticleData {
        sentences,
        author_text,
        steps: StepReport {
            close_popup,
            expand_view_all,
            read_authors,
        },
    })
}
