//! Headless Chromium backend built on `chromiumoxide`.
//!
//! Every article gets its own browser process, launched with the configured
//! viewport and torn down in [`ArticlePage::close`]. If a session is dropped
//! without being closed (the link was interrupted), `chromiumoxide` kills the
//! child process when the `Browser` is dropped, and the CDP handler task is
//! aborted here.

use super::{ArticlePage, PageDriver};
use crate::config::WindowSize;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::error::Error;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Launches a headless browser per article.
#[derive(Debug, Clone)]
pub struct ChromeDriver {
    window_size: WindowSize,
    executable: Option<PathBuf>,
}

impl ChromeDriver {
    /// `executable` overrides Chromium auto-detection.
    pub fn new(window_size: WindowSize, executable: Option<PathBuf>) -> Self {
        Self {
            window_size,
            executable,
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, Box<dyn Error>> {
        let mut builder = BrowserConfig::builder()
            .window_size(self.window_size.width, self.window_size.height);
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        Ok(builder
            .build()
            .map_err(|e| format!("invalid browser config: {e}"))?)
    }
}

impl PageDriver for ChromeDriver {
    type Page = ChromePage;

    #[instrument(level = "info", skip_all, fields(%url))]
    async fn open(&self, url: &str) -> Result<ChromePage, Box<dyn Error>> {
        let (browser, mut handler) = Browser::launch(self.browser_config()?).await?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "CDP handler stopped");
                    break;
                }
            }
        });

        // From here on the session owns the browser, so an early return
        // still tears it down through Drop.
        let mut session = ChromePage {
            browser,
            handler,
            page: None,
            closed: false,
        };

        let page = session.browser.new_page(url).await?;
        page.wait_for_navigation().await?;
        session.page = Some(page);
        info!(window_size = %self.window_size, "Page loaded");
        Ok(session)
    }
}

/// One browser process with a single loaded page.
pub struct ChromePage {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
    closed: bool,
}

impl ChromePage {
    fn page(&self) -> Result<&Page, Box<dyn Error>> {
        self.page.as_ref().ok_or_else(|| "no page loaded".into())
    }
}

impl ArticlePage for ChromePage {
    async fn click_by_id(&self, id: &str) -> Result<(), Box<dyn Error>> {
        let element = self.page()?.find_element(format!("#{id}")).await?;
        element.click().await?;
        Ok(())
    }

    async fn click_first_child(&self, class: &str) -> Result<(), Box<dyn Error>> {
        let container = self.page()?.find_element(format!(".{class}")).await?;
        let first = container
            .find_elements("*")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| format!("element .{class} has no child elements"))?;
        first.click().await?;
        Ok(())
    }

    async fn text_by_class(&self, class: &str) -> Result<String, Box<dyn Error>> {
        let element = self.page()?.find_element(format!(".{class}")).await?;
        Ok(element.inner_text().await?.unwrap_or_default())
    }

    async fn close(mut self) -> Result<(), Box<dyn Error>> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!(error = %e, "Page close failed; closing browser anyway");
            }
        }
        self.browser.close().await?;
        self.browser.wait().await?;
        self.closed = true;
        debug!("Browser closed");
        Ok(())
    }
}

impl Drop for ChromePage {
    fn drop(&mut self) {
        if !self.closed {
            warn!("Browser session dropped before close; killing it");
        }
        self.handler.abort();
    }
}
