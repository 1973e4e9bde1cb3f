//! Plain-HTTP page backend.
//!
//! Downloads the page with `reqwest` and queries the static HTML with
//! `scraper`. No JavaScript runs, so a "click" has no effect: it succeeds when
//! the target element exists and fails when it does not, which keeps the step
//! report meaningful. Text is rendered roughly the way a browser's
//! `innerText` would be, with block elements on their own lines.

use super::{ArticlePage, PageDriver};
use reqwest::Client;
use scraper::{ElementRef, Html, Node, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument};

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Fetches pages over HTTP without rendering them.
#[derive(Debug, Clone)]
pub struct HttpDriver {
    client: Client,
}

impl HttpDriver {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl PageDriver for HttpDriver {
    type Page = HtmlPage;

    #[instrument(level = "info", skip_all, fields(%url))]
    async fn open(&self, url: &str) -> Result<HtmlPage, Box<dyn Error>> {
        let resp = self.client.get(url).send().await?.error_for_status()?;
        let body = resp.text().await?;
        info!(bytes = body.len(), "Downloaded page");
        Ok(HtmlPage::parse(&body))
    }
}

/// A parsed, static HTML document.
pub struct HtmlPage {
    document: Html,
}

impl HtmlPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    fn first(&self, css: &str) -> Result<ElementRef<'_>, Box<dyn Error>> {
        let selector = Selector::parse(css).map_err(|e| format!("bad selector {css:?}: {e}"))?;
        self.document
            .select(&selector)
            .next()
            .ok_or_else(|| format!("no element matches {css:?}").into())
    }
}

impl ArticlePage for HtmlPage {
    async fn click_by_id(&self, id: &str) -> Result<(), Box<dyn Error>> {
        self.first(&format!("#{id}"))?;
        debug!(%id, "Static page; click is a no-op");
        Ok(())
    }

    async fn click_first_child(&self, class: &str) -> Result<(), Box<dyn Error>> {
        let container = self.first(&format!(".{class}"))?;
        container
            .children()
            .find_map(ElementRef::wrap)
            .ok_or_else(|| format!("element .{class} has no child elements"))?;
        debug!(%class, "Static page; click is a no-op");
        Ok(())
    }

    async fn text_by_class(&self, class: &str) -> Result<String, Box<dyn Error>> {
        let element = self.first(&format!(".{class}"))?;
        Ok(inner_text(element))
    }

    async fn close(self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}

/// Approximate `innerText`: whitespace collapsed inside text, block elements
/// separated by newlines.
pub fn inner_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => push_collapsed(&mut out, text),
            Node::Element(el) if BLOCK_ELEMENTS.contains(&el.name()) => {
                while out.ends_with(' ') {
                    out.pop();
                }
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
    out.trim().to_string()
}

fn push_collapsed(out: &mut String, text: &str) {
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() && !out.ends_with([' ', '\n']) {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }
    if pending_space && !out.is_empty() && !out.ends_with([' ', '\n']) {
        out.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div id="webmdHoverClose"></div>
        <div class="view-all">
            <a href="?page=all">View All</a>
        </div>
        <div class="authors">
            By   Jane
            Doe
        </div>
        <div class="article-body">
            <h2>Heart health</h2>
            <p>Black adults are <b>more likely</b> to have high blood pressure.</p>
            <p>Diet matters.</p>
        </div>
        <div class="empty-view-all"> text only </div>
    </body></html>"#;

    #[tokio::test]
    async fn test_click_by_id() {
        let page = HtmlPage::parse(PAGE);
        assert!(page.click_by_id("webmdHoverClose").await.is_ok());
        assert!(page.click_by_id("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_click_first_child() {
        let page = HtmlPage::parse(PAGE);
        assert!(page.click_first_child("view-all").await.is_ok());
        assert!(page.click_first_child("empty-view-all").await.is_err());
        assert!(page.click_first_child("nope").await.is_err());
    }

    #[tokio::test]
    async fn test_text_collapses_whitespace() {
        let page = HtmlPage::parse(PAGE);
        assert_eq!(page.text_by_class("authors").await.unwrap(), "By Jane Doe");
    }

    #[tokio::test]
    async fn test_text_separates_blocks() {
        let page = HtmlPage::parse(PAGE);
        let body = page.text_by_class("article-body").await.unwrap();
        assert_eq!(
            body,
            "Heart health\nBlack adults are more likely to have high blood pressure.\nDiet matters."
        );
    }

    #[tokio::test]
    async fn test_missing_class_error_names_selector() {
        let page = HtmlPage::parse(PAGE);
        let err = page.text_by_class("article-body-x").await.unwrap_err();
        assert!(err.to_string().contains(".article-body-x"));
    }
}
