use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

/// Request identity presented to scraped sites. Some sites serve an empty
/// shell to unknown agents, so this mimics a desktop browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Character budget for the scraped snippet embedded in the prompt.
pub const CONTENT_BUDGET: usize = 5000;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Non-success status: {0}")]
    Status(u16),
}

/// Fetches the raw HTML body of a company website. Abstracted so the
/// enrichment workflow can run against canned pages in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(FETCH_TIMEOUT)
                .user_agent(BROWSER_USER_AGENT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

/// Reduces an HTML document to its visible text: markup (script and style
/// content included) is dropped, whitespace is collapsed to single spaces,
/// and the result is cut to `budget` characters.
pub fn extract_visible_text(html: &str, budget: usize) -> String {
    let text = html2text::from_read(html.as_bytes(), 120).unwrap_or_default();
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(budget).collect()
}
