//! Public page fetching through a text-extraction reader proxy.

use std::sync::LazyLock;

use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

static REFERENCE_BASE: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("http://en.wikipedia.org/wiki/").expect("reference base URL is valid")
});

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),
}

/// Fetches the readable text of a public page.
///
/// Carried in `AppState` as `Arc<dyn PageFetcher>`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches pages via a reader proxy that turns HTML into clean text,
/// e.g. `https://r.jina.ai/https://acme.com/about`.
#[derive(Clone)]
pub struct ReaderProxyFetcher {
    client: Client,
    proxy_url: String,
}

impl ReaderProxyFetcher {
    pub fn new(proxy_url: String) -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            proxy_url,
        })
    }
}

#[async_trait]
impl PageFetcher for ReaderProxyFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let proxied = format!("{}{}", self.proxy_url, url);
        let response = self.client.get(&proxied).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        debug!("Fetched {} chars from {}", text.len(), url);
        Ok(text)
    }
}

/// The three public pages researched for every company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanySources {
    pub reference: String,
    pub about: String,
    pub careers: String,
}

impl CompanySources {
    pub fn for_company(company: &str) -> Self {
        let slug = company_slug(company);

        let mut reference = REFERENCE_BASE.clone();
        if let Ok(mut segments) = reference.path_segments_mut() {
            segments.pop_if_empty().push(company);
        }

        Self {
            reference: reference.to_string(),
            about: format!("https://{slug}.com/about"),
            careers: format!("https://{slug}.com/careers"),
        }
    }
}

/// Lowercase, whitespace-stripped company name, used as a domain guess.
pub fn company_slug(company: &str) -> String {
    company
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_lowercases_and_strips_whitespace() {
        assert_eq!(company_slug("Acme"), "acme");
        assert_eq!(company_slug("Jane Street"), "janestreet");
        assert_eq!(company_slug("  Big\tBlue  Co "), "bigblueco");
    }

    #[test]
    fn test_sources_for_single_word_company() {
        let sources = CompanySources::for_company("Stripe");
        assert_eq!(sources.reference, "http://en.wikipedia.org/wiki/Stripe");
        assert_eq!(sources.about, "https://stripe.com/about");
        assert_eq!(sources.careers, "https://stripe.com/careers");
    }

    #[test]
    fn test_reference_url_percent_encodes_company() {
        let sources = CompanySources::for_company("Jane Street");
        assert_eq!(sources.reference, "http://en.wikipedia.org/wiki/Jane%20Street");
        assert_eq!(sources.about, "https://janestreet.com/about");
    }

    #[test]
    fn test_reference_url_escapes_path_separators() {
        let sources = CompanySources::for_company("AT/T");
        assert_eq!(sources.reference, "http://en.wikipedia.org/wiki/AT%2FT");
    }
}
