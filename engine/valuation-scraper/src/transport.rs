use crate::config::{HttpConfig, RetryConfig, SiteConfig};
use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// A fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub body: String,
}

impl Page {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self { url: url.into(), body: body.into() }
    }

    /// Parse the body into a document tree
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Fetches pages by absolute URL.
///
/// Implementations retry transient failures themselves; an `Err` is terminal.
/// A successful response with an empty body is still `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page>;
}

/// Outcome of one attempt inside [`retry_with_backoff`]
#[derive(Debug)]
pub enum AttemptError {
    /// Worth trying again
    Retryable(ScrapeError),
    /// Give up immediately
    Fatal(ScrapeError),
}

/// Run `op` until it succeeds, fails fatally, or retries are exhausted
pub async fn retry_with_backoff<F, Fut, T>(retry: &RetryConfig, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, AttemptError>>,
{
    let mut attempt = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(AttemptError::Fatal(e)) => return Err(e),
            Err(AttemptError::Retryable(e)) => {
                if attempt >= retry.max_retries {
                    return Err(e);
                }

                let delay = retry.delay_for(attempt);
                warn!("Attempt {} failed: {}, retrying in {:?}", attempt + 1, e, delay);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// HTTP transport backed by `reqwest`
pub struct HttpTransport {
    client: Client,
    retry: RetryConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(site: &SiteConfig, http: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(site.user_agent.clone())
            .build()
            .map_err(|e| ScrapeError::transport(&site.base_url, e.to_string()))?;

        Ok(Self { client, retry: http.retry.clone() })
    }

    async fn attempt(&self, url: &str) -> std::result::Result<Page, AttemptError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            let err = ScrapeError::transport(url, e.to_string());
            if e.is_builder() {
                AttemptError::Fatal(err)
            } else {
                AttemptError::Retryable(err)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let err = ScrapeError::Status { url: url.to_string(), status: status.as_u16() };
            return Err(if self.retry.is_retryable(status.as_u16()) {
                AttemptError::Retryable(err)
            } else {
                AttemptError::Fatal(err)
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Retryable(ScrapeError::transport(url, e.to_string())))?;

        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(Page::new(url, body))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<Page> {
        retry_with_backoff(&self.retry, || self.attempt(url)).await
    }
}
