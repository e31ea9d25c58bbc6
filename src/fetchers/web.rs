use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::fetchers::Fetcher;
use crate::filter::UrlFilter;
use crate::results::PageContent;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::redirect::Policy;
use std::sync::Arc;
use std::time::Duration;

const MAX_REDIRECTS: usize = 10;

/// Fetches pages over HTTP(S) with a browser identity and a bounded timeout
///
/// Redirect targets go through the same [`UrlFilter`] as request URLs, and
/// bodies larger than `max_body_bytes` are refused.
#[derive(Debug, Clone)]
pub struct WebFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl WebFetcher {
    /// Create a fetcher from configuration
    pub fn new(config: &FetchConfig, url_filter: Arc<UrlFilter>) -> Result<Self, reqwest::Error> {
        Self::with_settings(
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
            config.max_body_bytes,
            url_filter,
        )
    }

    /// Create a fetcher with explicit settings
    pub fn with_settings(
        user_agent: &str,
        timeout: Duration,
        max_body_bytes: usize,
        url_filter: Arc<UrlFilter>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(redirect_policy(url_filter))
            .build()?;

        Ok(Self {
            client,
            max_body_bytes,
        })
    }

    fn too_large(&self, url: &str) -> FetchError {
        FetchError::Network {
            url: url.to_string(),
            message: format!("body exceeds {} bytes", self.max_body_bytes),
        }
    }
}

/// Follow redirects only to URLs the filter would accept as a request
fn redirect_policy(url_filter: Arc<UrlFilter>) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if let Err(reason) = url_filter.check(attempt.url()) {
            ::log::warn!("Refusing redirect: {}", reason);
            attempt.error(reason)
        } else {
            attempt.follow()
        }
    })
}

#[async_trait]
impl Fetcher for WebFetcher {
    async fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
        ::log::debug!("Fetching {}", url);

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if response
            .content_length()
            .is_some_and(|length| length > self.max_body_bytes as u64)
        {
            return Err(self.too_large(url));
        }

        // The timeout also covers reading the body
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }

        ::log::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(PageContent::new(body, url))
    }
}
