use crate::error::FetchError;
use crate::results::PageContent;
use async_trait::async_trait;

/// Base trait for page fetchers
///
/// A fetcher performs exactly one attempt per call. Retrying is left to the caller.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the raw page at `url`
    async fn fetch(&self, url: &str) -> Result<PageContent, FetchError>;
}
