pub mod html;
pub mod text;


use crate::config::ExtractConfig;
use crate::error::ConfigError;
use crate::results::{ExtractedText, PageContent};
use html::FallbackChain;
use scraper::Html;

/// Title used when no title strategy matches
pub const NO_TITLE: &str = "No title found";

/// Description used when no description strategy matches
pub const NO_DESCRIPTION: &str = "No description found";

/// Pulls product title and description out of a fetched page
///
/// Page structure is site-specific and unreliable, so every field is a
/// fallback chain ending in a sentinel. Extraction never fails.
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    title: FallbackChain,
    description: FallbackChain,
}

impl Default for ProductExtractor {
    fn default() -> Self {
        Self::new(&ExtractConfig::default()).expect("Default selectors should be valid")
    }
}

impl ProductExtractor {
    /// Build an extractor from configured selector chains
    pub fn new(config: &ExtractConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            title: FallbackChain::from_selectors(config.title_selectors.as_slice(), NO_TITLE)?,
            description: FallbackChain::from_selectors(
                config.description_selectors.as_slice(),
                NO_DESCRIPTION,
            )?,
        })
    }

    /// Extract product text from a fetched page
    pub fn extract(&self, page: &PageContent) -> ExtractedText {
        let html = String::from_utf8_lossy(&page.raw_html);
        ::log::debug!(
            "Extracting product text from {} ({} bytes)",
            page.source_url,
            page.raw_html.len()
        );
        self.extract_html(&html)
    }

    /// Extract product text from an HTML string
    pub fn extract_html(&self, html: &str) -> ExtractedText {
        let doc = Html::parse_document(html);

        ExtractedText {
            title: self.title.evaluate(&doc),
            description: self.description.evaluate(&doc),
        }
    }
}
