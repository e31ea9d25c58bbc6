use crate::error::{AnalysisError, ConfigError};
use regex::Regex;
use url::Url;

/// Schemes the fetcher is allowed to request
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Validates product URLs before anything is fetched
#[derive(Debug, Clone, Default)]
pub struct UrlFilter {
    blocked_regexes: Vec<Regex>,
}

impl UrlFilter {
    /// Create a URL filter that also refuses URLs matching any of `blocked_patterns`
    pub fn new<S: AsRef<str>>(blocked_patterns: &[S]) -> Result<Self, ConfigError> {
        let mut blocked_regexes = Vec::with_capacity(blocked_patterns.len());
        for pattern in blocked_patterns {
            blocked_regexes.push(Regex::new(pattern.as_ref())?);
        }

        Ok(Self { blocked_regexes })
    }

    /// Parse and check a request URL
    pub fn validate(&self, raw: &str) -> Result<Url, AnalysisError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AnalysisError::Input("url is empty".to_string()));
        }

        let url = Url::parse(trimmed)
            .map_err(|e| AnalysisError::Input(format!("malformed url {:?}: {}", trimmed, e)))?;

        self.check(&url).map_err(AnalysisError::Input)?;
        Ok(url)
    }

    /// Check an already parsed URL, such as a redirect target
    pub fn check(&self, url: &Url) -> Result<(), String> {
        if !ALLOWED_SCHEMES.contains(&url.scheme()) {
            return Err(format!("unsupported scheme {:?}", url.scheme()));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(format!("url has no host: {}", url));
        }

        if let Some(regex) = self.blocked_regexes.iter().find(|r| r.is_match(url.as_str())) {
            return Err(format!(
                "url {} matches blocked pattern {}",
                url,
                regex.as_str()
            ));
        }

        Ok(())
    }
}
