use crate::error::ConfigError;
use crate::parsers::text;
use scraper::{Html, Selector};

/// One way of locating a product field: the first element matching a CSS selector
#[derive(Debug, Clone)]
pub struct SelectorStrategy {
    css: String,
    selector: Selector,
}

impl SelectorStrategy {
    /// Compile a strategy from a CSS selector
    pub fn new(css: &str) -> Result<Self, ConfigError> {
        let selector = Selector::parse(css).map_err(|e| ConfigError::Selector {
            selector: css.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            css: css.to_string(),
            selector,
        })
    }

    /// The CSS selector this strategy was built from
    pub fn css(&self) -> &str {
        &self.css
    }

    /// Text of the first matching element, or `None` if it is missing or blank
    pub fn apply(&self, doc: &Html) -> Option<String> {
        let element = doc.select(&self.selector).next()?;
        let content = text::join_nodes(element.text());
        text::non_empty(&content)
    }
}

/// An ordered list of strategies with a sentinel for when none of them match
#[derive(Debug, Clone)]
pub struct FallbackChain {
    strategies: Vec<SelectorStrategy>,
    sentinel: &'static str,
}

impl FallbackChain {
    pub fn new(strategies: Vec<SelectorStrategy>, sentinel: &'static str) -> Self {
        Self {
            strategies,
            sentinel,
        }
    }

    /// Compile every selector in order
    pub fn from_selectors<S: AsRef<str>>(
        selectors: &[S],
        sentinel: &'static str,
    ) -> Result<Self, ConfigError> {
        let strategies = selectors
            .iter()
            .map(|css| SelectorStrategy::new(css.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(strategies, sentinel))
    }

    /// Runs strategies in order; the first non-empty result wins, otherwise the sentinel
    pub fn evaluate(&self, doc: &Html) -> String {
        for strategy in &self.strategies {
            if let Some(found) = strategy.apply(doc) {
                ::log::debug!("Selector '{}' matched", strategy.css());
                return found;
            }
        }

        ::log::debug!(
            "No selector matched out of {}, using '{}'",
            self.strategies.len(),
            self.sentinel
        );
        self.sentinel.to_string()
    }
}
