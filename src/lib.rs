//! Product sustainability analysis.
//!
//! A product page URL goes through fetch, extraction, zero-shot
//! classification and scoring, and comes back as a score, a display color,
//! the label breakdown and a list of alternatives.

pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod error;
pub mod fetchers;
pub mod filter;
pub mod parsers;
pub mod results;
pub mod scoring;
pub mod server;

// Re-export commonly used types for convenience
pub use analyzer::Analyzer;
pub use classifier::{Classifier, ClassifierHandle};
pub use config::ServiceConfig;
pub use error::AnalysisError;
pub use results::{AnalysisRequest, AnalysisResponse};
