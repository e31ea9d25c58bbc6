//! Adapter over an external zero-shot text classification capability.
//!
//! The capability is brought up once per process. If that fails the service
//! keeps running with an unavailable handle instead of retrying per request.

pub mod http;

use crate::config::ClassifierConfig;
use crate::error::ClassificationError;
use crate::results::ClassificationResult;
use async_trait::async_trait;
use std::sync::Arc;

pub use http::HttpClassifier;

/// A zero-shot classifier: ranks `candidate_labels` against `text`
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<ClassificationResult, ClassificationError>;
}

/// Process-wide handle to the classifier, decided once at startup
#[derive(Clone)]
pub struct ClassifierHandle {
    inner: Option<Arc<dyn Classifier>>,
}

impl ClassifierHandle {
    pub fn available(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            inner: Some(classifier),
        }
    }

    pub fn unavailable() -> Self {
        Self { inner: None }
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    /// The classifier, or `None` if it never came up
    pub fn get(&self) -> Option<&dyn Classifier> {
        self.inner.as_deref()
    }
}

impl std::fmt::Debug for ClassifierHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierHandle")
            .field("available", &self.is_available())
            .finish()
    }
}

/// Bring up the HTTP classifier, failing if the endpoint is unusable
pub async fn init(config: &ClassifierConfig) -> Result<HttpClassifier, ClassificationError> {
    let classifier = HttpClassifier::new(config)?;

    if config.warm_up {
        classifier.warm_up().await?;
    }

    Ok(classifier)
}

/// Bring up the classifier and wrap the outcome in a handle. Failure is logged, not fatal.
pub async fn load(config: &ClassifierConfig) -> ClassifierHandle {
    ::log::info!("Loading zero-shot classifier from {}", config.endpoint);

    match init(config).await {
        Ok(classifier) => {
            ::log::info!("Classifier loaded from {}", classifier.endpoint());
            ClassifierHandle::available(Arc::new(classifier))
        }
        Err(e) => {
            ::log::error!("Error loading classifier: {}", e);
            ClassifierHandle::unavailable()
        }
    }
}
