use crate::classifier::ClassifierHandle;
use crate::config::ServiceConfig;
use crate::error::{AnalysisError, ConfigError};
use crate::fetchers::{Fetcher, WebFetcher};
use crate::filter::UrlFilter;
use crate::parsers::ProductExtractor;
use crate::results::{AnalysisRequest, AnalysisResponse};
use crate::scoring::{self, CANDIDATE_LABELS};
use std::fmt;
use std::sync::Arc;

/// Pipeline stages a request moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Fetching,
    Extracting,
    Classifying,
    Scoring,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::Classifying => "classifying",
            Stage::Scoring => "scoring",
        };
        f.write_str(name)
    }
}

/// Runs fetch, extract, classify and score for one product URL
///
/// Each request is independent. The only shared pieces are read-only: the
/// fetcher's client, the compiled selectors and the classifier handle.
pub struct Analyzer {
    fetcher: Arc<dyn Fetcher>,
    classifier: ClassifierHandle,
    extractor: ProductExtractor,
    url_filter: Arc<UrlFilter>,
}

impl Analyzer {
    /// Create an analyzer with default extraction selectors and no blocked URLs
    pub fn new(fetcher: Arc<dyn Fetcher>, classifier: ClassifierHandle) -> Self {
        Self {
            fetcher,
            classifier,
            extractor: ProductExtractor::default(),
            url_filter: Arc::new(UrlFilter::default()),
        }
    }

    /// Build the production analyzer from configuration
    pub fn from_config(
        config: &ServiceConfig,
        classifier: ClassifierHandle,
    ) -> Result<Self, ConfigError> {
        // One compiled filter guards both request URLs and redirect hops
        let url_filter = Arc::new(UrlFilter::new(config.blocked_url_patterns.as_slice())?);
        let fetcher = WebFetcher::new(&config.fetch, Arc::clone(&url_filter))?;

        Ok(Self::new(Arc::new(fetcher), classifier)
            .with_extractor(ProductExtractor::new(&config.extract)?)
            .with_url_filter(url_filter))
    }

    /// Replace the product extractor
    pub fn with_extractor(mut self, extractor: ProductExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Replace the request URL filter
    pub fn with_url_filter(mut self, url_filter: impl Into<Arc<UrlFilter>>) -> Self {
        self.url_filter = url_filter.into();
        self
    }

    pub fn classifier_available(&self) -> bool {
        self.classifier.is_available()
    }

    /// Analyze a product page. Either the full response or a single error; never partial.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResponse, AnalysisError> {
        ::log::info!("Received request for URL: {}", request.url);

        let result = self.run(request).await;
        match &result {
            Ok(response) => ::log::info!(
                "Predicted '{}' ({:.3}) for {}",
                response.breakdown.predicted_label,
                response.breakdown.confidence,
                request.url
            ),
            Err(e) => ::log::warn!("Analysis of {} failed: {}", request.url, e),
        }
        result
    }

    async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        trace_stage(Stage::Received, &request.url);

        // Unavailability is a standing condition, so fail before doing any work
        let classifier = self
            .classifier
            .get()
            .ok_or(AnalysisError::CapabilityUnavailable)?;

        let url = self.url_filter.validate(&request.url)?;

        trace_stage(Stage::Fetching, url.as_str());
        let page = self.fetcher.fetch(url.as_str()).await?;

        trace_stage(Stage::Extracting, url.as_str());
        let text = self.extractor.extract(&page).combined_text();
        drop(page);

        trace_stage(Stage::Classifying, url.as_str());
        let classification = classifier.classify(&text, &CANDIDATE_LABELS).await?;

        trace_stage(Stage::Scoring, url.as_str());
        let (label, confidence) = classification.top();
        let response = scoring::build_response(label, confidence)?;

        Ok(response)
    }
}

fn trace_stage(stage: Stage, url: &str) {
    ::log::debug!("[{}] {}", stage, url);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::error::{ClassificationError, DETAIL_SCRAPE_FAILED, FetchError, FetchFailure};
    use crate::results::{ClassificationResult, PageContent};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BAMBOO_PAGE: &str = r#"
        <html><body>
          <span id="productTitle">Bamboo Toothbrush</span>
          <div id="feature-bullets"><ul><li>100% biodegradable, zero plastic</li></ul></div>
        </body></html>
    "#;

    struct FakeFetcher {
        outcome: Result<&'static str, FetchFailure>,
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        fn page(html: &'static str) -> Arc<Self> {
            Arc::new(Self {
                outcome: Ok(html),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(reason: FetchFailure) -> Arc<Self> {
            Arc::new(Self {
                outcome: Err(reason),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Fetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let url = url.to_string();
            match self.outcome {
                Ok(html) => Ok(PageContent::new(html.as_bytes().to_vec(), url)),
                Err(FetchFailure::Network) => Err(FetchError::Network {
                    url,
                    message: "dns error".to_string(),
                }),
                Err(FetchFailure::HttpStatus(status)) => Err(FetchError::HttpStatus { url, status }),
                Err(FetchFailure::Timeout) => Err(FetchError::Timeout { url }),
            }
        }
    }

    struct FakeClassifier {
        labels: Vec<&'static str>,
        scores: Vec<f64>,
        fail: bool,
        calls: AtomicUsize,
        seen: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl FakeClassifier {
        fn predicting(label: &'static str, confidence: f64) -> Arc<Self> {
            let others: Vec<&'static str> = CANDIDATE_LABELS
                .iter()
                .copied()
                .filter(|l| *l != label)
                .collect();
            let rest = (1.0 - confidence) / 2.0;
            Arc::new(Self {
                labels: vec![label, others[0], others[1]],
                scores: vec![confidence, rest, rest],
                fail: false,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn returning(labels: Vec<&'static str>, scores: Vec<f64>) -> Arc<Self> {
            Arc::new(Self {
                labels,
                scores,
                fail: false,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                labels: Vec::new(),
                scores: Vec::new(),
                fail: true,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Classifier for FakeClassifier {
        async fn classify(
            &self,
            text: &str,
            candidate_labels: &[&str],
        ) -> Result<ClassificationResult, ClassificationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push((
                text.to_string(),
                candidate_labels.iter().map(|l| l.to_string()).collect(),
            ));
            if self.fail {
                return Err(ClassificationError::Request("connection reset".to_string()));
            }
            ClassificationResult::new(
                self.labels.iter().map(|l| l.to_string()).collect(),
                self.scores.clone(),
            )
        }
    }

    fn request(url: &str) -> AnalysisRequest {
        AnalysisRequest {
            url: url.to_string(),
        }
    }

    fn analyzer(fetcher: Arc<FakeFetcher>, classifier: Arc<FakeClassifier>) -> Analyzer {
        Analyzer::new(fetcher, ClassifierHandle::available(classifier))
    }

    #[tokio::test]
    async fn test_end_to_end_bamboo_toothbrush() {
        let fetcher = FakeFetcher::page(BAMBOO_PAGE);
        let classifier = FakeClassifier::predicting("eco-friendly", 0.87);
        let analyzer = analyzer(fetcher.clone(), classifier.clone());

        let response = analyzer
            .analyze(&request("http://example.com/product"))
            .await
            .unwrap();

        let seen = classifier.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "Bamboo Toothbrush. 100% biodegradable, zero plastic");
        assert_eq!(seen[0].1, vec!["eco-friendly", "unsustainable", "neutral"]);

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({
                "score": 9.0,
                "color": "#2ecc71",
                "breakdown": {"predicted_label": "eco-friendly", "confidence": 0.87},
                "alternatives": [
                    {"name": "Reusable Bottle", "score": 9},
                    {"name": "Eco Bag", "score": 8}
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_failures_skip_classification() {
        for reason in [
            FetchFailure::Network,
            FetchFailure::HttpStatus(404),
            FetchFailure::HttpStatus(500),
            FetchFailure::Timeout,
        ] {
            let fetcher = FakeFetcher::failing(reason);
            let classifier = FakeClassifier::predicting("neutral", 0.5);
            let analyzer = analyzer(fetcher.clone(), classifier.clone());

            let err = analyzer
                .analyze(&request("http://example.com/product"))
                .await
                .unwrap_err();

            match &err {
                AnalysisError::Acquisition(fetch) => assert_eq!(fetch.reason(), reason),
                other => panic!("expected acquisition error, got {:?}", other),
            }
            assert_eq!(err.status_code(), 400);
            assert_eq!(err.detail(), DETAIL_SCRAPE_FAILED);
            assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
            assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_empty_page_still_classifies() {
        let fetcher = FakeFetcher::page("<html><body></body></html>");
        let classifier = FakeClassifier::predicting("neutral", 0.4);
        let analyzer = analyzer(fetcher, classifier.clone());

        let response = analyzer
            .analyze(&request("https://example.com/empty"))
            .await
            .unwrap();

        assert_eq!(response.score, 5.0);
        assert_eq!(response.color, "#f39c12");
        assert_eq!(
            classifier.seen.lock().unwrap()[0].0,
            "No title found. No description found"
        );
    }

    #[tokio::test]
    async fn test_unavailable_classifier_fails_for_any_url() {
        for url in ["http://example.com/product", "", "not a url"] {
            let fetcher = FakeFetcher::page(BAMBOO_PAGE);
            let analyzer = Analyzer::new(fetcher.clone(), ClassifierHandle::unavailable());

            let err = analyzer.analyze(&request(url)).await.unwrap_err();
            assert!(matches!(err, AnalysisError::CapabilityUnavailable));
            assert_eq!(err.status_code(), 500);
            assert_eq!(err.detail(), "AI model is not available.");
            assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        }
        assert!(!Analyzer::new(FakeFetcher::page(""), ClassifierHandle::unavailable())
            .classifier_available());
    }

    #[tokio::test]
    async fn test_malformed_url_is_input_error() {
        let fetcher = FakeFetcher::page(BAMBOO_PAGE);
        let analyzer = analyzer(fetcher.clone(), FakeClassifier::predicting("neutral", 0.5));

        for url in ["", "example.com/product", "ftp://example.com/product"] {
            let err = analyzer.analyze(&request(url)).await.unwrap_err();
            assert!(matches!(err, AnalysisError::Input(_)), "url {:?}", url);
            assert_eq!(err.status_code(), 400);
        }
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_classifier_failure() {
        let analyzer = analyzer(FakeFetcher::page(BAMBOO_PAGE), FakeClassifier::failing());

        let err = analyzer
            .analyze(&request("http://example.com/product"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Classification(_)));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.detail(), "Failed to analyze product.");
    }

    #[tokio::test]
    async fn test_unknown_label_is_handled() {
        let classifier = FakeClassifier::returning(vec!["greenwashed", "neutral"], vec![0.9, 0.1]);
        let analyzer = analyzer(FakeFetcher::page(BAMBOO_PAGE), classifier);

        let err = analyzer
            .analyze(&request("http://example.com/product"))
            .await
            .unwrap_err();
        match &err {
            AnalysisError::UnknownLabel(e) => assert_eq!(e.label, "greenwashed"),
            other => panic!("expected unknown label, got {:?}", other),
        }
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let analyzer = analyzer(
            FakeFetcher::page(BAMBOO_PAGE),
            FakeClassifier::predicting("unsustainable", 0.66),
        );
        let req = request("http://example.com/product");

        let first = analyzer.analyze(&req).await.unwrap();
        let second = analyzer.analyze(&req).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.breakdown.predicted_label, "unsustainable");
        assert_eq!(first.score, 2.0);
    }

    #[tokio::test]
    async fn test_blocked_url_pattern() {
        let fetcher = FakeFetcher::page(BAMBOO_PAGE);
        let analyzer = analyzer(fetcher.clone(), FakeClassifier::predicting("neutral", 0.5))
            .with_url_filter(UrlFilter::new(&["localhost"]).unwrap());

        let err = analyzer
            .analyze(&request("http://localhost/product"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Input(_)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_from_config_rejects_bad_selectors() {
        let mut config = ServiceConfig::default();
        config.extract.description_selectors = vec!["div[".to_string()];

        let result = Analyzer::from_config(&config, ClassifierHandle::unavailable());
        assert!(matches!(result, Err(ConfigError::Selector { .. })));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Received.to_string(), "received");
        assert_eq!(Stage::Classifying.to_string(), "classifying");
    }
}
