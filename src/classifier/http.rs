use crate::classifier::Classifier;
use crate::config::ClassifierConfig;
use crate::error::ClassificationError;
use crate::results::ClassificationResult;
use crate::scoring::CANDIDATE_LABELS;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Both response shapes served by zero-shot inference endpoints
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    /// `{"sequence": ..., "labels": [...], "scores": [...]}`
    Parallel {
        labels: Vec<String>,
        scores: Vec<f64>,
    },
    /// `[{"label": ..., "score": ...}, ...]`
    Pairs(Vec<LabelScore>),
}

impl ZeroShotResponse {
    fn into_result(self) -> Result<ClassificationResult, ClassificationError> {
        match self {
            ZeroShotResponse::Parallel { labels, scores } => {
                ClassificationResult::new(labels, scores)
            }
            ZeroShotResponse::Pairs(pairs) => {
                let (labels, scores) = pairs.into_iter().map(|p| (p.label, p.score)).unzip();
                ClassificationResult::new(labels, scores)
            }
        }
    }
}

/// Zero-shot classifier served over HTTP (Hugging Face inference API or compatible)
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: Client,
    endpoint: Url,
    api_token: Option<String>,
}

impl HttpClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassificationError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            ClassificationError::Init(format!("invalid endpoint {:?}: {}", config.endpoint, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClassificationError::Init(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_token: config.api_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Classify a fixed sentence so a broken endpoint shows up at startup
    pub async fn warm_up(&self) -> Result<(), ClassificationError> {
        self.classify("Reusable stainless steel water bottle.", &CANDIDATE_LABELS)
            .await
            .map(|_| ())
            .map_err(|e| ClassificationError::Init(format!("warm-up failed: {}", e)))
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<ClassificationResult, ClassificationError> {
        let body = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters { candidate_labels },
        };

        ::log::debug!(
            "Classifying {} chars against {:?} via {}",
            text.len(),
            candidate_labels,
            self.endpoint
        );

        let mut request = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClassificationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassificationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ZeroShotResponse = response
            .json()
            .await
            .map_err(|e| ClassificationError::MalformedResponse(e.to_string()))?;

        parsed.into_result()
    }
}
