use crate::error::ClassificationError;
use serde::{Deserialize, Serialize};

/// Incoming analysis request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Product page to analyze
    pub url: String,
}

/// Raw page as fetched, handed straight to the extractor
#[derive(Debug, Clone)]
pub struct PageContent {
    /// Response body bytes
    pub raw_html: Vec<u8>,

    /// URL the page was requested from
    pub source_url: String,
}

impl PageContent {
    pub fn new(raw_html: Vec<u8>, source_url: impl Into<String>) -> Self {
        Self {
            raw_html,
            source_url: source_url.into(),
        }
    }
}

/// Product text pulled out of a page. Fields fall back to sentinels, never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub title: String,
    pub description: String,
}

impl ExtractedText {
    /// Text handed to the classifier
    pub fn combined_text(&self) -> String {
        format!("{}. {}", self.title, self.description)
    }
}

/// Ranked output of a zero-shot classification
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    labels: Vec<String>,
    scores: Vec<f64>,
}

impl ClassificationResult {
    /// Build a result from parallel label/score lists, ranking by descending score.
    ///
    /// Rejects empty or mismatched lists and scores outside [0, 1].
    pub fn new(labels: Vec<String>, scores: Vec<f64>) -> Result<Self, ClassificationError> {
        if labels.is_empty() {
            return Err(ClassificationError::MalformedResponse(
                "no labels returned".to_string(),
            ));
        }
        if labels.len() != scores.len() {
            return Err(ClassificationError::MalformedResponse(format!(
                "{} labels but {} scores",
                labels.len(),
                scores.len()
            )));
        }
        if let Some(bad) = scores.iter().find(|s| !(0.0..=1.0).contains(*s)) {
            return Err(ClassificationError::MalformedResponse(format!(
                "score {} outside [0, 1]",
                bad
            )));
        }

        let mut ranked: Vec<(String, f64)> = labels.into_iter().zip(scores).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        let (labels, scores) = ranked.into_iter().unzip();

        Ok(Self { labels, scores })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Highest-ranked label and its confidence
    pub fn top(&self) -> (&str, f64) {
        (&self.labels[0], self.scores[0])
    }
}

/// Label and confidence behind a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub predicted_label: String,
    pub confidence: f64,
}

/// Suggested replacement product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub name: String,
    pub score: u8,
}

/// Successful analysis, serialized as the `/analyze` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub score: f64,
    pub color: String,
    pub breakdown: Breakdown,
    pub alternatives: Vec<Alternative>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_combined_text() {
        let text = ExtractedText {
            title: "Bamboo Toothbrush".to_string(),
            description: "100% biodegradable, zero plastic".to_string(),
        };
        assert_eq!(
            text.combined_text(),
            "Bamboo Toothbrush. 100% biodegradable, zero plastic"
        );
    }

    #[test]
    fn test_classification_result_is_ranked() {
        let result = ClassificationResult::new(
            strings(&["unsustainable", "eco-friendly", "neutral"]),
            vec![0.08, 0.87, 0.05],
        )
        .unwrap();

        assert_eq!(result.top(), ("eco-friendly", 0.87));
        assert_eq!(
            result.labels(),
            strings(&["eco-friendly", "unsustainable", "neutral"]).as_slice()
        );
        assert_eq!(result.scores(), &[0.87, 0.08, 0.05]);
    }

    #[test]
    fn test_classification_result_rejects_bad_shapes() {
        assert!(ClassificationResult::new(vec![], vec![]).is_err());
        assert!(ClassificationResult::new(strings(&["neutral"]), vec![0.5, 0.5]).is_err());
        assert!(ClassificationResult::new(strings(&["neutral"]), vec![1.5]).is_err());
    }

    #[test]
    fn test_response_serializes_to_wire_shape() {
        let response = AnalysisResponse {
            score: 9.0,
            color: "#2ecc71".to_string(),
            breakdown: Breakdown {
                predicted_label: "eco-friendly".to_string(),
                confidence: 0.87,
            },
            alternatives: vec![Alternative {
                name: "Eco Bag".to_string(),
                score: 8,
            }],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "score": 9.0,
                "color": "#2ecc71",
                "breakdown": {"predicted_label": "eco-friendly", "confidence": 0.87},
                "alternatives": [{"name": "Eco Bag", "score": 8}]
            })
        );
    }
}
