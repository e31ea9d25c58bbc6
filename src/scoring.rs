use crate::error::UnknownLabelError;
use crate::results::{Alternative, AnalysisResponse, Breakdown};
use std::fmt;
use std::str::FromStr;

/// Labels offered to the classifier, in the order they are sent
pub const CANDIDATE_LABELS: [&str; 3] = ["eco-friendly", "unsustainable", "neutral"];

/// Score and display color for a label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub score: f64,
    pub color: &'static str,
}

/// The fixed sustainability labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SustainabilityLabel {
    EcoFriendly,
    Neutral,
    Unsustainable,
}

impl SustainabilityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SustainabilityLabel::EcoFriendly => "eco-friendly",
            SustainabilityLabel::Neutral => "neutral",
            SustainabilityLabel::Unsustainable => "unsustainable",
        }
    }
}

impl fmt::Display for SustainabilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SustainabilityLabel {
    type Err = UnknownLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eco-friendly" => Ok(SustainabilityLabel::EcoFriendly),
            "neutral" => Ok(SustainabilityLabel::Neutral),
            "unsustainable" => Ok(SustainabilityLabel::Unsustainable),
            other => Err(UnknownLabelError {
                label: other.to_string(),
            }),
        }
    }
}

/// Label to score/color table
pub const fn score_for(label: SustainabilityLabel) -> Score {
    match label {
        SustainabilityLabel::EcoFriendly => Score {
            score: 9.0,
            color: "#2ecc71",
        },
        SustainabilityLabel::Neutral => Score {
            score: 5.0,
            color: "#f39c12",
        },
        SustainabilityLabel::Unsustainable => Score {
            score: 2.0,
            color: "#e74c3c",
        },
    }
}

/// Placeholder suggestions, identical for every request.
/// Stands in until real recommendation data exists.
pub const MOCK_ALTERNATIVES: [(&str, u8); 2] = [("Reusable Bottle", 9), ("Eco Bag", 8)];

/// Look up the score and color for a predicted label
pub fn score(label: &str) -> Result<Score, UnknownLabelError> {
    let label: SustainabilityLabel = label.parse()?;
    Ok(score_for(label))
}

pub fn alternatives() -> Vec<Alternative> {
    MOCK_ALTERNATIVES
        .iter()
        .map(|(name, score)| Alternative {
            name: name.to_string(),
            score: *score,
        })
        .collect()
}

/// Build the full response for a predicted label and its confidence
pub fn build_response(label: &str, confidence: f64) -> Result<AnalysisResponse, UnknownLabelError> {
    let label: SustainabilityLabel = label.parse()?;
    let Score { score, color } = score_for(label);

    Ok(AnalysisResponse {
        score,
        color: color.to_string(),
        breakdown: Breakdown {
            predicted_label: label.to_string(),
            confidence,
        },
        alternatives: alternatives(),
    })
}
