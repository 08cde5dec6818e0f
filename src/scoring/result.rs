// src/scoring/result.rs
//
// Report types produced by scoring. Everything here serializes
// directly into the JSON output mode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{GenreId, Subgenre};
use crate::core::{Feature, FeatureVector};

/// How the final score was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    /// Range-based heuristic only.
    Heuristic,
    /// Trained classifier, possibly safety-boosted.
    Ml,
    /// Weighted classifier/heuristic combination.
    Ensemble,
}

impl PredictionMethod {
    pub fn description(&self) -> &'static str {
        match self {
            PredictionMethod::Heuristic => "range heuristic",
            PredictionMethod::Ml => "trained classifier",
            PredictionMethod::Ensemble => "classifier + heuristic ensemble",
        }
    }
}

/// Recommendation urgency, ordered lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Tempo,
    Danceability,
    Energy,
    Duration,
    Overall,
}

/// One actionable suggestion derived from the sub-scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: RecommendationCategory,
    pub message: String,
}

impl Recommendation {
    pub fn new(
        priority: Priority,
        category: RecommendationCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            category,
            message: message.into(),
        }
    }
}

/// One scored feature range as a percentage, one decimal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubScore {
    pub feature: Feature,
    pub score: f64,
}

/// Classifier output attached to ML-backed predictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlPrediction {
    /// True when the raw probability reaches 0.5.
    pub is_hit: bool,
    /// Hit probability as a percentage, one decimal.
    pub probability: f64,
    /// The heuristic aggregate the classifier was blended with.
    pub heuristic_score: u32,
}

/// Scoring outcome for one track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub genre: GenreId,
    pub subcategory: Option<Subgenre>,
    /// Final hit-potential score, 0-100.
    pub score: u32,
    pub method: PredictionMethod,
    pub individual_scores: Vec<SubScore>,
    pub recommendations: Vec<Recommendation>,
    pub ml: Option<MlPrediction>,
}

impl Prediction {
    /// Human description of the score band.
    pub fn verdict(&self) -> &'static str {
        match self.score {
            80..=100 => "Strong hit potential",
            60..=79 => "Promising",
            40..=59 => "Moderate potential",
            _ => "Low hit potential",
        }
    }
}

/// Complete per-file analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub file: String,
    pub analyzed_at: DateTime<Utc>,
    pub features: FeatureVector,
    pub prediction: Prediction,
}
