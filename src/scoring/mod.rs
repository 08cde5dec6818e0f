//! Genre-aware scoring: range heuristics, classifier blending, reports

mod blend;
mod engine;
mod predictor;
mod result;

pub use blend::blend;
pub use engine::{heuristic_score, recommendations, ScoreCard};
pub use predictor::HitPredictor;
pub use result::{
    AnalysisReport, MlPrediction, Prediction, PredictionMethod, Priority, Recommendation,
    RecommendationCategory, SubScore,
};
