// src/scoring/blend.rs
//
// Combines a classifier probability with the heuristic aggregate into
// the final score.

use super::result::PredictionMethod;

/// Safety-boost gate: the classifier must sit below this while the
/// heuristic clears its floor.
const BOOST_ML_CEILING: f64 = 75.0;
const BOOST_HEURISTIC_FLOOR: f64 = 70.0;

/// Ensemble mix for subcategories that favor the range heuristic.
const ENSEMBLE_ML_WEIGHT: f64 = 0.4;
const ENSEMBLE_HEURISTIC_WEIGHT: f64 = 0.6;

/// Blend `probability` (0-1) with the heuristic aggregate.
///
/// The ensemble path mixes both scores at fixed weights. Otherwise
/// the classifier leads, with a lukewarm classifier pulled halfway
/// toward a clearly strong heuristic.
pub fn blend(probability: f64, heuristic: u32, ensemble: bool) -> (u32, PredictionMethod) {
    let ml_score = probability * 100.0;
    let heuristic_score = heuristic as f64;

    if ensemble {
        let mixed = ENSEMBLE_ML_WEIGHT * ml_score + ENSEMBLE_HEURISTIC_WEIGHT * heuristic_score;
        return (
            mixed.round().clamp(0.0, 100.0) as u32,
            PredictionMethod::Ensemble,
        );
    }

    let score = if ml_score < BOOST_ML_CEILING && heuristic_score > BOOST_HEURISTIC_FLOOR {
        (ml_score + 0.5 * (heuristic_score - ml_score)).round().min(100.0)
    } else {
        ml_score.round()
    };
    (score.clamp(0.0, 100.0) as u32, PredictionMethod::Ml)
}
