// src/scoring/predictor.rs
//
// Ties scoring together: the heuristic score card, subcategory
// detection, and the classifier blend for genres that carry one.

use log::warn;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{detect_subgenre, GenreId, GenreProfile, ScoringMode, Subgenre};
use crate::core::FeatureVector;
use crate::error::ClassifierError;
use crate::ml::{latest_model_path, resolve_models_dir, shared, LogisticModel};

use super::blend::blend;
use super::engine::{heuristic_score, recommendations};
use super::result::{MlPrediction, Prediction, PredictionMethod};

/// Scores feature vectors against genre profiles.
///
/// Holds only the models directory override; model blobs live in the
/// process-wide cache, so predictors are cheap to construct and share
/// loaded models with each other.
pub struct HitPredictor {
    models_dir: Option<PathBuf>,
}

impl HitPredictor {
    /// Predictor using the environment/platform models directory.
    pub fn new() -> Self {
        Self { models_dir: None }
    }

    /// Predictor reading model blobs from `dir`.
    pub fn with_models_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: Some(dir.into()),
        }
    }

    /// Score `features` for `genre`.
    ///
    /// A missing or unusable classifier never fails the prediction;
    /// the result simply stays on the heuristic method.
    pub fn predict(&self, genre: GenreId, features: &FeatureVector) -> Prediction {
        let profile = GenreProfile::for_genre(genre);
        let card = heuristic_score(&profile, features);
        let recs = recommendations(&profile, features, &card);
        let subcategory = detect_subgenre(genre, features);

        let mut score = card.total;
        let mut method = PredictionMethod::Heuristic;
        let mut ml = None;

        if profile.mode == ScoringMode::MlBlend {
            match self.classifier_probability(genre, subcategory, features) {
                Ok(probability) => {
                    let ensemble = subcategory.is_some_and(|s| s.uses_ensemble());
                    let (blended, blend_method) = blend(probability, card.total, ensemble);
                    score = blended;
                    method = blend_method;
                    ml = Some(MlPrediction {
                        is_hit: probability >= 0.5,
                        probability: (probability * 1000.0).round() / 10.0,
                        heuristic_score: card.total,
                    });
                }
                Err(e) => {
                    warn!("classifier unavailable for {}, staying on the heuristic: {}", genre, e);
                }
            }
        }

        Prediction {
            genre,
            subcategory,
            score,
            method,
            individual_scores: card.as_percentages(),
            recommendations: recs,
            ml,
        }
    }

    fn classifier_probability(
        &self,
        genre: GenreId,
        subcategory: Option<Subgenre>,
        features: &FeatureVector,
    ) -> Result<f64, ClassifierError> {
        let dir = resolve_models_dir(self.models_dir.as_deref())?;
        let model = find_model(&dir, genre, subcategory)?;
        model.probability(&features.ml_inputs())
    }
}

impl Default for HitPredictor {
    fn default() -> Self {
        Self::new()
    }
}

/// Most specific usable model: the subcategory blob when one is
/// trained and loads, the parent genre blob otherwise.
fn find_model(
    dir: &Path,
    genre: GenreId,
    subcategory: Option<Subgenre>,
) -> Result<Arc<LogisticModel>, ClassifierError> {
    let cache = shared();

    if let Some(sub) = subcategory {
        if let Ok(path) = latest_model_path(dir, sub.as_str()) {
            if let Some(model) = cache.get(&path) {
                return Ok(model);
            }
        }
    }

    let path = latest_model_path(dir, genre.as_str())?;
    cache
        .get(&path)
        .ok_or_else(|| ClassifierError::NotFound(genre.as_str().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ML_FEATURE_NAMES;
    use std::fs;

    fn temp_models_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hitscore-predictor-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Constant-output model: zero weights make the probability
    /// sigmoid(bias) regardless of the inputs.
    fn write_model(dir: &Path, key: &str, timestamp: &str, bias: f64) {
        let model = LogisticModel {
            genre: key.to_string(),
            variant: "baseline".to_string(),
            trained_at: timestamp.to_string(),
            features: ML_FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            means: vec![0.0; 10],
            scales: vec![1.0; 10],
            weights: vec![0.0; 10],
            bias,
        };
        let name = format!("{}_baseline_{}.json", key, timestamp);
        fs::write(dir.join(name), serde_json::to_string(&model).unwrap()).unwrap();
    }

    fn samba_ideal() -> FeatureVector {
        let mut f = FeatureVector::fallback();
        f.energy = 0.7;
        f.bpm = 105.0;
        f.loudness = -6.0;
        f.brightness = 2000.0;
        f.danceability = 0.7;
        f.dynamic_variation = 0.2;
        f
    }

    #[test]
    fn test_heuristic_genre_never_consults_the_classifier() {
        // Nonexistent directory: a model lookup would degrade, but a
        // heuristic-mode genre must not even attempt one.
        let predictor = HitPredictor::with_models_dir("/nonexistent/models");
        let mut f = FeatureVector::fallback();
        f.bpm = 124.0;
        f.energy = 0.7;
        f.danceability = 0.82;
        f.loudness = -6.0;
        f.duration = 200.0;
        f.brightness = 2500.0;
        f.dynamic_variation = 0.2;

        let p = predictor.predict(GenreId::Generic, &f);
        assert_eq!(p.method, PredictionMethod::Heuristic);
        assert_eq!(p.score, 100);
        assert!(p.ml.is_none());
        assert!(p.subcategory.is_none());
        assert!(!p.individual_scores.is_empty());
    }

    #[test]
    fn test_blend_genre_degrades_without_models() {
        let predictor = HitPredictor::with_models_dir("/nonexistent/models");
        let p = predictor.predict(GenreId::Samba, &samba_ideal());
        assert_eq!(p.method, PredictionMethod::Heuristic);
        assert_eq!(p.score, 100);
        assert!(p.ml.is_none());
    }

    #[test]
    fn test_blend_genre_uses_the_latest_model() {
        let dir = temp_models_dir();
        // The older blob predicts ~0, the newer exactly 0.5; seeing
        // 50% proves lexicographic recency selection.
        write_model(&dir, "samba", "20230101000000", -30.0);
        write_model(&dir, "samba", "20240301000000", 0.0);

        let predictor = HitPredictor::with_models_dir(&dir);
        let p = predictor.predict(GenreId::Samba, &samba_ideal());

        let ml = p.ml.expect("classifier output");
        assert_eq!(ml.probability, 50.0);
        assert!(ml.is_hit);
        assert_eq!(ml.heuristic_score, 100);
        // 50 boosted halfway toward the heuristic 100.
        assert_eq!(p.score, 75);
        assert_eq!(p.method, PredictionMethod::Ml);
    }

    #[test]
    fn test_subcategory_model_outranks_the_parent() {
        let dir = temp_models_dir();
        write_model(&dir, "rnb_brasil", "20240301000000", 30.0);
        write_model(&dir, "rnb_trap", "20240301000000", 0.0);

        let mut f = FeatureVector::fallback();
        f.bpm = 90.0;
        f.speechiness = 0.25;
        f.energy = 0.75;
        f.danceability = 0.65;
        f.acousticness = 0.3;
        f.loudness = -5.0;

        let predictor = HitPredictor::with_models_dir(&dir);
        let p = predictor.predict(GenreId::RnbBrasil, &f);

        assert_eq!(p.subcategory, Some(Subgenre::RnbTrap));
        // 50% can only have come from the subcategory blob.
        assert_eq!(p.ml.as_ref().map(|m| m.probability), Some(50.0));
        assert_eq!(p.method, PredictionMethod::Ml);
    }

    #[test]
    fn test_malformed_subcategory_blob_falls_back_to_the_parent() {
        let dir = temp_models_dir();
        fs::write(dir.join("rnb_trap_baseline_20240301000000.json"), "{not json").unwrap();
        write_model(&dir, "rnb_brasil", "20240301000000", 0.0);

        let mut f = FeatureVector::fallback();
        f.bpm = 90.0;
        f.speechiness = 0.25;
        f.energy = 0.75;
        f.danceability = 0.65;
        f.acousticness = 0.3;

        let predictor = HitPredictor::with_models_dir(&dir);
        let p = predictor.predict(GenreId::RnbBrasil, &f);

        assert_eq!(p.subcategory, Some(Subgenre::RnbTrap));
        assert_eq!(p.ml.as_ref().map(|m| m.probability), Some(50.0));
    }

    #[test]
    fn test_indie_subcategory_blends_as_ensemble() {
        let dir = temp_models_dir();
        write_model(&dir, "mpb_indie", "20240301000000", 0.0);

        let mut f = FeatureVector::fallback();
        f.acousticness = 0.55;
        f.valence = 0.5;
        f.bpm = 112.0;
        f.energy = 0.5;
        f.speechiness = 0.05;
        f.loudness = -10.0;
        f.dynamic_variation = 0.15;

        let predictor = HitPredictor::with_models_dir(&dir);
        let p = predictor.predict(GenreId::Mpb, &f);

        assert_eq!(p.subcategory, Some(Subgenre::MpbIndie));
        assert_eq!(p.method, PredictionMethod::Ensemble);
        // 0.4 * 50 + 0.6 * 100.
        assert_eq!(p.score, 80);
        assert_eq!(p.ml.as_ref().map(|m| m.heuristic_score), Some(100));
    }
}
