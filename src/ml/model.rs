// src/ml/model.rs
//
// Trained classifier blobs: standardized logistic regression stored as
// JSON. Inputs are standardized with the stored means and scales, so
// the blob is self-contained and needs no runtime fit state.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::ML_FEATURE_NAMES;
use crate::error::ClassifierError;

/// A standardized logistic regression over the fixed feature order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Genre or subcategory the model was trained for.
    pub genre: String,
    /// Training variant label.
    pub variant: String,
    /// Training timestamp, informational.
    pub trained_at: String,
    /// Input feature names, must match the canonical order exactly.
    pub features: Vec<String>,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LogisticModel {
    /// Read and validate a model blob.
    pub fn from_path(path: &Path) -> Result<Self, ClassifierError> {
        let text = fs::read_to_string(path).map_err(|source| ClassifierError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self =
            serde_json::from_str(&text).map_err(|e| ClassifierError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        model.validate(path)?;
        Ok(model)
    }

    fn validate(&self, path: &Path) -> Result<(), ClassifierError> {
        let malformed = |reason: String| ClassifierError::Malformed {
            path: path.to_path_buf(),
            reason,
        };

        if self.features.len() != ML_FEATURE_NAMES.len()
            || !self
                .features
                .iter()
                .map(String::as_str)
                .eq(ML_FEATURE_NAMES)
        {
            return Err(malformed(format!(
                "feature list {:?} does not match the expected order",
                self.features
            )));
        }

        for (name, len) in [
            ("means", self.means.len()),
            ("scales", self.scales.len()),
            ("weights", self.weights.len()),
        ] {
            if len != ML_FEATURE_NAMES.len() {
                return Err(malformed(format!(
                    "{} has {} entries, expected {}",
                    name,
                    len,
                    ML_FEATURE_NAMES.len()
                )));
            }
        }

        if self.scales.iter().any(|s| s.abs() < 1e-12) {
            return Err(malformed("a feature scale is zero".to_string()));
        }

        let params = self
            .means
            .iter()
            .chain(&self.scales)
            .chain(&self.weights)
            .chain(std::iter::once(&self.bias));
        if params.into_iter().any(|v| !v.is_finite()) {
            return Err(malformed("non-finite model parameter".to_string()));
        }

        Ok(())
    }

    /// Hit probability for inputs in the canonical feature order.
    pub fn probability(&self, inputs: &[f64; 10]) -> Result<f64, ClassifierError> {
        let mut z = self.bias;
        for i in 0..inputs.len() {
            z += self.weights[i] * (inputs[i] - self.means[i]) / self.scales[i];
        }

        let p = sigmoid(z);
        if p.is_finite() {
            Ok(p)
        } else {
            Err(ClassifierError::NonFinite)
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_model() -> LogisticModel {
        LogisticModel {
            genre: "samba".to_string(),
            variant: "baseline".to_string(),
            trained_at: "20240301120000".to_string(),
            features: ML_FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            means: vec![110.0, 0.6, 0.7, 0.5, 0.4, 0.2, 0.1, 0.1, -7.0, 200_000.0],
            scales: vec![25.0, 0.2, 0.15, 0.2, 0.25, 0.3, 0.05, 0.1, 3.0, 60_000.0],
            weights: vec![0.4, 1.2, 0.9, 0.3, -0.2, -0.5, 0.0, 0.1, 0.6, -0.3],
            bias: 0.2,
        }
    }

    #[test]
    fn test_probability_at_the_means_is_the_bias() {
        let model = test_model();
        let means: [f64; 10] = model.means.clone().try_into().unwrap();
        let p = model.probability(&means).unwrap();
        assert!((p - sigmoid(0.2)).abs() < 1e-12);
    }

    #[test]
    fn test_probability_is_monotone_in_a_positive_weight() {
        let model = test_model();
        let mut low = [0.0; 10];
        low.copy_from_slice(&model.means);
        let mut high = low;
        // Energy carries weight 1.2.
        high[1] += 0.2;
        assert!(model.probability(&high).unwrap() > model.probability(&low).unwrap());
    }

    #[test]
    fn test_validation_rejects_shuffled_features() {
        let mut model = test_model();
        model.features.swap(0, 1);
        assert!(model.validate(Path::new("x.json")).is_err());
    }

    #[test]
    fn test_validation_rejects_zero_scale() {
        let mut model = test_model();
        model.scales[3] = 0.0;
        assert!(model.validate(Path::new("x.json")).is_err());
    }

    #[test]
    fn test_validation_rejects_nan_weight() {
        let mut model = test_model();
        model.weights[0] = f64::NAN;
        assert!(model.validate(Path::new("x.json")).is_err());
    }

    #[test]
    fn test_validation_rejects_short_vectors() {
        let mut model = test_model();
        model.weights.pop();
        assert!(model.validate(Path::new("x.json")).is_err());
    }

    #[test]
    fn test_sigmoid_saturates_cleanly() {
        assert!(sigmoid(1000.0) > 0.999);
        assert!(sigmoid(-1000.0) < 0.001);
        assert!(sigmoid(-1000.0).is_finite());
    }
}
