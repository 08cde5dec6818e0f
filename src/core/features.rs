// src/core/features.rs
//
// The fixed feature schema shared by extraction, scoring, and the
// classifiers. Every analysis produces exactly this set of values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Feature names in the exact order classifier inputs are assembled.
pub const ML_FEATURE_NAMES: [&str; 10] = [
    "bpm",
    "energy",
    "danceability",
    "valence",
    "acousticness",
    "instrumentalness",
    "liveness",
    "speechiness",
    "loudness",
    "duration_ms",
];

/// Identifies one scalar feature, for profile ranges and subgenre rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Bpm,
    Energy,
    EnergyVariance,
    Danceability,
    Valence,
    Acousticness,
    Instrumentalness,
    Liveness,
    Speechiness,
    Loudness,
    Brightness,
    #[serde(rename = "spectral_rolloff")]
    Rolloff,
    #[serde(rename = "spectral_bandwidth")]
    Bandwidth,
    #[serde(rename = "zero_crossing_rate")]
    Zcr,
    DynamicVariation,
    PitchIrregularity,
    Duration,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::Bpm => "bpm",
            Feature::Energy => "energy",
            Feature::EnergyVariance => "energy_variance",
            Feature::Danceability => "danceability",
            Feature::Valence => "valence",
            Feature::Acousticness => "acousticness",
            Feature::Instrumentalness => "instrumentalness",
            Feature::Liveness => "liveness",
            Feature::Speechiness => "speechiness",
            Feature::Loudness => "loudness",
            Feature::Brightness => "brightness",
            Feature::Rolloff => "spectral_rolloff",
            Feature::Bandwidth => "spectral_bandwidth",
            Feature::Zcr => "zero_crossing_rate",
            Feature::DynamicVariation => "dynamic_variation",
            Feature::PitchIrregularity => "pitch_irregularity",
            Feature::Duration => "duration",
        };
        f.write_str(name)
    }
}

/// Complete feature set for one track.
///
/// Values are pre-populated with neutral fallbacks so a failed
/// extraction stage degrades a score instead of aborting the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Estimated tempo in BPM, clamped to [60, 200].
    pub bpm: f64,
    /// Calibrated overall energy in [0.1, 0.98].
    pub energy: f64,
    /// Variance of block RMS energies across the window.
    pub energy_variance: f64,
    /// Danceability proxy in [0.1, 0.98].
    pub danceability: f64,
    /// Musical positivity proxy in [0, 1].
    pub valence: f64,
    /// Inverse of energy and brightness, in [0, 1].
    pub acousticness: f64,
    /// Vocal-absence proxy in [0, 0.95].
    pub instrumentalness: f64,
    /// Fixed placeholder, no live-audience detection is attempted.
    pub liveness: f64,
    /// Spoken-content proxy in [0.03, 0.66].
    pub speechiness: f64,
    /// Estimated integrated loudness in dBFS, [-60, 0].
    pub loudness: f64,
    /// Spectral centroid in Hz.
    pub brightness: f64,
    /// 85th-percentile spectral rolloff in Hz.
    #[serde(rename = "spectral_rolloff")]
    pub rolloff: f64,
    /// Spectral bandwidth around the centroid in Hz.
    #[serde(rename = "spectral_bandwidth")]
    pub bandwidth: f64,
    /// Zero-crossing rate per sample.
    #[serde(rename = "zero_crossing_rate")]
    pub zcr: f64,
    /// Standard deviation of absolute amplitude.
    pub dynamic_variation: f64,
    /// Melodic instability score in [0, 1].
    pub pitch_irregularity: f64,
    /// Log-energy summary of the five lowest timbre bands.
    pub timbre: [f64; 5],
    /// Full-track duration in seconds.
    pub duration: f64,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::fallback()
    }
}

impl FeatureVector {
    /// Neutral values used when an extraction stage fails.
    pub fn fallback() -> Self {
        Self {
            bpm: 120.0,
            energy: 0.5,
            energy_variance: 0.0,
            danceability: 0.5,
            valence: 0.5,
            acousticness: 0.5,
            instrumentalness: 0.0,
            liveness: 0.1,
            speechiness: 0.05,
            loudness: -12.0,
            brightness: 1000.0,
            rolloff: 2000.0,
            bandwidth: 1500.0,
            zcr: 0.0,
            dynamic_variation: 0.0,
            pitch_irregularity: 0.0,
            timbre: [0.0; 5],
            duration: 0.0,
        }
    }

    /// Scalar lookup used by profile ranges and subgenre rules.
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Bpm => self.bpm,
            Feature::Energy => self.energy,
            Feature::EnergyVariance => self.energy_variance,
            Feature::Danceability => self.danceability,
            Feature::Valence => self.valence,
            Feature::Acousticness => self.acousticness,
            Feature::Instrumentalness => self.instrumentalness,
            Feature::Liveness => self.liveness,
            Feature::Speechiness => self.speechiness,
            Feature::Loudness => self.loudness,
            Feature::Brightness => self.brightness,
            Feature::Rolloff => self.rolloff,
            Feature::Bandwidth => self.bandwidth,
            Feature::Zcr => self.zcr,
            Feature::DynamicVariation => self.dynamic_variation,
            Feature::PitchIrregularity => self.pitch_irregularity,
            Feature::Duration => self.duration,
        }
    }

    /// Classifier inputs in the [`ML_FEATURE_NAMES`] order.
    pub fn ml_inputs(&self) -> [f64; 10] {
        [
            self.bpm,
            self.energy,
            self.danceability,
            self.valence,
            self.acousticness,
            self.instrumentalness,
            self.liveness,
            self.speechiness,
            self.loudness,
            self.duration * 1000.0,
        ]
    }
}
