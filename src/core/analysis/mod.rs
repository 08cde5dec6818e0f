//! Feature extraction algorithms
//!
//! Contains the per-feature analyzers:
//! - Tempo estimation (onset flux autocorrelation)
//! - Spectral shape (brightness, rolloff, bandwidth, timbre bands)
//! - Pitch irregularity (melodic instability)
//! - Perceptual proxies (danceability, valence, speechiness, ...)
//! - Energy calibration

mod calibration;
mod perceptual;
mod pitch;
mod spectral;
mod tempo;

// Re-export all analysis modules
pub use calibration::calibrated_energy;
pub use perceptual::{
    acousticness, danceability, instrumentalness, speechiness, valence, SpeechCues, LIVENESS,
};
pub use pitch::PitchAnalyzer;
pub use spectral::{SpectralAnalyzer, SpectralSummary, FRAME_SIZE, HOP_SIZE};
pub use tempo::{TempoEstimator, FALLBACK_BPM};
