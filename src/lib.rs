//! hitscore - Score the hit potential of songs from raw audio
//!
//! Decodes a track, extracts an interpretable feature set with plain DSP,
//! and scores it against genre-specific hit profiles, optionally blended
//! with trained logistic classifiers.
//!
//! ## Features
//!
//! - **Two-stage pipeline**: feature extraction first, genre-aware scoring second
//! - **Interpretable features**: BPM, energy, brightness, danceability, valence, speechiness, etc.
//! - **Genre profiles**: weighted ideal ranges for Brazilian genres plus a generic pop profile
//! - **Subcategory detection**: rule-based R&B and MPB subgenre refinement
//! - **Classifier blending**: per-genre logistic models with a safety boost and an ensemble path
//! - **Batch CLI**: parallel directory scans with text or JSON reports
//!
//! ## Module Structure
//!
//! - `core` - Decoding, DSP utilities, and feature extraction
//! - `config` - Genre profiles and subcategory rules
//! - `scoring` - Heuristic scoring, classifier blending, reports
//! - `ml` - Trained model loading and caching
//! - `cli` - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hitscore::{analyze_file, GenreId};
//!
//! let report = analyze_file(Path::new("track.mp3"), GenreId::Samba, None)?;
//! println!("{}: {}/100", report.file, report.prediction.score);
//! ```
//!
//! ## Genre Profiles
//!
//! | Genre      | Weighted emphasis                 | Scoring          |
//! |------------|-----------------------------------|------------------|
//! | generic    | Danceability, energy, tempo       | Heuristic only   |
//! | sertanejo  | Energy, loudness                  | Classifier blend |
//! | samba      | Energy, tempo                     | Classifier blend |
//! | pagode     | Danceability, tempo, acousticness | Classifier blend |
//! | forro      | Tempo, danceability               | Classifier blend |
//! | mpb        | Acousticness, valence             | Classifier blend |
//! | rnb_brasil | Energy, danceability, speechiness | Classifier blend |
//! | brazil     | Energy, danceability, loudness    | Classifier blend |

use chrono::Utc;
use std::path::Path;

// Command-line interface
pub mod cli;

// Genre profiles and subcategory rules
pub mod config;

// Decoding and feature extraction
pub mod core;

// Error taxonomy
pub mod error;

// Trained classifier support
pub mod ml;

// Scoring and reports
pub mod scoring;

// Re-export commonly used types at crate root for convenience
pub use config::{GenreId, GenreProfile, Subgenre};
pub use core::{Feature, FeatureExtractor, FeatureVector, Waveform};
pub use error::LoadError;
pub use scoring::{AnalysisReport, HitPredictor, Prediction, PredictionMethod};

/// Analyze one file end to end: decode, extract features, score.
///
/// `models_dir` overrides the classifier blob location; pass `None` to
/// use the `HITSCORE_MODELS_DIR` environment variable or the platform
/// data directory.
pub fn analyze_file(
    path: &Path,
    genre: GenreId,
    models_dir: Option<&Path>,
) -> Result<AnalysisReport, LoadError> {
    let waveform = Waveform::load(path)?;
    let features = FeatureExtractor::new().analyze(&waveform);

    let predictor = match models_dir {
        Some(dir) => HitPredictor::with_models_dir(dir),
        None => HitPredictor::new(),
    };
    let prediction = predictor.predict(genre, &features);

    Ok(AnalysisReport {
        file: path.display().to_string(),
        analyzed_at: Utc::now(),
        features,
        prediction,
    })
}
