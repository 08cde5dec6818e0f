// src/error.rs
//
// Error taxonomy for the analysis pipeline. Only waveform loading is fatal;
// extractor and classifier failures degrade the result instead of aborting.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal loading failures. No partial waveform is ever returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognized or corrupt container")]
    Probe(#[source] symphonia::core::errors::Error),

    #[error("no decodable audio track found")]
    NoAudioTrack,

    #[error("stream parameters do not specify a sample rate")]
    NoSampleRate,

    #[error("file reports zero audio channels")]
    NoChannels,

    #[error("no decoder available for the audio codec")]
    UnsupportedCodec(#[source] symphonia::core::errors::Error),

    #[error("decode failed")]
    Decode(#[source] symphonia::core::errors::Error),

    #[error("analysis window contained no samples")]
    EmptyWindow,
}

/// A single feature extractor failed. The pipeline substitutes the
/// extractor's documented fallback value and continues; this never
/// surfaces to callers.
#[derive(Debug, Error)]
#[error("{stage}: {reason}")]
pub struct ExtractorFailure {
    pub stage: &'static str,
    pub reason: String,
}

impl ExtractorFailure {
    pub fn new(stage: &'static str, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

/// The classifier could not be loaded or used. Prediction downgrades to
/// the heuristic method instead of failing.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("no models directory available")]
    NoModelsDir,

    #[error("no model found for genre '{0}'")]
    NotFound(String),

    #[error("failed to read model {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("model emitted a non-finite probability")]
    NonFinite,
}
