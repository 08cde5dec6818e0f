//! Core decoding and feature extraction modules

pub mod analysis;
pub mod analyzer;
pub mod dsp;
pub mod features;
pub mod loader;

pub use analyzer::FeatureExtractor;
pub use features::{Feature, FeatureVector, ML_FEATURE_NAMES};
pub use loader::Waveform;
