// src/core/analyzer.rs
//
// The feature extraction pipeline. Runs every analyzer over one
// decoded window and assembles the complete FeatureVector, falling
// back to neutral values for any stage that cannot produce one.

use log::warn;

use super::analysis::{self, PitchAnalyzer, SpectralAnalyzer, SpeechCues, TempoEstimator};
use super::dsp::stats;
use super::features::FeatureVector;
use super::loader::Waveform;

/// Block count for the energy-variance statistic.
const ENERGY_BLOCKS: usize = 100;

/// Extracts the full feature set from a decoded window.
///
/// Construction plans the FFTs once; `analyze` borrows immutably, so
/// one extractor can serve a parallel batch.
pub struct FeatureExtractor {
    spectral: SpectralAnalyzer,
    tempo: TempoEstimator,
    pitch: PitchAnalyzer,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self {
            spectral: SpectralAnalyzer::new(),
            tempo: TempoEstimator::new(),
            pitch: PitchAnalyzer::new(),
        }
    }

    /// Run the full pipeline.
    ///
    /// Stage order matters: danceability reads the raw RMS energy,
    /// everything after calibration reads the calibrated value.
    pub fn analyze(&self, wave: &Waveform) -> FeatureVector {
        let samples = wave.samples();
        let rate = wave.sample_rate();

        let mut features = FeatureVector::fallback();
        features.duration = wave.duration();

        features.bpm = self.tempo.estimate(samples, rate);

        let raw_energy = stats::rms(samples);
        features.energy = raw_energy;
        features.loudness = loudness_db(raw_energy);
        features.energy_variance = energy_variance(samples);

        match self.spectral.analyze(samples, rate) {
            Ok(summary) => {
                features.brightness = summary.brightness;
                features.rolloff = summary.rolloff;
                features.bandwidth = summary.bandwidth;
                features.timbre = summary.timbre;
            }
            Err(e) => warn!("{}; keeping spectral fallbacks", e),
        }

        features.zcr = zero_crossing_rate(samples);
        features.dynamic_variation = dynamic_variation(samples);
        features.pitch_irregularity = self.pitch.irregularity(samples, rate);

        features.danceability = analysis::danceability(features.bpm, raw_energy);

        features.energy =
            analysis::calibrated_energy(raw_energy, features.brightness, features.loudness);

        features.valence = analysis::valence(features.bpm, features.energy, features.brightness);
        features.acousticness = analysis::acousticness(features.energy, features.brightness);
        features.instrumentalness = analysis::instrumentalness(features.zcr, features.energy);
        features.liveness = analysis::LIVENESS;
        features.speechiness = analysis::speechiness(&SpeechCues {
            pitch_irregularity: features.pitch_irregularity,
            zcr: features.zcr,
            brightness: features.brightness,
            dynamic_variation: features.dynamic_variation,
            bandwidth: features.bandwidth,
            energy: features.energy,
        });

        features
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Estimated loudness in dBFS, clamped to [-60, 0].
///
/// The +2.5 dB offset compensates for the RMS-vs-program-loudness gap
/// on typical mastered material.
fn loudness_db(rms: f64) -> f64 {
    let db = if rms > 0.0 { 20.0 * rms.log10() } else { -80.0 };
    (db + 2.5).clamp(-60.0, 0.0)
}

/// Variance of block RMS energies over 100 near-equal blocks.
fn energy_variance(samples: &[f32]) -> f64 {
    if samples.len() < ENERGY_BLOCKS {
        return 0.0;
    }

    let sizes = stats::split_sizes(samples.len(), ENERGY_BLOCKS);
    let mut energies = Vec::with_capacity(ENERGY_BLOCKS);
    let mut start = 0;
    for size in sizes {
        energies.push(stats::rms(&samples[start..start + size]));
        start += size;
    }
    stats::variance(&energies)
}

/// Sign changes per sample, halved per the usual convention.
fn zero_crossing_rate(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    stats::sign_changes(samples) as f64 / (2.0 * samples.len() as f64)
}

/// Standard deviation of the absolute amplitude.
fn dynamic_variation(samples: &[f32]) -> f64 {
    let magnitudes: Vec<f64> = samples.iter().map(|s| s.abs() as f64).collect();
    stats::std_dev(&magnitudes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 11025;

    fn sine(freq: f32, secs: f32, amp: f32) -> Vec<f32> {
        let n = (SR as f32 * secs) as usize;
        (0..n)
            .map(|i| amp * (2.0 * std::f32::consts::PI * freq * i as f32 / SR as f32).sin())
            .collect()
    }

    #[test]
    fn test_loudness_db_mapping() {
        assert_eq!(loudness_db(1.0), 0.0);
        assert!((loudness_db(10f64.powf(-1.5)) - -27.5).abs() < 1e-9);
        assert_eq!(loudness_db(0.0), -60.0);
    }

    #[test]
    fn test_zero_crossing_rate_alternating() {
        let samples: Vec<f32> = (0..100).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        assert!((zero_crossing_rate(&samples) - 0.495).abs() < 1e-9);
    }

    #[test]
    fn test_energy_variance_flat_vs_gated() {
        let flat = sine(220.0, 3.0, 0.5);
        let mut gated = flat.clone();
        let half = gated.len() / 2;
        for s in &mut gated[half..] {
            *s *= 0.05;
        }
        assert!(energy_variance(&gated) > energy_variance(&flat) + 1e-4);
    }

    #[test]
    fn test_pipeline_outputs_stay_in_range() {
        let wave = Waveform::from_samples(sine(220.0, 3.0, 0.5), SR).unwrap();
        let f = FeatureExtractor::new().analyze(&wave);

        assert!((60.0..=200.0).contains(&f.bpm));
        assert!((0.1..=0.98).contains(&f.energy));
        assert!((-60.0..=0.0).contains(&f.loudness));
        assert!((0.1..=0.98).contains(&f.danceability));
        assert!((0.0..=1.0).contains(&f.valence));
        assert!((0.0..=1.0).contains(&f.acousticness));
        assert!((0.0..=0.95).contains(&f.instrumentalness));
        assert!((0.03..=0.66).contains(&f.speechiness));
        assert_eq!(f.liveness, 0.1);
        assert!((f.duration - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_silent_window_degrades_gracefully() {
        let wave = Waveform::from_samples(vec![0.0; SR as usize * 2], SR).unwrap();
        let f = FeatureExtractor::new().analyze(&wave);

        assert_eq!(f.loudness, -60.0);
        assert_eq!(f.zcr, 0.0);
        assert_eq!(f.dynamic_variation, 0.0);
        assert_eq!(f.pitch_irregularity, 0.0);
        // Calibration floors the energy even with no signal.
        assert_eq!(f.energy, 0.1);
    }
}
