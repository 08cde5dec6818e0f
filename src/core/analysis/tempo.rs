// src/core/analysis/tempo.rs
//
// Tempo estimation from the onset-strength envelope: half-wave
// rectified spectral flux, autocorrelated over the 30-200 BPM lag
// range, with octave correction of the winning lag.

use log::debug;
use num_complex::Complex;
use realfft::RealFftPlanner;

use crate::core::dsp::FftProcessor;

use super::spectral::{FRAME_SIZE, HOP_SIZE};

/// Returned whenever the window is too short or carries no onsets.
pub const FALLBACK_BPM: f64 = 120.0;

/// Fewer samples than this cannot support a tempo estimate.
const MIN_SAMPLES: usize = 1000;

/// Lag search covers this BPM span; the final estimate is clamped
/// tighter, after octave correction.
const SEARCH_MIN_BPM: f64 = 30.0;
const SEARCH_MAX_BPM: f64 = 200.0;

const CLAMP_MIN_BPM: f64 = 60.0;
const CLAMP_MAX_BPM: f64 = 200.0;

/// Estimates tempo from onset periodicity.
pub struct TempoEstimator {
    fft: FftProcessor,
    hop_size: usize,
}

impl TempoEstimator {
    pub fn new() -> Self {
        Self {
            fft: FftProcessor::new(FRAME_SIZE),
            hop_size: HOP_SIZE,
        }
    }

    /// Estimate the tempo of `samples` in BPM, rounded to one decimal.
    ///
    /// Never fails: inputs that defeat the estimator produce
    /// [`FALLBACK_BPM`].
    pub fn estimate(&self, samples: &[f32], sample_rate: u32) -> f64 {
        if samples.len() < MIN_SAMPLES {
            debug!("tempo: window too short ({} samples)", samples.len());
            return FALLBACK_BPM;
        }

        let envelope = self.onset_envelope(samples);

        let hop = self.hop_size as f64;
        let rate = sample_rate as f64;
        let min_lag = (60.0 * rate / (SEARCH_MAX_BPM * hop)) as usize;
        let max_lag = ((60.0 * rate / (SEARCH_MIN_BPM * hop)) as usize).min(envelope.len());

        if min_lag == 0 || min_lag >= max_lag {
            debug!("tempo: envelope of {} frames too short for lag search", envelope.len());
            return FALLBACK_BPM;
        }

        let acf = match fft_autocorrelation(&envelope) {
            Some(acf) => acf,
            None => return FALLBACK_BPM,
        };

        // First maximum wins on ties, favoring the shorter lag.
        let mut best_lag = min_lag;
        let mut best_value = f32::MIN;
        for (lag, &value) in acf.iter().enumerate().take(max_lag).skip(min_lag) {
            if value > best_value {
                best_value = value;
                best_lag = lag;
            }
        }

        if best_value <= 0.0 {
            debug!("tempo: no onset periodicity found");
            return FALLBACK_BPM;
        }

        let bpm = 60.0 * rate / (best_lag as f64 * hop);
        let corrected = correct_octave(bpm).clamp(CLAMP_MIN_BPM, CLAMP_MAX_BPM);
        (corrected * 10.0).round() / 10.0
    }

    /// Half-wave rectified spectral flux, normalized to a peak of 1.
    ///
    /// The first frame has no predecessor and contributes zero.
    fn onset_envelope(&self, samples: &[f32]) -> Vec<f32> {
        let frame_size = self.fft.fft_size();
        if samples.len() < frame_size {
            return Vec::new();
        }

        let mut envelope = Vec::new();
        let mut previous: Option<Vec<f32>> = None;
        let mut start = 0;
        while start + frame_size <= samples.len() {
            let spectrum = self.fft.magnitude_spectrum(&samples[start..start + frame_size]);
            let flux = match previous {
                Some(ref prev) => spectrum
                    .iter()
                    .zip(prev.iter())
                    .map(|(&m, &p)| (m - p).max(0.0))
                    .sum(),
                None => 0.0,
            };
            envelope.push(flux);
            previous = Some(spectrum);
            start += self.hop_size;
        }

        let peak = envelope.iter().copied().fold(0.0f32, f32::max);
        if peak > 0.0 {
            for v in &mut envelope {
                *v /= peak;
            }
        }
        envelope
    }
}

impl Default for TempoEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve half/double-time confusions around the raw lag estimate.
fn correct_octave(bpm: f64) -> f64 {
    let mut bpm = bpm;
    if bpm < 70.0 {
        bpm *= 2.0;
    } else if bpm > 180.0 {
        bpm /= 2.0;
    }

    // Mid-range estimates often track the half-time feel; prefer the
    // doubled tempo when it lands in the common dance range.
    if (70.0..=90.0).contains(&bpm) {
        let doubled = bpm * 2.0;
        if (100.0..=170.0).contains(&doubled) {
            bpm = doubled;
        }
    }
    bpm
}

/// Unnormalized autocorrelation via IRFFT(|RFFT|^2), zero-padded to
/// the next power of two at least twice the input length.
fn fft_autocorrelation(signal: &[f32]) -> Option<Vec<f32>> {
    let n = signal.len();
    if n == 0 {
        return None;
    }

    let size = (2 * n).next_power_of_two();
    let mut planner = RealFftPlanner::<f32>::new();
    let forward = planner.plan_fft_forward(size);
    let inverse = planner.plan_fft_inverse(size);

    let mut padded = vec![0.0f32; size];
    padded[..n].copy_from_slice(signal);

    let mut spectrum = forward.make_output_vec();
    forward.process(&mut padded, &mut spectrum).ok()?;

    for c in spectrum.iter_mut() {
        *c = Complex::new(c.norm_sqr(), 0.0);
    }

    let mut acf = inverse.make_output_vec();
    inverse.process(&mut spectrum, &mut acf).ok()?;
    acf.truncate(n);
    Some(acf)
}
