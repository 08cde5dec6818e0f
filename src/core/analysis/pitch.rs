// src/core/analysis/pitch.rs
//
// Melodic-instability scoring. A frame-wise autocorrelation pitch
// tracker over the vocal range feeds three instability statistics:
// pitch spread, octave-scale jumps, and the unvoiced share.

use crate::core::dsp::stats::{autocorrelation, mean, rms, std_dev};

use super::spectral::{FRAME_SIZE, HOP_SIZE};

/// Trackable pitch range in Hz.
const MIN_PITCH_HZ: f64 = 65.0;
const MAX_PITCH_HZ: f64 = 2100.0;

/// A frame is voiced when its normalized autocorrelation peak clears
/// this and the frame carries audible energy.
const VOICING_THRESHOLD: f32 = 0.30;
const MIN_FRAME_RMS: f64 = 0.01;

/// Below this many voiced frames no irregularity is reported.
const MIN_VOICED_FRAMES: usize = 10;

/// Pitch steps larger than this count as jumps.
const JUMP_HZ: f64 = 50.0;

/// Scores how unstable the tracked melodic line is.
pub struct PitchAnalyzer {
    frame_size: usize,
    hop_size: usize,
}

impl PitchAnalyzer {
    pub fn new() -> Self {
        Self {
            frame_size: FRAME_SIZE,
            hop_size: HOP_SIZE,
        }
    }

    /// Irregularity in [0, 1]; 0.0 for windows with too little voiced
    /// content to judge.
    pub fn irregularity(&self, samples: &[f32], sample_rate: u32) -> f64 {
        let rate = sample_rate as f64;
        let min_lag = ((rate / MAX_PITCH_HZ).ceil() as usize).max(2);
        let max_lag = (rate / MIN_PITCH_HZ) as usize;
        if min_lag >= max_lag {
            return 0.0;
        }

        let mut pitches: Vec<f64> = Vec::new();
        let mut total_frames = 0usize;

        let mut start = 0;
        while start + self.frame_size <= samples.len() {
            let frame = &samples[start..start + self.frame_size];
            total_frames += 1;
            start += self.hop_size;

            if rms(frame) < MIN_FRAME_RMS {
                continue;
            }

            let acf = autocorrelation(frame, max_lag);
            if acf.len() <= min_lag {
                continue;
            }

            let mut best_lag = min_lag;
            let mut best_value = f32::MIN;
            for (lag, &value) in acf.iter().enumerate().skip(min_lag) {
                if value > best_value {
                    best_value = value;
                    best_lag = lag;
                }
            }

            if best_value >= VOICING_THRESHOLD {
                pitches.push(rate / best_lag as f64);
            }
        }

        if pitches.len() < MIN_VOICED_FRAMES || total_frames == 0 {
            return 0.0;
        }

        let pitch_mean = mean(&pitches);
        let cv = std_dev(&pitches) / pitch_mean;

        let jumps = pitches
            .windows(2)
            .filter(|w| (w[1] - w[0]).abs() > JUMP_HZ)
            .count();
        let jump_ratio = jumps as f64 / (pitches.len() - 1) as f64;

        let voiced_ratio = pitches.len() as f64 / total_frames as f64;

        let mut score = 0.0;
        if cv > 0.15 {
            score += ((cv - 0.15) / 0.15).min(1.0) * 0.5;
        }
        if jump_ratio > 0.1 {
            score += ((jump_ratio - 0.1) / 0.2).min(1.0) * 0.3;
        }
        if voiced_ratio < 0.6 {
            score += (0.6 - voiced_ratio) / 0.6 * 0.2;
        }

        score.min(1.0)
    }
}

impl Default for PitchAnalyzer {
    fn default() -> Self {
        Self::new()
    }
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
    fn test_steady_tone_is_regular() {
        let analyzer = PitchAnalyzer::new();
        let score = analyzer.irregularity(&sine(220.0, 3.0, 0.5), SR);
        assert!(score < 0.05, "steady tone scored {}", score);
    }

    #[test]
    fn test_alternating_pitches_are_irregular() {
        let analyzer = PitchAnalyzer::new();
        let mut samples = Vec::new();
        for i in 0..12 {
            let freq = if i % 2 == 0 { 220.0 } else { 440.0 };
            samples.extend(sine(freq, 0.25, 0.5));
        }
        let score = analyzer.irregularity(&samples, SR);
        assert!(score > 0.3, "alternating pitches scored {}", score);
    }

    #[test]
    fn test_silence_scores_zero() {
        let analyzer = PitchAnalyzer::new();
        assert_eq!(analyzer.irregularity(&vec![0.0; SR as usize * 2], SR), 0.0);
    }

    #[test]
    fn test_quiet_signal_is_unvoiced() {
        let analyzer = PitchAnalyzer::new();
        assert_eq!(analyzer.irregularity(&sine(220.0, 2.0, 0.005), SR), 0.0);
    }

    #[test]
    fn test_too_short_window_scores_zero() {
        let analyzer = PitchAnalyzer::new();
        assert_eq!(analyzer.irregularity(&sine(220.0, 0.1, 0.5), SR), 0.0);
    }
}
