// src/core/analysis/spectral.rs
//
// Frame-averaged spectral shape of the analysis window: centroid
// (brightness), 85% rolloff, bandwidth, and banded log-power timbre
// summaries. All statistics average over a 2048/512 Hann STFT.

use crate::core::dsp::stats::split_sizes;
use crate::core::dsp::FftProcessor;
use crate::error::ExtractorFailure;

/// STFT frame length shared by the spectral extractors.
pub const FRAME_SIZE: usize = 2048;

/// Hop between consecutive STFT frames.
pub const HOP_SIZE: usize = 512;

/// Number of linear timbre bands the spectrum is split into.
const TIMBRE_BANDS: usize = 13;

/// How many of the low timbre bands are reported.
const TIMBRE_KEPT: usize = 5;

/// Fraction of cumulative magnitude that defines the rolloff point.
const ROLLOFF_FRACTION: f64 = 0.85;

/// Spectral shape summary of one analysis window.
#[derive(Debug, Clone)]
pub struct SpectralSummary {
    /// Mean spectral centroid in Hz.
    pub brightness: f64,
    /// Mean 85th-percentile rolloff frequency in Hz.
    pub rolloff: f64,
    /// Mean spectral bandwidth around the centroid in Hz.
    pub bandwidth: f64,
    /// Time-averaged log power of the lowest linear bands.
    pub timbre: [f64; TIMBRE_KEPT],
}

/// Computes frame-averaged spectral statistics.
pub struct SpectralAnalyzer {
    fft: FftProcessor,
    hop_size: usize,
}

impl SpectralAnalyzer {
    pub fn new() -> Self {
        Self {
            fft: FftProcessor::new(FRAME_SIZE),
            hop_size: HOP_SIZE,
        }
    }

    /// Magnitude spectra of every complete frame, hop-strided.
    pub fn magnitude_frames(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        let frame_size = self.fft.fft_size();
        if samples.len() < frame_size {
            return Vec::new();
        }

        let mut frames = Vec::with_capacity((samples.len() - frame_size) / self.hop_size + 1);
        let mut start = 0;
        while start + frame_size <= samples.len() {
            frames.push(self.fft.magnitude_spectrum(&samples[start..start + frame_size]));
            start += self.hop_size;
        }
        frames
    }

    /// Summarize the window's spectral shape.
    ///
    /// Fails when the window is shorter than one frame; the caller
    /// substitutes neutral fallbacks in that case.
    pub fn analyze(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<SpectralSummary, ExtractorFailure> {
        let frames = self.magnitude_frames(samples);
        if frames.is_empty() {
            return Err(ExtractorFailure::new(
                "spectral",
                format!("window shorter than one {} sample frame", FRAME_SIZE),
            ));
        }

        let bins = self.fft.num_bins();
        // Bin center frequencies span [0, Nyquist] inclusive.
        let bin_hz = sample_rate as f64 / 2.0 / (bins - 1) as f64;

        let mut centroid_sum = 0.0;
        let mut rolloff_sum = 0.0;
        let mut bandwidth_sum = 0.0;
        let mut band_log_sums = [0.0f64; TIMBRE_BANDS];
        let band_sizes = split_sizes(bins, TIMBRE_BANDS);

        for frame in &frames {
            let mut mag_sum = 0.0f64;
            let mut weighted_sum = 0.0f64;
            for (i, &m) in frame.iter().enumerate() {
                let m = m as f64;
                mag_sum += m;
                weighted_sum += i as f64 * bin_hz * m;
            }

            let centroid = weighted_sum / (mag_sum + 1e-9);
            centroid_sum += centroid;

            // Rolloff: first bin where cumulative magnitude crosses 85%.
            let threshold = ROLLOFF_FRACTION * mag_sum;
            let mut cumulative = 0.0f64;
            let mut rolloff_bin = 0usize;
            for (i, &m) in frame.iter().enumerate() {
                cumulative += m as f64;
                if cumulative >= threshold {
                    rolloff_bin = i;
                    break;
                }
            }
            rolloff_sum += rolloff_bin as f64 * bin_hz;

            let mut spread_sum = 0.0f64;
            for (i, &m) in frame.iter().enumerate() {
                let dev = i as f64 * bin_hz - centroid;
                spread_sum += dev * dev * m as f64;
            }
            bandwidth_sum += (spread_sum / (mag_sum + 1e-9)).sqrt();

            let mut bin = 0usize;
            for (band, &size) in band_sizes.iter().enumerate() {
                let mut power_sum = 0.0f64;
                for &m in &frame[bin..bin + size] {
                    power_sum += (m as f64) * (m as f64);
                }
                let mean_power = power_sum / size.max(1) as f64;
                band_log_sums[band] += (mean_power + 1e-9).ln();
                bin += size;
            }
        }

        let n = frames.len() as f64;
        let mut timbre = [0.0f64; TIMBRE_KEPT];
        for (out, sum) in timbre.iter_mut().zip(band_log_sums.iter()) {
            *out = sum / n;
        }

        Ok(SpectralSummary {
            brightness: centroid_sum / n,
            rolloff: rolloff_sum / n,
            bandwidth: bandwidth_sum / n,
            timbre,
        })
    }
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * secs) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_sine_centroid_tracks_frequency() {
        let analyzer = SpectralAnalyzer::new();
        let summary = analyzer.analyze(&sine(1000.0, 11025, 2.0), 11025).unwrap();
        assert!(
            (summary.brightness - 1000.0).abs() < 150.0,
            "centroid {} too far from 1000 Hz",
            summary.brightness
        );
        assert!((summary.rolloff - 1000.0).abs() < 150.0);
        // A pure tone has almost no spread around its centroid.
        assert!(summary.bandwidth < 400.0, "bandwidth {}", summary.bandwidth);
    }

    #[test]
    fn test_brighter_signal_raises_centroid() {
        let analyzer = SpectralAnalyzer::new();
        let low = analyzer.analyze(&sine(500.0, 11025, 2.0), 11025).unwrap();
        let high = analyzer.analyze(&sine(2000.0, 11025, 2.0), 11025).unwrap();
        assert!(high.brightness > low.brightness + 1000.0);
    }

    #[test]
    fn test_low_tone_concentrates_in_first_timbre_band() {
        let analyzer = SpectralAnalyzer::new();
        let summary = analyzer.analyze(&sine(100.0, 11025, 2.0), 11025).unwrap();
        assert!(summary.timbre[0] > summary.timbre[4]);
    }

    #[test]
    fn test_short_window_is_an_error() {
        let analyzer = SpectralAnalyzer::new();
        assert!(analyzer.analyze(&[0.1; 1024], 11025).is_err());
    }

    #[test]
    fn test_frame_count_matches_hop() {
        let analyzer = SpectralAnalyzer::new();
        let frames = analyzer.magnitude_frames(&vec![0.0; 2048 + 512 * 3]);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].len(), 1025);
    }
}
