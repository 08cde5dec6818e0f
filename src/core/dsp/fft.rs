//! Short-time FFT with Hann windowing

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use super::windows::hann_window;

/// Windowed magnitude-spectrum computation for fixed-size frames.
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    fft_size: usize,
}

impl FftProcessor {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        Self {
            fft,
            window: hann_window(fft_size),
            fft_size,
        }
    }

    /// Magnitude spectrum of one Hann-windowed frame.
    ///
    /// Returns the first `fft_size/2 + 1` bins, linearly spaced over
    /// [0, sample_rate/2]. Short frames are zero-padded.
    pub fn magnitude_spectrum(&self, frame: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .take(self.fft_size)
            .enumerate()
            .map(|(i, &s)| Complex::new(s * self.window[i], 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer[..self.fft_size / 2 + 1]
            .iter()
            .map(|c| c.norm())
            .collect()
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of spectrum bins produced per frame.
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }
}
