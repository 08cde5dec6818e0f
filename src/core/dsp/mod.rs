//! DSP primitives: windowing, short-time FFT, scalar statistics

pub mod fft;
pub mod stats;
pub mod windows;

pub use fft::FftProcessor;
pub use windows::hann_window;
