// src/core/analysis/calibration.rs
//
// Maps raw RMS energy onto the perceptual scale downstream consumers
// expect. The square root lifts quiet-but-dense material; brightness
// and loudness contribute smaller corrections.

/// Calibrated energy in [0.1, 0.98].
///
/// `raw_energy` is the window RMS, `loudness` the estimated dBFS
/// loudness in [-60, 0].
pub fn calibrated_energy(raw_energy: f64, brightness: f64, loudness: f64) -> f64 {
    let base = 1.2 * raw_energy.max(0.0).sqrt();
    let bright_term = 0.15 * (brightness / 4000.0).min(1.0);
    let loud_term = 0.25 * ((loudness + 60.0) / 60.0);
    (base + bright_term + loud_term).clamp(0.1, 0.98)
}
