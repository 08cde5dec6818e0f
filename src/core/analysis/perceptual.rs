// src/core/analysis/perceptual.rs
//
// Closed-form perceptual proxies derived from the measured features.
// Each estimator is a pure function over already-extracted values;
// none of them touch the samples again.

/// Fixed liveness placeholder. No audience detection is attempted.
pub const LIVENESS: f64 = 0.1;

/// Danceability in [0.1, 0.98] from tempo and raw signal energy.
///
/// Peaks around 118 BPM; tempos outside 50-190 BPM are damped before
/// clamping.
pub fn danceability(bpm: f64, energy: f64) -> f64 {
    let tempo_term = if bpm > 0.0 {
        (0.5 - (bpm - 118.0).abs() * 0.006).max(0.0)
    } else {
        0.2
    };

    let mut value = 0.1 + 0.5 * energy + tempo_term;
    if bpm < 50.0 || bpm > 190.0 {
        value *= 0.7;
    }
    value.clamp(0.1, 0.98)
}

/// Musical positivity in [0, 1] from tempo, energy, and brightness.
pub fn valence(bpm: f64, energy: f64, brightness: f64) -> f64 {
    let tempo_term = (bpm / 180.0).min(1.0);
    let bright_term = (brightness / 4000.0).min(1.0);
    (0.3 * tempo_term + 0.4 * energy + 0.3 * bright_term).clamp(0.0, 1.0)
}

/// Acoustic character in [0, 1], the inverse of energy and brightness.
pub fn acousticness(energy: f64, brightness: f64) -> f64 {
    let bright_term = (brightness / 5000.0).min(1.0);
    (1.0 - (0.6 * energy + 0.4 * bright_term)).clamp(0.0, 1.0)
}

/// Vocal absence in [0, 0.95]. Low zero-crossing rates and very high
/// energy both push toward instrumental.
pub fn instrumentalness(zcr: f64, energy: f64) -> f64 {
    let mut value: f64 = 0.5;
    if zcr < 0.05 {
        value += 0.3;
    }
    if energy > 0.8 {
        value += 0.2;
    }
    value.clamp(0.0, 0.95)
}

/// Everything the speechiness blend looks at.
#[derive(Debug, Clone, Copy)]
pub struct SpeechCues {
    pub pitch_irregularity: f64,
    pub zcr: f64,
    pub brightness: f64,
    pub dynamic_variation: f64,
    pub bandwidth: f64,
    pub energy: f64,
}

/// Spoken-content likelihood in [0.03, 0.66].
///
/// Five weighted cues, normalized by their combined weight; dense
/// high-energy mixes are attenuated since they mask speech cues.
pub fn speechiness(cues: &SpeechCues) -> f64 {
    let zcr_factor = if cues.zcr < 0.08 {
        0.0
    } else if cues.zcr < 0.12 {
        (cues.zcr - 0.08) / 0.04 * 0.3
    } else {
        0.3 + ((cues.zcr - 0.12) / 0.08).min(1.0) * 0.7
    };

    let b = cues.brightness;
    let bright_factor = if (1800.0..=2500.0).contains(&b) {
        0.2
    } else if b < 1800.0 {
        (0.2 - (1800.0 - b) / 2000.0).max(0.0)
    } else {
        (0.2 - (b - 2500.0) / 2000.0).max(0.0)
    };

    let var_factor = if cues.dynamic_variation > 0.15 {
        (cues.dynamic_variation / 0.3).min(0.2)
    } else {
        0.0
    };

    let bandwidth_factor = if cues.bandwidth > 1800.0 { 0.15 } else { 0.0 };

    let mut value = (0.8 * cues.pitch_irregularity
        + zcr_factor
        + bright_factor
        + var_factor
        + bandwidth_factor)
        / 2.35;

    if cues.energy > 0.90 {
        value *= 0.7;
    }
    value.clamp(0.03, 0.66)
}
