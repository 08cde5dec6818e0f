//! Scalar statistics shared by the feature extractors

/// Root mean square amplitude.
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = samples.iter().map(|&s| s as f64 * s as f64).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Number of sign-bit changes between adjacent samples.
///
/// Counts transitions of the IEEE sign bit, so a -0.0/+0.0 boundary
/// counts as a crossing.
pub fn sign_changes(samples: &[f32]) -> usize {
    samples
        .windows(2)
        .filter(|w| w[0].is_sign_negative() != w[1].is_sign_negative())
        .count()
}

/// Autocorrelation normalized by the zero-lag energy.
///
/// Returns coefficients for lags 0..=max_lag; all zeros when the input
/// carries no energy. Values at lag 0 are 1.0 by construction.
pub fn autocorrelation(samples: &[f32], max_lag: usize) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let n = samples.len();
    let max_lag = max_lag.min(n - 1);

    let energy: f32 = samples.iter().map(|s| s * s).sum();
    if energy < 1e-10 {
        return vec![0.0; max_lag + 1];
    }

    (0..=max_lag)
        .map(|lag| {
            let sum: f32 = samples[..n - lag]
                .iter()
                .zip(&samples[lag..])
                .map(|(a, b)| a * b)
                .sum();
            sum / energy
        })
        .collect()
}

/// Split a length into the block sizes used for ~100-block statistics:
/// the first `n % count` blocks are one sample longer.
pub fn split_sizes(n: usize, count: usize) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }

    let base = n / count;
    let extra = n % count;
    (0..count)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}
