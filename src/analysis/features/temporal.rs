// Time-domain block measurements
//
// Zero counts as non-negative when detecting sign transitions.

/// Max absolute sample, 0 for an empty slice
pub fn peak(samples: &[f32]) -> f64 {
    samples
        .iter()
        .map(|&s| (s as f64).abs())
        .fold(0.0, f64::max)
}

/// Mean absolute sample, 0 for an empty slice
pub fn absmean(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|&s| (s as f64).abs()).sum::<f64>() / samples.len() as f64
}

/// Zero-crossing rate
///
/// Formula: ZCR = crossings / (N - 1)
pub fn zero_crossing_rate(samples: &[f32]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }

    let crossings = samples
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();

    crossings as f64 / (samples.len() - 1) as f64
}
