use serde::{Deserialize, Serialize};

/// Features of one analysis block (or of a steady-state window)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockFeatures {
    /// Max absolute sample
    pub peak: f64,
    /// Mean absolute sample
    pub absmean: f64,
    /// Sign transitions per adjacent sample pair
    pub zcr: f64,
    /// Dominant autocorrelation lag in samples, 0 when none qualified
    pub lag: usize,
    /// Normalized autocorrelation at the dominant lag
    pub periodicity: f64,
    /// `sample_rate / lag`, 0 when no lag qualified
    pub frequency_hz: f64,
}
