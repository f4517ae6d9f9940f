// Autocorrelation pitch estimate
//
// For each candidate lag the block is correlated with itself shifted by the
// lag, using raw (not mean-subtracted) sums of products. The lag with the
// strictly highest ratio wins; ratios at or below zero never qualify.

use std::ops::RangeInclusive;

/// Dominant lag and its normalized correlation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Periodicity {
    pub lag: usize,
    pub strength: f64,
}

impl Periodicity {
    /// `sample_rate / lag`, or 0 when no lag qualified
    pub fn frequency_hz(&self, sample_rate: u32) -> f64 {
        if self.lag == 0 {
            return 0.0;
        }
        sample_rate as f64 / self.lag as f64
    }
}

/// Scan `lags` (capped below the slice length) for the best self-similarity
///
/// A lag only qualifies when both overlapping segments carry more than
/// `energy_floor` energy.
pub fn autocorrelation(
    samples: &[f32],
    lags: RangeInclusive<usize>,
    energy_floor: f64,
) -> Periodicity {
    let mut best = Periodicity::default();
    let n = samples.len();
    if n == 0 {
        return best;
    }
    let last_lag = (*lags.end()).min(n - 1);

    for lag in *lags.start()..=last_lag {
        let mut acc = 0.0f64;
        let mut e1 = 0.0f64;
        let mut e2 = 0.0f64;
        for i in lag..n {
            let x = samples[i] as f64;
            let y = samples[i - lag] as f64;
            acc += x * y;
            e1 += x * x;
            e2 += y * y;
        }
        if e1 > energy_floor && e2 > energy_floor {
            let r = acc / (e1 * e2).sqrt();
            if r > best.strength {
                best = Periodicity { lag, strength: r };
            }
        }
    }

    best
}
