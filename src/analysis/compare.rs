// Pairwise comparator - aggregate similarity of two renders
//
// Both buffers are truncated to their shared count of full blocks. Per
// block pair the comparator records both feature vectors and the
// mean-subtracted cross-correlation of the samples; the aggregates are the
// energy ratio, envelope correlation, pitch agreement and average
// cross-correlation over active blocks.

use serde::Serialize;

use crate::analysis::features::{block_slice, BlockFeatures, FeatureExtractor};
use crate::audio::AudioBuffer;
use crate::config::ComparisonConfig;

/// Below this deviation a Pearson correlation is undefined and reported as 0
const CORRELATION_FLOOR: f64 = 1e-10;

/// Mean-subtracted Pearson correlation of two equal-length sequences
///
/// Only the shared prefix is used. Empty or flat input yields 0.
pub fn pearson<T: Copy + Into<f64>>(a: &[T], b: &[T]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let mean_a = a[..n].iter().map(|&v| v.into()).sum::<f64>() / n as f64;
    let mean_b = b[..n].iter().map(|&v| v.into()).sum::<f64>() / n as f64;

    let mut num = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a[..n].iter().zip(&b[..n]) {
        let dx = x.into() - mean_a;
        let dy = y.into() - mean_b;
        num += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let dev_a = var_a.sqrt();
    let dev_b = var_b.sqrt();
    if dev_a < CORRELATION_FLOOR || dev_b < CORRELATION_FLOOR {
        return 0.0;
    }
    num / (dev_a * dev_b)
}

/// One aligned block pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockComparison {
    pub block: usize,
    pub reference: BlockFeatures,
    pub candidate: BlockFeatures,
    pub xcorr: f64,
}

/// Diagnostic criteria; they never gate the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonCriteria {
    pub envelope_ok: bool,
    pub pitch_ok: bool,
    pub xcorr_ok: bool,
}

/// Aggregate metrics of a buffer pair
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    /// Candidate energy over reference energy, infinite when the reference is silent
    pub energy_ratio: f64,
    pub envelope_correlation: f64,
    /// Percentage of jointly active blocks whose pitches agree
    pub pitch_match_pct: f64,
    /// Mean block cross-correlation over blocks where either side is active
    pub avg_xcorr: f64,
    /// Blocks where both sides are active
    pub pitch_blocks: usize,
    /// Blocks where either side is active
    pub active_blocks: usize,
    pub criteria: ComparisonCriteria,
    pub blocks: Vec<BlockComparison>,
}

impl ComparisonResult {
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

/// Comparator combines two buffers' block features into aggregate metrics
#[derive(Debug, Clone)]
pub struct Comparator {
    extractor: FeatureExtractor,
    config: ComparisonConfig,
}

impl Comparator {
    pub fn new(extractor: FeatureExtractor, config: ComparisonConfig) -> Self {
        Self { extractor, config }
    }

    pub fn compare(&self, reference: &AudioBuffer, candidate: &AudioBuffer) -> ComparisonResult {
        let block_size = self.extractor.block_size();
        let shared = reference.len().min(candidate.len());
        let n_blocks = if block_size == 0 { 0 } else { shared / block_size };

        let blocks: Vec<BlockComparison> = (0..n_blocks)
            .map(|index| {
                let ref_block = block_slice(reference.samples(), index, block_size);
                let cand_block = block_slice(candidate.samples(), index, block_size);
                BlockComparison {
                    block: index,
                    reference: self.extractor.extract(ref_block),
                    candidate: self.extractor.extract(cand_block),
                    xcorr: pearson(ref_block, cand_block),
                }
            })
            .collect();

        self.aggregate(blocks)
    }

    fn aggregate(&self, blocks: Vec<BlockComparison>) -> ComparisonResult {
        let floor = self.config.silence_floor;

        let ref_energy: f64 = blocks.iter().map(|b| b.reference.absmean).sum();
        let cand_energy: f64 = blocks.iter().map(|b| b.candidate.absmean).sum();
        let energy_ratio = if ref_energy > self.config.energy_floor {
            cand_energy / ref_energy
        } else {
            f64::INFINITY
        };

        let ref_env: Vec<f64> = blocks.iter().map(|b| b.reference.absmean).collect();
        let cand_env: Vec<f64> = blocks.iter().map(|b| b.candidate.absmean).collect();
        let envelope_correlation = pearson(&ref_env, &cand_env);

        let mut pitch_blocks = 0usize;
        let mut pitch_agree = 0usize;
        for block in blocks
            .iter()
            .filter(|b| b.reference.absmean > floor && b.candidate.absmean > floor)
        {
            pitch_blocks += 1;
            if self.pitches_agree(block.reference.frequency_hz, block.candidate.frequency_hz) {
                pitch_agree += 1;
            }
        }
        let pitch_match_pct = if pitch_blocks > 0 {
            100.0 * pitch_agree as f64 / pitch_blocks as f64
        } else {
            0.0
        };

        let active: Vec<f64> = blocks
            .iter()
            .filter(|b| b.reference.absmean > floor || b.candidate.absmean > floor)
            .map(|b| b.xcorr)
            .collect();
        let avg_xcorr = if active.is_empty() {
            0.0
        } else {
            active.iter().sum::<f64>() / active.len() as f64
        };

        let criteria = ComparisonCriteria {
            envelope_ok: envelope_correlation > self.config.min_envelope_correlation,
            pitch_ok: pitch_match_pct >= self.config.min_pitch_match_pct,
            xcorr_ok: avg_xcorr > self.config.min_avg_xcorr,
        };

        ComparisonResult {
            energy_ratio,
            envelope_correlation,
            pitch_match_pct,
            avg_xcorr,
            pitch_blocks,
            active_blocks: active.len(),
            criteria,
            blocks,
        }
    }

    fn pitches_agree(&self, a: f64, b: f64) -> bool {
        if a <= 0.0 || b <= 0.0 {
            return false;
        }
        a.max(b) / a.min(b) < self.config.pitch_ratio_limit
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new(FeatureExtractor::default(), ComparisonConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::signals;
    use approx::assert_relative_eq;

    #[test]
    fn identical_buffers_match_perfectly() {
        let tone = signals::decaying_sine(441.0, 0.8, 3.0, 96 * 128, 44_100);
        let result = Comparator::default().compare(&tone, &tone);

        assert_eq!(result.block_count(), 96);
        assert_eq!(result.energy_ratio, 1.0);
        assert_relative_eq!(result.envelope_correlation, 1.0, epsilon = 1e-9);
        assert_relative_eq!(result.avg_xcorr, 1.0, epsilon = 1e-9);
        assert_eq!(result.pitch_match_pct, 100.0);
        assert!(result.criteria.envelope_ok);
        assert!(result.criteria.pitch_ok);
        assert!(result.criteria.xcorr_ok);
    }

    #[test]
    fn truncates_to_shorter_buffer() {
        let long = signals::sine(441.0, 0.5, 10 * 128 + 50, 44_100);
        let short = signals::sine(441.0, 0.5, 4 * 128 + 127, 44_100);
        let result = Comparator::default().compare(&long, &short);
        assert_eq!(result.block_count(), 4);
    }

    #[test]
    fn silent_reference_gives_infinite_ratio() {
        let silence = signals::silence(8 * 128, 44_100);
        let tone = signals::sine(441.0, 0.5, 8 * 128, 44_100);
        let result = Comparator::default().compare(&silence, &tone);

        assert!(result.energy_ratio.is_infinite());
        assert_eq!(result.pitch_blocks, 0);
        assert_eq!(result.pitch_match_pct, 0.0);
        assert_eq!(result.envelope_correlation, 0.0);
        // active blocks still count on the candidate side
        assert_eq!(result.active_blocks, 8);
    }

    #[test]
    fn detuned_pitch_does_not_agree() {
        let low = signals::sine(441.0, 0.5, 16 * 128, 44_100);
        let high = signals::sine(630.0, 0.5, 16 * 128, 44_100);
        let result = Comparator::default().compare(&low, &high);
        assert_eq!(result.pitch_match_pct, 0.0);
        assert!(!result.criteria.pitch_ok);
    }

    #[test]
    fn level_difference_shows_in_energy_ratio() {
        let loud = signals::sine(441.0, 0.8, 16 * 128, 44_100);
        let quiet = signals::sine(441.0, 0.2, 16 * 128, 44_100);
        let result = Comparator::default().compare(&loud, &quiet);
        assert_relative_eq!(result.energy_ratio, 0.25, epsilon = 1e-4);
        // same shape, scaled
        assert_relative_eq!(result.avg_xcorr, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn pearson_edge_cases() {
        assert_eq!(pearson::<f64>(&[], &[]), 0.0);
        assert_eq!(pearson(&[1.0f64, 1.0, 1.0], &[0.0, 1.0, 2.0]), 0.0);
        assert_relative_eq!(pearson(&[1.0f64, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0);
        assert_relative_eq!(pearson(&[0.5f32, -0.5, 0.25], &[1.0f32, -1.0, 0.5]), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_input_is_degenerate_not_a_fault() {
        let empty = AudioBuffer::new(Vec::new(), 44_100);
        let result = Comparator::default().compare(&empty, &empty);
        assert_eq!(result.block_count(), 0);
        assert!(result.energy_ratio.is_infinite());
        assert_eq!(result.avg_xcorr, 0.0);
    }
}
