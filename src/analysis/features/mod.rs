// FeatureExtractor - per-block features of a rendered buffer
//
// A buffer is cut into fixed-size, non-overlapping blocks (the last one
// zero-padded). Each block yields peak, absmean, zero-crossing rate and an
// autocorrelation pitch estimate.
//
// Module organization:
// - types: BlockFeatures
// - temporal: peak, absmean, zero-crossing rate
// - periodicity: autocorrelation lag scan
// - mod.rs: Coordinator (FeatureExtractor)

mod periodicity;
mod temporal;
mod types;

pub use periodicity::{autocorrelation, Periodicity};
pub use temporal::{absmean, peak, zero_crossing_rate};
pub use types::BlockFeatures;

use crate::audio::AudioBuffer;
use crate::config::{AnalysisConfig, StimulusScript};

/// FeatureExtractor turns buffers into block feature sequences
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: AnalysisConfig,
}

impl FeatureExtractor {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Features of one block
    ///
    /// Shorter input is zero-padded to the block size.
    pub fn extract(&self, block: &[f32]) -> BlockFeatures {
        let block_size = self.config.block_size;
        if block.len() < block_size {
            let mut padded = block.to_vec();
            padded.resize(block_size, 0.0);
            return self.measure(&padded, self.config.min_lag);
        }
        self.measure(&block[..block_size], self.config.min_lag)
    }

    /// Features of the first `count` blocks of `samples`
    ///
    /// Blocks past the end of the input are all padding.
    pub fn extract_blocks(&self, samples: &[f32], count: usize) -> Vec<BlockFeatures> {
        (0..count)
            .map(|index| self.extract(block_slice(samples, index, self.config.block_size)))
            .collect()
    }

    /// Features of every block, the partial tail included
    pub fn extract_all(&self, buffer: &AudioBuffer) -> Vec<BlockFeatures> {
        let block_size = self.config.block_size;
        if block_size == 0 {
            return Vec::new();
        }
        let count = buffer.len().div_ceil(block_size);
        self.extract_blocks(buffer.samples(), count)
    }

    /// Aggregate character of a render over its steady-state window
    ///
    /// The window is the last `window_blocks` blocks of the held-note
    /// section of `stimulus`. A render that ends before the window is
    /// complete is measured over its last `window_blocks` blocks instead.
    /// Lags are scanned from `window_min_lag`.
    ///
    /// Returns `None` when the render is shorter than one block.
    pub fn measure_window(
        &self,
        buffer: &AudioBuffer,
        stimulus: &StimulusScript,
    ) -> Option<BlockFeatures> {
        let samples = buffer.samples();
        let block_size = self.config.block_size;
        if block_size == 0 || samples.len() < block_size {
            return None;
        }

        let window_len = self.config.window_blocks * block_size;
        let end = (stimulus.hold_blocks * block_size).min(samples.len());
        let start = end.saturating_sub(window_len);
        Some(self.measure(&samples[start..end], self.config.window_min_lag))
    }

    fn measure(&self, samples: &[f32], min_lag: usize) -> BlockFeatures {
        let periodicity = autocorrelation(
            samples,
            min_lag..=self.config.max_lag,
            self.config.energy_floor,
        );

        BlockFeatures {
            peak: peak(samples),
            absmean: absmean(samples),
            zcr: zero_crossing_rate(samples),
            lag: periodicity.lag,
            periodicity: periodicity.strength,
            frequency_hz: periodicity.frequency_hz(self.config.sample_rate),
        }
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

/// Block `index` of `samples`, possibly short or empty at the tail
pub(crate) fn block_slice(samples: &[f32], index: usize, block_size: usize) -> &[f32] {
    let start = (index * block_size).min(samples.len());
    let end = (start + block_size).min(samples.len());
    &samples[start..end]
}
