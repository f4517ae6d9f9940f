//! Rendered audio buffers and the decoders for renderer output files.
//!
//! Renderers write either a mono PCM WAV or a headerless run of
//! little-endian `f32` samples. Both decode into an [`AudioBuffer`] with
//! samples in [-1.0, 1.0].

mod decode;

pub use decode::{read_raw_f32, read_render_output, read_wav, write_wav};

/// Mono samples at a fixed sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of complete blocks of `block_size` samples
    pub fn full_blocks(&self, block_size: usize) -> usize {
        if block_size == 0 {
            return 0;
        }
        self.samples.len() / block_size
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

impl From<AudioBuffer> for Vec<f32> {
    fn from(buffer: AudioBuffer) -> Self {
        buffer.samples
    }
}
