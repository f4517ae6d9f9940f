//! Deterministic synthetic signals.
//!
//! Every generator returns a mono [`AudioBuffer`]; noise is seeded so the
//! same arguments always produce the same samples.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f64::consts::PI;

use crate::audio::AudioBuffer;

/// Constant-amplitude sine
pub fn sine(frequency_hz: f64, amplitude: f32, len: usize, sample_rate: u32) -> AudioBuffer {
    decaying_sine(frequency_hz, amplitude, 0.0, len, sample_rate)
}

/// Sine with an exponential amplitude decay of `decay_per_sec`
pub fn decaying_sine(
    frequency_hz: f64,
    amplitude: f32,
    decay_per_sec: f64,
    len: usize,
    sample_rate: u32,
) -> AudioBuffer {
    let rate = sample_rate as f64;
    let samples = (0..len)
        .map(|i| {
            let t = i as f64 / rate;
            let envelope = (-decay_per_sec * t).exp();
            ((2.0 * PI * frequency_hz * t).sin() * envelope) as f32 * amplitude
        })
        .collect();
    AudioBuffer::new(samples, sample_rate)
}

/// Uniform white noise in `[-amplitude, amplitude)`
pub fn white_noise(amplitude: f32, len: usize, sample_rate: u32, seed: u64) -> AudioBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let samples = (0..len)
        .map(|_| rng.gen_range(-1.0f32..1.0) * amplitude)
        .collect();
    AudioBuffer::new(samples, sample_rate)
}

pub fn silence(len: usize, sample_rate: u32) -> AudioBuffer {
    AudioBuffer::new(vec![0.0; len], sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_seeded() {
        let a = white_noise(0.5, 256, 44_100, 42);
        let b = white_noise(0.5, 256, 44_100, 42);
        let c = white_noise(0.5, 256, 44_100, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.samples().iter().all(|s| s.abs() <= 0.5));
    }

    #[test]
    fn decay_reduces_level() {
        let tone = decaying_sine(441.0, 1.0, 10.0, 44_100, 44_100);
        let head = tone.samples()[..1000].iter().map(|s| s.abs()).fold(0.0, f32::max);
        let tail = tone.samples()[43_000..].iter().map(|s| s.abs()).fold(0.0, f32::max);
        assert!(tail < head * 0.001);
    }
}
