// Native parameter snapshot of the target engine
//
// The key set is closed: every field is always present, so a snapshot is
// complete by construction. Continuous values are `f64` rounded to six
// decimals; switches and modes are small integers.

use serde::{Deserialize, Serialize};

/// Complete typed parameter state for one preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeSnapshot {
    pub name: String,

    // oscillator mix
    pub saw: f64,
    pub pulse: f64,
    pub sub: f64,
    pub sub_mode: u8,
    pub noise: f64,
    pub white_noise: u8,
    pub pulse_width: f64,
    pub pwm_mode: u8,
    pub pwm_depth: f64,
    pub pwm_env_depth: f64,

    // filter
    pub cutoff: f64,
    pub resonance: f64,
    pub env_amt: f64,
    pub filter_env_full_range: u8,
    pub filter_env_polarity: u8,
    pub filter_volume_correction: f64,
    pub key_follow: f64,

    // envelopes, seconds
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
    pub f_attack: f64,
    pub f_decay: f64,
    pub f_sustain: f64,
    pub f_release: f64,

    /// Glide time in milliseconds
    pub glide: f64,
    pub portamento_mode: u8,

    // modulation
    /// LFO rate in Hz
    pub lfo_rate: f64,
    pub lfo_waveform: u8,
    pub lfo_trigger: u8,
    pub lfo_sync: u8,
    pub lfo_invert: u8,
    pub lfo_pitch_snap: u8,
    pub lfo_pitch: f64,
    pub lfo_filter: f64,
    pub lfo_pwm: f64,

    // performance
    pub velocity_sens: f64,
    pub filter_velocity_sens: f64,
    pub velocity_mode: u8,
    pub adsr_declick: f64,
    pub vca_mode: u8,
    pub portamento_linear: u8,
    pub priority: u8,
    pub gate_trig_mode: u8,
    pub retrigger: u8,
    pub volume: f64,
    /// Semitones
    pub transpose: i32,
    /// Octaves, -2..=2
    pub octave_transpose: i32,
    /// Cents, -100..=100
    pub fine_tune: f64,

    // provenance
    pub source_path: String,
    pub source_category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_path: Option<String>,
}

impl NativeSnapshot {
    /// Attach the archive entry the preset came from
    pub fn with_archive_path(mut self, path: impl Into<String>) -> Self {
        self.archive_path = Some(path.into());
        self
    }
}
