//! Parameter mapping from reference presets to native snapshots.
//!
//! [`map_program`] is a pure, total function: any [`AttributeSet`], however
//! sparse, yields a complete [`NativeSnapshot`]. Absent attributes resolve to
//! fixed defaults; every derived value is clamped to its native range and
//! rounded to six decimals.
//!
//! Transform families:
//! - linear clamp-scale (mix levels, resonance with 1.2 gain)
//! - exponential time curve (attack)
//! - power time curve, exponent 2.2 (decay, release)
//! - ordered threshold tables (three-state switches, LFO wave, gate mode)
//! - bipolar recombination (filter envelope amount)
//! - composite octave assembly (transpose knob + footage switch)

pub mod curves;
mod snapshot;
pub mod thresholds;

pub use snapshot::NativeSnapshot;

use crate::preset::AttributeSet;
use curves::{bipolar, clamp, exp_time, flag, linear, power_time, round6, scaled, unit};
use thresholds::{DCO_RANGE_OCTAVES, GATE_TRIG_MODE, LFO_WAVEFORM, PORTAMENTO_MODE, THREE_STATE};

/// Name used when the preset carries none
pub const DEFAULT_PRESET_NAME: &str = "Unnamed Preset";

const ATTACK_RANGE: (f64, f64) = (0.001, 4.0);
const DECAY_RANGE: (f64, f64) = (0.001, 6.0);
const RELEASE_RANGE: (f64, f64) = (0.001, 8.0);
const ENVELOPE_EXPONENT: f64 = 2.2;
const RESONANCE_GAIN: f64 = 1.2;
const PULSE_WIDTH_RANGE: (f64, f64) = (0.05, 0.95);
const GLIDE_MAX_MS: f64 = 500.0;
const LFO_RATE_RANGE: (f64, f64) = (0.02, 40.0);
const FINE_TUNE_CENTS: f64 = 100.0;
const VELOCITY_THRESHOLD: f64 = 0.01;
const OCTAVE_LIMIT: i32 = 2;
const SEMITONE_LIMIT: i32 = 24;

/// PWM source positions of the three-state switch
const PWM_ENVELOPE: u8 = 0;
const PWM_LFO: u8 = 2;

/// Map a reference program's attributes onto the native parameter set
pub fn map_program(attrs: &AttributeSet) -> NativeSnapshot {
    let level = |key: &str| round6(unit(attrs.number(key)));

    let pwm_mode = THREE_STATE.classify(attrs.number("dcopwmmode"));
    let pwm_value = unit(attrs.number("dcopwmvalue"));
    let pwm_depth = if pwm_mode == PWM_LFO { pwm_value } else { 0.0 };
    let pwm_env_depth = if pwm_mode == PWM_ENVELOPE { pwm_value } else { 0.0 };

    let attack = round6(exp_time(
        attrs.number("adsrattack"),
        ATTACK_RANGE.0,
        ATTACK_RANGE.1,
    ));
    let decay = round6(power_time(
        attrs.number("adsrdecay"),
        DECAY_RANGE.0,
        DECAY_RANGE.1,
        ENVELOPE_EXPONENT,
    ));
    let sustain = level("adsrsustain");
    let release = round6(power_time(
        attrs.number("adsrrelease"),
        RELEASE_RANGE.0,
        RELEASE_RANGE.1,
        ENVELOPE_EXPONENT,
    ));

    let env_full_range = flag(attrs.number("filterenvelopevaluefullrange"));
    let (env_amt, env_polarity) =
        bipolar(attrs.number("filterenvelopevalue"), env_full_range == 1);

    let velocity_sens = unit(attrs.number("controlvelocityvolume"));
    let filter_velocity_sens = unit(attrs.number("controlvelocityenvelope"));
    let velocity_mode = u8::from(velocity_sens.max(filter_velocity_sens) > VELOCITY_THRESHOLD);

    let (octave_transpose, transpose) =
        assemble_octaves(attrs.number("octavetranspose"), attrs.number("dcorange"));

    let gate_trig_mode = GATE_TRIG_MODE.classify(attrs.number("adsrmode"));

    let fine_tune = clamp(
        (unit(attrs.number("masterfinetune")) - 0.5) * 2.0 * FINE_TUNE_CENTS,
        -FINE_TUNE_CENTS,
        FINE_TUNE_CENTS,
    );

    NativeSnapshot {
        name: attrs.text_or("programname", DEFAULT_PRESET_NAME),
        saw: level("sawvolume"),
        pulse: level("pulsevolume"),
        sub: level("suboscvolume"),
        sub_mode: THREE_STATE.classify(attrs.number("suboscmode")),
        noise: level("noisevolume"),
        white_noise: flag(attrs.number("whitenoiseenabled")),
        pulse_width: round6(clamp(pwm_value, PULSE_WIDTH_RANGE.0, PULSE_WIDTH_RANGE.1)),
        pwm_mode,
        pwm_depth: round6(pwm_depth),
        pwm_env_depth: round6(pwm_env_depth),
        cutoff: round6(unit(attrs.number("filtercutoff")).sqrt()),
        resonance: round6(scaled(
            attrs.number("filterresonance"),
            RESONANCE_GAIN,
            0.0,
            RESONANCE_GAIN,
        )),
        env_amt: round6(unit(env_amt)),
        filter_env_full_range: env_full_range,
        filter_env_polarity: env_polarity,
        filter_volume_correction: level("filtervolumecorrection"),
        key_follow: level("filterkeyboardvalue"),
        attack,
        decay,
        sustain,
        release,
        f_attack: attack,
        f_decay: decay,
        f_sustain: sustain,
        f_release: release,
        glide: round6(unit(attrs.number("portamentointensity")) * GLIDE_MAX_MS),
        portamento_mode: PORTAMENTO_MODE.classify(attrs.number("portamentomode")).code(),
        lfo_rate: round6(linear(
            attrs.number("lforate"),
            LFO_RATE_RANGE.0,
            LFO_RATE_RANGE.1,
        )),
        lfo_waveform: LFO_WAVEFORM.classify(attrs.number("lfowaveform")).code(),
        lfo_trigger: flag(attrs.number("lfotrigger")),
        lfo_sync: flag(attrs.number("lfosync")),
        lfo_invert: flag(attrs.number("lfoinverted")),
        lfo_pitch_snap: flag(attrs.number("dcolfovaluesnap")),
        lfo_pitch: level("dcolfovalue"),
        lfo_filter: level("filtermodulationvalue"),
        lfo_pwm: round6(pwm_depth),
        velocity_sens: round6(velocity_sens),
        filter_velocity_sens: round6(filter_velocity_sens),
        velocity_mode,
        adsr_declick: level("adsrdecklick"),
        vca_mode: flag(attrs.number_or("vcamode", 1.0)),
        portamento_linear: flag(attrs.number("portamentolinear")),
        priority: 0,
        gate_trig_mode: gate_trig_mode.code(),
        retrigger: u8::from(gate_trig_mode.retrigger()),
        volume: level("volume"),
        transpose,
        octave_transpose,
        fine_tune: round6(fine_tune),
        source_path: attrs.text_or("path", ""),
        source_category: attrs.text_or("category", ""),
        archive_path: None,
    }
}

/// Combine the transpose knob and the footage switch into
/// `(octave_transpose, semitone transpose)`.
///
/// Offsets beyond the native octave range carry over into semitones.
pub fn assemble_octaves(transpose_knob: f64, range_switch: f64) -> (i32, i32) {
    let knob_octaves = ((unit(transpose_knob) - 0.5) * 4.0).round_ties_even() as i32;
    let range_octaves = DCO_RANGE_OCTAVES.classify(range_switch);
    let total = knob_octaves + range_octaves;

    let octave_transpose = total.clamp(-OCTAVE_LIMIT, OCTAVE_LIMIT);
    let transpose = ((total - octave_transpose) * 12).clamp(-SEMITONE_LIMIT, SEMITONE_LIMIT);
    (octave_transpose, transpose)
}

#[cfg(test)]
#[path = "mapping_tests.rs"]
mod tests;
