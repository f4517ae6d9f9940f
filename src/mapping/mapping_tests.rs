use super::*;
use crate::preset::{AttributeSet, AttributeValue};

fn attrs(pairs: &[(&str, f64)]) -> AttributeSet {
    pairs.iter().map(|(key, value)| (*key, *value)).collect()
}

/// A fully populated program node
fn full_program() -> AttributeSet {
    let mut set = attrs(&[
        ("sawvolume", 0.7),
        ("pulsevolume", 0.3),
        ("suboscvolume", 0.2),
        ("suboscmode", 0.9),
        ("noisevolume", 0.1),
        ("whitenoiseenabled", 1.0),
        ("dcopwmvalue", 1.0),
        ("dcopwmmode", 0.5),
        ("dcolfovalue", 0.6),
        ("dcorange", 0.75),
        ("filtercutoff", 0.2),
        ("filterresonance", 0.4),
        ("filterenvelopevalue", 0.9),
        ("filterenvelopevaluefullrange", 1.0),
        ("filterkeyboardvalue", 0.8),
        ("adsrattack", 0.0),
        ("adsrdecay", 1.0),
        ("adsrsustain", 0.5),
        ("adsrrelease", 0.25),
        ("adsrmode", 0.95),
        ("vcamode", 0.9),
        ("portamentointensity", 0.5),
        ("portamentomode", 0.45),
        ("lforate", 0.5),
        ("lfowaveform", 0.8),
        ("lfotrigger", 1.0),
        ("lfosync", 1.0),
        ("lfoinverted", 1.0),
        ("filtermodulationvalue", 0.25),
        ("controlvelocityvolume", 0.75),
        ("controlvelocityenvelope", 0.33),
        ("volume", 0.62),
        ("masterfinetune", 0.625),
        ("octavetranspose", 0.5),
    ]);
    set.insert("programname", AttributeValue::Text("Test Preset".into()));
    set
}

#[test]
fn test_maps_full_program() {
    let out = map_program(&full_program());

    assert_eq!(out.name, "Test Preset");
    assert_eq!(out.saw, 0.7);
    assert_eq!(out.pulse, 0.3);
    assert_eq!(out.sub, 0.2);
    assert_eq!(out.sub_mode, 2);
    assert_eq!(out.noise, 0.1);
    assert_eq!(out.white_noise, 1);
    assert_eq!(out.pulse_width, 0.95);
    assert_eq!(out.pwm_mode, 1);
    assert_eq!(out.pwm_depth, 0.0);
    assert_eq!(out.pwm_env_depth, 0.0);
    assert_eq!(out.cutoff, 0.447214);
    assert_eq!(out.resonance, 0.48);
    assert_eq!(out.env_amt, 0.8);
    assert_eq!(out.filter_env_full_range, 1);
    assert_eq!(out.filter_env_polarity, 0);
    assert_eq!(out.key_follow, 0.8);
    assert_eq!(out.attack, 0.001);
    assert_eq!(out.decay, 6.0);
    assert_eq!(out.sustain, 0.5);
    assert_eq!(
        out.release,
        round6(0.001 + 0.25_f64.powf(2.2) * (8.0 - 0.001))
    );
    assert_eq!(out.f_attack, out.attack);
    assert_eq!(out.f_decay, out.decay);
    assert_eq!(out.f_sustain, out.sustain);
    assert_eq!(out.f_release, out.release);
    assert_eq!(out.glide, 250.0);
    assert_eq!(out.portamento_mode, 0);
    assert_eq!(out.lfo_rate, 20.01);
    assert_eq!(out.lfo_pitch, 0.6);
    assert_eq!(out.lfo_filter, 0.25);
    assert_eq!(out.lfo_pwm, 0.0);
    assert_eq!(out.lfo_waveform, 2);
    assert_eq!(out.lfo_trigger, 1);
    assert_eq!(out.lfo_sync, 1);
    assert_eq!(out.lfo_invert, 1);
    assert_eq!(out.velocity_sens, 0.75);
    assert_eq!(out.filter_velocity_sens, 0.33);
    assert_eq!(out.velocity_mode, 1);
    assert_eq!(out.priority, 0);
    assert_eq!(out.gate_trig_mode, 1);
    assert_eq!(out.retrigger, 1);
    assert_eq!(out.vca_mode, 1);
    assert_eq!(out.adsr_declick, 0.0);
    assert_eq!(out.filter_volume_correction, 0.0);
    assert_eq!(out.portamento_linear, 0);
    assert_eq!(out.lfo_pitch_snap, 0);
    assert_eq!(out.volume, 0.62);
    assert_eq!(out.fine_tune, 25.0);
    assert_eq!(out.transpose, 0);
    assert_eq!(out.octave_transpose, 1);
    assert_eq!(out.archive_path, None);
}

#[test]
fn test_mapping_is_pure() {
    let program = full_program();
    let first = serde_json::to_vec(&map_program(&program)).unwrap();
    for _ in 0..5 {
        assert_eq!(serde_json::to_vec(&map_program(&program)).unwrap(), first);
    }
}

#[test]
fn test_empty_program_yields_complete_snapshot() {
    let out = map_program(&AttributeSet::new());

    assert_eq!(out.name, DEFAULT_PRESET_NAME);
    assert_eq!(out.vca_mode, 1, "VCA mode defaults to on");
    assert_eq!(out.gate_trig_mode, 2);
    assert_eq!(out.retrigger, 0);
    assert_eq!(out.attack, 0.001);
    assert_eq!(out.decay, 0.001);
    assert_eq!(out.release, 0.001);
    assert_eq!(out.pulse_width, 0.05);
    assert_eq!(out.portamento_mode, 2);
    assert_eq!(out.fine_tune, -100.0);
    assert_eq!(out.octave_transpose, -2);
    assert_eq!(out.transpose, -12);
    assert_eq!(out.source_path, "");

    let json = serde_json::to_value(&out).unwrap();
    let keys = json.as_object().unwrap();
    assert_eq!(keys.len(), 52);
    assert!(!keys.contains_key("archive_path"));
}

#[test]
fn test_gate_mode_end_to_end() {
    let lfo = map_program(&attrs(&[("adsrmode", 0.0)]));
    let gate = map_program(&attrs(&[("adsrmode", 0.333)]));
    let gate_trig = map_program(&attrs(&[("adsrmode", 1.0)]));

    assert_eq!(lfo.gate_trig_mode, 2);
    assert_eq!(lfo.retrigger, 0);
    assert_eq!(gate.gate_trig_mode, 0);
    assert_eq!(gate.retrigger, 0);
    assert_eq!(gate_trig.gate_trig_mode, 1);
    assert_eq!(gate_trig.retrigger, 1);
}

#[test]
fn test_mode_thresholds_match_reference_switches() {
    let low = map_program(&attrs(&[
        ("adsrmode", 0.20),
        ("portamentomode", 0.0),
        ("lfowaveform", 0.10),
    ]));
    let mid = map_program(&attrs(&[
        ("adsrmode", 0.69),
        ("portamentomode", 0.40),
        ("lfowaveform", 0.20),
    ]));
    let high = map_program(&attrs(&[
        ("adsrmode", 0.95),
        ("portamentomode", 0.95),
        ("lfowaveform", 0.60),
    ]));
    let noise = map_program(&attrs(&[("lfowaveform", 0.95)]));

    assert_eq!(
        (low.gate_trig_mode, low.portamento_mode, low.lfo_waveform),
        (2, 2, 0)
    );
    assert_eq!(
        (mid.gate_trig_mode, mid.portamento_mode, mid.lfo_waveform),
        (0, 0, 1)
    );
    assert_eq!(
        (high.gate_trig_mode, high.portamento_mode, high.lfo_waveform),
        (1, 1, 2)
    );
    assert_eq!(noise.lfo_waveform, 3);
}

#[test]
fn test_typical_bass_decay_is_not_milliseconds() {
    let out = map_program(&attrs(&[
        ("filtercutoff", 0.199),
        ("adsrdecay", 0.212),
        ("adsrrelease", 0.0),
        ("adsrsustain", 0.0),
    ]));
    assert!(out.decay > 0.15, "decay {}", out.decay);
    assert!(out.cutoff > 0.4, "cutoff {}", out.cutoff);
}

#[test]
fn test_out_of_range_inputs_are_clamped() {
    let high = map_program(&attrs(&[
        ("sawvolume", 3.0),
        ("filterresonance", 5.0),
        ("adsrattack", 9.0),
        ("lforate", 2.0),
        ("masterfinetune", 4.0),
        ("portamentointensity", 1.5),
    ]));
    assert_eq!(high.saw, 1.0);
    assert_eq!(high.resonance, 1.2);
    assert_eq!(high.attack, 4.0);
    assert_eq!(high.lfo_rate, 40.0);
    assert_eq!(high.fine_tune, 100.0);
    assert_eq!(high.glide, 500.0);

    let low = map_program(&attrs(&[
        ("sawvolume", -1.0),
        ("filterresonance", -0.3),
        ("adsrrelease", -2.0),
        ("dcopwmvalue", -0.5),
        ("filtercutoff", -0.1),
    ]));
    assert_eq!(low.saw, 0.0);
    assert_eq!(low.resonance, 0.0);
    assert_eq!(low.release, 0.001);
    assert_eq!(low.pulse_width, 0.05);
    assert_eq!(low.cutoff, 0.0);
}

#[test]
fn test_pwm_depth_follows_mode() {
    let lfo = map_program(&attrs(&[("dcopwmmode", 0.9), ("dcopwmvalue", 0.4)]));
    assert_eq!(lfo.pwm_mode, 2);
    assert_eq!(lfo.pwm_depth, 0.4);
    assert_eq!(lfo.lfo_pwm, 0.4);
    assert_eq!(lfo.pwm_env_depth, 0.0);

    let env = map_program(&attrs(&[("dcopwmmode", 0.1), ("dcopwmvalue", 0.4)]));
    assert_eq!(env.pwm_mode, 0);
    assert_eq!(env.pwm_depth, 0.0);
    assert_eq!(env.pwm_env_depth, 0.4);

    let manual = map_program(&attrs(&[("dcopwmmode", 0.5), ("dcopwmvalue", 0.4)]));
    assert_eq!(manual.pwm_depth, 0.0);
    assert_eq!(manual.pwm_env_depth, 0.0);
    assert_eq!(manual.pulse_width, 0.4);
}

#[test]
fn test_envelope_amount_polarity() {
    let centered = map_program(&attrs(&[
        ("filterenvelopevalue", 0.5),
        ("filterenvelopevaluefullrange", 1.0),
    ]));
    assert_eq!(centered.env_amt, 0.0);
    assert_eq!(centered.filter_env_polarity, 0);

    let centered_plain = map_program(&attrs(&[("filterenvelopevalue", 0.5)]));
    assert_eq!(centered_plain.env_amt, 0.5);
    assert_eq!(centered_plain.filter_env_polarity, 0);

    let inverted = map_program(&attrs(&[
        ("filterenvelopevalue", 0.1),
        ("filterenvelopevaluefullrange", 1.0),
    ]));
    assert_eq!(inverted.env_amt, 0.8);
    assert_eq!(inverted.filter_env_polarity, 1);
}

#[test]
fn test_velocity_mode_threshold() {
    let off = map_program(&attrs(&[
        ("controlvelocityvolume", 0.01),
        ("controlvelocityenvelope", 0.0),
    ]));
    assert_eq!(off.velocity_mode, 0);

    let env_only = map_program(&attrs(&[("controlvelocityenvelope", 0.02)]));
    assert_eq!(env_only.velocity_mode, 1);
}

#[test]
fn test_octave_assembly_carries_into_semitones() {
    // knob centered, 8' footage
    assert_eq!(assemble_octaves(0.5, 0.3), (0, 0));
    // knob +2, 2' footage: +4 octaves total
    assert_eq!(assemble_octaves(1.0, 1.0), (2, 24));
    // knob -2, 16' footage: -3 octaves total
    assert_eq!(assemble_octaves(0.0, 0.0), (-2, -12));
    // half-way knob positions round to even
    assert_eq!(assemble_octaves(0.625, 0.3), (0, 0));
    assert_eq!(assemble_octaves(0.875, 0.3), (2, 0));
}

#[test]
fn test_text_values_fall_back_to_defaults() {
    let mut set = AttributeSet::new();
    set.insert("vcamode", AttributeValue::Text("on".into()));
    set.insert("sawvolume", AttributeValue::Text("loud".into()));
    set.insert("path", AttributeValue::Text("Bass/Acid.vstpreset".into()));
    set.insert("category", AttributeValue::Text("Bass".into()));

    let out = map_program(&set);
    assert_eq!(out.vca_mode, 1);
    assert_eq!(out.saw, 0.0);
    assert_eq!(out.source_path, "Bass/Acid.vstpreset");
    assert_eq!(out.source_category, "Bass");
}
