// Ordered threshold tables for multi-state switches
//
// A table is a list of (exclusive upper bound, state) pairs checked in
// order, plus the state used at and above the last bound. Every multi-state
// parameter resolves through one of the tables below.

use super::curves::unit;

/// Ordered (upper bound, state) table
#[derive(Debug, Clone, Copy)]
pub struct ThresholdTable<T: Copy + 'static> {
    steps: &'static [(f64, T)],
    last: T,
}

impl<T: Copy + 'static> ThresholdTable<T> {
    pub const fn new(steps: &'static [(f64, T)], last: T) -> Self {
        Self { steps, last }
    }

    /// State for a normalized value (clamped into [0, 1] first)
    pub fn classify(&self, value: f64) -> T {
        let n = unit(value);
        self.steps
            .iter()
            .find(|(bound, _)| n < *bound)
            .map(|(_, state)| *state)
            .unwrap_or(self.last)
    }

    /// Upper bounds, in order
    pub fn bounds(&self) -> impl Iterator<Item = f64> + '_ {
        self.steps.iter().map(|(bound, _)| *bound)
    }
}

/// Envelope trigger behavior of the amp/filter envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTrigMode {
    /// Envelope retriggered by the LFO
    Lfo,
    /// Envelope follows the key gate
    Gate,
    /// Gate plus retrigger on every note
    GateTrigger,
}

impl GateTrigMode {
    /// Native parameter encoding
    pub fn code(self) -> u8 {
        match self {
            GateTrigMode::Gate => 0,
            GateTrigMode::GateTrigger => 1,
            GateTrigMode::Lfo => 2,
        }
    }

    pub fn retrigger(self) -> bool {
        self == GateTrigMode::GateTrigger
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortamentoMode {
    Auto,
    Off,
    On,
}

impl PortamentoMode {
    pub fn code(self) -> u8 {
        match self {
            PortamentoMode::Off => 0,
            PortamentoMode::On => 1,
            PortamentoMode::Auto => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LfoWaveform {
    Triangle,
    Rectangle,
    Random,
    Noise,
}

impl LfoWaveform {
    pub fn code(self) -> u8 {
        match self {
            LfoWaveform::Triangle => 0,
            LfoWaveform::Rectangle => 1,
            LfoWaveform::Random => 2,
            LfoWaveform::Noise => 3,
        }
    }
}

const SIXTH: f64 = 1.0 / 6.0;
const FIVE_SIXTHS: f64 = 5.0 / 6.0;

/// Generic three-position switch (sub oscillator, PWM source)
pub const THREE_STATE: ThresholdTable<u8> = ThresholdTable::new(&[(0.25, 0), (0.75, 1)], 2);

pub const GATE_TRIG_MODE: ThresholdTable<GateTrigMode> = ThresholdTable::new(
    &[(0.25, GateTrigMode::Lfo), (0.75, GateTrigMode::Gate)],
    GateTrigMode::GateTrigger,
);

pub const PORTAMENTO_MODE: ThresholdTable<PortamentoMode> = ThresholdTable::new(
    &[(0.25, PortamentoMode::Auto), (0.75, PortamentoMode::Off)],
    PortamentoMode::On,
);

pub const LFO_WAVEFORM: ThresholdTable<LfoWaveform> = ThresholdTable::new(
    &[
        (SIXTH, LfoWaveform::Triangle),
        (0.5, LfoWaveform::Rectangle),
        (FIVE_SIXTHS, LfoWaveform::Random),
    ],
    LfoWaveform::Noise,
);

/// Oscillator footage switch as octave offsets: 16' 8' 4' 2'
pub const DCO_RANGE_OCTAVES: ThresholdTable<i32> =
    ThresholdTable::new(&[(SIXTH, -1), (0.5, 0), (FIVE_SIXTHS, 1)], 2);
