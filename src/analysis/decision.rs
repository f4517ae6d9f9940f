// Match decision engine - pass/fail policy over two measurements
//
// Baseline: class agreement (Mixed is a wildcard), bounded zero-crossing
// and periodicity deltas, level ratio inside the call site's band.
// Two overrides force a pass:
// - mutual near-silence: both absmeans under the quiet floor
// - reference dropout: reference under its floor while the candidate
//   stays under its ceiling
//
// The level bands and override floors are calibration values from
// DecisionConfig.

use serde::{Deserialize, Serialize};

use crate::analysis::classifier::{Classifier, SignalClass};
use crate::analysis::features::BlockFeatures;
use crate::config::{DecisionConfig, LevelBand};

/// Where a level ratio was measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Steady-state window absmean of each render
    Live,
    /// Whole-render energy ratio from the comparator
    File,
}

/// Per-criterion breakdown of a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecisionCriteria {
    pub class_ok: bool,
    pub zcr_ok: bool,
    pub periodicity_ok: bool,
    pub level_ok: bool,
    pub both_quiet: bool,
    pub reference_dropout: bool,
    /// Both renders were long enough to measure
    pub measurable: bool,
}

impl DecisionCriteria {
    pub fn baseline(&self) -> bool {
        self.class_ok && self.zcr_ok && self.periodicity_ok && self.level_ok
    }

    /// Names of the baseline criteria that failed
    pub fn failed(&self) -> Vec<&'static str> {
        [
            ("class", self.class_ok),
            ("zcr", self.zcr_ok),
            ("periodicity", self.periodicity_ok),
            ("level", self.level_ok),
            ("measurable", self.measurable),
        ]
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Outcome of one pairwise decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchVerdict {
    pub pass: bool,
    pub reference_class: SignalClass,
    pub candidate_class: SignalClass,
    pub zcr_delta: f64,
    pub periodicity_delta: f64,
    /// May be infinite
    pub level_ratio: f64,
    pub criteria: DecisionCriteria,
}

impl MatchVerdict {
    /// Fail a verdict whose renders could not be measured
    ///
    /// Neither override applies: an unmeasured render is not silence.
    pub fn unmeasurable(mut self) -> Self {
        self.criteria.measurable = false;
        self.pass = false;
        self
    }
}

/// Window level ratio with the degenerate-reference rule
///
/// When the reference absmean is at or below `floor`, the ratio is infinite
/// if the candidate is audible and 1.0 if both are silent.
pub fn live_level_ratio(reference_absmean: f64, candidate_absmean: f64, floor: f64) -> f64 {
    if reference_absmean > floor {
        candidate_absmean / reference_absmean
    } else if candidate_absmean > floor {
        f64::INFINITY
    } else {
        1.0
    }
}

/// Applies the decision policy
#[derive(Debug, Clone, Default)]
pub struct MatchPolicy {
    classifier: Classifier,
    config: DecisionConfig,
}

impl MatchPolicy {
    pub fn new(classifier: Classifier, config: DecisionConfig) -> Self {
        Self { classifier, config }
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Level band for a call site
    pub fn band(&self, mode: ValidationMode) -> LevelBand {
        match mode {
            ValidationMode::Live => self.config.live_level_band,
            ValidationMode::File => self.config.file_level_band,
        }
    }

    /// Decide whether two measurements match
    ///
    /// # Arguments
    /// * `reference` - Aggregate measurement of the reference render
    /// * `candidate` - Aggregate measurement of the candidate render
    /// * `level_ratio` - Candidate/reference level, possibly infinite
    /// * `band` - Accepted range for `level_ratio`
    pub fn decide(
        &self,
        reference: &BlockFeatures,
        candidate: &BlockFeatures,
        level_ratio: f64,
        band: LevelBand,
    ) -> MatchVerdict {
        let reference_class = self.classifier.classify(reference);
        let candidate_class = self.classifier.classify(candidate);
        let zcr_delta = (reference.zcr - candidate.zcr).abs();
        let periodicity_delta = (reference.periodicity - candidate.periodicity).abs();

        let criteria = DecisionCriteria {
            class_ok: reference_class.agrees_with(candidate_class),
            zcr_ok: zcr_delta <= self.config.max_zcr_delta,
            periodicity_ok: periodicity_delta <= self.config.max_periodicity_delta,
            level_ok: band.contains(level_ratio),
            both_quiet: reference.absmean < self.config.quiet_floor
                && candidate.absmean < self.config.quiet_floor,
            reference_dropout: reference.absmean < self.config.dropout_reference_floor
                && candidate.absmean < self.config.dropout_candidate_ceiling,
            measurable: true,
        };

        MatchVerdict {
            pass: criteria.baseline() || criteria.both_quiet || criteria.reference_dropout,
            reference_class,
            candidate_class,
            zcr_delta,
            periodicity_delta,
            level_ratio,
            criteria,
        }
    }

    /// Decide using the live-engine level ratio and band
    pub fn decide_live(&self, reference: &BlockFeatures, candidate: &BlockFeatures) -> MatchVerdict {
        let ratio = live_level_ratio(
            reference.absmean,
            candidate.absmean,
            self.config.live_level_floor,
        );
        self.decide(reference, candidate, ratio, self.config.live_level_band)
    }
}
