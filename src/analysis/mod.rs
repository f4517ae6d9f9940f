// Analysis module - render comparison pipeline
//
// This module turns two rendered buffers into a pass/fail verdict.
//
// Architecture:
// - features: per-block and steady-state window measurements
// - classifier: tonal / noisy / mixed decision table
// - compare: block-aligned comparison and aggregate metrics
// - decision: match policy with call-site level bands and overrides
// - Analyzer: wires the stages together for one buffer pair

pub mod classifier;
pub mod compare;
pub mod decision;
pub mod features;

use crate::audio::AudioBuffer;
use crate::config::{AppConfig, StimulusScript};

use classifier::Classifier;
use compare::{Comparator, ComparisonResult};
use decision::{MatchPolicy, MatchVerdict, ValidationMode};
use features::{BlockFeatures, FeatureExtractor};

/// Result of assessing one reference/candidate pair
#[derive(Debug, Clone)]
pub struct Assessment {
    pub mode: ValidationMode,
    /// Steady-state window of the reference render, zeroed when unmeasurable
    pub reference: BlockFeatures,
    /// Steady-state window of the candidate render
    pub candidate: BlockFeatures,
    pub verdict: MatchVerdict,
    /// Block comparison, file mode only
    pub comparison: Option<ComparisonResult>,
}

impl Assessment {
    pub fn pass(&self) -> bool {
        self.verdict.pass
    }
}

/// Runs extraction, comparison and decision for a buffer pair
#[derive(Debug, Clone)]
pub struct Analyzer {
    extractor: FeatureExtractor,
    comparator: Comparator,
    policy: MatchPolicy,
    stimulus: StimulusScript,
}

impl Analyzer {
    pub fn new(config: &AppConfig) -> Self {
        let extractor = FeatureExtractor::new(config.analysis.clone());
        Self {
            comparator: Comparator::new(extractor.clone(), config.comparison.clone()),
            extractor,
            policy: MatchPolicy::new(
                Classifier::new(config.classifier.clone()),
                config.decision.clone(),
            ),
            stimulus: config.render.stimulus.clone(),
        }
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Assess a pair at the given call site
    ///
    /// Live mode rates the level from the window absmeans against the live
    /// band. File mode runs the block comparator and rates its energy ratio
    /// against the file band.
    pub fn assess(
        &self,
        reference: &AudioBuffer,
        candidate: &AudioBuffer,
        mode: ValidationMode,
    ) -> Assessment {
        let ref_measured = self.extractor.measure_window(reference, &self.stimulus);
        let cand_measured = self.extractor.measure_window(candidate, &self.stimulus);
        let measurable = ref_measured.is_some() && cand_measured.is_some();
        if !measurable {
            tracing::warn!(
                reference_samples = reference.len(),
                candidate_samples = candidate.len(),
                "[Analyzer] render shorter than one block, failing pair"
            );
        }
        let ref_window = ref_measured.unwrap_or_default();
        let cand_window = cand_measured.unwrap_or_default();

        let (verdict, comparison) = match mode {
            ValidationMode::Live => (self.policy.decide_live(&ref_window, &cand_window), None),
            ValidationMode::File => {
                let comparison = self.comparator.compare(reference, candidate);
                let verdict = self.policy.decide(
                    &ref_window,
                    &cand_window,
                    comparison.energy_ratio,
                    self.policy.band(ValidationMode::File),
                );
                (verdict, Some(comparison))
            }
        };

        let verdict = if measurable {
            verdict
        } else {
            verdict.unmeasurable()
        };

        Assessment {
            mode,
            reference: ref_window,
            candidate: cand_window,
            verdict,
            comparison,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::signals;

    const RENDER_LEN: usize = 96 * 128;

    #[test]
    fn same_tone_passes_both_modes() {
        let analyzer = Analyzer::default();
        let tone = signals::sine(220.5, 0.5, RENDER_LEN, 44_100);

        let live = analyzer.assess(&tone, &tone, ValidationMode::Live);
        assert!(live.pass());
        assert!(live.comparison.is_none());

        let file = analyzer.assess(&tone, &tone, ValidationMode::File);
        assert!(file.pass());
        let comparison = file.comparison.as_ref().unwrap();
        assert_eq!(comparison.energy_ratio, 1.0);
    }

    #[test]
    fn tone_against_noise_fails() {
        let analyzer = Analyzer::default();
        let tone = signals::sine(220.5, 0.5, RENDER_LEN, 44_100);
        let noise = signals::white_noise(0.5, RENDER_LEN, 44_100, 11);

        let verdict = analyzer.assess(&tone, &noise, ValidationMode::Live).verdict;
        assert!(!verdict.criteria.class_ok);
        assert!(!verdict.pass);
    }

    #[test]
    fn silent_candidate_fails_level() {
        let analyzer = Analyzer::default();
        let tone = signals::sine(220.5, 0.5, RENDER_LEN, 44_100);
        let silence = signals::silence(RENDER_LEN, 44_100);

        let file = analyzer.assess(&tone, &silence, ValidationMode::File);
        assert!(!file.verdict.criteria.level_ok);
        assert!(!file.pass());
    }

    #[test]
    fn both_silent_pass() {
        let analyzer = Analyzer::default();
        let silence = signals::silence(RENDER_LEN, 44_100);
        let file = analyzer.assess(&silence, &silence, ValidationMode::File);
        assert!(file.verdict.level_ratio.is_infinite());
        assert!(file.verdict.criteria.both_quiet);
        assert!(file.pass());
    }

    #[test]
    fn short_loud_pair_is_measured_not_silent() {
        let analyzer = Analyzer::default();
        let tone = signals::sine(220.5, 0.8, 20 * 128, 44_100);
        let noise = signals::white_noise(0.8, 20 * 128, 44_100, 5);

        for mode in [ValidationMode::Live, ValidationMode::File] {
            let assessment = analyzer.assess(&tone, &noise, mode);
            assert!(assessment.reference.absmean > 0.4, "mode {mode:?}");
            assert!(assessment.candidate.absmean > 0.3, "mode {mode:?}");
            assert!(!assessment.verdict.criteria.both_quiet, "mode {mode:?}");
            assert!(!assessment.verdict.criteria.class_ok, "mode {mode:?}");
            assert!(!assessment.pass(), "mode {mode:?}");
        }
    }

    #[test]
    fn short_matching_pair_passes() {
        let analyzer = Analyzer::default();
        let tone = signals::sine(220.5, 0.8, 20 * 128, 44_100);
        assert!(analyzer.assess(&tone, &tone, ValidationMode::Live).pass());
        assert!(analyzer.assess(&tone, &tone, ValidationMode::File).pass());
    }

    #[test]
    fn sub_block_render_fails() {
        let analyzer = Analyzer::default();
        let tone = signals::sine(220.5, 0.8, RENDER_LEN, 44_100);
        let empty = AudioBuffer::new(Vec::new(), 44_100);

        let live = analyzer.assess(&tone, &empty, ValidationMode::Live);
        assert!(!live.verdict.criteria.measurable);
        assert!(!live.pass());

        let blip = signals::silence(100, 44_100);
        let file = analyzer.assess(&blip, &blip, ValidationMode::File);
        assert!(!file.verdict.criteria.measurable);
        assert!(!file.pass());
    }
}
