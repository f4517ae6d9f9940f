// Report schema for comparisons and batch runs
//
// Metrics are kept at full precision in memory. Rounding to six decimals
// happens here, during serialization, and infinite ratios serialize as the
// string "inf".

use serde::{Serialize, Serializer};

use crate::analysis::classifier::SignalClass;
use crate::analysis::compare::{BlockComparison, ComparisonCriteria, ComparisonResult};
use crate::analysis::decision::{DecisionCriteria, ValidationMode};
use crate::analysis::features::BlockFeatures;
use crate::analysis::Assessment;
use crate::error::RenderError;
use crate::mapping::curves::round6;

/// Error tag written into rows whose renders failed
pub const RENDER_FAILED: &str = "render_failed";

fn rounded<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round6(*value))
}

fn ratio<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(round6(*value))
    } else {
        serializer.serialize_str("inf")
    }
}

/// Feature vector as reported
#[derive(Debug, Clone, Serialize)]
pub struct Metrics {
    #[serde(serialize_with = "rounded")]
    pub peak: f64,
    #[serde(serialize_with = "rounded")]
    pub absmean: f64,
    #[serde(serialize_with = "rounded")]
    pub zcr: f64,
    pub lag: usize,
    #[serde(serialize_with = "rounded")]
    pub periodicity: f64,
    #[serde(serialize_with = "rounded")]
    pub frequency_hz: f64,
}

impl From<&BlockFeatures> for Metrics {
    fn from(features: &BlockFeatures) -> Self {
        Self {
            peak: features.peak,
            absmean: features.absmean,
            zcr: features.zcr,
            lag: features.lag,
            periodicity: features.periodicity,
            frequency_hz: features.frequency_hz,
        }
    }
}

/// Decision inputs and criteria
#[derive(Debug, Clone, Serialize)]
pub struct Deltas {
    pub reference_class: SignalClass,
    pub candidate_class: SignalClass,
    #[serde(serialize_with = "rounded")]
    pub zcr_delta: f64,
    #[serde(serialize_with = "rounded")]
    pub periodicity_delta: f64,
    #[serde(serialize_with = "ratio")]
    pub level_ratio: f64,
    pub criteria: DecisionCriteria,
}

/// One aligned block pair as reported
#[derive(Debug, Clone, Serialize)]
pub struct BlockRow {
    pub block: usize,
    #[serde(serialize_with = "rounded")]
    pub reference_absmean: f64,
    #[serde(serialize_with = "rounded")]
    pub candidate_absmean: f64,
    #[serde(serialize_with = "rounded")]
    pub reference_peak: f64,
    #[serde(serialize_with = "rounded")]
    pub candidate_peak: f64,
    #[serde(serialize_with = "rounded")]
    pub reference_freq: f64,
    #[serde(serialize_with = "rounded")]
    pub candidate_freq: f64,
    #[serde(serialize_with = "rounded")]
    pub reference_periodicity: f64,
    #[serde(serialize_with = "rounded")]
    pub candidate_periodicity: f64,
    #[serde(serialize_with = "rounded")]
    pub xcorr: f64,
}

impl From<&BlockComparison> for BlockRow {
    fn from(block: &BlockComparison) -> Self {
        Self {
            block: block.block,
            reference_absmean: block.reference.absmean,
            candidate_absmean: block.candidate.absmean,
            reference_peak: block.reference.peak,
            candidate_peak: block.candidate.peak,
            reference_freq: block.reference.frequency_hz,
            candidate_freq: block.candidate.frequency_hz,
            reference_periodicity: block.reference.periodicity,
            candidate_periodicity: block.candidate.periodicity,
            xcorr: block.xcorr,
        }
    }
}

/// Comparator aggregates as reported
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    #[serde(serialize_with = "ratio")]
    pub energy_ratio: f64,
    #[serde(serialize_with = "rounded")]
    pub envelope_correlation: f64,
    #[serde(serialize_with = "rounded")]
    pub pitch_match_pct: f64,
    #[serde(serialize_with = "rounded")]
    pub avg_xcorr: f64,
    pub block_count: usize,
    pub criteria: ComparisonCriteria,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<BlockRow>>,
}

impl ComparisonSummary {
    pub fn new(result: &ComparisonResult, include_blocks: bool) -> Self {
        Self {
            energy_ratio: result.energy_ratio,
            envelope_correlation: result.envelope_correlation,
            pitch_match_pct: result.pitch_match_pct,
            avg_xcorr: result.avg_xcorr,
            block_count: result.block_count(),
            criteria: result.criteria,
            blocks: include_blocks.then(|| result.blocks.iter().map(BlockRow::from).collect()),
        }
    }
}

/// Measurements, deltas and comparison of one assessed pair
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub reference: Metrics,
    pub candidate: Metrics,
    pub deltas: Deltas,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonSummary>,
}

impl AssessmentReport {
    pub fn new(assessment: &Assessment, include_blocks: bool) -> Self {
        let verdict = &assessment.verdict;
        Self {
            reference: Metrics::from(&assessment.reference),
            candidate: Metrics::from(&assessment.candidate),
            deltas: Deltas {
                reference_class: verdict.reference_class,
                candidate_class: verdict.candidate_class,
                zcr_delta: verdict.zcr_delta,
                periodicity_delta: verdict.periodicity_delta,
                level_ratio: verdict.level_ratio,
                criteria: verdict.criteria,
            },
            comparison: assessment
                .comparison
                .as_ref()
                .map(|result| ComparisonSummary::new(result, include_blocks)),
        }
    }
}

/// One preset's row in a batch report
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub preset: String,
    pub pass: bool,
    #[serde(flatten)]
    pub assessment: Option<AssessmentReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ReportRow {
    pub fn assessed(preset: impl Into<String>, assessment: &Assessment) -> Self {
        Self {
            preset: preset.into(),
            pass: assessment.pass(),
            assessment: Some(AssessmentReport::new(assessment, false)),
            error: None,
            reason: None,
        }
    }

    pub fn render_failed(preset: impl Into<String>, err: &RenderError) -> Self {
        Self {
            preset: preset.into(),
            pass: false,
            assessment: None,
            error: Some(RENDER_FAILED.to_string()),
            reason: Some(err.reason_tag().to_string()),
        }
    }

    /// Short failure description for console summaries
    pub fn failure_summary(&self) -> String {
        match (&self.assessment, &self.reason) {
            (_, Some(reason)) => format!("{} ({})", RENDER_FAILED, reason),
            (Some(assessment), None) => {
                let deltas = &assessment.deltas;
                let level = if deltas.level_ratio.is_finite() {
                    format!("{:.6}", deltas.level_ratio)
                } else {
                    "inf".to_string()
                };
                format!(
                    "class {}->{} zcr_delta={:.6} periodicity_delta={:.6} level={} [{}]",
                    deltas.reference_class.as_str(),
                    deltas.candidate_class.as_str(),
                    deltas.zcr_delta,
                    deltas.periodicity_delta,
                    level,
                    deltas.criteria.failed().join(", ")
                )
            }
            (None, None) => String::from("no measurement"),
        }
    }
}

/// Batch validation report
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub preset_root: String,
    pub mode: ValidationMode,
    pub supported_only: bool,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped_unsupported: usize,
    pub rows: Vec<ReportRow>,
}

impl ValidationReport {
    pub fn new(
        preset_root: impl Into<String>,
        mode: ValidationMode,
        supported_only: bool,
        skipped_unsupported: usize,
        rows: Vec<ReportRow>,
    ) -> Self {
        let passed = rows.iter().filter(|row| row.pass).count();
        Self {
            preset_root: preset_root.into(),
            mode,
            supported_only,
            total: rows.len(),
            passed,
            failed: rows.len() - passed,
            skipped_unsupported,
            rows,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|row| !row.pass)
    }
}
