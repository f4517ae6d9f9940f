//! Batch validation over a preset corpus.
//!
//! Presets are processed sequentially and independently: each one gets its
//! own scratch directory, both renders, one assessment and one report row.
//! A render failure only fails that preset's row.

mod discovery;
pub mod report;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

pub use discovery::{discover_presets, select_presets, CapabilityFilter, Selection};
pub use report::{ReportRow, ValidationReport};

use crate::analysis::decision::ValidationMode;
use crate::analysis::Analyzer;
use crate::config::AppConfig;
use crate::error::log_render_error;
use crate::render::Renderer;

/// Drives both renderers and the analyzer over a list of presets
pub struct BatchRunner<'a> {
    reference: &'a dyn Renderer,
    candidate: &'a dyn Renderer,
    analyzer: Analyzer,
    mode: ValidationMode,
    reference_output: String,
    candidate_output: String,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        config: &AppConfig,
        reference: &'a dyn Renderer,
        candidate: &'a dyn Renderer,
        mode: ValidationMode,
    ) -> Self {
        let reference_output = config.render.reference.output_name.clone();
        let mut candidate_output = config.render.candidate.output_name.clone();
        // a stale reference file must never read as the candidate's output
        if candidate_output == reference_output {
            candidate_output = format!("candidate-{candidate_output}");
        }

        Self {
            reference,
            candidate,
            analyzer: Analyzer::new(config),
            mode,
            reference_output,
            candidate_output,
        }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// One row per preset, in input order
    pub fn run(&self, presets: &[PathBuf]) -> Result<Vec<ReportRow>> {
        let mut rows = Vec::with_capacity(presets.len());
        for (index, preset) in presets.iter().enumerate() {
            tracing::info!(
                "[{}/{}] {}",
                index + 1,
                presets.len(),
                preset_label(preset)
            );
            rows.push(self.run_one(preset)?);
        }
        Ok(rows)
    }

    /// Render and assess one preset
    ///
    /// Only a scratch-directory failure is an error; render failures become
    /// failed rows.
    pub fn run_one(&self, preset: &Path) -> Result<ReportRow> {
        let id = preset.display().to_string();
        let scratch = tempfile::Builder::new()
            .prefix("patchmatch-")
            .tempdir()
            .context("creating scratch directory")?;

        let started = Instant::now();
        let renders = self
            .reference
            .render(preset, &scratch.path().join(&self.reference_output))
            .and_then(|reference| {
                self.candidate
                    .render(preset, &scratch.path().join(&self.candidate_output))
                    .map(|candidate| (reference, candidate))
            });

        let (reference, candidate) = match renders {
            Ok(pair) => pair,
            Err(err) => {
                log_render_error(&err, &id);
                return Ok(ReportRow::render_failed(id, &err));
            }
        };

        let assessment = self.analyzer.assess(&reference, &candidate, self.mode);
        tracing::debug!(
            preset = %id,
            pass = assessment.pass(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "preset assessed"
        );
        Ok(ReportRow::assessed(id, &assessment))
    }
}

/// Select, run and summarize a batch
pub fn validate_corpus(
    config: &AppConfig,
    root: &Path,
    reference: &dyn Renderer,
    candidate: &dyn Renderer,
    mode: ValidationMode,
    supported_only: bool,
    count: usize,
) -> Result<ValidationReport> {
    let selection = select_presets(root, &config.batch, supported_only, count)?;
    tracing::info!(
        selected = selection.presets.len(),
        skipped_unsupported = selection.skipped_unsupported,
        reference = reference.name(),
        candidate = candidate.name(),
        "starting validation"
    );

    let runner = BatchRunner::new(config, reference, candidate, mode);
    let rows = runner.run(&selection.presets)?;
    Ok(ValidationReport::new(
        root.display().to_string(),
        mode,
        supported_only,
        selection.skipped_unsupported,
        rows,
    ))
}

fn preset_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
