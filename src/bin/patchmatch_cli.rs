use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use patchmatch::audio::read_render_output;
use patchmatch::batch::report::AssessmentReport;
use patchmatch::batch::{select_presets, validate_corpus, ValidationReport};
use patchmatch::config::{AppConfig, OutputFormat};
use patchmatch::{convert_archive, convert_file, Analyzer, ProcessRenderer, ValidationMode};

/// Failures listed in the console summary
const SUMMARY_FAILURES: usize = 15;

#[derive(Parser, Debug)]
#[command(
    name = "patchmatch_cli",
    about = "Preset translation and render-comparison harness"
)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert one preset container into a native snapshot
    Convert {
        #[arg(long)]
        preset: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Convert every preset inside a zip archive
    ConvertArchive {
        #[arg(long)]
        zip: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compare two rendered files
    Compare {
        #[arg(long)]
        reference: PathBuf,
        #[arg(long)]
        candidate: PathBuf,
        /// Include per-block metrics in the output
        #[arg(long)]
        verbose_blocks: bool,
    },
    /// Render and validate a preset corpus with the configured renderers
    Validate {
        #[arg(long)]
        preset_root: PathBuf,
        #[arg(long)]
        count: Option<usize>,
        #[arg(long)]
        supported_only: bool,
        #[arg(long, value_enum, default_value_t = ValidationMode::Live)]
        mode: ValidationMode,
        #[arg(long)]
        out_json: Option<PathBuf>,
    },
    /// List the presets a validation run would select
    ListPresets {
        #[arg(long)]
        preset_root: PathBuf,
        #[arg(long)]
        supported_only: bool,
        #[arg(long)]
        count: Option<usize>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = AppConfig::load(cli.config.as_deref());

    match cli.command {
        Commands::Convert { preset, output } => run_convert(&preset, output),
        Commands::ConvertArchive { zip, output } => run_convert_archive(&config, &zip, output),
        Commands::Compare {
            reference,
            candidate,
            verbose_blocks,
        } => run_compare(&config, &reference, &candidate, verbose_blocks),
        Commands::Validate {
            preset_root,
            count,
            supported_only,
            mode,
            out_json,
        } => run_validate(&config, &preset_root, count, supported_only, mode, out_json),
        Commands::ListPresets {
            preset_root,
            supported_only,
            count,
        } => run_list(&config, &preset_root, supported_only, count),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // ignore a second init in the same process
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_convert(preset: &Path, output: Option<PathBuf>) -> Result<ExitCode> {
    let snapshot =
        convert_file(preset).with_context(|| format!("converting {}", preset.display()))?;
    emit_json(&snapshot, output)?;
    Ok(ExitCode::from(0))
}

fn run_convert_archive(config: &AppConfig, zip: &Path, output: Option<PathBuf>) -> Result<ExitCode> {
    let result = convert_archive(zip, &config.batch.preset_extension)
        .with_context(|| format!("converting archive {}", zip.display()))?;
    emit_json(&result, output)?;

    if result.is_complete() {
        Ok(ExitCode::from(0))
    } else {
        for failure in &result.failures {
            eprintln!("FAIL {}: {}", failure.name, failure.error);
        }
        Ok(ExitCode::from(2))
    }
}

#[derive(Serialize)]
struct ComparePayload<'a> {
    reference_file: String,
    candidate_file: String,
    mode: ValidationMode,
    pass: bool,
    #[serde(flatten)]
    assessment: &'a AssessmentReport,
}

fn run_compare(
    config: &AppConfig,
    reference: &Path,
    candidate: &Path,
    verbose_blocks: bool,
) -> Result<ExitCode> {
    let sample_rate = config.analysis.sample_rate;
    let reference_buffer = read_render_output(reference, OutputFormat::Auto, sample_rate)
        .with_context(|| format!("reading {}", reference.display()))?;
    let candidate_buffer = read_render_output(candidate, OutputFormat::Auto, sample_rate)
        .with_context(|| format!("reading {}", candidate.display()))?;

    let analyzer = Analyzer::new(config);
    let assessment = analyzer.assess(&reference_buffer, &candidate_buffer, ValidationMode::File);
    let report = AssessmentReport::new(&assessment, verbose_blocks);

    emit_json(
        &ComparePayload {
            reference_file: reference.display().to_string(),
            candidate_file: candidate.display().to_string(),
            mode: assessment.mode,
            pass: assessment.pass(),
            assessment: &report,
        },
        None,
    )?;

    Ok(ExitCode::from(if assessment.pass() { 0 } else { 2 }))
}

fn run_validate(
    config: &AppConfig,
    preset_root: &Path,
    count: Option<usize>,
    supported_only: bool,
    mode: ValidationMode,
    out_json: Option<PathBuf>,
) -> Result<ExitCode> {
    let sample_rate = config.analysis.sample_rate;
    let reference = ProcessRenderer::new("reference", config.render.reference.clone(), sample_rate)
        .context("starting reference renderer runtime")?;
    let candidate = ProcessRenderer::new("candidate", config.render.candidate.clone(), sample_rate)
        .context("starting candidate renderer runtime")?;

    let report = validate_corpus(
        config,
        preset_root,
        &reference,
        &candidate,
        mode,
        supported_only,
        count.unwrap_or(config.batch.default_count),
    )?;

    let out_path = out_json.unwrap_or_else(|| config.batch.default_report.clone());
    write_report(&report, &out_path)?;
    print_summary(&report, &out_path);
    Ok(ExitCode::from(0))
}

fn run_list(
    config: &AppConfig,
    preset_root: &Path,
    supported_only: bool,
    count: Option<usize>,
) -> Result<ExitCode> {
    let selection = select_presets(
        preset_root,
        &config.batch,
        supported_only,
        count.unwrap_or(config.batch.default_count),
    )?;

    if selection.presets.is_empty() {
        println!("No presets found under {}", preset_root.display());
        return Ok(ExitCode::from(0));
    }
    for preset in &selection.presets {
        println!("{}", preset.display());
    }
    if supported_only {
        eprintln!("skipped {} unsupported presets", selection.skipped_unsupported);
    }
    Ok(ExitCode::from(0))
}

fn write_report(report: &ValidationReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json + "\n").with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn print_summary(report: &ValidationReport, out_path: &Path) {
    println!(
        "validated {} presets: {} pass / {} fail",
        report.total, report.passed, report.failed
    );
    for row in report.failures().take(SUMMARY_FAILURES) {
        println!("FAIL {}: {}", row.preset, row.failure_summary());
    }
    println!("report -> {}", out_path.display());
}

fn emit_json<T: Serialize>(value: &T, output: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    if let Some(path) = output {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}
