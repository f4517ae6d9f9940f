//! Configuration management for analysis and match-policy tuning
//!
//! Every threshold the comparison pipeline uses lives here, loaded from a
//! JSON file when one is supplied so calibration can be adjusted without
//! recompiling. The level bands and override floors were tuned empirically
//! against reference renders; treat them as calibration values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::render::{OUTPUT_PLACEHOLDER, PRESET_PLACEHOLDER};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub classifier: ClassifierConfig,
    pub comparison: ComparisonConfig,
    pub decision: DecisionConfig,
    pub render: RenderConfig,
    pub batch: BatchConfig,
}

/// Block feature extraction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Samples per analysis block
    pub block_size: usize,
    /// Sample rate of every render in Hz
    pub sample_rate: u32,
    /// Smallest autocorrelation lag scanned per block
    pub min_lag: usize,
    /// Largest autocorrelation lag scanned (inclusive, capped by block length)
    pub max_lag: usize,
    /// Smallest lag scanned over the steady-state window
    pub window_min_lag: usize,
    /// Number of blocks in the steady-state window
    pub window_blocks: usize,
    /// Energy floor below which a lag is not considered
    pub energy_floor: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            block_size: 128,
            sample_rate: 44_100,
            min_lag: 20,
            max_lag: 500,
            window_min_lag: 40,
            window_blocks: 16,
            energy_floor: 1e-12,
        }
    }
}

/// Signal class decision table thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub tonal_min_periodicity: f64,
    pub tonal_max_zcr: f64,
    pub noisy_min_zcr: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            tonal_min_periodicity: 0.75,
            tonal_max_zcr: 0.12,
            noisy_min_zcr: 0.45,
        }
    }
}

/// Pairwise comparator parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Absmean below which a block counts as silent
    pub silence_floor: f64,
    /// Max larger/smaller frequency ratio that still counts as agreement
    pub pitch_ratio_limit: f64,
    /// Reference energy at or below this makes the energy ratio infinite
    pub energy_floor: f64,
    /// Envelope correlation above which the envelope criterion holds
    pub min_envelope_correlation: f64,
    /// Pitch match percentage at or above which the pitch criterion holds
    pub min_pitch_match_pct: f64,
    /// Average cross-correlation above which the xcorr criterion holds
    pub min_avg_xcorr: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            silence_floor: 0.005,
            pitch_ratio_limit: 1.10,
            energy_floor: 1e-6,
            min_envelope_correlation: 0.85,
            min_pitch_match_pct: 70.0,
            min_avg_xcorr: 0.5,
        }
    }
}

/// Inclusive bounds an energy/level ratio must fall within
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelBand {
    pub min: f64,
    pub max: f64,
}

impl LevelBand {
    /// Band used when comparing live-engine measurements
    pub const LIVE: LevelBand = LevelBand {
        min: 0.15,
        max: 7.0,
    };

    /// Band used when comparing rendered files
    pub const FILE: LevelBand = LevelBand { min: 0.2, max: 5.0 };

    /// Infinite ratios never fall inside a band
    pub fn contains(&self, ratio: f64) -> bool {
        ratio.is_finite() && ratio >= self.min && ratio <= self.max
    }
}

/// Match decision policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub live_level_band: LevelBand,
    pub file_level_band: LevelBand,
    pub max_zcr_delta: f64,
    pub max_periodicity_delta: f64,
    /// Both absmeans below this pass as mutual near-silence
    pub quiet_floor: f64,
    /// Reference absmean below this counts as a dropout
    pub dropout_reference_floor: f64,
    /// Candidate absmean must stay below this for the dropout override
    pub dropout_candidate_ceiling: f64,
    /// Reference window absmean at or below this makes the live ratio degenerate
    pub live_level_floor: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            live_level_band: LevelBand::LIVE,
            file_level_band: LevelBand::FILE,
            max_zcr_delta: 0.50,
            max_periodicity_delta: 0.60,
            quiet_floor: 0.008,
            dropout_reference_floor: 0.0001,
            dropout_candidate_ceiling: 0.15,
            live_level_floor: 1e-5,
        }
    }
}

/// Decoding applied to a renderer's output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Pick from the output file extension
    Auto,
    /// Mono 16-bit PCM WAV
    Wav,
    /// Headerless little-endian f32 samples
    RawF32,
}

/// External renderer invocation
///
/// Fields left out of a config section take the values below, so a section
/// may set only `program` and `args`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererCommand {
    pub program: String,
    /// Arguments; `{preset}` and `{output}` are substituted per call
    pub args: Vec<String>,
    pub timeout_ms: u64,
    pub output_format: OutputFormat,
    /// File name of the render inside the per-preset scratch directory
    pub output_name: String,
}

impl Default for RendererCommand {
    fn default() -> Self {
        Self {
            program: String::new(),
            args: vec![PRESET_PLACEHOLDER.to_string(), OUTPUT_PLACEHOLDER.to_string()],
            timeout_ms: 30_000,
            output_format: OutputFormat::Auto,
            output_name: "render.wav".to_string(),
        }
    }
}

/// Fixed stimulus every renderer plays
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StimulusScript {
    pub note: u8,
    pub velocity: u8,
    /// Blocks rendered with the note held
    pub hold_blocks: usize,
    /// Blocks rendered after note-off
    pub release_blocks: usize,
}

impl Default for StimulusScript {
    fn default() -> Self {
        Self {
            note: 60,
            velocity: 110,
            hold_blocks: 64,
            release_blocks: 32,
        }
    }
}

impl StimulusScript {
    pub fn total_blocks(&self) -> usize {
        self.hold_blocks + self.release_blocks
    }
}

/// Render adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub reference: RendererCommand,
    pub candidate: RendererCommand,
    pub stimulus: StimulusScript,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            reference: RendererCommand {
                program: "render_reference_wav".to_string(),
                output_name: "reference.wav".to_string(),
                ..RendererCommand::default()
            },
            candidate: RendererCommand {
                program: "render_candidate_wav".to_string(),
                timeout_ms: 10_000,
                output_name: "candidate.wav".to_string(),
                ..RendererCommand::default()
            },
            stimulus: StimulusScript::default(),
        }
    }
}

/// Batch selection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Attributes that mark a preset as using an unsupported subsystem
    pub unsupported_flags: Vec<String>,
    /// Flag values strictly above this count as enabled
    pub flag_threshold: f64,
    /// File extension of preset containers
    pub preset_extension: String,
    /// Default number of presets to validate
    pub default_count: usize,
    pub default_report: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            unsupported_flags: [
                "arpenabled",
                "seqenabled",
                "fmpulse",
                "fmsaw",
                "fmsubosc",
                "fmnoise",
                "fmintensity",
                "polymode",
            ]
            .iter()
            .map(|flag| flag.to_string())
            .collect(),
            flag_threshold: 0.5,
            preset_extension: "vstpreset".to_string(),
            default_count: 50,
            default_report: PathBuf::from("build/validation_report.json"),
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration. If the file doesn't exist or the JSON is
    /// invalid, a warning is logged and the defaults are returned.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load from an optional path, defaults when none is given
    pub fn load(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::default(),
        }
    }
}
