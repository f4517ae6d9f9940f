// Preset corpus discovery and capability filtering

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use walkdir::WalkDir;

use crate::config::BatchConfig;
use crate::preset::{load_attributes, AttributeSet};

/// Every `*.<extension>` file under `root`, sorted by path
pub fn discover_presets(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(anyhow!("preset root not found: {}", root.display()));
    }

    let mut presets = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
            presets.push(path.to_path_buf());
        }
    }

    presets.sort();
    Ok(presets)
}

/// Skips presets that enable a subsystem the candidate engine lacks
#[derive(Debug, Clone)]
pub struct CapabilityFilter {
    flags: Vec<String>,
    threshold: f64,
}

impl CapabilityFilter {
    pub fn new(flags: Vec<String>, threshold: f64) -> Self {
        Self { flags, threshold }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new(config.unsupported_flags.clone(), config.flag_threshold)
    }

    /// Unsupported flags enabled in `attrs`
    ///
    /// Only numeric values strictly above the threshold count.
    pub fn active_flags(&self, attrs: &AttributeSet) -> Vec<String> {
        self.flags
            .iter()
            .filter(|flag| {
                attrs
                    .get(flag)
                    .and_then(|value| value.as_number())
                    .is_some_and(|value| value > self.threshold)
            })
            .cloned()
            .collect()
    }

    /// Whether a preset file can be validated
    ///
    /// Unreadable presets are kept so their failure shows up in the report.
    pub fn is_supported(&self, path: &Path) -> bool {
        match load_attributes(path) {
            Ok(attrs) => {
                let active = self.active_flags(&attrs);
                if !active.is_empty() {
                    tracing::debug!(preset = %path.display(), ?active, "skipping unsupported preset");
                }
                active.is_empty()
            }
            Err(_) => true,
        }
    }
}

/// Presets chosen for a batch run
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub presets: Vec<PathBuf>,
    pub skipped_unsupported: usize,
    pub requested: usize,
}

/// Walk `root`, optionally drop unsupported presets, and keep the first `count`
pub fn select_presets(
    root: &Path,
    config: &BatchConfig,
    supported_only: bool,
    count: usize,
) -> Result<Selection> {
    let filter = CapabilityFilter::from_config(config);
    let mut selection = Selection {
        requested: count,
        ..Selection::default()
    };

    for path in discover_presets(root, &config.preset_extension)? {
        if selection.presets.len() >= count {
            break;
        }
        if supported_only && !filter.is_supported(&path) {
            selection.skipped_unsupported += 1;
            continue;
        }
        selection.presets.push(path);
    }

    if selection.presets.len() < count {
        tracing::warn!(
            requested = count,
            selected = selection.presets.len(),
            "fewer presets selected than requested"
        );
    }
    Ok(selection)
}
