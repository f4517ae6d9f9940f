//! Preset translation: container bytes to native snapshots.
//!
//! Single containers fail with a [`FormatError`]. Archives convert entry by
//! entry; a broken entry is recorded as a failure and the rest still
//! convert.

use std::path::Path;

use serde::Serialize;

use crate::error::{log_format_error, ErrorCode, FormatError};
use crate::mapping::{map_program, NativeSnapshot};
use crate::preset::{load_attributes, program_attributes, read_archive_presets};

/// Convert raw container bytes
pub fn convert_blob(blob: &[u8]) -> Result<NativeSnapshot, FormatError> {
    let attrs = program_attributes(blob)?;
    Ok(map_program(&attrs))
}

/// Convert one container file
pub fn convert_file(path: &Path) -> Result<NativeSnapshot, FormatError> {
    let attrs = load_attributes(path)?;
    let snapshot = map_program(&attrs);
    tracing::debug!(path = %path.display(), name = %snapshot.name, "converted preset");
    Ok(snapshot)
}

/// Archive entry that could not be converted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionFailure {
    pub name: String,
    pub code: i32,
    pub error: String,
}

/// Outcome of converting a whole archive
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveConversion {
    pub archive: String,
    pub converted: Vec<NativeSnapshot>,
    pub failures: Vec<ConversionFailure>,
}

impl ArchiveConversion {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Convert every `*.<extension>` entry of a zip archive, in entry-name order
///
/// Each snapshot is tagged with its entry path. Only an unreadable archive
/// fails the call as a whole.
pub fn convert_archive(path: &Path, extension: &str) -> Result<ArchiveConversion, FormatError> {
    let entries = read_archive_presets(path, extension)?;
    let mut converted = Vec::with_capacity(entries.len());
    let mut failures = Vec::new();

    for entry in entries {
        match convert_blob(&entry.bytes) {
            Ok(snapshot) => converted.push(snapshot.with_archive_path(entry.name)),
            Err(err) => {
                log_format_error(&err, &entry.name);
                failures.push(ConversionFailure {
                    name: entry.name,
                    code: err.code(),
                    error: err.message(),
                });
            }
        }
    }

    tracing::info!(
        archive = %path.display(),
        converted = converted.len(),
        failed = failures.len(),
        "archive converted"
    );

    Ok(ArchiveConversion {
        archive: path.display().to_string(),
        converted,
        failures,
    })
}
