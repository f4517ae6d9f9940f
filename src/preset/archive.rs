// Zip archives of preset containers
//
// Factory banks ship as zip files. Entries are read in name order so that
// conversions are reproducible; macOS resource forks are skipped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::FormatError;

/// One preset container read from an archive
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Path of the entry inside the archive
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Read every `*.<extension>` entry of a zip archive, sorted by entry name
pub fn read_archive_presets(path: &Path, extension: &str) -> Result<Vec<ArchiveEntry>, FormatError> {
    let unreadable = |reason: String| FormatError::Unreadable {
        path: path.display().to_string(),
        reason,
    };

    let file = File::open(path).map_err(|err| unreadable(err.to_string()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|err| unreadable(err.to_string()))?;
    let suffix = format!(".{extension}");

    let mut entries = Vec::new();
    for idx in 0..archive.len() {
        let mut entry = archive
            .by_index(idx)
            .map_err(|err| unreadable(err.to_string()))?;
        let name = entry.name().to_string();
        if entry.is_dir() || !name.ends_with(&suffix) || name.starts_with("__MACOSX/") {
            continue;
        }

        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|err| unreadable(format!("{name}: {err}")))?;
        entries.push(ArchiveEntry { name, bytes });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
