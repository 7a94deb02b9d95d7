//! CSV encoding of crawl records
//!
//! Fields containing the delimiter, quotes or line breaks (team and referee
//! names are free text) are quoted rather than emitted raw.

use crate::output::{OutputError, OutputResult};
use crate::state::{ItemRecord, COLUMNS};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Encodes the header and one row per record, in order
pub fn serialize_records(records: &[ItemRecord]) -> OutputResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_rows(&mut writer, records)?;

    let bytes = writer
        .into_inner()
        .map_err(|e| OutputError::Write(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| OutputError::Format(e.to_string()))
}

/// Writes the records to `path`, creating parent directories as needed
pub fn write_records(path: &Path, records: &[ItemRecord]) -> OutputResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_writer(File::create(path)?);
    write_rows(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Writes a snapshot and reports failures instead of returning them
///
/// # Returns
///
/// * `Some(PathBuf)` - The file was written
/// * `None` - Writing failed; the error has been logged
pub fn save_snapshot(path: &Path, records: &[ItemRecord]) -> Option<PathBuf> {
    match write_records(path, records) {
        Ok(()) => {
            tracing::info!("Wrote {} records to {}", records.len(), path.display());
            Some(path.to_path_buf())
        }
        Err(e) => {
            tracing::error!("Failed to write {}: {}", path.display(), e);
            None
        }
    }
}

fn write_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    records: &[ItemRecord],
) -> OutputResult<()> {
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    Ok(())
}
