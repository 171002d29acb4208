//! Zip container for installable packages.
use anyhow::{Context, Result};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Name of the package metadata entry inside every archive.
pub const PACKAGE_METADATA_FILE: &str = "kmp.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Write `entries` into an in-memory zip, in order.
///
/// Entries carry a fixed timestamp so the same inputs give the same bytes.
pub fn write_archive(entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        writer
            .start_file(entry.name.as_str(), options)
            .with_context(|| format!("add {} to package", entry.name))?;
        writer
            .write_all(&entry.bytes)
            .with_context(|| format!("write {} to package", entry.name))?;
    }
    let cursor = writer.finish().context("finish package archive")?;
    Ok(cursor.into_inner())
}
