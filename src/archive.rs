// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Aggregate archive assembly.
//!
//! Responsibilities:
//! - Rebuild the combined ZIP of all registered files from scratch on every
//!   request for the aggregate name.
//! - Skip registered files that are currently missing from disk.
//! - Write to a temporary sibling and rename over the target, so a failed
//!   build leaves any previous archive intact.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use zip::{CompressionMethod, write::FileOptions};

use crate::registry::FileRegistry;

/// Build a fresh archive of every registered file that exists on disk and
/// write it to `output`, replacing any previous archive there.
///
/// Each member is stored under its logical name. Registered files without a
/// backing file are skipped with a warning. Returns the number of members
/// written.
pub fn build_archive(registry: &FileRegistry, output: &Path) -> Result<usize> {
    // Ensure parent exists so the archive can be written without IO errors.
    if let Some(parent) = output.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create archive directory {:?}", parent))?;
    }

    let tmp = tmp_path(output);
    let members = write_members(registry, &tmp).inspect_err(|_| {
        // Leave no half-written temp file behind on failure.
        let _ = fs::remove_file(&tmp);
    })?;

    fs::rename(&tmp, output)
        .with_context(|| format!("Failed to move finished archive into place at {:?}", output))?;

    Ok(members)
}

/// Temporary sibling path the archive is assembled at before the rename.
fn tmp_path(output: &Path) -> std::path::PathBuf {
    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    output.with_file_name(name)
}

fn write_members(registry: &FileRegistry, tmp: &Path) -> Result<usize> {
    let file = File::create(tmp)
        .with_context(|| format!("Failed to create archive file {:?}", tmp))?;
    let mut zip = zip::ZipWriter::new(file);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut members = 0;
    for entry in registry.files() {
        if !entry.path.is_file() {
            warn!(
                "Skipping registered file {:?}: missing at {:?}",
                entry.name, entry.path
            );
            continue;
        }

        zip.start_file(&entry.name, options)
            .with_context(|| format!("Failed to add {} to archive", entry.name))?;

        let mut reader = File::open(&entry.path)
            .with_context(|| format!("Failed to read source file {:?}", entry.path))?;
        io::copy(&mut reader, &mut zip)
            .with_context(|| format!("Failed to write {} into archive", entry.name))?;

        members += 1;
    }

    zip.finish().context("Failed to finalize archive")?;
    Ok(members)
}
