// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Static file registry.
//!
//! Responsibilities:
//! - Hold the immutable logical-name → path mapping built from configuration.
//! - Guarantee the static content root exists at startup and warn about
//!   registered files that are missing from disk.
//! - Resolve requested download names to paths without ever escaping the
//!   root.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use thiserror::Error;

use crate::config::ServerConfig;

/// Why a requested download name could not be served.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DownloadError {
    /// The name is empty, contains path separators, or tries to traverse out
    /// of the static root.
    #[error("Invalid file request: {0:?}")]
    InvalidName(String),

    /// The name is well-formed but no such file exists under the root.
    #[error("File not found: {0}")]
    NotFound(String),
}

/// A (logical name, on-disk path) pair known to the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredFile {
    pub name: String,
    pub path: PathBuf,
}

/// Immutable registry of downloadable files plus the root they live under.
#[derive(Clone, Debug)]
pub struct FileRegistry {
    root: PathBuf,
    files: Vec<RegisteredFile>,
}

impl FileRegistry {
    /// Build the registry from validated configuration. Registered paths are
    /// anchored under the static root.
    pub fn from_config(config: &ServerConfig) -> Self {
        let files = config
            .decks
            .iter()
            .map(|deck| RegisteredFile {
                name: deck.name.clone(),
                path: config.static_root.join(deck.relative_path()),
            })
            .collect();

        Self {
            root: config.static_root.clone(),
            files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[RegisteredFile] {
        &self.files
    }

    /// Create the static content root if missing.
    ///
    /// Failure is logged rather than raised; the server still starts and
    /// reports per-file errors at request time.
    pub fn ensure_root(&self) {
        if self.root.is_dir() {
            return;
        }
        match fs::create_dir_all(&self.root) {
            Ok(()) => warn!(
                "Static content root {:?} was missing and has been created",
                self.root
            ),
            Err(e) => warn!("Failed to create static content root {:?}: {}", self.root, e),
        }
    }

    /// Warn about registered files whose backing path does not exist.
    ///
    /// Missing files are not fatal; the download handler answers 404 for
    /// them until they appear on disk.
    pub fn check_registered_files(&self) {
        for file in self.missing_files() {
            warn!(
                "Registered file {:?} is missing from disk (expected at {:?})",
                file.name, file.path
            );
        }
    }

    /// Registered entries currently absent from disk. Existence is checked
    /// on every call, never cached.
    pub fn missing_files(&self) -> Vec<&RegisteredFile> {
        self.files.iter().filter(|f| !f.path.is_file()).collect()
    }
}

/// Resolve a requested download name to a path under `root`.
///
/// Matching is literal and case-sensitive. Names containing path separators
/// or `..` are rejected before the filesystem is consulted, so a request can
/// never escape the static root.
pub fn resolve(filename: &str, root: &Path) -> Result<PathBuf, DownloadError> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return Err(DownloadError::InvalidName(filename.to_string()));
    }

    let path = root.join(filename);
    if path.is_file() {
        Ok(path)
    } else {
        Err(DownloadError::NotFound(filename.to_string()))
    }
}
