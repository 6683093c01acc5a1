// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Server configuration.
//!
//! Responsibilities:
//! - Describe the full runtime configuration as one explicit struct instead
//!   of module-level globals.
//! - Load an optional TOML file, apply environment overrides, and validate
//!   the result before the server starts.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};
use serde::Deserialize;

/// A single downloadable deck known to the dashboard.
///
/// `path` is relative to the static content root and defaults to the logical
/// name itself, so plain entries only need a `name`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DeckEntry {
    pub name: String,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl DeckEntry {
    /// Relative location of the backing file under the static root.
    pub fn relative_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from(&self.name))
    }
}

/// Complete runtime configuration, constructed once at process start.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding all downloadable source files. Created on startup
    /// when missing.
    #[serde(default = "default_static_root")]
    pub static_root: PathBuf,
    /// Reserved download name that triggers an archive rebuild.
    #[serde(default = "default_archive_name")]
    pub archive_name: String,
    /// Verbose logging, matching the old dashboard's debug mode.
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_decks")]
    pub decks: Vec<DeckEntry>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_root: default_static_root(),
            archive_name: default_archive_name(),
            debug: false,
            decks: default_decks(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8050
}

fn default_static_root() -> PathBuf {
    PathBuf::from("static")
}

fn default_archive_name() -> String {
    "archive.zip".to_string()
}

fn default_decks() -> Vec<DeckEntry> {
    vec![DeckEntry {
        name: "Staff Qualification Overview Per Department.pptx".to_string(),
        path: None,
    }]
}

impl ServerConfig {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist. Environment overrides are applied afterwards.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = if path.as_ref().exists() {
            let content = fs::read_to_string(path.as_ref())
                .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
            toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?
        } else {
            ServerConfig::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported environment variables:
    /// - DECKHUB_HOST: Override host
    /// - DECKHUB_PORT: Override port
    /// - DECKHUB_STATIC_ROOT: Override static_root
    fn apply_env_overrides(&mut self) -> Result<()> {
        use std::env;

        if let Ok(host) = env::var("DECKHUB_HOST") {
            self.host = host;
        }

        if let Ok(port_str) = env::var("DECKHUB_PORT") {
            self.port = port_str
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid DECKHUB_PORT value: {}", port_str))?;
        }

        if let Ok(root) = env::var("DECKHUB_STATIC_ROOT") {
            self.static_root = PathBuf::from(root);
        }

        Ok(())
    }

    /// Reject configurations that would let a registered entry escape the
    /// static root or shadow the aggregate archive.
    fn validate(&self) -> Result<()> {
        if self.archive_name.is_empty()
            || self.archive_name.contains('/')
            || self.archive_name.contains('\\')
            || self.archive_name.contains("..")
        {
            bail!("archive_name must be a plain file name: {:?}", self.archive_name);
        }

        let mut seen = std::collections::HashSet::new();
        for deck in &self.decks {
            if deck.name.is_empty() || deck.name.contains('/') || deck.name.contains('\\') {
                bail!("Registered deck name must be a plain file name: {:?}", deck.name);
            }
            if !seen.insert(deck.name.as_str()) {
                bail!("Duplicate registered deck name: {}", deck.name);
            }
            if deck.name == self.archive_name {
                bail!(
                    "Registered deck '{}' collides with the archive name; the archive would pack itself",
                    deck.name
                );
            }

            let rel = deck.relative_path();
            if rel.is_absolute() {
                bail!("Registered deck path must be relative: {:?}", rel);
            }
            if rel
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
            {
                bail!("Registered deck path escapes the static root: {:?}", rel);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{DeckEntry, ServerConfig};

    // Defaults reproduce the original deployment: local Dash port, `static`
    // root, one registered deck.
    #[test]
    fn defaults_match_original_deployment() {
        let config = ServerConfig::default();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8050);
        assert_eq!(config.static_root, PathBuf::from("static"));
        assert_eq!(config.archive_name, "archive.zip");
        assert_eq!(config.decks.len(), 1);
        assert!(config.decks[0].name.ends_with(".pptx"));
    }

    #[test]
    fn load_parses_toml_and_applies_field_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deckhub.toml");
        std::fs::write(
            &path,
            r#"
port = 9000
static_root = "decks"

[[decks]]
name = "Quarterly Review.pptx"

[[decks]]
name = "Renamed.pptx"
path = "on-disk-name.pptx"
"#,
        )
        .unwrap();

        let config = ServerConfig::load(&path).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.static_root, PathBuf::from("decks"));
        assert_eq!(config.decks.len(), 2);
        assert_eq!(
            config.decks[1].relative_path(),
            PathBuf::from("on-disk-name.pptx")
        );
    }

    // A missing config file is not an error; defaults apply.
    #[test]
    fn load_falls_back_to_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load(dir.path().join("nope.toml")).unwrap();

        assert_eq!(config.port, 8050);
    }

    #[test]
    fn validate_rejects_traversal_paths() {
        let mut config = ServerConfig::default();
        config.decks = vec![DeckEntry {
            name: "evil.pptx".to_string(),
            path: Some(PathBuf::from("../secret.pptx")),
        }];

        assert!(config.validate().is_err());
    }

    // Download names are single path segments; separators can never match.
    #[test]
    fn validate_rejects_separator_in_deck_name() {
        let mut config = ServerConfig::default();
        config.decks = vec![DeckEntry {
            name: "sub/deck.pptx".to_string(),
            path: None,
        }];

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_absolute_paths() {
        let mut config = ServerConfig::default();
        config.decks = vec![DeckEntry {
            name: "abs.pptx".to_string(),
            path: Some(PathBuf::from("/etc/passwd")),
        }];

        assert!(config.validate().is_err());
    }

    // The archive lives inside the static root, so an entry with the same
    // name would make every rebuild pack the previous archive.
    #[test]
    fn validate_rejects_deck_named_like_archive() {
        let mut config = ServerConfig::default();
        config.decks.push(DeckEntry {
            name: config.archive_name.clone(),
            path: None,
        });

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_names() {
        let mut config = ServerConfig::default();
        let first = config.decks[0].clone();
        config.decks.push(first);

        assert!(config.validate().is_err());
    }
}
