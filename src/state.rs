// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared application state handed to the request handlers.

use crate::config::ServerConfig;
use crate::registry::FileRegistry;

/// Everything a request handler needs, built once at startup.
#[derive(Clone, Debug)]
pub struct AppState {
    pub registry: FileRegistry,
    /// Reserved download name that triggers an archive rebuild.
    pub archive_name: String,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            registry: FileRegistry::from_config(config),
            archive_name: config.archive_name.clone(),
        }
    }
}
