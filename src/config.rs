// SPDX-FileCopyrightText: 2026 The Netgraph Authors
// SPDX-License-Identifier: LicenseRef-Netgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Netgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Display and viewport settings of one diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NetGraphConfig {
    /// Main viewport size in device pixels.
    pub width: f64,
    pub height: f64,
    /// Minimap size in device pixels.
    pub minimap_width: f64,
    pub minimap_height: f64,
    /// Label size in percent, used while `zoom_fonts` is off.
    pub font_size: f64,
    pub zoom_fonts: bool,
    /// Rescale top-level items with the viewport so their on-screen aspect is kept.
    pub aspect_resize: bool,
    pub transparent_nets: bool,
    pub show_minimap: bool,
}

impl Default for NetGraphConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            minimap_width: 200.0,
            minimap_height: 150.0,
            font_size: 100.0,
            zoom_fonts: false,
            aspect_resize: false,
            transparent_nets: false,
            show_minimap: true,
        }
    }
}

impl NetGraphConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_owned(),
            source,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}
