// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor configuration.
//!
//! Every field has a default, so a config file only needs to mention what it overrides:
//!
//! ```json
//! { "history_limit": 100, "pose_defaults": { "speed": 30 } }
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::history::DEFAULT_HISTORY_LIMIT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum entries kept on each of the undo and redo stacks.
    pub history_limit: usize,
    /// Post-step wait for steps without an explicit duration.
    pub default_step_delay_ms: u64,
    pub pose_defaults: PoseDefaults,
    pub gripper_defaults: GripperDefaults,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_step_delay_ms: 1000,
            pose_defaults: PoseDefaults::default(),
            gripper_defaults: GripperDefaults::default(),
        }
    }
}

/// Field values for poses captured from the arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseDefaults {
    pub name: String,
    pub speed: u8,
    pub duration_ms: u64,
}

impl Default for PoseDefaults {
    fn default() -> Self {
        Self {
            name: "Pose".to_owned(),
            speed: 50,
            duration_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GripperDefaults {
    pub effort: u32,
    pub duration_ms: u64,
    /// Values strictly above the threshold are named as opening actions.
    pub open_threshold: u8,
    pub open_name: String,
    pub close_name: String,
}

impl Default for GripperDefaults {
    fn default() -> Self {
        Self {
            effort: 1000,
            duration_ms: 500,
            open_threshold: 50,
            open_name: "Gripper Open".to_owned(),
            close_name: "Gripper Close".to_owned(),
        }
    }
}

impl GripperDefaults {
    pub fn name_for(&self, value: u8) -> &str {
        if value > self.open_threshold {
            &self.open_name
        } else {
            &self.close_name
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read config {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "invalid config {path:?}: {source}"),
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

impl EditorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
