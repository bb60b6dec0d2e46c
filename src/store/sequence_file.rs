// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::model::{Folder, GripperStep, MoveMode, Node, PoseStep};

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Valid JSON that is not a sequence (not an array, unknown step type, bad field value).
    MalformedFile {
        path: PathBuf,
        reason: String,
    },
    EmptySequence,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::MalformedFile { path, reason } => {
                write!(f, "invalid sequence file {path:?}: {reason}")
            }
            Self::EmptySequence => f.write_str("sequence is empty"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::MalformedFile { .. } | Self::EmptySequence => None,
        }
    }
}

/// Failure to turn JSON text into steps, before any file path is attached.
#[derive(Debug)]
pub enum DecodeError {
    Json(serde_json::Error),
    Malformed(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "{err}"),
            Self::Malformed(reason) => f.write_str(reason),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Malformed(_) => None,
        }
    }
}

impl DecodeError {
    fn at(self, path: &Path) -> StoreError {
        match self {
            Self::Json(source) => StoreError::Json {
                path: path.to_path_buf(),
                source,
            },
            Self::Malformed(reason) => StoreError::MalformedFile {
                path: path.to_path_buf(),
                reason,
            },
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Writes a temp file and renames it into place without fsync.
    #[default]
    BestEffort,

    /// Also syncs the file contents and the parent directory. Exact guarantees depend on the
    /// platform and filesystem.
    Durable,
}

/// A sequence stored at a single path.
#[derive(Debug, Clone)]
pub struct SequenceFile {
    path: PathBuf,
    durability: WriteDurability,
}

impl SequenceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the whole file. Nothing is returned unless every entry is valid.
    pub fn load(&self) -> Result<Vec<Node>, StoreError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let nodes = from_json_str(&raw).map_err(|err| err.at(&self.path))?;
        debug!(path = ?self.path, roots = nodes.len(), "loaded sequence");
        Ok(nodes)
    }

    /// Writes `nodes` atomically. An empty sequence is refused.
    pub fn save(&self, nodes: &[Node]) -> Result<(), StoreError> {
        if nodes.is_empty() {
            return Err(StoreError::EmptySequence);
        }
        let contents = to_json_string(nodes).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        write_atomic(&self.path, contents.as_bytes(), self.durability)?;
        debug!(path = ?self.path, roots = nodes.len(), "saved sequence");
        Ok(())
    }
}

/// Pretty-printed JSON array with a trailing newline.
pub fn to_json_string(nodes: &[Node]) -> Result<String, serde_json::Error> {
    let steps: Vec<StepJson> = nodes.iter().map(StepJson::from).collect();
    let mut out = serde_json::to_string_pretty(&steps)?;
    out.push('\n');
    Ok(out)
}

/// Decodes a JSON array of steps. Entries without a `type` are tagged `pose` when they carry
/// `joints` and `gripper` otherwise, at any depth.
///
/// Zero values are kept as written: `"duration": 0` replays with no wait and `"effort": 0` is
/// sent as 0. Only an absent field falls back to a default.
pub fn from_json_str(raw: &str) -> Result<Vec<Node>, DecodeError> {
    let mut value: Value = serde_json::from_str(raw).map_err(DecodeError::Json)?;
    let Value::Array(entries) = &mut value else {
        return Err(DecodeError::Malformed("top-level value is not an array".to_owned()));
    };
    for entry in entries.iter_mut() {
        tag_legacy_entry(entry);
    }

    let steps: Vec<StepJson> = serde_json::from_value(value).map_err(DecodeError::Json)?;
    steps.into_iter().map(Node::try_from).collect()
}

// Extracted JSON DTOs and the atomic write helper for `SequenceFile`.
include!("sequence_file/helpers.rs");

#[cfg(test)]
mod tests;
