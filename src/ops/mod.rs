// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editing operations on a [`Session`].
//!
//! Every tree-changing operation edits a copy of the tree and commits it in one step, so the
//! replaced tree becomes the undo snapshot and a failed operation leaves the session untouched.
//! Results carry a coarse [`Delta`] the host uses to refresh its rendering.

use std::fmt;

use tracing::debug;

use crate::model::{
    EndPose, Folder, GripperStep, Joints, MoveMode, Node, NodeKind, NodePath, PoseStep, Session,
    Tree, TreeError,
};

pub mod reorder;

pub use reorder::{classify_drop, drag_over, drag_start, drop_on, move_node, DropZone};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Select { path: NodePath, multi: bool },
    ClearSelection,
    AddFolder,
    CapturePose { joints: Joints, end_pose: EndPose },
    AddGripperAction { value: u8, effort: Option<u32> },
    DeleteSelected,
    Delete { path: NodePath },
    Edit { path: NodePath, patch: StepPatch },
    ToggleCollapsed { path: NodePath },
    Cut,
    Copy,
    Paste,
    Undo,
    Redo,
    Move { source: NodePath, dest: NodePath, zone: DropZone },
}

impl Op {
    /// Maps a key press to an op. `key` is the key name as reported by the host (`"z"`,
    /// `"Delete"`); `command` is ctrl on Linux/Windows and cmd on macOS.
    pub fn from_shortcut(key: &str, command: bool, shift: bool) -> Option<Self> {
        if matches!(key, "Delete" | "Backspace") {
            return Some(Self::DeleteSelected);
        }
        if !command {
            return None;
        }
        match key.to_ascii_lowercase().as_str() {
            "x" => Some(Self::Cut),
            "c" => Some(Self::Copy),
            "v" => Some(Self::Paste),
            "z" if shift => Some(Self::Redo),
            "z" => Some(Self::Undo),
            "y" => Some(Self::Redo),
            _ => None,
        }
    }
}

/// Field edits for a single node. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepPatch {
    pub name: Option<String>,
    pub joints: Option<Joints>,
    pub end_pose: Option<EndPose>,
    pub speed: Option<u8>,
    pub move_mode: Option<MoveMode>,
    /// `Some(None)` resets the step to the player's default delay.
    pub duration_ms: Option<Option<u64>>,
    pub value: Option<u8>,
    pub effort: Option<u32>,
}

impl StepPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    /// `false` when the op hit a no-op guard (empty selection or clipboard, nothing to undo,
    /// drop onto itself) and the session was left as it was.
    pub changed: bool,
    pub delta: Delta,
}

impl ApplyResult {
    fn unchanged(session: &Session) -> Self {
        Self {
            new_rev: session.rev(),
            changed: false,
            delta: Delta::default(),
        }
    }

    fn changed(session: &Session, delta: Delta) -> Self {
        Self {
            new_rev: session.rev(),
            changed: true,
            delta,
        }
    }
}

/// Paths touched by an op. `added` and `updated` are valid in the new tree, `removed` in the
/// tree before the op.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<NodePath>,
    pub removed: Vec<NodePath>,
    pub updated: Vec<NodePath>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    Conflict {
        base_rev: u64,
        current_rev: u64,
    },
    Tree(TreeError),
    NotApplicable {
        path: NodePath,
        kind: NodeKind,
        field: &'static str,
    },
    OutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },
    MoveIntoSelf {
        source: NodePath,
        dest: NodePath,
    },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict {
                base_rev,
                current_rev,
            } => write!(f, "stale base_rev (base_rev={base_rev}, current_rev={current_rev})"),
            Self::Tree(err) => write!(f, "{err}"),
            Self::NotApplicable { path, kind, field } => {
                write!(f, "field {field} does not apply to {kind} node at {path}")
            }
            Self::OutOfRange { field, value, max } => {
                write!(f, "{field} out of range ({value} > {max})")
            }
            Self::MoveIntoSelf { source, dest } => {
                write!(f, "cannot move {source} into its own subtree at {dest}")
            }
        }
    }
}

impl std::error::Error for ApplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TreeError> for ApplyError {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

/// Applies one op after checking that the caller's view of the tree is current.
///
/// `base_rev` is the [`Session::rev`] the caller derived its paths from; a mismatch means those
/// paths may point at different nodes now.
pub fn apply_op(session: &mut Session, base_rev: u64, op: &Op) -> Result<ApplyResult, ApplyError> {
    let current_rev = session.rev();
    if base_rev != current_rev {
        return Err(ApplyError::Conflict {
            base_rev,
            current_rev,
        });
    }

    let result = match op {
        Op::Select { path, multi } => {
            select(session, path.clone(), *multi)?;
            ApplyResult::changed(session, Delta::default())
        }
        Op::ClearSelection => {
            session.selection_mut().clear();
            ApplyResult::changed(session, Delta::default())
        }
        Op::AddFolder => add_folder(session)?,
        Op::CapturePose { joints, end_pose } => capture_pose(session, *joints, *end_pose)?,
        Op::AddGripperAction { value, effort } => add_gripper_action(session, *value, *effort)?,
        Op::DeleteSelected => delete_selected(session)?,
        Op::Delete { path } => delete(session, path)?,
        Op::Edit { path, patch } => edit(session, path, patch)?,
        Op::ToggleCollapsed { path } => toggle_collapsed(session, path)?,
        Op::Cut => cut(session)?,
        Op::Copy => copy(session)?,
        Op::Paste => paste(session)?,
        Op::Undo => undo(session),
        Op::Redo => redo(session),
        Op::Move { source, dest, zone } => move_node(session, source, dest, *zone)?,
    };

    debug!(
        ?op,
        changed = result.changed,
        rev = result.new_rev,
        "applied op"
    );
    Ok(result)
}

// CRUD, clipboard and history entry points used by `apply_op`.
include!("ops_impl.rs");
