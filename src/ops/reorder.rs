// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Drag-and-drop reordering.
//!
//! The host reports the dragged row at drag start and the row under the pointer (with the
//! pointer's offset inside that row) while hovering and on drop. Moves remove the source first
//! and then re-insert it, so a destination path taken before the removal may need its index
//! shifted down by one.

use tracing::debug;

use super::{place, ApplyError, ApplyResult, Delta, Placement};
use crate::model::{NodePath, Session, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    Before,
    After,
    /// Last child of a folder destination.
    Inside,
}

/// Classifies a pointer at `offset_y` within a row of height `row_height`.
///
/// Folder rows split into quarters (top quarter before, bottom quarter after, middle inside);
/// leaf rows split at the midpoint.
pub fn classify_drop(offset_y: f64, row_height: f64, is_folder: bool) -> DropZone {
    if is_folder {
        if offset_y < row_height * 0.25 {
            DropZone::Before
        } else if offset_y > row_height * 0.75 {
            DropZone::After
        } else {
            DropZone::Inside
        }
    } else if offset_y < row_height * 0.5 {
        DropZone::Before
    } else {
        DropZone::After
    }
}

pub fn drag_start(session: &mut Session, source: NodePath) -> Result<(), ApplyError> {
    session.tree().get(&source)?;
    session.set_drag_source(Some(source));
    Ok(())
}

/// Zone the host should highlight while hovering `dest`.
pub fn drag_over(
    session: &Session,
    dest: &NodePath,
    offset_y: f64,
    row_height: f64,
) -> Result<DropZone, ApplyError> {
    let is_folder = session.tree().get(dest)?.is_folder();
    Ok(classify_drop(offset_y, row_height, is_folder))
}

/// Ends the drag on `dest`. The drag source is consumed whether or not the drop moves anything.
pub fn drop_on(
    session: &mut Session,
    dest: &NodePath,
    offset_y: f64,
    row_height: f64,
) -> Result<ApplyResult, ApplyError> {
    let Some(source) = session.take_drag_source() else {
        return Ok(ApplyResult::unchanged(session));
    };
    if &source == dest {
        return Ok(ApplyResult::unchanged(session));
    }
    let zone = drag_over(session, dest, offset_y, row_height)?;
    move_node(session, &source, dest, zone)
}

/// Moves the node at `source` relative to `dest` and selects it at its new path.
///
/// Both paths refer to the tree before the move.
pub fn move_node(
    session: &mut Session,
    source: &NodePath,
    dest: &NodePath,
    zone: DropZone,
) -> Result<ApplyResult, ApplyError> {
    if source == dest {
        return Ok(ApplyResult::unchanged(session));
    }

    let tree = session.tree();
    tree.get(source)?;
    let dest_is_folder = tree.get(dest)?.is_folder();
    if dest.starts_with(source) {
        return Err(ApplyError::MoveIntoSelf {
            source: source.clone(),
            dest: dest.clone(),
        });
    }
    if zone == DropZone::Inside && !dest_is_folder {
        return Err(TreeError::NotAFolder { path: dest.clone() }.into());
    }

    let mut draft = tree.clone();
    let node = draft.remove(source)?;
    let target = shifted_after_removal(source, dest);
    let placement = match zone {
        DropZone::Before => Placement::Before(target),
        DropZone::After => Placement::After(target),
        DropZone::Inside => Placement::Inside(target),
    };
    let added = place(&mut draft, &placement, vec![node])?;

    session.commit_tree(draft);
    session.selection_mut().replace(added.iter().cloned());
    debug!(%source, %dest, ?zone, "moved node");

    let mut delta = Delta {
        added,
        removed: vec![source.clone()],
        ..Delta::default()
    };
    if let Placement::Inside(folder_path) = placement {
        delta.updated.push(folder_path);
    }
    Ok(ApplyResult::changed(session, delta))
}

/// Re-derives `dest` for the tree with `source` removed.
///
/// Removal shifts down the later siblings of `source` and every path through them. Only a
/// destination that runs through the source's parent list at a higher index is affected; paths
/// in other lists keep their indices.
fn shifted_after_removal(source: &NodePath, dest: &NodePath) -> NodePath {
    let mut shifted = dest.clone();
    let (Some(source_index), parent) = (source.last(), source.parent_indices()) else {
        return shifted;
    };
    let level = parent.len();
    if dest.depth() > level && dest.indices().starts_with(parent) {
        let slot = &mut shifted.indices_mut()[level];
        if source_index < *slot {
            *slot -= 1;
        }
    }
    shifted
}
