// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Where new or moved content lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Appended as the last children of the folder, which is expanded.
    Inside(NodePath),
    /// Inserted at the target's slot; the target and later siblings shift down.
    Before(NodePath),
    /// Inserted as the immediate next siblings of the target.
    After(NodePath),
    AppendRoot,
}

/// Resolves where user-added content goes, from the current selection.
///
/// The anchor is the selected path that comes last in reading order. A folder anchor receives
/// the content as its last children; any other anchor gets it as next siblings; no selection
/// appends to the root list.
pub fn insertion_context(session: &Session) -> Result<Placement, TreeError> {
    let Some(anchor) = session.selection().anchor() else {
        return Ok(Placement::AppendRoot);
    };
    let placement = if session.tree().get(anchor)?.is_folder() {
        Placement::Inside(anchor.clone())
    } else {
        Placement::After(anchor.clone())
    };
    Ok(placement)
}

/// Inserts `nodes` in order at `placement` and returns their new paths.
pub(crate) fn place(
    tree: &mut Tree,
    placement: &Placement,
    nodes: Vec<Node>,
) -> Result<Vec<NodePath>, TreeError> {
    let mut added = Vec::with_capacity(nodes.len());
    match placement {
        Placement::Inside(folder_path) => {
            for node in nodes {
                added.push(tree.append_child(folder_path, node)?);
            }
        }
        Placement::Before(target) | Placement::After(target) => {
            let index = target.last().ok_or_else(|| TreeError::InvalidPath {
                path: target.clone(),
            })?;
            let first = match placement {
                Placement::After(_) => index + 1,
                _ => index,
            };
            for (offset, node) in nodes.into_iter().enumerate() {
                let path = target.with_last(first + offset);
                tree.insert(&path, node)?;
                added.push(path);
            }
        }
        Placement::AppendRoot => {
            for node in nodes {
                added.push(tree.push(node));
            }
        }
    }
    Ok(added)
}

/// Inserts `nodes` at the selection's insertion context and selects them.
pub fn insert_at_context(session: &mut Session, nodes: Vec<Node>) -> Result<ApplyResult, ApplyError> {
    if nodes.is_empty() {
        return Ok(ApplyResult::unchanged(session));
    }

    let placement = insertion_context(session)?;
    let mut draft = session.tree().clone();
    let added = place(&mut draft, &placement, nodes)?;

    session.commit_tree(draft);
    session.selection_mut().replace(added.iter().cloned());

    let mut delta = Delta {
        added,
        ..Delta::default()
    };
    if let Placement::Inside(folder_path) = placement {
        delta.updated.push(folder_path);
    }
    Ok(ApplyResult::changed(session, delta))
}

/// Validates `path` against the current tree before selecting it.
pub fn select(session: &mut Session, path: NodePath, multi: bool) -> Result<(), ApplyError> {
    session.tree().get(&path)?;
    session.selection_mut().select(path, multi);
    Ok(())
}

pub fn add_folder(session: &mut Session) -> Result<ApplyResult, ApplyError> {
    insert_at_context(session, vec![Node::from(Folder::new("New Folder"))])
}

/// Adds a pose from the arm's current joint angles and end pose; the remaining fields come from
/// the configured pose defaults.
pub fn capture_pose(
    session: &mut Session,
    joints: Joints,
    end_pose: EndPose,
) -> Result<ApplyResult, ApplyError> {
    let defaults = &session.config().pose_defaults;
    let pose = PoseStep::new(defaults.name.clone(), joints)
        .with_end_pose(end_pose)
        .with_speed(defaults.speed)
        .with_duration_ms(Some(defaults.duration_ms));
    insert_at_context(session, vec![Node::from(pose)])
}

pub fn add_gripper_action(
    session: &mut Session,
    value: u8,
    effort: Option<u32>,
) -> Result<ApplyResult, ApplyError> {
    ensure_percent("value", value)?;
    let defaults = &session.config().gripper_defaults;
    let action = GripperStep::new(defaults.name_for(value), value)
        .with_effort(effort.unwrap_or(defaults.effort))
        .with_duration_ms(Some(defaults.duration_ms));
    insert_at_context(session, vec![Node::from(action)])
}

/// Removes every selected node, deepest paths first so no pending path shifts.
pub fn delete_selected(session: &mut Session) -> Result<ApplyResult, ApplyError> {
    if session.selection().is_empty() {
        return Ok(ApplyResult::unchanged(session));
    }

    let paths = session.selection().sorted_for_removal();
    let mut draft = session.tree().clone();
    for path in &paths {
        draft.remove(path)?;
    }

    session.commit_tree(draft);
    session.selection_mut().clear();
    Ok(ApplyResult::changed(
        session,
        Delta {
            removed: paths,
            ..Delta::default()
        },
    ))
}

/// Removes a single node regardless of the selection (row delete button).
pub fn delete(session: &mut Session, path: &NodePath) -> Result<ApplyResult, ApplyError> {
    let mut draft = session.tree().clone();
    draft.remove(path)?;

    session.commit_tree(draft);
    session.selection_mut().clear();
    Ok(ApplyResult::changed(
        session,
        Delta {
            removed: vec![path.clone()],
            ..Delta::default()
        },
    ))
}

pub fn rename(
    session: &mut Session,
    path: &NodePath,
    name: impl Into<String>,
) -> Result<ApplyResult, ApplyError> {
    edit(session, path, &StepPatch::rename(name))
}

/// Applies a field patch to one node. Fields that do not exist on the node's kind are
/// rejected rather than ignored; that check comes before any range check.
pub fn edit(
    session: &mut Session,
    path: &NodePath,
    patch: &StepPatch,
) -> Result<ApplyResult, ApplyError> {
    session.tree().get(path)?;
    if patch.is_empty() {
        return Ok(ApplyResult::unchanged(session));
    }

    let mut draft = session.tree().clone();
    apply_patch(draft.get_mut(path)?, path, patch)?;

    session.commit_tree(draft);
    Ok(ApplyResult::changed(
        session,
        Delta {
            updated: vec![path.clone()],
            ..Delta::default()
        },
    ))
}

fn apply_patch(node: &mut Node, path: &NodePath, patch: &StepPatch) -> Result<(), ApplyError> {
    let kind = node.kind();
    match node {
        Node::Pose(pose) => {
            ensure_absent(
                path,
                kind,
                &[("value", patch.value.is_some()), ("effort", patch.effort.is_some())],
            )?;
            if let Some(speed) = patch.speed {
                ensure_percent("speed", speed)?;
            }
            if let Some(joints) = patch.joints {
                pose.set_joints(joints);
            }
            if let Some(end_pose) = patch.end_pose {
                pose.set_end_pose(end_pose);
            }
            if let Some(speed) = patch.speed {
                pose.set_speed(speed);
            }
            if let Some(move_mode) = patch.move_mode {
                pose.set_move_mode(move_mode);
            }
            if let Some(duration_ms) = patch.duration_ms {
                pose.set_duration_ms(duration_ms);
            }
        }
        Node::Gripper(gripper) => {
            ensure_absent(
                path,
                kind,
                &[
                    ("joints", patch.joints.is_some()),
                    ("end_pose", patch.end_pose.is_some()),
                    ("speed", patch.speed.is_some()),
                    ("move_mode", patch.move_mode.is_some()),
                ],
            )?;
            if let Some(value) = patch.value {
                ensure_percent("value", value)?;
                gripper.set_value(value);
            }
            if let Some(effort) = patch.effort {
                gripper.set_effort(effort);
            }
            if let Some(duration_ms) = patch.duration_ms {
                gripper.set_duration_ms(duration_ms);
            }
        }
        Node::Folder(_) => {
            ensure_absent(
                path,
                kind,
                &[
                    ("joints", patch.joints.is_some()),
                    ("end_pose", patch.end_pose.is_some()),
                    ("speed", patch.speed.is_some()),
                    ("move_mode", patch.move_mode.is_some()),
                    ("duration_ms", patch.duration_ms.is_some()),
                    ("value", patch.value.is_some()),
                    ("effort", patch.effort.is_some()),
                ],
            )?;
        }
    }

    if let Some(name) = &patch.name {
        node.set_name(name.clone());
    }
    Ok(())
}

fn ensure_absent(
    path: &NodePath,
    kind: NodeKind,
    fields: &[(&'static str, bool)],
) -> Result<(), ApplyError> {
    match fields.iter().find(|(_, present)| *present) {
        Some((field, _)) => Err(ApplyError::NotApplicable {
            path: path.clone(),
            kind,
            field,
        }),
        None => Ok(()),
    }
}

fn ensure_percent(field: &'static str, value: u8) -> Result<(), ApplyError> {
    if value > 100 {
        return Err(ApplyError::OutOfRange {
            field,
            value: u64::from(value),
            max: 100,
        });
    }
    Ok(())
}

/// Flips a folder's collapsed flag. View state only: no history entry, no revision bump.
pub fn toggle_collapsed(session: &mut Session, path: &NodePath) -> Result<ApplyResult, ApplyError> {
    let folder = session
        .tree_mut()
        .get_mut(path)?
        .as_folder_mut()
        .ok_or_else(|| TreeError::NotAFolder { path: path.clone() })?;
    let collapsed = folder.collapsed();
    folder.set_collapsed(!collapsed);

    Ok(ApplyResult::changed(
        session,
        Delta {
            updated: vec![path.clone()],
            ..Delta::default()
        },
    ))
}

/// Moves the selected nodes to the clipboard (top-down order) and clears the selection.
pub fn cut(session: &mut Session) -> Result<ApplyResult, ApplyError> {
    if session.selection().is_empty() {
        return Ok(ApplyResult::unchanged(session));
    }

    let paths = session.selection().sorted_for_removal();
    let mut draft = session.tree().clone();
    let mut removed = Vec::with_capacity(paths.len());
    for path in &paths {
        removed.push((path.clone(), draft.remove(path)?));
    }
    // Clipboard keeps reading order.
    removed.sort_by(|(a, _), (b, _)| a.cmp(b));

    session.commit_tree(draft);
    session
        .clipboard_mut()
        .set(removed.into_iter().map(|(_, node)| node).collect());
    session.selection_mut().clear();
    Ok(ApplyResult::changed(
        session,
        Delta {
            removed: paths,
            ..Delta::default()
        },
    ))
}

/// Deep-copies the selected nodes (reading order) into the clipboard. The tree and history
/// are untouched.
pub fn copy(session: &mut Session) -> Result<ApplyResult, ApplyError> {
    if session.selection().is_empty() {
        return Ok(ApplyResult::unchanged(session));
    }

    let nodes = session
        .selection()
        .iter()
        .map(|path| session.tree().get(path).cloned())
        .collect::<Result<Vec<_>, _>>()?;
    session.clipboard_mut().set(nodes);
    Ok(ApplyResult::changed(session, Delta::default()))
}

/// Inserts copies of the clipboard at the insertion context; the clipboard is kept for
/// further pastes.
pub fn paste(session: &mut Session) -> Result<ApplyResult, ApplyError> {
    if session.clipboard().is_empty() {
        return Ok(ApplyResult::unchanged(session));
    }
    let nodes = session.clipboard().nodes().to_vec();
    insert_at_context(session, nodes)
}

pub fn undo(session: &mut Session) -> ApplyResult {
    if !session.undo() {
        return ApplyResult::unchanged(session);
    }
    debug!(rev = session.rev(), "undo");
    ApplyResult::changed(session, Delta::default())
}

pub fn redo(session: &mut Session) -> ApplyResult {
    if !session.redo() {
        return ApplyResult::unchanged(session);
    }
    debug!(rev = session.rev(), "redo");
    ApplyResult::changed(session, Delta::default())
}

/// Replaces the whole tree (file load). Undoable like any other edit.
pub fn replace_tree(session: &mut Session, nodes: Vec<Node>) -> ApplyResult {
    session.commit_tree(Tree::new(nodes));
    session.selection_mut().clear();
    session.set_drag_source(None);
    ApplyResult::changed(session, Delta::default())
}
