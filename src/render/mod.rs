// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Plain-text rendering of a sequence.
//!
//! The outline mirrors the editor's list: one row per visible node, children indented under
//! their folder, collapsed folders hiding their subtree.

use std::fmt::Write as _;

use crate::model::{GripperStep, MoveMode, Node, PoseStep, Selection, Step, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Prefix each row with its canonical path (`[1,0]`).
    pub show_paths: bool,
}

/// Renders the visible rows of `tree`. Selected rows are marked with `*`.
pub fn render_outline(tree: &Tree, selection: &Selection, options: RenderOptions) -> String {
    let mut out = String::new();
    tree.walk(|path, node| {
        let marker = if selection.contains(path) { '*' } else { ' ' };
        let indent = "  ".repeat(path.depth().saturating_sub(1));
        let _ = write!(out, "{marker} ");
        if options.show_paths {
            let _ = write!(out, "{:<10} ", path.to_string());
        }
        let _ = write!(out, "{indent}");
        match node {
            Node::Folder(folder) => {
                let glyph = if folder.collapsed() { '▸' } else { '▾' };
                let _ = writeln!(
                    out,
                    "{glyph} {} ({} items)",
                    folder.name(),
                    folder.children().len()
                );
                !folder.collapsed()
            }
            Node::Pose(pose) => {
                let _ = writeln!(out, "{}", pose_row(pose));
                true
            }
            Node::Gripper(gripper) => {
                let _ = writeln!(out, "{}", gripper_row(gripper));
                true
            }
        }
    });
    out
}

/// Renders the playback order, one numbered step per line.
pub fn render_steps(steps: &[Step]) -> String {
    let width = steps.len().to_string().len();
    let mut out = String::new();
    for (index, step) in steps.iter().enumerate() {
        let row = match step {
            Step::Pose(pose) => pose_row(pose),
            Step::Gripper(gripper) => gripper_row(gripper),
        };
        let _ = writeln!(out, "{:>width$}. {row}", index + 1);
    }
    out
}

fn pose_row(pose: &PoseStep) -> String {
    let mode = match pose.move_mode() {
        MoveMode::Joint => "joint",
        MoveMode::Linear => "linear",
    };
    let joints = pose
        .joints()
        .iter()
        .map(|angle| format!("{angle:.2}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "◆ {}  [{joints}] speed {} {mode}, {}",
        pose.name(),
        pose.speed(),
        wait_label(pose.duration_ms())
    )
}

fn gripper_row(gripper: &GripperStep) -> String {
    format!(
        "✋ {}  value {} effort {}, {}",
        gripper.name(),
        gripper.value(),
        gripper.effort(),
        wait_label(gripper.duration_ms())
    )
}

fn wait_label(duration_ms: Option<u64>) -> String {
    match duration_ms {
        Some(ms) => format!("wait {ms} ms"),
        None => "default wait".to_owned(),
    }
}
