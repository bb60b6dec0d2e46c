// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A session owns the step tree plus the editing state around it (selection, undo history,
//! clipboard, drag source). Nodes are addressed by positional [`NodePath`]s.

pub mod clipboard;
pub(crate) mod fixtures;
pub mod history;
pub mod node;
pub mod path;
pub mod selection;
pub mod session;
pub mod tree;

pub use clipboard::Clipboard;
pub use history::History;
pub use node::{
    EndPose, Folder, GripperStep, Joints, MoveMode, Node, NodeKind, PoseStep, Step, JOINT_COUNT,
};
pub use path::{cmp_removal_order, NodePath, ParseNodePathError};
pub use selection::Selection;
pub use session::Session;
pub use tree::{flatten, Tree, TreeError};
