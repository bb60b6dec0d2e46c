// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![cfg(test)]

use super::node::{Folder, GripperStep, Node, PoseStep};
use super::tree::Tree;

pub(crate) fn pose(name: &str) -> Node {
    Node::from(PoseStep::new(name, [0.0; 6]))
}

pub(crate) fn gripper(name: &str, value: u8) -> Node {
    Node::from(GripperStep::new(name, value))
}

pub(crate) fn folder(name: &str, children: Vec<Node>) -> Node {
    Node::from(Folder::new(name).with_children(children))
}

pub(crate) fn names(nodes: &[Node]) -> Vec<String> {
    nodes.iter().map(|node| node.name().to_owned()).collect()
}

/// ```text
/// [0]       A        (pose)
/// [1]       B        (folder)
/// [1,0]       B1     (pose)
/// [1,1]       B2     (gripper)
/// [1,2]       C      (folder)
/// [1,2,0]       C1   (pose)
/// [1,2,1]       C2   (pose)
/// [2]       D        (gripper)
/// ```
pub(crate) fn sample_tree() -> Tree {
    Tree::new(vec![
        pose("A"),
        folder(
            "B",
            vec![
                pose("B1"),
                gripper("B2", 80),
                folder("C", vec![pose("C1"), pose("C2")]),
            ],
        ),
        gripper("D", 10),
    ])
}

/// Four root-level poses named `0`..`3`.
pub(crate) fn flat_tree() -> Tree {
    Tree::new((0..4).map(|i| pose(&i.to_string())).collect())
}
