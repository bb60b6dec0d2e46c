// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::node::{Node, Step};
use super::path::NodePath;

/// The ordered, nested list of sequence steps.
///
/// The root is a plain list, not a folder. All accessors are pure structural edits; callers
/// snapshot history before mutating.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Out-of-range index, empty path, or an intermediate node that is not a folder.
    InvalidPath { path: NodePath },
    NotAFolder { path: NodePath },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPath { path } => write!(f, "invalid node path {path}"),
            Self::NotAFolder { path } => write!(f, "node at {path} is not a folder"),
        }
    }
}

impl std::error::Error for TreeError {}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, path: &NodePath) -> bool {
        self.get(path).is_ok()
    }

    pub fn get(&self, path: &NodePath) -> Result<&Node, TreeError> {
        let index = path.last().ok_or_else(|| invalid(path))?;
        self.children_at(path.parent_indices())
            .and_then(|list| list.get(index))
            .ok_or_else(|| invalid(path))
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Result<&mut Node, TreeError> {
        let index = path.last().ok_or_else(|| invalid(path))?;
        self.children_at_mut(path.parent_indices())
            .and_then(|list| list.get_mut(index))
            .ok_or_else(|| invalid(path))
    }

    /// Detaches the node at `path`; later siblings shift down by one.
    pub fn remove(&mut self, path: &NodePath) -> Result<Node, TreeError> {
        let index = path.last().ok_or_else(|| invalid(path))?;
        let list = self
            .children_at_mut(path.parent_indices())
            .ok_or_else(|| invalid(path))?;
        if index >= list.len() {
            return Err(invalid(path));
        }
        Ok(list.remove(index))
    }

    /// Inserts `node` so that it ends up at `path`; later siblings shift up by one.
    ///
    /// The final index may equal the parent's child count (append).
    pub fn insert(&mut self, path: &NodePath, node: Node) -> Result<(), TreeError> {
        let index = path.last().ok_or_else(|| invalid(path))?;
        let list = self
            .children_at_mut(path.parent_indices())
            .ok_or_else(|| invalid(path))?;
        if index > list.len() {
            return Err(invalid(path));
        }
        list.insert(index, node);
        Ok(())
    }

    /// Appends to the root list and returns the new node's path.
    pub fn push(&mut self, node: Node) -> NodePath {
        self.nodes.push(node);
        NodePath::root(self.nodes.len() - 1)
    }

    /// Appends `node` as the last child of the folder at `folder_path` and expands the folder.
    pub fn append_child(&mut self, folder_path: &NodePath, node: Node) -> Result<NodePath, TreeError> {
        let folder = self
            .get_mut(folder_path)?
            .as_folder_mut()
            .ok_or_else(|| TreeError::NotAFolder {
                path: folder_path.clone(),
            })?;
        folder.children_mut().push(node);
        folder.set_collapsed(false);
        Ok(folder_path.child(folder.children().len() - 1))
    }

    /// Depth-first pre-order visit of every node. Returning `false` from `visit` skips the
    /// node's children.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&NodePath, &'a Node) -> bool) {
        fn walk_list<'a>(
            list: &'a [Node],
            prefix: &NodePath,
            visit: &mut impl FnMut(&NodePath, &'a Node) -> bool,
        ) {
            for (index, node) in list.iter().enumerate() {
                let path = prefix.child(index);
                if visit(&path, node) {
                    if let Node::Folder(folder) = node {
                        walk_list(folder.children(), &path, visit);
                    }
                }
            }
        }

        walk_list(&self.nodes, &NodePath::default(), &mut visit);
    }

    /// Every node path in reading order.
    pub fn paths(&self) -> Vec<NodePath> {
        let mut paths = Vec::new();
        self.walk(|path, _| {
            paths.push(path.clone());
            true
        });
        paths
    }

    pub fn flatten(&self) -> Vec<Step> {
        flatten(&self.nodes)
    }

    fn children_at(&self, parent: &[usize]) -> Option<&[Node]> {
        let mut list = self.nodes.as_slice();
        for &index in parent {
            list = match list.get(index) {
                Some(Node::Folder(folder)) => folder.children(),
                _ => return None,
            };
        }
        Some(list)
    }

    fn children_at_mut(&mut self, parent: &[usize]) -> Option<&mut Vec<Node>> {
        let mut list = &mut self.nodes;
        for &index in parent {
            list = match list.get_mut(index) {
                Some(Node::Folder(folder)) => folder.children_mut(),
                _ => return None,
            };
        }
        Some(list)
    }
}

/// Depth-first, left-to-right list of the executable leaves under `nodes`. Folders contribute
/// their flattened children in place and never appear themselves.
pub fn flatten(nodes: &[Node]) -> Vec<Step> {
    let mut steps = Vec::new();
    flatten_into(nodes, &mut steps);
    steps
}

fn flatten_into(nodes: &[Node], steps: &mut Vec<Step>) {
    for node in nodes {
        match node {
            Node::Pose(pose) => steps.push(Step::Pose(pose.clone())),
            Node::Gripper(gripper) => steps.push(Step::Gripper(gripper.clone())),
            Node::Folder(folder) => flatten_into(folder.children(), steps),
        }
    }
}

fn invalid(path: &NodePath) -> TreeError {
    TreeError::InvalidPath { path: path.clone() }
}

impl From<Vec<Node>> for Tree {
    fn from(nodes: Vec<Node>) -> Self {
        Self::new(nodes)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Tree, TreeError};
    use crate::model::fixtures::{folder, names, pose, sample_tree};
    use crate::model::{Node, NodePath, Step};

    #[test]
    fn get_walks_into_folders() {
        let tree = sample_tree();
        assert_eq!(tree.get(&NodePath::from([1, 1])).unwrap().name(), "B2");
        assert_eq!(tree.get(&NodePath::from([1, 2, 0])).unwrap().name(), "C1");
    }

    #[rstest]
    #[case::out_of_range(&[9])]
    #[case::nested_out_of_range(&[1, 7])]
    #[case::through_leaf(&[0, 0])]
    #[case::empty(&[])]
    fn get_rejects_invalid_paths(#[case] indices: &[usize]) {
        let tree = sample_tree();
        let path = NodePath::from(indices);
        assert_eq!(tree.get(&path), Err(TreeError::InvalidPath { path }));
    }

    #[test]
    fn remove_then_insert_at_same_path_is_identity_for_every_path() {
        let original = sample_tree();
        for path in original.paths() {
            let mut tree = original.clone();
            let node = tree.remove(&path).expect("remove");
            assert_eq!(&node, original.get(&path).unwrap());
            tree.insert(&path, node).expect("insert");
            assert_eq!(tree, original, "path {path}");
        }
    }

    #[test]
    fn insert_allows_append_slot_but_not_beyond() {
        let mut tree = sample_tree();
        let len = tree.len();
        tree.insert(&NodePath::root(len), pose("tail")).expect("append slot");
        assert_eq!(tree.get(&NodePath::root(len)).unwrap().name(), "tail");

        let beyond = NodePath::root(len + 2);
        assert_eq!(
            tree.insert(&beyond, pose("nope")),
            Err(TreeError::InvalidPath { path: beyond })
        );
    }

    #[test]
    fn append_child_expands_folder() {
        let mut tree = Tree::new(vec![Node::from(
            crate::model::Folder::new("F").with_collapsed(true),
        )]);
        let path = tree.append_child(&NodePath::root(0), pose("P")).expect("append");
        assert_eq!(path, NodePath::from([0, 0]));
        let Node::Folder(folder) = tree.get(&NodePath::root(0)).unwrap() else {
            panic!("expected folder");
        };
        assert!(!folder.collapsed());
    }

    #[test]
    fn append_child_rejects_leaf_target() {
        let mut tree = Tree::new(vec![pose("P")]);
        let path = NodePath::root(0);
        assert_eq!(
            tree.append_child(&path, pose("Q")),
            Err(TreeError::NotAFolder { path })
        );
    }

    #[test]
    fn flatten_is_depth_first_and_omits_folders() {
        let tree = sample_tree();
        let flat: Vec<String> = tree.flatten().iter().map(|s| s.name().to_owned()).collect();
        assert_eq!(flat, vec!["A", "B1", "B2", "C1", "C2", "D"]);
        assert!(tree.flatten().iter().all(|s| matches!(s, Step::Pose(_) | Step::Gripper(_))));
    }

    #[test]
    fn walk_can_skip_collapsed_children() {
        let tree = Tree::new(vec![
            Node::from(
                crate::model::Folder::new("F")
                    .with_children(vec![pose("hidden")])
                    .with_collapsed(true),
            ),
            pose("shown"),
        ]);
        let mut visited = Vec::new();
        tree.walk(|_, node| {
            visited.push(node.name().to_owned());
            node.as_folder().map_or(true, |f| !f.collapsed())
        });
        assert_eq!(visited, vec!["F", "shown"]);
    }

    #[test]
    fn paths_are_reading_order() {
        let tree = Tree::new(vec![folder("F", vec![pose("a"), pose("b")]), pose("c")]);
        assert_eq!(
            tree.paths(),
            vec![
                NodePath::from([0]),
                NodePath::from([0, 0]),
                NodePath::from([0, 1]),
                NodePath::from([1]),
            ]
        );
        assert_eq!(names(tree.nodes()), vec!["F", "c"]);
    }
}
