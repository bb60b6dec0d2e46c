// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use super::path::{cmp_removal_order, NodePath};

/// Set of selected node paths.
///
/// The set is keyed by path, so it goes stale with the tree: clear or replace it after every
/// structural mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    paths: BTreeSet<NodePath>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain click replaces the selection; `multi` (ctrl/cmd click) toggles membership.
    pub fn select(&mut self, path: NodePath, multi: bool) {
        if !multi {
            self.paths.clear();
            self.paths.insert(path);
            return;
        }
        if !self.paths.remove(&path) {
            self.paths.insert(path);
        }
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn replace(&mut self, paths: impl IntoIterator<Item = NodePath>) {
        self.paths = paths.into_iter().collect();
    }

    pub fn contains(&self, path: &NodePath) -> bool {
        self.paths.contains(path)
    }

    /// Lookup by canonical path string (`[0,2]`), as carried by rendered rows.
    pub fn contains_key(&self, key: &str) -> bool {
        key.parse::<NodePath>()
            .is_ok_and(|path| self.paths.contains(&path))
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodePath> {
        self.paths.iter()
    }

    pub fn keys(&self) -> Vec<String> {
        self.paths.iter().map(ToString::to_string).collect()
    }

    /// Reading order, shallow/low-index first.
    pub fn sorted_ascending(&self) -> Vec<NodePath> {
        self.paths.iter().cloned().collect()
    }

    /// Deepest first, then highest index first; safe order for batch removal.
    pub fn sorted_for_removal(&self) -> Vec<NodePath> {
        let mut paths = self.sorted_ascending();
        paths.sort_by(cmp_removal_order);
        paths
    }

    /// The path new content is inserted relative to: the last one in reading order.
    pub fn anchor(&self) -> Option<&NodePath> {
        self.paths.last()
    }
}

#[cfg(test)]
mod tests {
    use super::Selection;
    use crate::model::NodePath;

    #[test]
    fn single_select_replaces() {
        let mut selection = Selection::new();
        selection.select(NodePath::from([0]), false);
        selection.select(NodePath::from([2]), false);
        assert_eq!(selection.sorted_ascending(), vec![NodePath::from([2])]);
    }

    #[test]
    fn multi_select_toggles() {
        let mut selection = Selection::new();
        selection.select(NodePath::from([0]), true);
        selection.select(NodePath::from([1, 0]), true);
        selection.select(NodePath::from([0]), true);
        assert_eq!(selection.keys(), vec!["[1,0]".to_owned()]);
        assert!(selection.contains_key("[1,0]"));
        assert!(!selection.contains_key("[0]"));
        assert!(!selection.contains_key("garbage"));
    }

    #[test]
    fn anchor_is_last_in_reading_order() {
        let mut selection = Selection::new();
        let paths: [&[usize]; 4] = [&[2, 0], &[0], &[1, 5, 3], &[2]];
        for path in paths {
            selection.select(NodePath::from(path), true);
        }
        assert_eq!(selection.anchor(), Some(&NodePath::from([2, 0])));
    }

    #[test]
    fn removal_order_puts_deep_paths_first() {
        let mut selection = Selection::new();
        selection.select(NodePath::from([0]), true);
        selection.select(NodePath::from([1, 2]), true);
        assert_eq!(
            selection.sorted_for_removal(),
            vec![NodePath::from([1, 2]), NodePath::from([0])]
        );
    }
}
