// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;

use super::tree::Tree;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded undo/redo stacks of whole-tree snapshots.
///
/// Recording a new snapshot always clears the redo stack.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    undo: VecDeque<Tree>,
    redo: VecDeque<Tree>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// `limit` is clamped to at least one entry.
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Deep-copies `tree` onto the undo stack.
    pub fn snapshot(&mut self, tree: &Tree) {
        self.record(tree.clone());
    }

    /// Pushes an already-detached pre-edit tree onto the undo stack.
    pub fn record(&mut self, previous: Tree) {
        push_bounded(&mut self.undo, previous, self.limit);
        self.redo.clear();
    }

    /// Swaps `current` with the newest undo snapshot. Returns `false` when there is nothing to
    /// undo.
    pub fn undo(&mut self, current: &mut Tree) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        let replaced = std::mem::replace(current, previous);
        push_bounded(&mut self.redo, replaced, self.limit);
        true
    }

    pub fn redo(&mut self, current: &mut Tree) -> bool {
        let Some(next) = self.redo.pop_back() else {
            return false;
        };
        let replaced = std::mem::replace(current, next);
        push_bounded(&mut self.undo, replaced, self.limit);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}

fn push_bounded(stack: &mut VecDeque<Tree>, tree: Tree, limit: usize) {
    stack.push_back(tree);
    while stack.len() > limit {
        stack.pop_front();
    }
}
