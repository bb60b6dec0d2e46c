// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::clipboard::Clipboard;
use super::history::History;
use super::path::NodePath;
use super::selection::Selection;
use super::tree::Tree;
use crate::config::EditorConfig;

/// One editor instance: the tree plus everything the editing operations read and write.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    tree: Tree,
    selection: Selection,
    history: History,
    clipboard: Clipboard,
    drag_source: Option<NodePath>,
    config: EditorConfig,
    rev: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Session {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            tree: Tree::default(),
            selection: Selection::default(),
            history: History::new(config.history_limit),
            clipboard: Clipboard::default(),
            drag_source: None,
            config,
            rev: 0,
        }
    }

    pub fn with_tree(mut self, tree: Tree) -> Self {
        self.tree = tree;
        self
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn clipboard_mut(&mut self) -> &mut Clipboard {
        &mut self.clipboard
    }

    pub fn drag_source(&self) -> Option<&NodePath> {
        self.drag_source.as_ref()
    }

    pub fn set_drag_source(&mut self, drag_source: Option<NodePath>) {
        self.drag_source = drag_source;
    }

    pub fn take_drag_source(&mut self) -> Option<NodePath> {
        self.drag_source.take()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Incremented by every history-recorded tree change and by undo/redo. Collapsing a
    /// folder does not move it.
    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    /// Installs an edited copy of the tree, recording the replaced tree as the undo snapshot.
    pub fn commit_tree(&mut self, next: Tree) {
        let previous = std::mem::replace(&mut self.tree, next);
        self.history.record(previous);
        self.bump_rev();
    }

    /// Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.tree) {
            return false;
        }
        self.after_history_swap();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.tree) {
            return false;
        }
        self.after_history_swap();
        true
    }

    fn after_history_swap(&mut self) {
        self.selection.clear();
        self.drag_source = None;
        self.bump_rev();
    }
}
