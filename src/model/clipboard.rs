// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::node::Node;

/// Detached subtrees in top-down reading order. Holds no paths, so it survives any later tree
/// mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clipboard {
    nodes: Vec<Node>,
}

impl Clipboard {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn set(&mut self, nodes: Vec<Node>) {
        self.nodes = nodes;
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
