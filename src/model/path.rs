// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

/// Positional address of a node: one child index per tree depth, root list first.
///
/// Paths are not identities. They are only valid for the tree shape they were derived from and
/// die at the next structural mutation.
///
/// `Ord` is lexicographic over the indices with a strict prefix sorting first, which is the
/// top-down reading order of the rendered list (`[0] < [0,1] < [1]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath {
    indices: SmallVec<[usize; 4]>,
}

impl NodePath {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
        }
    }

    pub fn root(index: usize) -> Self {
        Self::new([index])
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn depth(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Index within the parent's children (or the root list).
    pub fn last(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Indices of the ancestor chain (`path[..len-1]`).
    pub fn parent_indices(&self) -> &[usize] {
        match self.indices.split_last() {
            Some((_, parent)) => parent,
            None => &[],
        }
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.indices.clone();
        indices.push(index);
        Self { indices }
    }

    /// The sibling slot at `index` under the same parent.
    pub fn with_last(&self, index: usize) -> Self {
        let mut indices = self.indices.clone();
        if let Some(last) = indices.last_mut() {
            *last = index;
        }
        Self { indices }
    }

    /// Returns `true` when `self` is `other` or one of its descendants.
    pub fn starts_with(&self, other: &NodePath) -> bool {
        self.indices.starts_with(&other.indices)
    }

    pub(crate) fn indices_mut(&mut self) -> &mut [usize] {
        &mut self.indices
    }
}

/// Removal order: deepest paths first, then higher indices first.
///
/// Removing paths in this order never shifts an index of a path that has not been removed yet.
pub fn cmp_removal_order(a: &NodePath, b: &NodePath) -> Ordering {
    b.depth()
        .cmp(&a.depth())
        .then_with(|| b.indices().cmp(a.indices()))
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, index) in self.indices.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{index}")?;
        }
        f.write_str("]")
    }
}

impl From<&[usize]> for NodePath {
    fn from(indices: &[usize]) -> Self {
        Self::new(indices.iter().copied())
    }
}

impl<const N: usize> From<[usize; N]> for NodePath {
    fn from(indices: [usize; N]) -> Self {
        Self::new(indices)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseNodePathError {
    MissingBrackets,
    InvalidIndex { segment: String },
}

impl fmt::Display for ParseNodePathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBrackets => f.write_str("node path must be wrapped in '[' and ']'"),
            Self::InvalidIndex { segment } => {
                write!(f, "node path segment is not an index: {segment:?}")
            }
        }
    }
}

impl std::error::Error for ParseNodePathError {}

impl FromStr for NodePath {
    type Err = ParseNodePathError;

    /// Parses the canonical form produced by `Display` (`[0,1,2]`); whitespace around
    /// segments is tolerated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or(ParseNodePathError::MissingBrackets)?;

        if inner.trim().is_empty() {
            return Ok(Self::default());
        }

        let indices = inner
            .split(',')
            .map(|segment| {
                let segment = segment.trim();
                segment
                    .parse::<usize>()
                    .map_err(|_| ParseNodePathError::InvalidIndex {
                        segment: segment.to_owned(),
                    })
            })
            .collect::<Result<SmallVec<[usize; 4]>, _>>()?;

        Ok(Self { indices })
    }
}
