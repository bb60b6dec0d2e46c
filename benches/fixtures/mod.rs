// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use armseq::model::{Folder, GripperStep, MoveMode, Node, PoseStep, Tree};

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut path = std::env::temp_dir();
        path.push(format!("armseq_bench_{prefix}_{pid}_{nanos}_{counter}"));
        std::fs::create_dir_all(&path).expect("create temp dir");

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// 40 root steps, no folders.
    Flat,
    /// 10 folders x 3 levels, about 400 leaves.
    Medium,
    /// 20 folders x 4 levels, about 4000 leaves.
    Large,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

pub fn tree(case: Case) -> Tree {
    match case {
        Case::Flat => Tree::new((0..40).map(leaf).collect()),
        Case::Medium => Tree::new(folders(10, 3, 4, &mut 0)),
        Case::Large => Tree::new(folders(20, 4, 10, &mut 0)),
    }
}

fn folders(count: usize, depth: usize, leaves: usize, next: &mut usize) -> Vec<Node> {
    (0..count)
        .map(|idx| {
            let mut children: Vec<Node> = (0..leaves)
                .map(|_| {
                    *next += 1;
                    leaf(*next)
                })
                .collect();
            if depth > 1 {
                children.extend(folders(2, depth - 1, leaves, next));
            }
            Node::from(Folder::new(format!("folder_{depth}_{idx:03}")).with_children(children))
        })
        .collect()
}

pub fn leaf(idx: usize) -> Node {
    if idx % 5 == 4 {
        let value = if idx % 2 == 0 { 90 } else { 10 };
        return Node::from(
            GripperStep::new(format!("grip_{idx:05}"), value).with_duration_ms(Some(500)),
        );
    }
    let angle = (idx % 360) as f64 / 57.3;
    let mode = if idx % 3 == 0 {
        MoveMode::Linear
    } else {
        MoveMode::Joint
    };
    Node::from(
        PoseStep::new(format!("pose_{idx:05}"), [angle, -angle, angle / 2.0, 0.0, angle, 0.0])
            .with_end_pose([idx as f64, 0.0, 150.0, 0.0, 90.0, 0.0])
            .with_speed((idx % 100) as u8)
            .with_duration_ms(if idx % 4 == 0 { None } else { Some(1500) })
            .with_move_mode(mode),
    )
}
