// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

pub const JOINT_COUNT: usize = 6;

/// Six joint angles in degrees.
pub type Joints = [f64; JOINT_COUNT];

/// Cartesian end-effector target (`x, y, z` in mm, `rx, ry, rz` in degrees).
pub type EndPose = [f64; JOINT_COUNT];

/// How the controller interpolates towards a pose target. [`MoveMode::code`] is the
/// controller's wire value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveMode {
    #[default]
    Joint,
    Linear,
}

impl MoveMode {
    pub fn code(self) -> u8 {
        match self {
            Self::Joint => 0x01,
            Self::Linear => 0x02,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::Joint),
            0x02 => Some(Self::Linear),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoseStep {
    name: String,
    joints: Joints,
    end_pose: EndPose,
    speed: u8,
    duration_ms: Option<u64>,
    move_mode: MoveMode,
}

impl PoseStep {
    pub const DEFAULT_SPEED: u8 = 50;

    pub fn new(name: impl Into<String>, joints: Joints) -> Self {
        Self {
            name: name.into(),
            joints,
            end_pose: [0.0; JOINT_COUNT],
            speed: Self::DEFAULT_SPEED,
            duration_ms: None,
            move_mode: MoveMode::Joint,
        }
    }

    pub fn with_end_pose(mut self, end_pose: EndPose) -> Self {
        self.end_pose = end_pose;
        self
    }

    pub fn with_speed(mut self, speed: u8) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: Option<u64>) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_move_mode(mut self, move_mode: MoveMode) -> Self {
        self.move_mode = move_mode;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn joints(&self) -> &Joints {
        &self.joints
    }

    pub fn set_joints(&mut self, joints: Joints) {
        self.joints = joints;
    }

    pub fn end_pose(&self) -> &EndPose {
        &self.end_pose
    }

    pub fn set_end_pose(&mut self, end_pose: EndPose) {
        self.end_pose = end_pose;
    }

    /// Percent of the controller's maximum speed (0–100).
    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed;
    }

    /// Wait after the move completes. `None` means the player's default delay.
    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    pub fn set_duration_ms(&mut self, duration_ms: Option<u64>) {
        self.duration_ms = duration_ms;
    }

    pub fn move_mode(&self) -> MoveMode {
        self.move_mode
    }

    pub fn set_move_mode(&mut self, move_mode: MoveMode) {
        self.move_mode = move_mode;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GripperStep {
    name: String,
    value: u8,
    effort: u32,
    duration_ms: Option<u64>,
}

impl GripperStep {
    pub const DEFAULT_EFFORT: u32 = 1000;

    pub fn new(name: impl Into<String>, value: u8) -> Self {
        Self {
            name: name.into(),
            value,
            effort: Self::DEFAULT_EFFORT,
            duration_ms: None,
        }
    }

    pub fn with_effort(mut self, effort: u32) -> Self {
        self.effort = effort;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: Option<u64>) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Aperture in percent (0 closed, 100 fully open).
    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    /// Grip force on the controller's ×1000 scale.
    pub fn effort(&self) -> u32 {
        self.effort
    }

    pub fn set_effort(&mut self, effort: u32) {
        self.effort = effort;
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    pub fn set_duration_ms(&mut self, duration_ms: Option<u64>) {
        self.duration_ms = duration_ms;
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Folder {
    name: String,
    children: Vec<Node>,
    collapsed: bool,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            collapsed: false,
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// View state only; never affects playback.
    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }
}

/// One entry of the sequence tree. Only folders carry children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Pose(PoseStep),
    Gripper(GripperStep),
    Folder(Folder),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Pose,
    Gripper,
    Folder,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pose => "pose",
            Self::Gripper => "gripper",
            Self::Folder => "folder",
        })
    }
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Pose(_) => NodeKind::Pose,
            Self::Gripper(_) => NodeKind::Gripper,
            Self::Folder(_) => NodeKind::Folder,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Pose(pose) => pose.name(),
            Self::Gripper(gripper) => gripper.name(),
            Self::Folder(folder) => folder.name(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        match self {
            Self::Pose(pose) => pose.set_name(name),
            Self::Gripper(gripper) => gripper.set_name(name),
            Self::Folder(folder) => folder.set_name(name),
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            _ => None,
        }
    }

    pub fn as_folder_mut(&mut self) -> Option<&mut Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            _ => None,
        }
    }

    /// The executable step for a leaf; `None` for folders.
    pub fn as_step(&self) -> Option<Step> {
        match self {
            Self::Pose(pose) => Some(Step::Pose(pose.clone())),
            Self::Gripper(gripper) => Some(Step::Gripper(gripper.clone())),
            Self::Folder(_) => None,
        }
    }
}

impl From<PoseStep> for Node {
    fn from(pose: PoseStep) -> Self {
        Self::Pose(pose)
    }
}

impl From<GripperStep> for Node {
    fn from(gripper: GripperStep) -> Self {
        Self::Gripper(gripper)
    }
}

impl From<Folder> for Node {
    fn from(folder: Folder) -> Self {
        Self::Folder(folder)
    }
}

/// A leaf node detached from the tree; what playback executes.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Pose(PoseStep),
    Gripper(GripperStep),
}

impl Step {
    pub fn name(&self) -> &str {
        match self {
            Self::Pose(pose) => pose.name(),
            Self::Gripper(gripper) => gripper.name(),
        }
    }

    pub fn duration_ms(&self) -> Option<u64> {
        match self {
            Self::Pose(pose) => pose.duration_ms(),
            Self::Gripper(gripper) => gripper.duration_ms(),
        }
    }
}
