// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Playback of a sequence against the arm controller.
//!
//! A run flattens the tree once when it is created, so edits made while it plays never affect
//! it. Steps are dispatched one at a time; after each step the run waits for the step's
//! duration (or the configured default). Stopping is cooperative and checked only between
//! steps: a command that was already sent always completes.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EditorConfig;
use crate::model::{
    flatten, EndPose, GripperStep, Joints, MoveMode, NodePath, PoseStep, Step, Tree, TreeError,
};

/// Joint-space move; the controller may use `end_pose` instead when `move_mode` is linear.
#[derive(Debug, Clone, PartialEq)]
pub struct JointMove {
    pub joints: Joints,
    pub end_pose: EndPose,
    pub speed: u8,
    pub move_mode: MoveMode,
}

impl From<&PoseStep> for JointMove {
    fn from(pose: &PoseStep) -> Self {
        Self {
            joints: *pose.joints(),
            end_pose: *pose.end_pose(),
            speed: pose.speed(),
            move_mode: pose.move_mode(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GripperMove {
    pub value: u8,
    pub effort: u32,
}

impl From<&GripperStep> for GripperMove {
    fn from(gripper: &GripperStep) -> Self {
        Self {
            value: gripper.value(),
            effort: gripper.effort(),
        }
    }
}

/// Snapshot reported by the controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmState {
    pub joints: Joints,
    pub end_pose: EndPose,
    pub gripper: f64,
    /// Controller-specific extras (status flags, error codes), passed through untouched.
    #[serde(default)]
    pub meta: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// The controller answered and refused the command.
    Rejected { message: String },
    /// The command never got a usable answer.
    Transport { message: String },
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { message } => write!(f, "controller rejected command: {message}"),
            Self::Transport { message } => write!(f, "controller unreachable: {message}"),
        }
    }
}

impl std::error::Error for ControlError {}

/// The arm controller. Each call resolves once the controller has acknowledged the command.
pub trait ControlApi {
    fn move_joints(&self, request: JointMove)
        -> impl Future<Output = Result<(), ControlError>> + Send;

    fn move_gripper(
        &self,
        request: GripperMove,
    ) -> impl Future<Output = Result<(), ControlError>> + Send;

    fn current_state(&self) -> impl Future<Output = Result<ArmState, ControlError>> + Send;
}

/// Receives the commanded arm configuration after each step (3D preview and the like).
pub trait ViewSink: Send + Sync {
    fn update(&self, joints: &Joints, gripper: u8);
}

#[derive(Debug, Default)]
struct PlayerState {
    playing: AtomicBool,
    generation: AtomicU64,
}

/// Owns the global "is playing" flag. Cheap to clone; clones share the flag.
#[derive(Clone)]
pub struct Player {
    state: Arc<PlayerState>,
    default_delay: Duration,
    view: Option<Arc<dyn ViewSink>>,
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("playing", &self.is_playing())
            .field("default_delay", &self.default_delay)
            .field("view", &self.view.is_some())
            .finish()
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Player {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: Arc::default(),
            default_delay: Duration::from_millis(config.default_step_delay_ms),
            view: None,
        }
    }

    pub fn with_view(mut self, view: Arc<dyn ViewSink>) -> Self {
        self.view = Some(view);
        self
    }

    pub fn default_delay(&self) -> Duration {
        self.default_delay
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing.load(Ordering::Acquire)
    }

    /// Starts a run over the whole tree. Returns `None` when a run is already playing.
    pub fn start(&self, tree: &Tree) -> Option<PlaybackRun> {
        if self.state.playing.swap(true, Ordering::AcqRel) {
            return None;
        }
        let generation = self.state.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let steps = tree.flatten();
        info!(steps = steps.len(), generation, "playback started");
        Some(self.run_with(
            steps,
            Cancel::Global {
                state: Arc::clone(&self.state),
                generation,
            },
            true,
        ))
    }

    /// Clears the playing flag. The current run stops before its next step.
    pub fn stop(&self) {
        if self.state.playing.swap(false, Ordering::AcqRel) {
            info!("playback stop requested");
        }
    }

    /// Plays the children of the folder at `path`, independently of the global flag.
    pub fn preview(&self, tree: &Tree, path: &NodePath) -> Result<PlaybackRun, TreeError> {
        let folder = tree
            .get(path)?
            .as_folder()
            .ok_or_else(|| TreeError::NotAFolder { path: path.clone() })?;
        if self.is_playing() {
            warn!(%path, "folder preview overlaps a running sequence");
        }
        let steps = flatten(folder.children());
        info!(%path, steps = steps.len(), "folder preview started");
        Ok(self.run_with(steps, Cancel::local(), true))
    }

    /// Plays one row: a step is sent once with no trailing wait, a folder is previewed.
    pub fn play_step(&self, tree: &Tree, path: &NodePath) -> Result<PlaybackRun, TreeError> {
        let node = tree.get(path)?;
        match node.as_step() {
            Some(step) => Ok(self.run_with(vec![step], Cancel::local(), false)),
            None => self.preview(tree, path),
        }
    }

    fn run_with(&self, steps: Vec<Step>, cancel: Cancel, wait_after_steps: bool) -> PlaybackRun {
        PlaybackRun {
            steps,
            cancel,
            default_delay: self.default_delay,
            wait_after_steps,
            view: self.view.clone(),
        }
    }
}

#[derive(Debug, Clone)]
enum Cancel {
    /// Tied to the player's flag; a newer global run also invalidates this one.
    Global {
        state: Arc<PlayerState>,
        generation: u64,
    },
    Local(Arc<AtomicBool>),
}

impl Cancel {
    fn local() -> Self {
        Self::Local(Arc::new(AtomicBool::new(false)))
    }

    fn keep_going(&self) -> bool {
        match self {
            Self::Global { state, generation } => {
                state.playing.load(Ordering::Acquire)
                    && state.generation.load(Ordering::Acquire) == *generation
            }
            Self::Local(cancelled) => !cancelled.load(Ordering::Acquire),
        }
    }

    fn cancel(&self) {
        match self {
            Self::Global { state, generation } => {
                if state.generation.load(Ordering::Acquire) == *generation {
                    state.playing.store(false, Ordering::Release);
                }
            }
            Self::Local(cancelled) => cancelled.store(true, Ordering::Release),
        }
    }
}

/// Cancels one run from outside the task that drives it.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    cancel: Cancel,
}

impl PlaybackHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        !self.cancel.keep_going()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Steps the controller acknowledged.
    pub dispatched: usize,
    /// Steps the controller rejected or never answered; the run continued after each.
    pub failed: usize,
    pub cancelled: bool,
}

/// A frozen list of steps ready to play. Dropping it releases the global flag if it owns it.
#[derive(Debug)]
pub struct PlaybackRun {
    steps: Vec<Step>,
    cancel: Cancel,
    default_delay: Duration,
    wait_after_steps: bool,
    view: Option<Arc<dyn ViewSink>>,
}

impl fmt::Debug for dyn ViewSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ViewSink")
    }
}

impl PlaybackRun {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn handle(&self) -> PlaybackHandle {
        PlaybackHandle {
            cancel: self.cancel.clone(),
        }
    }

    pub async fn run<C: ControlApi>(self, control: &C) -> PlaybackReport {
        let mut report = PlaybackReport::default();
        let mut joints: Joints = [0.0; 6];
        let mut gripper = 0u8;

        for (index, step) in self.steps.iter().enumerate() {
            if !self.cancel.keep_going() {
                report.cancelled = true;
                break;
            }

            let outcome = match step {
                Step::Pose(pose) => {
                    joints = *pose.joints();
                    control.move_joints(JointMove::from(pose)).await
                }
                Step::Gripper(action) => {
                    gripper = action.value();
                    control.move_gripper(GripperMove::from(action)).await
                }
            };
            match outcome {
                Ok(()) => report.dispatched += 1,
                Err(err) => {
                    report.failed += 1;
                    warn!(index, step = step.name(), %err, "step failed; continuing");
                }
            }
            if let Some(view) = &self.view {
                view.update(&joints, gripper);
            }

            if self.wait_after_steps {
                let delay = step
                    .duration_ms()
                    .map(Duration::from_millis)
                    .unwrap_or(self.default_delay);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        if report.cancelled {
            info!(
                dispatched = report.dispatched,
                failed = report.failed,
                "playback cancelled"
            );
        } else {
            info!(
                dispatched = report.dispatched,
                failed = report.failed,
                "playback finished"
            );
        }
        report
    }
}

impl Drop for PlaybackRun {
    fn drop(&mut self) {
        if let Cancel::Global { .. } = self.cancel {
            self.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests;
