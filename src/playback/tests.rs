// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{sleep, Instant};

use super::{
    ArmState, ControlApi, ControlError, GripperMove, JointMove, PlaybackReport,
    Player, ViewSink,
};
use crate::config::EditorConfig;
use crate::model::fixtures::folder;
use crate::model::{GripperStep, Joints, Node, NodePath, PoseStep, Tree};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Joints { first_joint: f64, speed: u8 },
    Gripper(GripperMove),
}

struct RecordingControl {
    start: Instant,
    calls: Mutex<Vec<(u64, Call)>>,
    reject_gripper: bool,
}

impl RecordingControl {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            calls: Mutex::new(Vec::new()),
            reject_gripper: false,
        }
    }

    fn rejecting_gripper() -> Self {
        Self {
            reject_gripper: true,
            ..Self::new()
        }
    }

    fn record(&self, call: Call) {
        let at = self.start.elapsed().as_millis() as u64;
        self.calls.lock().unwrap().push((at, call));
    }

    fn calls(&self) -> Vec<(u64, Call)> {
        self.calls.lock().unwrap().clone()
    }

    fn times(&self) -> Vec<u64> {
        self.calls().into_iter().map(|(at, _)| at).collect()
    }
}

impl ControlApi for RecordingControl {
    async fn move_joints(&self, request: JointMove) -> Result<(), ControlError> {
        self.record(Call::Joints {
            first_joint: request.joints[0],
            speed: request.speed,
        });
        Ok(())
    }

    async fn move_gripper(&self, request: GripperMove) -> Result<(), ControlError> {
        self.record(Call::Gripper(request));
        if self.reject_gripper {
            return Err(ControlError::Rejected {
                message: "gripper offline".to_owned(),
            });
        }
        Ok(())
    }

    async fn current_state(&self) -> Result<ArmState, ControlError> {
        Ok(ArmState::default())
    }
}

#[derive(Default)]
struct RecordingView {
    updates: Mutex<Vec<(f64, u8)>>,
}

impl ViewSink for RecordingView {
    fn update(&self, joints: &Joints, gripper: u8) {
        self.updates.lock().unwrap().push((joints[0], gripper));
    }
}

fn timed_pose(marker: f64, duration_ms: Option<u64>) -> Node {
    Node::from(
        PoseStep::new(format!("p{marker}"), [marker; 6])
            .with_speed(40)
            .with_duration_ms(duration_ms),
    )
}

fn timed_gripper(value: u8, duration_ms: Option<u64>) -> Node {
    Node::from(
        GripperStep::new("g", value)
            .with_effort(700)
            .with_duration_ms(duration_ms),
    )
}

/// ```text
/// [0] p1 (no duration)
/// [1] folder
/// [1,0] p2 (250 ms)
/// [1,1] g 80 (0 ms)
/// [2] p3 (500 ms)
/// ```
fn nested_tree() -> Tree {
    Tree::new(vec![
        timed_pose(1.0, None),
        folder("F", vec![timed_pose(2.0, Some(250)), timed_gripper(80, Some(0))]),
        timed_pose(3.0, Some(500)),
    ])
}

#[tokio::test(start_paused = true)]
async fn plays_leaves_in_order_with_step_delays() {
    let control = RecordingControl::new();
    let player = Player::default();
    let run = player.start(&nested_tree()).expect("idle player starts");
    assert_eq!(run.steps().len(), 4);

    let report = run.run(&control).await;

    assert_eq!(
        report,
        PlaybackReport {
            dispatched: 4,
            failed: 0,
            cancelled: false
        }
    );
    assert_eq!(
        control.calls(),
        vec![
            (0, Call::Joints { first_joint: 1.0, speed: 40 }),
            (1000, Call::Joints { first_joint: 2.0, speed: 40 }),
            (1250, Call::Gripper(GripperMove { value: 80, effort: 700 })),
            (1250, Call::Joints { first_joint: 3.0, speed: 40 }),
        ]
    );
    assert!(!player.is_playing());
}

#[tokio::test(start_paused = true)]
async fn default_delay_comes_from_config() {
    let config = EditorConfig {
        default_step_delay_ms: 100,
        ..EditorConfig::default()
    };
    let control = RecordingControl::new();
    let player = Player::new(&config);
    let tree = Tree::new(vec![timed_pose(1.0, None), timed_pose(2.0, None)]);

    player.start(&tree).expect("start").run(&control).await;
    assert_eq!(control.times(), vec![0, 100]);
}

#[tokio::test(start_paused = true)]
async fn start_while_playing_is_rejected() {
    let player = Player::default();
    let tree = nested_tree();
    let first = player.start(&tree).expect("first start");
    assert!(player.is_playing());
    assert!(player.start(&tree).is_none());

    drop(first);
    assert!(!player.is_playing());
    assert!(player.start(&tree).is_some());
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_between_steps() {
    let control = RecordingControl::new();
    let player = Player::default();
    let run = player.start(&nested_tree()).expect("start");

    let stopper = async {
        sleep(Duration::from_millis(1100)).await;
        player.stop();
    };
    let (report, ()) = tokio::join!(run.run(&control), stopper);

    assert!(report.cancelled);
    assert_eq!(report.dispatched, 2);
    assert_eq!(control.times(), vec![0, 1000]);
}

#[tokio::test(start_paused = true)]
async fn stale_run_stops_after_stop_and_restart() {
    let control = RecordingControl::new();
    let player = Player::default();
    let tree = nested_tree();
    let first = player.start(&tree).expect("start");

    let restart = async {
        sleep(Duration::from_millis(500)).await;
        player.stop();
        let second = player.start(&Tree::new(vec![timed_pose(9.0, Some(2000))]));
        second.expect("restart after stop").run(&control).await
    };
    let (first_report, second_report) = tokio::join!(first.run(&control), restart);

    assert!(first_report.cancelled);
    assert_eq!(first_report.dispatched, 1);
    assert_eq!(second_report.dispatched, 1);
    assert!(!player.is_playing());
}

#[tokio::test(start_paused = true)]
async fn edits_after_start_do_not_affect_the_run() {
    let control = RecordingControl::new();
    let player = Player::default();
    let mut tree = nested_tree();
    let run = player.start(&tree).expect("start");

    tree.remove(&NodePath::root(1)).expect("remove folder");
    tree.push(timed_pose(7.0, None));

    let report = run.run(&control).await;
    assert_eq!(report.dispatched, 4);
}

#[tokio::test(start_paused = true)]
async fn rejected_step_counts_as_completed() {
    let control = RecordingControl::rejecting_gripper();
    let player = Player::default();

    let report = player.start(&nested_tree()).expect("start").run(&control).await;

    assert_eq!(report.dispatched, 3);
    assert_eq!(report.failed, 1);
    assert!(!report.cancelled);
    assert_eq!(control.calls().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn preview_plays_folder_children_independently() {
    let control = RecordingControl::new();
    let player = Player::default();
    let tree = nested_tree();

    let global = player.start(&tree).expect("start");
    let preview = player.preview(&tree, &NodePath::root(1)).expect("preview");
    assert_eq!(preview.steps().len(), 2);

    let report = preview.run(&control).await;
    assert_eq!(report.dispatched, 2);
    assert!(player.is_playing());
    drop(global);

    assert!(player.preview(&tree, &NodePath::root(0)).is_err());
    assert!(player.preview(&tree, &NodePath::root(5)).is_err());
}

#[tokio::test(start_paused = true)]
async fn preview_handle_cancels_only_the_preview() {
    let control = RecordingControl::new();
    let player = Player::default();
    let tree = nested_tree();
    let preview = player.preview(&tree, &NodePath::root(1)).expect("preview");
    let handle = preview.handle();

    handle.cancel();
    assert!(handle.is_cancelled());
    let report = preview.run(&control).await;

    assert!(report.cancelled);
    assert_eq!(report.dispatched, 0);
    assert!(player.start(&tree).is_some());
}

#[tokio::test(start_paused = true)]
async fn play_step_sends_once_without_waiting() {
    let control = RecordingControl::new();
    let player = Player::default();
    let tree = nested_tree();

    let started = Instant::now();
    let report = player
        .play_step(&tree, &NodePath::root(0))
        .expect("step")
        .run(&control)
        .await;

    assert_eq!(report.dispatched, 1);
    assert_eq!(started.elapsed(), Duration::ZERO);

    let folder_run = player.play_step(&tree, &NodePath::root(1)).expect("folder");
    assert_eq!(folder_run.steps().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn view_sink_follows_commanded_targets() {
    let control = RecordingControl::new();
    let view = Arc::new(RecordingView::default());
    let player = Player::default().with_view(view.clone());

    player.start(&nested_tree()).expect("start").run(&control).await;

    assert_eq!(
        *view.updates.lock().unwrap(),
        vec![(1.0, 0), (2.0, 0), (2.0, 80), (3.0, 80)]
    );
}
