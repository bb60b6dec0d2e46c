// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::rstest;

use super::{
    from_json_str, stage_tmp_file, to_json_string, DecodeError, SequenceFile, StoreError,
    WriteDurability,
};
use crate::model::fixtures::{folder, gripper, names, pose, sample_tree};
use crate::model::{Folder, GripperStep, MoveMode, Node, PoseStep, Tree};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("armseq-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn detailed_tree() -> Tree {
    let linear = PoseStep::new("Approach", [0.1, -0.2, 0.3, 0.0, 1.5, -1.5])
        .with_end_pose([200.0, 0.0, 150.0, 0.0, 90.0, 0.0])
        .with_speed(25)
        .with_duration_ms(Some(0))
        .with_move_mode(MoveMode::Linear);
    let grip = GripperStep::new("Gripper Close", 10)
        .with_effort(800)
        .with_duration_ms(Some(500));
    let mut tree = sample_tree();
    tree.push(Node::from(linear));
    tree.push(Node::from(
        Folder::new("Collapsed")
            .with_children(vec![Node::from(grip), pose("inner")])
            .with_collapsed(true),
    ));
    tree
}

#[test]
fn json_round_trip_is_identity() {
    let tree = detailed_tree();
    let json = to_json_string(tree.nodes()).unwrap();
    let decoded = from_json_str(&json).unwrap();
    assert_eq!(Tree::new(decoded), tree);
}

#[test]
fn writes_browser_field_names() {
    let nodes = vec![
        Node::from(PoseStep::new("P", [0.0; 6]).with_duration_ms(Some(2000))),
        gripper("G", 80),
        folder("F", Vec::new()),
    ];
    let json = to_json_string(&nodes).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert!(json.ends_with("]\n"));
    assert_eq!(value[0]["type"], "pose");
    assert_eq!(value[0]["duration"], 2000);
    assert_eq!(value[0]["move_mode"], 1);
    assert_eq!(value[0]["speed"], 50);
    assert_eq!(value[1]["type"], "gripper");
    assert_eq!(value[1]["effort"], 1000);
    assert!(value[1].get("duration").is_none());
    assert_eq!(value[2]["type"], "folder");
    assert_eq!(value[2]["collapsed"], false);
}

#[test]
fn legacy_entries_are_tagged_by_joints() {
    let raw = r#"[
        { "name": "old pose", "joints": [0, 0, 0, 0, 0, 0] },
        { "name": "old grip", "value": 40 },
        { "type": "folder", "name": "F", "children": [ { "name": "nested", "value": 90 } ] }
    ]"#;
    let nodes = from_json_str(raw).unwrap();

    let Node::Pose(old_pose) = &nodes[0] else {
        panic!("expected pose");
    };
    assert_eq!(old_pose.speed(), 50);
    assert_eq!(old_pose.move_mode(), MoveMode::Joint);
    assert_eq!(old_pose.end_pose(), &[0.0; 6]);
    assert_eq!(old_pose.duration_ms(), None);

    let Node::Gripper(old_grip) = &nodes[1] else {
        panic!("expected gripper");
    };
    assert_eq!(old_grip.effort(), 1000);

    let children = nodes[2].as_folder().unwrap().children();
    assert!(matches!(children[0], Node::Gripper(_)));
}

#[test]
fn zero_duration_and_effort_are_kept() {
    let raw = r#"[
        { "type": "pose", "name": "home", "joints": [0, 0, 0, 0, 0, 0], "duration": 0 },
        { "type": "gripper", "name": "loose", "value": 30, "effort": 0, "duration": 0 },
        { "type": "gripper", "name": "firm", "value": 30 }
    ]"#;
    let nodes = from_json_str(raw).unwrap();

    let Node::Pose(home) = &nodes[0] else {
        panic!("expected pose");
    };
    assert_eq!(home.duration_ms(), Some(0));

    let Node::Gripper(loose) = &nodes[1] else {
        panic!("expected gripper");
    };
    assert_eq!(loose.effort(), 0);
    assert_eq!(loose.duration_ms(), Some(0));

    let Node::Gripper(firm) = &nodes[2] else {
        panic!("expected gripper");
    };
    assert_eq!(firm.effort(), GripperStep::DEFAULT_EFFORT);
    assert_eq!(firm.duration_ms(), None);
}

#[rstest]
#[case::object(r#"{ "type": "pose" }"#)]
#[case::unknown_type(r#"[ { "type": "wait", "name": "x" } ]"#)]
#[case::bad_move_mode(r#"[ { "type": "pose", "joints": [0,0,0,0,0,0], "move_mode": 7 } ]"#)]
#[case::speed(r#"[ { "type": "pose", "joints": [0,0,0,0,0,0], "speed": 150 } ]"#)]
#[case::value(r#"[ { "type": "gripper", "value": 101 } ]"#)]
#[case::syntax("[ { ")]
fn rejects_invalid_documents(#[case] raw: &str) {
    assert!(from_json_str(raw).is_err());
}

#[test]
fn non_array_is_malformed() {
    let err = from_json_str(r#"{ "type": "pose" }"#).unwrap_err();
    assert!(matches!(err, DecodeError::Malformed(_)));
}

#[test]
fn save_then_load_round_trips_on_disk() {
    let tmp = TempDir::new("roundtrip");
    let file = SequenceFile::new(tmp.path().join("piper_sequence.json"))
        .with_durability(WriteDurability::Durable);
    let tree = detailed_tree();

    file.save(tree.nodes()).unwrap();
    let loaded = file.load().unwrap();
    assert_eq!(Tree::new(loaded), tree);

    let leftovers: Vec<_> = std::fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(".armseq.tmp."))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn failed_staging_removes_the_temp_file() {
    let tmp = TempDir::new("staging");
    let tmp_path = tmp.path().join(".armseq.tmp.seq.json.1");

    // Data already written, then the sync step fails.
    let err = stage_tmp_file(&tmp_path, |file| {
        use std::io::Write;
        file.write_all(b"[]")?;
        Err(std::io::Error::other("sync failed"))
    })
    .unwrap_err();

    let StoreError::Io { path, source } = &err else {
        panic!("expected io error");
    };
    assert_eq!(path, &tmp_path);
    assert_eq!(source.to_string(), "sync failed");
    assert!(!tmp_path.exists());

    stage_tmp_file(&tmp_path, |_| Ok(())).unwrap();
    assert!(tmp_path.exists());
}

#[test]
fn save_overwrites_existing_file() {
    let tmp = TempDir::new("overwrite");
    let file = SequenceFile::new(tmp.path().join("seq.json"));
    file.save(&[pose("first")]).unwrap();
    file.save(&[pose("second"), pose("third")]).unwrap();
    assert_eq!(names(&file.load().unwrap()), ["second", "third"]);
}

#[test]
fn save_refuses_empty_sequence() {
    let tmp = TempDir::new("empty");
    let target = tmp.path().join("seq.json");
    let err = SequenceFile::new(&target).save(&[]).unwrap_err();
    assert!(matches!(err, StoreError::EmptySequence));
    assert!(!target.exists());
}

#[test]
fn load_errors_carry_the_path() {
    let tmp = TempDir::new("errors");
    let missing = SequenceFile::new(tmp.path().join("missing.json"));
    assert!(matches!(missing.load(), Err(StoreError::Io { .. })));

    let broken_path = tmp.path().join("broken.json");
    std::fs::write(&broken_path, "not json").unwrap();
    let err = SequenceFile::new(&broken_path).load().unwrap_err();
    let StoreError::Json { path, .. } = &err else {
        panic!("expected json error");
    };
    assert_eq!(path, &broken_path);

    let object_path = tmp.path().join("object.json");
    std::fs::write(&object_path, "{}").unwrap();
    let err = SequenceFile::new(&object_path).load().unwrap_err();
    assert!(matches!(err, StoreError::MalformedFile { .. }));
    assert!(err.to_string().contains("not an array"));
}
