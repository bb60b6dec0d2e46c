// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Armseq CLI entrypoint.
//!
//! Loads a sequence file and prints its outline (default), its flattened playback order, or
//! plays it against a dry-run controller that only logs the commands it receives.

use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use armseq::config::EditorConfig;
use armseq::model::{Session, Tree};
use armseq::playback::{ArmState, ControlApi, ControlError, GripperMove, JointMove, Player};
use armseq::render::{render_outline, render_steps, RenderOptions};
use armseq::store::SequenceFile;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <sequence.json> [--config <file>] [--outline] [--flatten] [--play] [--paths]\n\n--outline prints the sequence tree (default when no other output is chosen).\n--flatten prints the steps in playback order.\n--play replays the sequence against a dry-run controller that logs each command.\n--paths prefixes outline rows with their tree path.\n\nSet RUST_LOG to adjust logging (default `armseq=info`)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    sequence: String,
    config: Option<String>,
    outline: bool,
    flatten: bool,
    play: bool,
    paths: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();
    let mut sequence = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(args.next().ok_or(())?);
            }
            "--outline" => set_once(&mut options.outline)?,
            "--flatten" => set_once(&mut options.flatten)?,
            "--play" => set_once(&mut options.play)?,
            "--paths" => set_once(&mut options.paths)?,
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if sequence.is_some() {
                    return Err(());
                }
                sequence = Some(arg);
            }
        }
    }

    options.sequence = sequence.ok_or(())?;
    if !options.flatten && !options.play {
        options.outline = true;
    }
    Ok(options)
}

fn set_once(flag: &mut bool) -> Result<(), ()> {
    if *flag {
        return Err(());
    }
    *flag = true;
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("armseq=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Acknowledges every command immediately and logs it.
struct DryRunControl;

impl ControlApi for DryRunControl {
    async fn move_joints(&self, request: JointMove) -> Result<(), ControlError> {
        info!(
            joints = ?request.joints,
            speed = request.speed,
            move_mode = request.move_mode.code(),
            "move_joints"
        );
        Ok(())
    }

    async fn move_gripper(&self, request: GripperMove) -> Result<(), ControlError> {
        info!(value = request.value, effort = request.effort, "move_gripper");
        Ok(())
    }

    async fn current_state(&self) -> Result<ArmState, ControlError> {
        Ok(ArmState::default())
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "armseq".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing();

        let config = match &options.config {
            Some(path) => EditorConfig::load(path)?,
            None => EditorConfig::default(),
        };
        let nodes = SequenceFile::new(&options.sequence).load()?;
        let session = Session::new(config).with_tree(Tree::new(nodes));

        if options.outline {
            let render_options = RenderOptions {
                show_paths: options.paths,
            };
            print!(
                "{}",
                render_outline(session.tree(), session.selection(), render_options)
            );
        }

        if options.flatten {
            print!("{}", render_steps(&session.tree().flatten()));
        }

        if options.play {
            let player = Player::new(session.config());
            let run = player.start(session.tree()).ok_or("playback already running")?;
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            let report = runtime.block_on(run.run(&DryRunControl));
            println!(
                "played {} steps ({} failed{})",
                report.dispatched + report.failed,
                report.failed,
                if report.cancelled { ", cancelled" } else { "" }
            );
        }

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("armseq: {err}");
        std::process::exit(1);
    }
}
