// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Armseq: editor core for robot-arm motion sequences.
//!
//! A sequence is a tree of pose steps, gripper steps and folders. [`model::Session`] holds one
//! editing session, [`ops`] mutates it with undo support, [`playback`] replays the flattened
//! steps against a controller and [`store`] reads and writes sequence files.

pub mod config;
pub mod model;
pub mod ops;
pub mod playback;
pub mod render;
pub mod store;
