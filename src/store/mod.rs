// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for sequences on disk.
//!
//! A sequence file is a pretty-printed JSON array of step objects, compatible with files saved
//! by the browser editor (including older files whose entries carry no `type` tag).

pub mod sequence_file;

pub use sequence_file::{
    from_json_str, to_json_string, DecodeError, SequenceFile, StoreError, WriteDurability,
};
