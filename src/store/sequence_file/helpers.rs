// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Armseq-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Armseq and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StepJson {
    Pose {
        #[serde(default)]
        name: String,
        joints: [f64; 6],
        #[serde(default)]
        end_pose: [f64; 6],
        #[serde(default = "default_speed")]
        speed: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<u64>,
        #[serde(default = "default_move_mode")]
        move_mode: u8,
    },
    Gripper {
        #[serde(default)]
        name: String,
        value: u8,
        #[serde(default = "default_effort")]
        effort: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<u64>,
    },
    Folder {
        #[serde(default)]
        name: String,
        #[serde(default)]
        children: Vec<StepJson>,
        #[serde(default)]
        collapsed: bool,
    },
}

fn default_speed() -> u8 {
    PoseStep::DEFAULT_SPEED
}

fn default_move_mode() -> u8 {
    MoveMode::default().code()
}

fn default_effort() -> u32 {
    GripperStep::DEFAULT_EFFORT
}

impl From<&Node> for StepJson {
    fn from(node: &Node) -> Self {
        match node {
            Node::Pose(pose) => Self::Pose {
                name: pose.name().to_owned(),
                joints: *pose.joints(),
                end_pose: *pose.end_pose(),
                speed: pose.speed(),
                duration: pose.duration_ms(),
                move_mode: pose.move_mode().code(),
            },
            Node::Gripper(gripper) => Self::Gripper {
                name: gripper.name().to_owned(),
                value: gripper.value(),
                effort: gripper.effort(),
                duration: gripper.duration_ms(),
            },
            Node::Folder(folder) => Self::Folder {
                name: folder.name().to_owned(),
                children: folder.children().iter().map(Self::from).collect(),
                collapsed: folder.collapsed(),
            },
        }
    }
}

impl TryFrom<StepJson> for Node {
    type Error = DecodeError;

    fn try_from(step: StepJson) -> Result<Self, Self::Error> {
        let node = match step {
            StepJson::Pose {
                name,
                joints,
                end_pose,
                speed,
                duration,
                move_mode,
            } => {
                ensure_percent(&name, "speed", speed)?;
                let move_mode = MoveMode::from_code(move_mode).ok_or_else(|| {
                    DecodeError::Malformed(format!(
                        "pose {name:?}: unknown move_mode {move_mode:#04x}"
                    ))
                })?;
                Node::from(
                    PoseStep::new(name, joints)
                        .with_end_pose(end_pose)
                        .with_speed(speed)
                        .with_duration_ms(duration)
                        .with_move_mode(move_mode),
                )
            }
            StepJson::Gripper {
                name,
                value,
                effort,
                duration,
            } => {
                ensure_percent(&name, "value", value)?;
                Node::from(
                    GripperStep::new(name, value)
                        .with_effort(effort)
                        .with_duration_ms(duration),
                )
            }
            StepJson::Folder {
                name,
                children,
                collapsed,
            } => {
                let children = children
                    .into_iter()
                    .map(Node::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Node::from(
                    Folder::new(name)
                        .with_children(children)
                        .with_collapsed(collapsed),
                )
            }
        };
        Ok(node)
    }
}

fn ensure_percent(name: &str, field: &str, value: u8) -> Result<(), DecodeError> {
    if value > 100 {
        return Err(DecodeError::Malformed(format!(
            "step {name:?}: {field} {value} is above 100"
        )));
    }
    Ok(())
}

fn tag_legacy_entry(entry: &mut Value) {
    let Value::Object(fields) = entry else {
        return;
    };
    if !fields.contains_key("type") {
        let kind = if fields.contains_key("joints") {
            "pose"
        } else {
            "gripper"
        };
        fields.insert("type".to_owned(), Value::String(kind.to_owned()));
    }
    if let Some(Value::Array(children)) = fields.get_mut("children") {
        for child in children.iter_mut() {
            tag_legacy_entry(child);
        }
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    match fs::symlink_metadata(path) {
        Ok(md) if md.is_dir() => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: io::Error::other("path is a directory"),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".armseq.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    stage_tmp_file(&tmp_path, |file| {
        file.write_all(contents)?;
        if durability == WriteDurability::Durable {
            file.sync_all()?;
        }
        Ok(())
    })?;

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

/// Creates `tmp_path` and hands it to `fill`. On any failure the temp file is removed before
/// the error is returned.
fn stage_tmp_file(
    tmp_path: &Path,
    fill: impl FnOnce(&mut fs::File) -> io::Result<()>,
) -> Result<(), StoreError> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.to_path_buf(),
            source,
        })?;

    let filled = fill(&mut file);
    drop(file);
    if let Err(source) = filled {
        let _ = fs::remove_file(tmp_path);
        return Err(StoreError::Io {
            path: tmp_path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
