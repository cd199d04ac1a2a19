use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::sequence::ButtonColor;

#[derive(Debug, Deserialize, Clone)]
pub struct BoardFile {
    pub version: String,
    pub board_id: String,
    /// World translation applied to every object (the tweakable board pose).
    #[serde(default)]
    pub offset: [f32; 3],
    /// Euler angles in degrees, applied y-x-z like the pose controls expect.
    #[serde(default)]
    pub orientation_deg: [f32; 3],
    pub objects: Vec<BoardObject>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BoardObject {
    pub id: String,
    pub shape: ShapeSpec,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default = "default_tint")]
    pub tint: [f32; 3],
    /// Translation local to the board, applied before the board pose.
    #[serde(default)]
    pub offset: [f32; 3],
    /// Which button light drives this object's emissive channel, if any.
    #[serde(default)]
    pub light: Option<ButtonColor>,
}

/// Mesh source for one board object: a procedural primitive or an OBJ file.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub enum ShapeSpec {
    Box {
        size: [f32; 3],
    },
    Cylinder {
        radius: f32,
        height: f32,
        #[serde(default = "default_segments")]
        segments: u32,
    },
    RingSegment {
        inner_radius: f32,
        outer_radius: f32,
        height: f32,
        start_deg: f32,
        sweep_deg: f32,
        #[serde(default = "default_segments")]
        segments: u32,
    },
    Obj {
        path: String,
    },
}

pub struct BoardWatcher {
    board_path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl BoardWatcher {
    pub fn new(board_path: PathBuf) -> Self {
        let last_seen_modified = modified_time(&board_path);
        Self {
            board_path,
            last_seen_modified,
        }
    }

    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.board_path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

pub fn load_board_from_path(board_path: &Path) -> Result<BoardFile, String> {
    let raw = fs::read_to_string(board_path)
        .map_err(|e| format!("Failed to read board file {}: {e}", board_path.display()))?;
    let board: BoardFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse board JSON {}: {e}", board_path.display()))?;
    validate_board(&board)?;
    Ok(board)
}

fn validate_board(board: &BoardFile) -> Result<(), String> {
    // Strict on identifiers and light channels so the draw loop and the
    // light lookup can assume uniqueness without defensive branching.
    if board.version != "0.1" {
        return Err(format!(
            "Board validation failed: unsupported version '{}'",
            board.version
        ));
    }
    if board.objects.is_empty() {
        return Err("Board validation failed: objects array is empty".to_string());
    }

    let mut object_ids = HashSet::new();
    let mut light_channels = HashSet::new();

    for object in &board.objects {
        if object.id.is_empty() {
            return Err("Board validation failed: object with empty id".to_string());
        }
        if !object_ids.insert(object.id.clone()) {
            return Err(format!(
                "Board validation failed: duplicate object id '{}'",
                object.id
            ));
        }
        if let Some(channel) = object.light {
            if !light_channels.insert(channel) {
                return Err(format!(
                    "Board validation failed: light channel '{}' assigned twice",
                    channel
                ));
            }
        }
        if let ShapeSpec::Obj { path } = &object.shape {
            if path.is_empty() {
                return Err(format!(
                    "Board validation failed: object '{}' has an empty obj path",
                    object.id
                ));
            }
        }
    }

    for color in ButtonColor::ALL {
        if !light_channels.contains(&color) {
            return Err(format!(
                "Board validation failed: no object drives the '{}' light",
                color
            ));
        }
    }

    Ok(())
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

const fn default_tint() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

const fn default_segments() -> u32 {
    24
}
