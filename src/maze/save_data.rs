//! JSON level files.
//!
//! A level is one JSON object:
//!
//! ```json
//! {
//!   "map": [[1, 1, 1], [1, 0, 1], [1, 1, 1]],
//!   "start": [1, 1],
//!   "end": [1, 1],
//!   "dialogues": [[[1, 1], [0, 4], "hello"]],
//!   "red": { "location": [1, 1], "map": [[0, 0, 0], [0, 0, 0], [0, 0, 0]] }
//! }
//! ```
//!
//! `map` holds 0 (open) / 1 (wall) rows in wall-matrix shape. Coordinates are
//! `[row, col]` matrix positions. Every key besides the known ones is a box,
//! named by its colour; a `_N` suffix (`red_2`) allows repeated colours.

use crate::config::GameConfig;
use crate::error::{MazeError, Result};
use crate::math::coordinates::MatrixPos;
use crate::maze::Maze;
use crate::maze::raster::GlyphColor;
use crate::maze::region::RevealBox;
use crate::maze::wall_matrix::WallMatrix;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A line of text shown once when the player reaches `hit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(MatrixPos, MatrixPos, String)", into = "(MatrixPos, MatrixPos, String)")]
pub struct Dialogue {
    pub hit: MatrixPos,
    /// Where the text starts (matrix coordinates).
    pub text_at: MatrixPos,
    pub text: String,
}

impl From<(MatrixPos, MatrixPos, String)> for Dialogue {
    fn from((hit, text_at, text): (MatrixPos, MatrixPos, String)) -> Self {
        Self { hit, text_at, text }
    }
}

impl From<Dialogue> for (MatrixPos, MatrixPos, String) {
    fn from(dialogue: Dialogue) -> Self {
        (dialogue.hit, dialogue.text_at, dialogue.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxData {
    pub location: MatrixPos,
    pub map: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    pub map: Vec<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<MatrixPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<MatrixPos>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dialogues: Vec<Dialogue>,
    #[serde(flatten)]
    pub boxes: BTreeMap<String, BoxData>,
}

/// Everything a level needs, decoded from [`SaveData`].
#[derive(Debug, Clone)]
pub struct LevelParts {
    pub maze: Maze,
    pub boxes: Vec<RevealBox>,
    pub dialogues: Vec<Dialogue>,
}

/// Colour of a box key: `"red"` and `"red_2"` are both red.
pub fn box_color(key: &str) -> Result<GlyphColor> {
    key.split('_').next().unwrap_or(key).parse()
}

impl SaveData {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads a level file.
    ///
    /// # Errors
    /// IO and JSON errors.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let data = Self::from_json(&text)?;
        info!(path = %path.display(), boxes = data.boxes.len(), "read level");
        Ok(data)
    }

    /// Captures a maze, its boxes and dialogues.
    pub fn from_maze(maze: &Maze, boxes: &[RevealBox], dialogues: &[Dialogue]) -> Self {
        let mut named = BTreeMap::new();
        for reveal_box in boxes {
            let color = reveal_box.color().name();
            let mut key = color.to_string();
            let mut n = 1;
            while named.contains_key(&key) {
                n += 1;
                key = format!("{color}_{n}");
            }
            named.insert(
                key,
                BoxData {
                    location: reveal_box.center(),
                    map: reveal_box.matrix().to_int_rows(),
                },
            );
        }
        Self {
            map: maze.matrix().to_int_rows(),
            start: maze.start,
            end: maze.end,
            dialogues: dialogues.to_vec(),
            boxes: named,
        }
    }

    /// Decodes the level: maze, boxes in key order, dialogues.
    ///
    /// # Errors
    /// `MalformedSaveData` for a map that is not a maze, start/end on a wall
    /// or outside the map, box maps of a different shape, or unknown colours.
    pub fn into_level_parts(self, config: &GameConfig) -> Result<LevelParts> {
        let matrix = WallMatrix::from_int_rows(&self.map)?;
        for (name, pos) in [("start", self.start), ("end", self.end)] {
            if let Some(pos) = pos {
                if !matrix.is_open(pos) {
                    return Err(MazeError::malformed(format!(
                        "{name} {pos:?} is not an open position"
                    )));
                }
            }
        }
        let maze = Maze::load(matrix, self.start, self.end)?;
        let boxes = self
            .boxes
            .into_iter()
            .map(|(key, data)| {
                let color = box_color(&key)?;
                let matrix = WallMatrix::from_int_rows(&data.map)?;
                RevealBox::from_matrix(&maze, data.location, matrix, config.footprint, color)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(LevelParts {
            maze,
            boxes,
            dialogues: self.dialogues,
        })
    }

    /// Writes the level to `dir` under a timestamped name
    /// (`Maze_10-16-26_03-04PM.json`), creating `dir` if needed.
    ///
    /// # Errors
    /// IO errors creating the directory or writing the file.
    pub fn save_to_file(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let name = Local::now().format("Maze_%m-%d-%y_%I-%M%p.json").to_string();
        let path = dir.join(name);
        fs::write(&path, self.to_json()?)?;
        info!(path = %path.display(), "saved level");
        Ok(path)
    }
}
