//! Game configuration.
//!
//! Every tunable lives in [`GameConfig`]. Defaults reproduce the classic game;
//! a JSON file can override any subset of fields, and CLI flags override the file.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// How start and end positions are chosen for generated mazes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// Anywhere open, at least `min_distance` apart.
    #[default]
    Random,
    /// Start in the leftmost cell column, end in the rightmost.
    OppositeSides,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Frames the main maze stays visible at the start of a level.
    pub show_frames: u32,
    /// Multiplied by the Euclidean norm of the wall matrix shape to get the
    /// minimum start/end distance.
    pub min_distance_factor: f64,
    /// Attempts per rejection-sampling run.
    pub placement_attempts: usize,
    /// How many times placement may halve the minimum distance before giving up.
    pub relax_steps: u32,
    pub placement_mode: PlacementMode,
    /// Input poll timeout; one frame per timeout or key press.
    pub frame_timeout_ms: u64,
    /// Frames between two counted collisions.
    pub collision_cooldown_frames: u32,
    /// Width and height of a box footprint in screen characters.
    pub footprint: (u16, u16),
    pub initial_score: f64,
    /// Score lost per frame (halved while inside a box).
    pub score_penalty: f64,
    /// Score lost per counted collision, times the collision count.
    pub collision_penalty: f64,
    /// Score added for reaching the end.
    pub goal_reward: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            show_frames: 40,
            min_distance_factor: 0.5,
            placement_attempts: 10_000,
            relax_steps: 4,
            placement_mode: PlacementMode::Random,
            frame_timeout_ms: 50,
            collision_cooldown_frames: 10,
            footprint: (3, 3),
            initial_score: 200.0,
            score_penalty: 0.05,
            collision_penalty: 2.0,
            goal_reward: 200.0,
        }
    }
}

impl GameConfig {
    /// Reads a JSON config file; missing fields take their defaults.
    ///
    /// # Errors
    /// IO errors reading the file, JSON errors parsing it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "show_frames": 5, "placement_mode": "opposite_sides" }"#)
                .unwrap();
        assert_eq!(config.show_frames, 5);
        assert_eq!(config.placement_mode, PlacementMode::OppositeSides);
        assert_eq!(config.footprint, (3, 3));
        assert_eq!(config.initial_score, 200.0);
    }

    #[test]
    fn test_round_trip() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<GameConfig>(&json).unwrap(), config);
    }
}
