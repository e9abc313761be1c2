//! fogbox - a terminal maze you only see once.
//!
//! A random perfect maze is drawn with Unicode box-drawing characters, shown
//! for a few seconds and then erased. The player walks the now invisible
//! maze; circular "boxes" bring parts of it back while the player stands on
//! them.
//!
//! # Architecture
//! - `maze/`: grid, generator, rasterizer, placement, reveal boxes, level files
//! - `math/`: screen and matrix coordinates
//! - `game/`: level runtime, player, score, key mapping
//! - `renderer/`: draw buffer and the crossterm backend
//! - `app`: the play loop

pub mod app;
pub mod config;
pub mod error;
pub mod game;
pub mod math;
pub mod maze;
pub mod renderer;

pub use config::GameConfig;
pub use error::{MazeError, Result};
