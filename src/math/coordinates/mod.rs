//! Coordinate systems for the maze.
//!
//! This module provides utilities to convert between the coordinate systems used in the game:
//! - Grid coordinates: `(x, y)` of a cell, used by generation
//! - Matrix coordinates: `(row, col)` into the double resolution wall matrix
//! - Screen coordinates: `(x, y)` terminal characters, where the player moves

mod positions;
mod transformations;

pub use positions::*;
pub use transformations::*;
