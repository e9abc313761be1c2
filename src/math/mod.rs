//! Math utilities for the maze: coordinate types and the screen/matrix transforms.

pub mod coordinates;
