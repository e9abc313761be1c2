//! Error type shared by the maze core and the game layer.

use thiserror::Error;

/// Main error type for fogbox operations.
///
/// Adjacency violations in [`crate::maze::grid::Grid::connect`] are not listed here:
/// they are programming errors and panic.
#[derive(Error, Debug)]
pub enum MazeError {
    /// A grid was requested with a zero (or negative) dimension.
    #[error("invalid maze dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: i64, height: i64 },

    /// Rejection sampling gave up.
    #[error("could not place {what} after {attempts} attempts")]
    PlacementUnsatisfiable { what: &'static str, attempts: usize },

    /// A level file had the wrong shape.
    #[error("malformed save data: {0}")]
    MalformedSaveData(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MazeError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSaveData(message.into())
    }
}

pub type Result<T> = std::result::Result<T, MazeError>;
