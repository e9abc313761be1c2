//! Automatic box layout for generated levels.
//!
//! The maze is split into a grid of slots (one per 6 columns by 4 rows of
//! cells, at least one each way) and every slot gets one box near its middle.

use crate::config::GameConfig;
use crate::math::coordinates::MatrixPos;
use crate::maze::Maze;
use crate::maze::raster::GlyphColor;
use crate::maze::region::RevealBox;
use rand::Rng;
use tracing::{debug, warn};

/// Colours handed out to boxes in order. The main maze is green.
pub const BOX_COLORS: [GlyphColor; 6] = [
    GlyphColor::Red,
    GlyphColor::Blue,
    GlyphColor::Yellow,
    GlyphColor::Magenta,
    GlyphColor::Cyan,
    GlyphColor::White,
];

/// Slot counts `(across, down)` for a maze of `width x height` cells.
pub fn slot_counts(width: usize, height: usize) -> (usize, usize) {
    ((width / 6).max(1), (height / 4).max(1))
}

/// Box radius in matrix units for the given slot counts.
pub fn box_radius(width: usize, height: usize, slots: (usize, usize)) -> u32 {
    let (across, down) = slots;
    ((width * 2 / across).max(height / down) + 3) as u32
}

/// Places one box per slot.
///
/// A slot center is jittered by `[-2, 2)` in both directions and resampled
/// until it is open, at least 2 away from the matrix edge, and neither the
/// start nor the end. Slots that still fail after
/// `config.placement_attempts` samples are skipped.
pub fn layout_boxes<R: Rng + ?Sized>(
    maze: &Maze,
    config: &GameConfig,
    rng: &mut R,
) -> Vec<RevealBox> {
    let (width, height) = (maze.grid().width(), maze.grid().height());
    let slots @ (across, down) = slot_counts(width, height);
    let radius = box_radius(width, height, slots);
    let (slot_cols, slot_rows) = (width * 2 / across, height * 2 / down);
    let matrix = maze.matrix();
    let (rows, cols) = (matrix.rows() as i32, matrix.cols() as i32);
    debug!(boxes = across * down, radius, "laying out boxes");

    let acceptable = |pos: MatrixPos| {
        (2..=rows - 3).contains(&pos.row)
            && (2..=cols - 3).contains(&pos.col)
            && matrix.is_open(pos)
            && Some(pos) != maze.start
            && Some(pos) != maze.end
    };

    let mut boxes = Vec::with_capacity(across * down);
    for slot_y in 0..down {
        for slot_x in 0..across {
            let anchor = MatrixPos::new(
                (slot_rows / 2 + slot_rows * slot_y) as i32,
                (slot_cols / 2 + slot_cols * slot_x) as i32,
            );
            let center = (0..config.placement_attempts)
                .map(|_| {
                    MatrixPos::new(
                        anchor.row + rng.gen_range(-2..2),
                        anchor.col + rng.gen_range(-2..2),
                    )
                })
                .find(|pos| acceptable(*pos));
            let Some(center) = center else {
                warn!(slot_x, slot_y, ?anchor, "no room for a box in this slot");
                continue;
            };
            let color = BOX_COLORS[boxes.len() % BOX_COLORS.len()];
            debug!(?center, %color, "placed box");
            boxes.push(RevealBox::extract(maze, center, radius, config.footprint, color));
        }
    }
    boxes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use test_case::test_case;

    #[test_case(5, 3, (1, 1) ; "smaller than one slot")]
    #[test_case(12, 8, (2, 2) ; "two by two")]
    #[test_case(30, 10, (5, 2) ; "wide")]
    fn test_slot_counts(width: usize, height: usize, expected: (usize, usize)) {
        assert_eq!(slot_counts(width, height), expected);
    }

    #[test]
    fn test_box_radius() {
        // 2*12/2 = 12 beats 8/2 = 4
        assert_eq!(box_radius(12, 8, (2, 2)), 15);
    }

    #[test]
    fn test_layout_boxes_are_valid() {
        let mut rng = StdRng::seed_from_u64(21);
        let config = GameConfig::default();
        let maze = Maze::generate(18, 8, &config, &mut rng).unwrap();
        let boxes = layout_boxes(&maze, &config, &mut rng);
        assert!(!boxes.is_empty());
        assert!(boxes.len() <= 6);
        for (i, b) in boxes.iter().enumerate() {
            let center = b.center();
            assert!(maze.matrix().is_open(center));
            assert!(center.row >= 2 && center.col >= 2);
            assert_ne!(Some(center), maze.start);
            assert_ne!(Some(center), maze.end);
            assert_eq!(b.color(), BOX_COLORS[i]);
        }
    }
}
