use crate::config::BoardLayout;
use crate::entity::{Position, Snake};
use rand::Rng;

/// Drawable area handed to the game when a session starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Board dimensions. Occupancy lives with the snake, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridWorld {
    pub cols: i32,
    pub rows: i32,
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl GridWorld {
    /// Dimensions are clamped to at least one cell each way.
    pub fn new(cols: i32, rows: i32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    pub fn from_viewport(viewport: Viewport, layout: &BoardLayout) -> Self {
        let cols = ((viewport.width - layout.margin_x) / layout.cell_width).floor();
        let rows = ((viewport.height - layout.margin_y) / layout.cell_height).floor();
        // NaN and negatives both land on the 1x1 floor
        let cols = if cols.is_finite() { cols.max(0.0) as i32 } else { 0 };
        let rows = if rows.is_finite() { rows.max(0.0) as i32 } else { 0 };
        Self::new(cols, rows)
    }

    pub fn center(&self) -> Position {
        Position::new(self.cols / 2, self.rows / 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.cols && pos.y < self.rows
    }

    /// Toroidal wrap: stepping off one edge re-enters on the opposite one.
    pub fn wrap(&self, pos: Position) -> Position {
        Position::new(pos.x.rem_euclid(self.cols), pos.y.rem_euclid(self.rows))
    }

    /// Random free cell for the next cheese.
    ///
    /// Tries `attempts` uniform samples, then scans row by row so a crowded
    /// board still terminates. Returns `None` only when every cell is taken.
    pub fn spawn_food<R: Rng + ?Sized>(
        &self,
        occupants: &Snake,
        rng: &mut R,
        attempts: u32,
    ) -> Option<Position> {
        for _ in 0..attempts {
            let pos = Position::new(rng.gen_range(0..self.cols), rng.gen_range(0..self.rows));
            if !occupants.occupies(pos) {
                return Some(pos);
            }
        }

        log::debug!(
            "food spawn fell back to scan after {} attempts ({} occupied)",
            attempts,
            occupants.len()
        );

        (0..self.rows)
            .flat_map(|y| (0..self.cols).map(move |x| Position::new(x, y)))
            .find(|&pos| !occupants.occupies(pos))
    }
}
