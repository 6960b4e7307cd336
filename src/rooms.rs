//! Rectangular rooms and the L-shaped corridors that chain them together.

use log::debug;
use rand::Rng;

use crate::config::MapConfig;
use crate::error::GridError;
use crate::grid::{Grid, Pos};

const ROOM_PADDING: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Room {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Room {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Pos {
        Pos::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.x
            && pos.x < self.x + self.width
            && pos.y >= self.y
            && pos.y < self.y + self.height
    }

    /// True when the two rectangles, each grown by `padding` tiles, touch.
    pub fn intersects(&self, other: &Room, padding: usize) -> bool {
        self.x < other.x + other.width + padding
            && self.x + self.width + padding > other.x
            && self.y < other.y + other.height + padding
            && self.y + self.height + padding > other.y
    }

    pub fn carve(&self, grid: &mut Grid) -> Result<(), GridError> {
        for y in self.y..self.y + self.height {
            for x in self.x..self.x + self.width {
                grid.carve(Pos::new(x, y))?;
            }
        }
        Ok(())
    }
}

/// Makes `max_rooms` placement attempts and carves every room that keeps a
/// one-tile gap to the rooms before it, linking it to its predecessor.
pub fn place_rooms(
    grid: &mut Grid,
    config: &MapConfig,
    rng: &mut impl Rng,
) -> Result<Vec<Room>, GridError> {
    let mut rooms: Vec<Room> = Vec::new();
    for _ in 0..config.max_rooms {
        let w = rng.gen_range(config.room_min..=config.room_max);
        let h = rng.gen_range(config.room_min..=config.room_max);
        // The room plus a wall ring and one spare column has to fit.
        if grid.width() < w + 3 {
            continue;
        }
        let x = rng.gen_range(1..=grid.width() - w - 2);
        if grid.height() < h + 3 {
            continue;
        }
        let y = rng.gen_range(1..=grid.height() - h - 2);
        let room = Room::new(x, y, w, h);

        if rooms.iter().any(|other| room.intersects(other, ROOM_PADDING)) {
            continue;
        }
        room.carve(grid)?;
        if let Some(prev) = rooms.last() {
            carve_corridor(grid, prev.center(), room.center(), rng)?;
        }
        rooms.push(room);
    }
    debug!(
        "placed {} of {} rooms on a {}x{} grid",
        rooms.len(),
        config.max_rooms,
        grid.width(),
        grid.height()
    );
    Ok(rooms)
}

/// Carves an L-shaped corridor, flipping a coin for which leg goes first.
pub fn carve_corridor(
    grid: &mut Grid,
    from: Pos,
    to: Pos,
    rng: &mut impl Rng,
) -> Result<(), GridError> {
    if rng.gen_bool(0.5) {
        carve_horizontal(grid, from.x, to.x, from.y)?;
        carve_vertical(grid, from.y, to.y, to.x)
    } else {
        carve_vertical(grid, from.y, to.y, from.x)?;
        carve_horizontal(grid, from.x, to.x, to.y)
    }
}

pub fn carve_horizontal(grid: &mut Grid, x1: usize, x2: usize, y: usize) -> Result<(), GridError> {
    for x in x1.min(x2)..=x1.max(x2) {
        grid.carve(Pos::new(x, y))?;
    }
    Ok(())
}

pub fn carve_vertical(grid: &mut Grid, y1: usize, y2: usize, x: usize) -> Result<(), GridError> {
    for y in y1.min(y2)..=y1.max(y2) {
        grid.carve(Pos::new(x, y))?;
    }
    Ok(())
}
