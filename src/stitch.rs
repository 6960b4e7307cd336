//! Joins the maze to the room graph and adds redundant room links.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::GridError;
use crate::grid::{Grid, Pos, Tile};
use crate::maze::MazeArea;
use crate::rooms::{carve_corridor, Room};

const MIN_EXTRA_LOOPS: usize = 3;

/// Carves up to `budget` corridors, each from a shuffled maze border tile
/// to the target nearest that tile. Returns the `(edge, target)` pairs in
/// carving order.
pub fn connect_maze(
    grid: &mut Grid,
    area: &MazeArea,
    targets: &[Pos],
    budget: usize,
    rng: &mut impl Rng,
) -> Result<Vec<(Pos, Pos)>, GridError> {
    let mut edges = area.perimeter();
    edges.shuffle(rng);

    let mut links = Vec::with_capacity(budget);
    for edge in edges.into_iter().take(budget) {
        let Some(target) = nearest(edge, targets) else {
            break;
        };
        carve_corridor(grid, edge, target, rng)?;
        links.push((edge, target));
    }
    debug!("connected maze to rooms with {} corridors", links.len());
    Ok(links)
}

/// Closest of `targets` to `from` by Manhattan distance; the earliest wins
/// ties.
fn nearest(from: Pos, targets: &[Pos]) -> Option<Pos> {
    targets.iter().copied().min_by_key(|t| from.manhattan(*t))
}

/// Links `max(3, rooms / 3)` random room pairs so the chain of rooms gains
/// cycles. Returns the number of corridors carved.
pub fn add_room_loops(
    grid: &mut Grid,
    rooms: &[Room],
    rng: &mut impl Rng,
) -> Result<usize, GridError> {
    let mut pairs = Vec::new();
    for (i, a) in rooms.iter().enumerate() {
        for b in &rooms[i + 1..] {
            pairs.push((a.center(), b.center()));
        }
    }
    pairs.shuffle(rng);

    let wanted = MIN_EXTRA_LOOPS.max(rooms.len() / 3);
    let mut made = 0;
    for (a, b) in pairs.into_iter().take(wanted) {
        carve_corridor(grid, a, b, rng)?;
        made += 1;
    }
    debug!("added {made} loop corridors between rooms");
    Ok(made)
}

pub fn mark_exit(grid: &mut Grid, pos: Pos) -> Result<(), GridError> {
    grid.set(pos.x, pos.y, Tile::Exit)
}
