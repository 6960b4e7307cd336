//! Map generation pipeline: rooms, maze, stitching, exit, repair.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::MapConfig;
use crate::error::MapGenError;
use crate::grid::{Grid, Pos, Tile};
use crate::maze::{carve_maze, MazeArea};
use crate::pathing::{is_reachable, repair_connection, REACH_EXPANSION_CAP};
use crate::rooms::{place_rooms, Room};
use crate::stitch::{add_room_loops, connect_maze, mark_exit};

/// Spawn used when not a single room could be placed.
pub const FALLBACK_SPAWN: Pos = Pos::new(1, 1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMap {
    pub grid: Grid,
    pub spawn: Pos,
    pub exit: Pos,
    /// Rooms in placement order; the first one holds the spawn.
    pub rooms: Vec<Room>,
    pub maze: MazeArea,
    /// Set when the exit was unreachable and a direct corridor was forced.
    pub repaired: bool,
}

/// Generates a map from `config.seed`, or from OS entropy when no seed is
/// given. The same seed and dimensions always produce the same map.
pub fn generate_map(
    width: usize,
    height: usize,
    config: &MapConfig,
) -> Result<GeneratedMap, MapGenError> {
    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    generate_map_with_rng(width, height, config, &mut rng)
}

/// Same as [`generate_map`] but draws from a caller-owned generator, which
/// keeps advancing afterwards. `config.seed` is ignored.
pub fn generate_map_with_rng(
    width: usize,
    height: usize,
    config: &MapConfig,
    rng: &mut impl Rng,
) -> Result<GeneratedMap, MapGenError> {
    config.validate(width, height)?;
    let mut grid = Grid::new(width, height);

    let rooms = place_rooms(&mut grid, config, rng)?;
    let spawn = rooms.first().map_or(FALLBACK_SPAWN, Room::center);
    let exit_room =
        farthest_room(&rooms, spawn).unwrap_or(Room::new(spawn.x, spawn.y, 1, 1));

    let maze = MazeArea::beside(&exit_room, width, height);
    carve_maze(&mut grid, &maze, rng)?;

    let targets: Vec<Pos> = if rooms.is_empty() {
        vec![spawn]
    } else {
        rooms.iter().map(Room::center).collect()
    };
    connect_maze(&mut grid, &maze, &targets, config.maze_connections, rng)?;

    // On small maps the maze can overlap the spawn room, so the exit may
    // land on the spawn tile itself. The player then wins on the first tick.
    let exit = maze.center();
    mark_exit(&mut grid, exit)?;
    add_room_loops(&mut grid, &rooms, rng)?;

    let repaired = !is_reachable(&grid, spawn, exit, REACH_EXPANSION_CAP);
    if repaired {
        info!("exit {exit} unreachable from spawn {spawn}, forcing a corridor");
        repair_connection(&mut grid, spawn, exit, rng)?;
    }
    debug!(
        "generated {}x{} map: {} rooms, spawn {spawn}, exit {exit}",
        width,
        height,
        rooms.len()
    );

    Ok(GeneratedMap {
        grid,
        spawn,
        exit,
        rooms,
        maze,
        repaired,
    })
}

/// The room whose center is furthest from `from`; the earliest wins ties.
fn farthest_room(rooms: &[Room], from: Pos) -> Option<Room> {
    let mut best: Option<(Room, usize)> = None;
    for room in rooms {
        let d = room.center().manhattan(from);
        match best {
            Some((_, bd)) if d <= bd => {}
            _ => best = Some((*room, d)),
        }
    }
    best.map(|(room, _)| room)
}

/// Picks a random floor tile (never the exit) that is not in `occupied`.
pub fn place_entity(grid: &Grid, occupied: &[Pos], rng: &mut impl Rng) -> Option<Pos> {
    let candidates: Vec<Pos> = grid
        .positions_of(Tile::Floor)
        .into_iter()
        .filter(|p| !occupied.contains(p))
        .collect();
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farthest_room_prefers_first_on_ties() {
        let rooms = [
            Room::new(1, 1, 3, 3),
            Room::new(10, 1, 3, 3),
            Room::new(1, 10, 3, 3),
        ];
        let spawn = rooms[0].center();
        assert_eq!(farthest_room(&rooms, spawn), Some(rooms[1]));
        assert_eq!(farthest_room(&[], spawn), None);
    }

    #[test]
    fn place_entity_avoids_occupied_and_exit() {
        let grid = Grid::from_ascii(&["#..>#"]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..10 {
            assert_eq!(
                place_entity(&grid, &[Pos::new(1, 0)], &mut rng),
                Some(Pos::new(2, 0))
            );
        }
        assert_eq!(
            place_entity(&grid, &[Pos::new(1, 0), Pos::new(2, 0)], &mut rng),
            None
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = generate_map(5, 40, &MapConfig::default()).unwrap_err();
        assert!(matches!(err, MapGenError::Config(_)));
    }

    #[test]
    fn exit_sits_at_maze_center() {
        let map = generate_map(60, 30, &MapConfig::default().with_seed(42)).unwrap();
        assert_eq!(map.exit, map.maze.center());
        assert_eq!(map.grid.tile_at(map.exit.x, map.exit.y), Ok(Tile::Exit));
        assert_eq!(map.grid.count(Tile::Exit), 1);
        assert_eq!(map.spawn, map.rooms[0].center());
    }
}
