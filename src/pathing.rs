//! Breadth-first searches over the grid.

use std::collections::{HashMap, VecDeque};

use log::debug;
use rand::Rng;

use crate::error::GridError;
use crate::grid::{Grid, Pos};
use crate::rooms::carve_corridor;

/// Expansions after which the reachability check gives up and reports
/// the goal as unreachable.
pub const REACH_EXPANSION_CAP: usize = 100_000;

/// Whether `goal` can be walked to from `start` over floor and exit tiles.
/// A start tile that is not itself walkable never reaches anything.
pub fn is_reachable(grid: &Grid, start: Pos, goal: Pos, max_expansions: usize) -> bool {
    if !grid.is_walkable(start) {
        return false;
    }
    let mut seen = vec![vec![false; grid.width()]; grid.height()];
    let mut q = VecDeque::new();
    seen[start.y][start.x] = true;
    q.push_back(start);

    let mut expansions = 0;
    while let Some(pos) = q.pop_front() {
        if pos == goal {
            return true;
        }
        expansions += 1;
        if expansions > max_expansions {
            debug!("reachability search hit the {max_expansions} expansion cap");
            return false;
        }
        for next in grid.neighbors(pos) {
            if !seen[next.y][next.x] && grid.is_walkable(next) {
                seen[next.y][next.x] = true;
                q.push_back(next);
            }
        }
    }
    false
}

/// Shortest 4-connected path from `start` to `goal`, both ends included,
/// stepping only onto tiles accepted by `passable`. The start tile itself
/// is not tested.
pub fn shortest_path(
    grid: &Grid,
    start: Pos,
    goal: Pos,
    passable: impl Fn(Pos) -> bool,
) -> Option<Vec<Pos>> {
    let mut prev: HashMap<Pos, Pos> = HashMap::new();
    let mut q = VecDeque::new();
    prev.insert(start, start);
    q.push_back(start);

    while let Some(pos) = q.pop_front() {
        if pos == goal {
            let mut path = vec![pos];
            let mut at = pos;
            while at != start {
                at = prev[&at];
                path.push(at);
            }
            path.reverse();
            return Some(path);
        }
        for next in grid.neighbors(pos) {
            if !prev.contains_key(&next) && passable(next) {
                prev.insert(next, pos);
                q.push_back(next);
            }
        }
    }
    None
}

/// Forces a route by carving two L-shaped corridors through the midpoint of
/// `start` and `goal`.
pub fn repair_connection(
    grid: &mut Grid,
    start: Pos,
    goal: Pos,
    rng: &mut impl Rng,
) -> Result<(), GridError> {
    let mid = Pos::new((start.x + goal.x) / 2, (start.y + goal.y) / 2);
    debug!("repairing connectivity {start} -> {mid} -> {goal}");
    carve_corridor(grid, start, mid, rng)?;
    carve_corridor(grid, mid, goal, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const WALLED: [&str; 5] = [
        "#######",
        "#..#..#",
        "#..#.>#",
        "#..#..#",
        "#######",
    ];

    #[test]
    fn reachability_respects_walls() {
        let grid = Grid::from_ascii(&WALLED);
        let exit = Pos::new(5, 2);
        assert!(!is_reachable(&grid, Pos::new(1, 1), exit, REACH_EXPANSION_CAP));
        assert!(is_reachable(&grid, Pos::new(4, 1), exit, REACH_EXPANSION_CAP));
        // A wall start never reaches.
        assert!(!is_reachable(&grid, Pos::new(3, 2), exit, REACH_EXPANSION_CAP));
    }

    #[test]
    fn reachability_cap_reports_failure() {
        let grid = Grid::from_ascii(&["..........>"]);
        let (start, exit) = (Pos::new(0, 0), Pos::new(10, 0));
        assert!(is_reachable(&grid, start, exit, 10));
        assert!(!is_reachable(&grid, start, exit, 5));
    }

    #[test]
    fn repair_makes_goal_reachable() {
        let mut grid = Grid::from_ascii(&WALLED);
        let (start, exit) = (Pos::new(1, 1), Pos::new(5, 2));
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        repair_connection(&mut grid, start, exit, &mut rng).unwrap();
        assert!(is_reachable(&grid, start, exit, REACH_EXPANSION_CAP));
        assert!(!grid.is_floor(exit), "repair must keep the exit marker");
    }

    #[test]
    fn shortest_path_includes_both_ends() {
        let grid = Grid::from_ascii(&WALLED);
        let path = shortest_path(&grid, Pos::new(1, 1), Pos::new(2, 3), |p| {
            grid.is_floor(p)
        })
        .unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.first(), Some(&Pos::new(1, 1)));
        assert_eq!(path.last(), Some(&Pos::new(2, 3)));
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
    }

    #[test]
    fn shortest_path_to_self_is_single_node() {
        let grid = Grid::from_ascii(&WALLED);
        let at = Pos::new(1, 1);
        assert_eq!(shortest_path(&grid, at, at, |_| false), Some(vec![at]));
        assert_eq!(
            shortest_path(&grid, at, Pos::new(4, 1), |p| grid.is_floor(p)),
            None
        );
    }
}
