//! Visited-tile bookkeeping shared by the player and the adversary.

use std::collections::HashSet;

use crate::grid::{Dir, Grid, Pos};

/// Append-only set of visited tiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trail {
    members: HashSet<Pos>,
}

impl Trail {
    pub fn starting_at(pos: Pos) -> Self {
        let mut trail = Trail::default();
        trail.insert(pos);
        trail
    }

    /// Returns `true` if the tile was not on the trail yet.
    pub fn insert(&mut self, pos: Pos) -> bool {
        self.members.insert(pos)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.members.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<Pos> for Trail {
    fn from_iter<I: IntoIterator<Item = Pos>>(iter: I) -> Self {
        let mut trail = Trail::default();
        for pos in iter {
            trail.insert(pos);
        }
        trail
    }
}

/// The player: a position that leaves a trail wherever it walks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walker {
    pub pos: Pos,
    pub trail: Trail,
}

impl Walker {
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            trail: Trail::starting_at(pos),
        }
    }

    /// Steps onto a floor or exit tile. Returns `false` and stays put when
    /// the target is a wall or off the map.
    pub fn try_move(&mut self, dir: Dir, grid: &Grid) -> bool {
        match grid.step(self.pos, dir) {
            Some(next) if grid.is_walkable(next) => {
                self.pos = next;
                self.trail.insert(next);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_ignores_repeats() {
        let mut trail = Trail::starting_at(Pos::new(1, 1));
        assert!(trail.insert(Pos::new(2, 1)));
        assert!(!trail.insert(Pos::new(1, 1)));
        assert_eq!(trail.len(), 2);
        assert!(trail.contains(Pos::new(2, 1)));
        assert!(!trail.contains(Pos::new(3, 1)));
    }

    #[test]
    fn walker_moves_onto_walkable_tiles_only() {
        let grid = Grid::from_ascii(&["#..>", "####"]);
        let mut walker = Walker::new(Pos::new(1, 0));
        assert!(!walker.try_move(Dir::Left, &grid));
        assert!(!walker.try_move(Dir::Up, &grid));
        assert!(walker.try_move(Dir::Right, &grid));
        assert!(walker.try_move(Dir::Right, &grid));
        assert_eq!(walker.pos, Pos::new(3, 0));
        assert!(!walker.try_move(Dir::Right, &grid));
        assert!(walker.trail.contains(Pos::new(1, 0)));
        assert!(walker.trail.contains(Pos::new(3, 0)));
        assert_eq!(walker.trail.len(), 3);
    }
}
