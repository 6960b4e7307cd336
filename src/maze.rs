//! The winding maze region that guards the exit.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::GridError;
use crate::grid::{Dir, Grid, Pos, Tile};
use crate::rooms::Room;

/// The maze never shrinks below this many tiles per side unless the map
/// edge forces it.
const MIN_MAZE_SIDE: usize = 10;
/// Gap kept between the exit room and the maze.
const MAZE_GAP: usize = 2;

/// Inclusive tile rectangle `(x1, y1)..=(x2, y2)` holding the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeArea {
    pub x1: usize,
    pub y1: usize,
    pub x2: usize,
    pub y2: usize,
}

impl MazeArea {
    /// Places a maze at least as large as `room` below it, else to its
    /// right, else up and to the left, keeping a two-tile wall margin from
    /// the far map edges.
    pub fn beside(room: &Room, width: usize, height: usize) -> Self {
        let maze_w = room.width.max(MIN_MAZE_SIDE);
        let maze_h = room.height.max(MIN_MAZE_SIDE);
        let max_x = width - 3;
        let max_y = height - 3;

        let (x1, y1) = if room.y + room.height + maze_h + MAZE_GAP < height {
            (room.x, room.y + room.height + MAZE_GAP)
        } else if room.x + room.width + maze_w + MAZE_GAP < width {
            (room.x + room.width + MAZE_GAP, room.y)
        } else {
            (
                room.x.saturating_sub(maze_w + MAZE_GAP).max(1),
                room.y.saturating_sub(maze_h + MAZE_GAP).max(1),
            )
        };
        let x2 = (x1 + maze_w - 1).min(max_x);
        let y2 = (y1 + maze_h - 1).min(max_y);

        // Keep room for at least one lattice cell on each axis.
        MazeArea {
            x1: x1.min(x2.saturating_sub(2)).max(1),
            y1: y1.min(y2.saturating_sub(2)).max(1),
            x2,
            y2,
        }
    }

    pub fn width(&self) -> usize {
        self.x2 - self.x1 + 1
    }

    pub fn height(&self) -> usize {
        self.y2 - self.y1 + 1
    }

    pub fn center(&self) -> Pos {
        Pos::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.x1 && pos.x <= self.x2 && pos.y >= self.y1 && pos.y <= self.y2
    }

    /// Border tiles: top and bottom rows first, then the side columns.
    pub fn perimeter(&self) -> Vec<Pos> {
        let mut edges = Vec::with_capacity(2 * (self.width() + self.height()));
        for x in self.x1..=self.x2 {
            edges.push(Pos::new(x, self.y1));
            edges.push(Pos::new(x, self.y2));
        }
        for y in self.y1 + 1..self.y2 {
            edges.push(Pos::new(self.x1, y));
            edges.push(Pos::new(self.x2, y));
        }
        edges
    }
}

/// Cell lattice of a carved maze. Cell `(cx, cy)` sits on tile
/// `origin + 2 * (cx, cy)`; the odd tiles between cells are walls or
/// passages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeLattice {
    pub origin: Pos,
    pub cells_w: usize,
    pub cells_h: usize,
}

impl MazeLattice {
    fn for_area(area: &MazeArea) -> Self {
        // Odd extents leave no stray column or row along the far border.
        let odd_w = if area.width() % 2 == 1 { area.width() } else { area.width() - 1 };
        let odd_h = if area.height() % 2 == 1 { area.height() } else { area.height() - 1 };
        MazeLattice {
            origin: Pos::new(area.x1 + 1, area.y1 + 1),
            cells_w: (odd_w / 2).max(1),
            cells_h: (odd_h / 2).max(1),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cells_w * self.cells_h
    }

    pub fn cell_pos(&self, cx: usize, cy: usize) -> Pos {
        Pos::new(self.origin.x + cx * 2, self.origin.y + cy * 2)
    }

    fn neighbor(&self, cx: usize, cy: usize, dir: Dir) -> Option<(usize, usize)> {
        let (dx, dy) = dir.delta();
        let nx = cx.checked_add_signed(dx)?;
        let ny = cy.checked_add_signed(dy)?;
        (nx < self.cells_w && ny < self.cells_h).then_some((nx, ny))
    }
}

struct Frame {
    cell: (usize, usize),
    dirs: [Dir; 4],
    next: usize,
}

/// Walls off `area` and carves a perfect maze into it with a randomized
/// depth-first backtracker starting from the top-left cell.
pub fn carve_maze(
    grid: &mut Grid,
    area: &MazeArea,
    rng: &mut impl Rng,
) -> Result<MazeLattice, GridError> {
    for y in area.y1..=area.y2 {
        for x in area.x1..=area.x2 {
            grid.set(x, y, Tile::Wall)?;
        }
    }

    let lattice = MazeLattice::for_area(area);
    let mut visited = vec![vec![false; lattice.cells_w]; lattice.cells_h];
    let mut stack = vec![enter_cell(grid, &lattice, &mut visited, (0, 0), rng)?];

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.dirs.len() {
            stack.pop();
            continue;
        }
        let dir = frame.dirs[frame.next];
        frame.next += 1;
        let (cx, cy) = frame.cell;
        let Some((nx, ny)) = lattice.neighbor(cx, cy, dir) else {
            continue;
        };
        if visited[ny][nx] {
            continue;
        }
        let here = lattice.cell_pos(cx, cy);
        let (dx, dy) = dir.delta();
        grid.set(
            here.x.wrapping_add_signed(dx),
            here.y.wrapping_add_signed(dy),
            Tile::Floor,
        )?;
        let frame = enter_cell(grid, &lattice, &mut visited, (nx, ny), rng)?;
        stack.push(frame);
    }

    debug!(
        "carved {}x{} cell maze in {:?}",
        lattice.cells_w, lattice.cells_h, area
    );
    Ok(lattice)
}

fn enter_cell(
    grid: &mut Grid,
    lattice: &MazeLattice,
    visited: &mut [Vec<bool>],
    (cx, cy): (usize, usize),
    rng: &mut impl Rng,
) -> Result<Frame, GridError> {
    visited[cy][cx] = true;
    let pos = lattice.cell_pos(cx, cy);
    grid.set(pos.x, pos.y, Tile::Floor)?;
    let mut dirs = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];
    dirs.shuffle(rng);
    Ok(Frame {
        cell: (cx, cy),
        dirs,
        next: 0,
    })
}
