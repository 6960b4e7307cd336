//! The tile map every other module reads from.

use std::fmt;

use crate::error::GridError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Wall,
    Floor,
    Exit,
}

impl Tile {
    pub fn symbol(self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Floor => '.',
            Tile::Exit => '>',
        }
    }

    fn from_symbol(c: char) -> Tile {
        match c {
            '.' => Tile::Floor,
            '>' => Tile::Exit,
            _ => Tile::Wall,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Pos) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    /// Cardinal directions in +x, -x, +y, -y order.
    pub const SCAN: [Dir; 4] = [Dir::Right, Dir::Left, Dir::Down, Dir::Up];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    /// Direction of a single cardinal step from `from` to `to`.
    pub fn between(from: Pos, to: Pos) -> Option<Dir> {
        let dx = to.x as isize - from.x as isize;
        let dy = to.y as isize - from.y as isize;
        match (dx, dy) {
            (0, -1) => Some(Dir::Up),
            (0, 1) => Some(Dir::Down),
            (-1, 0) => Some(Dir::Left),
            (1, 0) => Some(Dir::Right),
            _ => None,
        }
    }
}

/// Fixed-size rectangle of tiles, addressed as `(x, y)` with the origin in
/// the top-left corner. Every tile starts out as wall.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    rows: Vec<Vec<Tile>>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![Tile::Wall; width]; height],
        }
    }

    /// Builds a grid from `#`/`.`/`>` lines. Rows shorter than the first one
    /// are padded with wall.
    pub fn from_ascii(lines: &[&str]) -> Self {
        let width = lines.first().map_or(0, |l| l.chars().count());
        let mut grid = Grid::new(width, lines.len());
        for (y, line) in lines.iter().enumerate() {
            for (x, c) in line.chars().take(width).enumerate() {
                grid.rows[y][x] = Tile::from_symbol(c);
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn check(&self, x: usize, y: usize) -> Result<(), GridError> {
        if self.in_bounds(x, y) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn tile_at(&self, x: usize, y: usize) -> Result<Tile, GridError> {
        self.check(x, y)?;
        Ok(self.rows[y][x])
    }

    pub fn set(&mut self, x: usize, y: usize, tile: Tile) -> Result<(), GridError> {
        self.check(x, y)?;
        self.rows[y][x] = tile;
        Ok(())
    }

    /// Turns a tile into floor. An exit stays an exit so later corridors
    /// cannot erase it.
    pub fn carve(&mut self, pos: Pos) -> Result<(), GridError> {
        if self.tile_at(pos.x, pos.y)? != Tile::Exit {
            self.rows[pos.y][pos.x] = Tile::Floor;
        }
        Ok(())
    }

    /// `None` off the map.
    pub fn get(&self, pos: Pos) -> Option<Tile> {
        self.rows.get(pos.y).and_then(|row| row.get(pos.x)).copied()
    }

    /// Floor or exit.
    ///
    /// # Panics
    ///
    /// If `pos` is off the map. Callers clip with [`Grid::step`] first.
    pub fn is_walkable(&self, pos: Pos) -> bool {
        matches!(self.tile(pos), Tile::Floor | Tile::Exit)
    }

    /// # Panics
    ///
    /// If `pos` is off the map.
    pub fn is_floor(&self, pos: Pos) -> bool {
        self.tile(pos) == Tile::Floor
    }

    fn tile(&self, pos: Pos) -> Tile {
        match self.tile_at(pos.x, pos.y) {
            Ok(tile) => tile,
            Err(err) => panic!("{err}"),
        }
    }

    /// The neighbour of `pos` in `dir`, or `None` when it would leave the map.
    pub fn step(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = pos.x.checked_add_signed(dx)?;
        let ny = pos.y.checked_add_signed(dy)?;
        self.in_bounds(nx, ny).then_some(Pos::new(nx, ny))
    }

    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        Dir::SCAN.into_iter().filter_map(move |dir| self.step(pos, dir))
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&t| t == tile)
            .count()
    }

    /// Every position holding `tile`, row by row.
    pub fn positions_of(&self, tile: Tile) -> Vec<Pos> {
        let mut cells = Vec::new();
        for (y, row) in self.rows.iter().enumerate() {
            for (x, &t) in row.iter().enumerate() {
                if t == tile {
                    cells.push(Pos::new(x, y));
                }
            }
        }
        cells
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let line: String = row.iter().map(|t| t.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
