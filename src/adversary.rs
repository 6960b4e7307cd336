//! The pursuing adversary and its per-tick movement policy.
//!
//! Each tick the adversary asks four tiers for a move, in priority order,
//! and commits the first answer:
//!
//! 1. [`Tier::LockOn`]: a player trail tile is within the vision window and
//!    the player can be reached by walking only on trail tiles.
//! 2. [`Tier::Hallway`]: standing in a one-tile-wide passage, keep going
//!    the way it was already heading.
//! 3. [`Tier::Frontier`]: step onto an adjacent floor tile it has never
//!    occupied, scanning +x, -x, +y, -y.
//! 4. [`Tier::Wander`]: step onto any adjacent floor tile in random order.
//!
//! The adversary only ever walks on floor; the exit tile is off limits.

use log::{info, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Dir, Grid, Pos};
use crate::pathing::shortest_path;
use crate::trail::Trail;

pub const LOCK_ON_NOTICE: &str = "You feel a chill... something is following your trail!";

/// Number of non-floor cardinal neighbours that makes a tile a hallway.
const HALLWAY_WALLS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Explore,
    TrailFollow,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Explore => "explore",
            Mode::TrailFollow => "trail_follow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    LockOn,
    Hallway,
    Frontier,
    Wander,
}

impl Tier {
    pub const PRIORITY: [Tier; 4] = [Tier::LockOn, Tier::Hallway, Tier::Frontier, Tier::Wander];

    fn evaluate<R: Rng + ?Sized>(
        self,
        adversary: &mut Adversary,
        sight: &Sight<'_>,
        rng: &mut R,
    ) -> Option<Step> {
        match self {
            Tier::LockOn => lock_on(adversary, sight),
            Tier::Hallway => hallway(adversary, sight),
            Tier::Frontier => frontier(adversary, sight),
            Tier::Wander => wander(adversary, sight, rng),
        }
    }
}

/// What the adversary can see of the world this tick.
struct Sight<'a> {
    grid: &'a Grid,
    player_trail: &'a Trail,
    player_pos: Pos,
}

/// A move some tier committed to. `mode: None` keeps the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Step {
    to: Pos,
    dir: Dir,
    mode: Option<Mode>,
}

/// Result of one [`Adversary::decide_and_move`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub pos: Pos,
    pub mode: Mode,
    /// The tier that produced the move, `None` if the adversary stayed put.
    pub tier: Option<Tier>,
    /// Set only on the tick the adversary locks on to the player's trail.
    pub notice: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adversary {
    pub pos: Pos,
    /// Direction of the last step taken, `None` before the first move.
    pub last_dir: Option<Dir>,
    pub mode: Mode,
    pub locked_on: bool,
    pub in_hallway: bool,
    pub vision_radius: usize,
    /// Tiles the adversary has stained; slows the player down.
    pub trail: Trail,
    /// Tiles the adversary remembers occupying.
    pub explored: Trail,
}

impl Adversary {
    pub fn new(pos: Pos, vision_radius: usize) -> Self {
        Self {
            pos,
            last_dir: None,
            mode: Mode::Explore,
            locked_on: false,
            in_hallway: false,
            vision_radius,
            trail: Trail::starting_at(pos),
            explored: Trail::starting_at(pos),
        }
    }

    /// Picks and performs this tick's single-tile move.
    pub fn decide_and_move<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        player_trail: &Trail,
        player_pos: Pos,
        rng: &mut R,
    ) -> Turn {
        let sight = Sight {
            grid,
            player_trail,
            player_pos,
        };
        for tier in Tier::PRIORITY {
            if let Some(step) = tier.evaluate(self, &sight, rng) {
                return self.commit(tier, step);
            }
        }
        trace!("adversary at {} is boxed in", self.pos);
        Turn {
            pos: self.pos,
            mode: self.mode,
            tier: None,
            notice: None,
        }
    }

    fn commit(&mut self, tier: Tier, step: Step) -> Turn {
        let mut notice = None;
        if tier == Tier::LockOn {
            if !self.locked_on {
                info!("adversary locked on to the player's trail at {}", self.pos);
                notice = Some(LOCK_ON_NOTICE);
            }
            self.locked_on = true;
        }
        self.pos = step.to;
        self.last_dir = Some(step.dir);
        if let Some(mode) = step.mode {
            self.mode = mode;
        }
        self.trail.insert(step.to);
        self.explored.insert(step.to);
        trace!("adversary {:?} -> {} ({})", tier, self.pos, self.mode.label());
        Turn {
            pos: self.pos,
            mode: self.mode,
            tier: Some(tier),
            notice,
        }
    }

    /// Whether any floor tile of the player's trail lies inside the square
    /// vision window, clipped to the map.
    fn sees_trail(&self, sight: &Sight<'_>) -> bool {
        let grid = sight.grid;
        if grid.width() == 0 || grid.height() == 0 {
            return false;
        }
        let r = self.vision_radius;
        let x_max = (self.pos.x + r).min(grid.width() - 1);
        let y_max = (self.pos.y + r).min(grid.height() - 1);
        (self.pos.y.saturating_sub(r)..=y_max).any(|y| {
            (self.pos.x.saturating_sub(r)..=x_max).any(|x| {
                let pos = Pos::new(x, y);
                sight.player_trail.contains(pos) && grid.is_floor(pos)
            })
        })
    }
}

/// At least two of the four cardinal neighbours are wall, exit or off-map.
pub fn is_hallway(grid: &Grid, pos: Pos) -> bool {
    let blocked = Dir::SCAN
        .into_iter()
        .filter(|&dir| !grid.step(pos, dir).is_some_and(|p| grid.is_floor(p)))
        .count();
    blocked >= HALLWAY_WALLS
}

fn lock_on(adversary: &mut Adversary, sight: &Sight<'_>) -> Option<Step> {
    let path = if adversary.sees_trail(sight) {
        shortest_path(sight.grid, adversary.pos, sight.player_pos, |p| {
            sight.grid.is_floor(p) && sight.player_trail.contains(p)
        })
    } else {
        None
    };
    let step = path.filter(|p| p.len() >= 2).and_then(|path| {
        let to = path[1];
        Dir::between(adversary.pos, to).map(|dir| Step {
            to,
            dir,
            mode: Some(Mode::TrailFollow),
        })
    });
    if step.is_none() {
        adversary.locked_on = false;
    }
    step
}

fn hallway(adversary: &mut Adversary, sight: &Sight<'_>) -> Option<Step> {
    let grid = sight.grid;
    if !is_hallway(grid, adversary.pos) {
        adversary.in_hallway = false;
        return None;
    }
    adversary.in_hallway = true;
    let ahead = adversary.last_dir.and_then(|dir| {
        grid.step(adversary.pos, dir)
            .filter(|&p| grid.is_floor(p))
            .map(|to| Step {
                to,
                dir,
                mode: None,
            })
    });
    if ahead.is_none() {
        adversary.in_hallway = false;
    }
    ahead
}

fn frontier(adversary: &mut Adversary, sight: &Sight<'_>) -> Option<Step> {
    let grid = sight.grid;
    Dir::SCAN.into_iter().find_map(|dir| {
        grid.step(adversary.pos, dir)
            .filter(|&p| grid.is_floor(p) && !adversary.explored.contains(p))
            .map(|to| Step {
                to,
                dir,
                mode: Some(Mode::Explore),
            })
    })
}

fn wander<R: Rng + ?Sized>(
    adversary: &mut Adversary,
    sight: &Sight<'_>,
    rng: &mut R,
) -> Option<Step> {
    let grid = sight.grid;
    let mut dirs = Dir::SCAN;
    dirs.shuffle(rng);
    dirs.into_iter().find_map(|dir| {
        grid.step(adversary.pos, dir)
            .filter(|&p| grid.is_floor(p))
            .map(|to| Step {
                to,
                dir,
                mode: Some(Mode::Explore),
            })
    })
}
