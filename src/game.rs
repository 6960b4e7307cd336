//! One play session: the map, the player, the adversary and turn order.

use log::{debug, info};
use rand::Rng;

use crate::adversary::{Adversary, Turn};
use crate::config::GameConfig;
use crate::error::MapGenError;
use crate::grid::{Dir, Grid, Pos};
use crate::mapgen::{generate_map_with_rng, place_entity, GeneratedMap};
use crate::trail::Walker;

pub const BLOCKED_NOTICE: &str = "You can't walk there.";
pub const SLOWED_NOTICE: &str = "You are slowed by the adversary's trail!";
pub const CAUGHT_NOTICE: &str = "You lose! The adversary caught you!";
pub const WON_NOTICE: &str = "You found the exit! Congratulations!";

/// Turns lost after stepping onto the adversary's trail.
const SLOW_TURNS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Dir),
    Wait,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Running,
    Won,
    Caught,
    Quit,
}

#[derive(Debug, Clone)]
pub struct Game {
    grid: Grid,
    spawn: Pos,
    exit: Pos,
    pub player: Walker,
    pub adversary: Adversary,
    seen: Vec<Vec<bool>>,
    reveal_radius: usize,
    messages: Vec<String>,
    tick: u64,
    slow_turns: u32,
    outcome: Outcome,
}

impl Game {
    /// Generates a fresh map and drops the adversary on a random floor tile
    /// other than the spawn.
    pub fn new(config: &GameConfig, rng: &mut impl Rng) -> Result<Self, MapGenError> {
        config.validate()?;
        let map = generate_map_with_rng(config.width, config.height, &config.map, rng)?;
        Ok(Self::from_map(map, config, rng))
    }

    pub fn from_map(map: GeneratedMap, config: &GameConfig, rng: &mut impl Rng) -> Self {
        let GeneratedMap {
            grid, spawn, exit, ..
        } = map;
        let start = place_entity(&grid, &[spawn], rng).unwrap_or(exit);
        debug!("adversary starts at {start}");
        let adversary = Adversary::new(start, config.vision_radius);
        Self::with_adversary(grid, spawn, exit, adversary, config.reveal_radius)
    }

    pub fn with_adversary(
        grid: Grid,
        spawn: Pos,
        exit: Pos,
        adversary: Adversary,
        reveal_radius: usize,
    ) -> Self {
        let seen = vec![vec![false; grid.width()]; grid.height()];
        let mut game = Self {
            grid,
            spawn,
            exit,
            player: Walker::new(spawn),
            adversary,
            seen,
            reveal_radius,
            messages: Vec::new(),
            tick: 0,
            slow_turns: 0,
            outcome: Outcome::Running,
        };
        game.reveal_around_player();
        game
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn spawn(&self) -> Pos {
        self.spawn
    }

    pub fn exit(&self) -> Pos {
        self.exit
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Up to `n` of the latest messages, oldest first.
    pub fn recent_messages(&self, n: usize) -> &[String] {
        &self.messages[self.messages.len().saturating_sub(n)..]
    }

    pub fn say(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Whether the player has ever had `pos` in view.
    pub fn is_seen(&self, pos: Pos) -> bool {
        self.seen
            .get(pos.y)
            .and_then(|row| row.get(pos.x))
            .copied()
            .unwrap_or(false)
    }

    /// Advances the world by one turn: player, fog, adversary, then the
    /// win and loss checks. Does nothing once the game is over.
    pub fn tick(&mut self, command: Command, rng: &mut impl Rng) -> Outcome {
        if self.outcome != Outcome::Running {
            return self.outcome;
        }
        match command {
            Command::Quit => {
                info!("player quit after {} ticks", self.tick);
                self.outcome = Outcome::Quit;
                return self.outcome;
            }
            Command::Move(dir) => self.move_player(dir),
            Command::Wait => {}
        }

        self.reveal_around_player();

        let turn: Turn = self.adversary.decide_and_move(
            &self.grid,
            &self.player.trail,
            self.player.pos,
            rng,
        );
        if let Some(notice) = turn.notice {
            self.say(notice);
        }

        if self.adversary.pos == self.player.pos {
            self.outcome = Outcome::Caught;
            self.say(CAUGHT_NOTICE);
        } else if self.player.pos == self.exit {
            self.outcome = Outcome::Won;
            self.say(WON_NOTICE);
        }
        if self.outcome != Outcome::Running {
            info!("game over at tick {}: {:?}", self.tick, self.outcome);
        }
        self.tick += 1;
        self.outcome
    }

    fn move_player(&mut self, dir: Dir) {
        if self.slow_turns > 0 {
            self.slow_turns -= 1;
            self.say(SLOWED_NOTICE);
            return;
        }
        if !self.player.try_move(dir, &self.grid) {
            self.say(BLOCKED_NOTICE);
            return;
        }
        if self.adversary.trail.contains(self.player.pos) {
            self.slow_turns = SLOW_TURNS;
            self.say(SLOWED_NOTICE);
        }
    }

    fn reveal_around_player(&mut self) {
        let r = self.reveal_radius;
        let Pos { x: px, y: py } = self.player.pos;
        let y_end = (py + r + 1).min(self.grid.height());
        let x_end = (px + r + 1).min(self.grid.width());
        for row in &mut self.seen[py.saturating_sub(r)..y_end] {
            for seen in &mut row[px.saturating_sub(r)..x_end] {
                *seen = true;
            }
        }
    }
}
