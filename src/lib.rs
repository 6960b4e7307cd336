//! A small roguelike chase: escape a generated dungeon of rooms and a maze
//! while an adversary hunts you down by following the trail you leave.

pub mod adversary;
pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod mapgen;
pub mod maze;
pub mod pathing;
pub mod render;
pub mod rooms;
pub mod stitch;
pub mod trail;

pub use adversary::{Adversary, Mode, Tier, Turn};
pub use config::{GameConfig, MapConfig};
pub use error::{ConfigError, GridError, MapGenError};
pub use game::{Command, Game, Outcome};
pub use grid::{Dir, Grid, Pos, Tile};
pub use mapgen::{generate_map, generate_map_with_rng, place_entity, GeneratedMap};
pub use trail::{Trail, Walker};
