//! Tunables consumed by map generation and the game session.

use crate::error::ConfigError;

pub const MIN_MAP_SIDE: usize = 10;
pub const DEFAULT_MAP_W: usize = 80;
pub const DEFAULT_MAP_H: usize = 40;
pub const DEFAULT_ROOM_MIN: usize = 4;
pub const DEFAULT_ROOM_MAX: usize = 12;
pub const DEFAULT_MAX_ROOMS: usize = 15;
pub const DEFAULT_MAZE_CONNECTIONS: usize = 4;
pub const DEFAULT_VISION_RADIUS: usize = 2;
pub const DEFAULT_REVEAL_RADIUS: usize = 2;

/// Parameters for [`crate::mapgen::generate_map`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapConfig {
    /// Smallest room side, inclusive.
    pub room_min: usize,
    /// Largest room side, inclusive.
    pub room_max: usize,
    /// Number of placement attempts; rejected draws are not retried.
    pub max_rooms: usize,
    /// Corridors carved from the maze perimeter to nearby rooms.
    pub maze_connections: usize,
    /// Fixed seed for reproducible maps. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            room_min: DEFAULT_ROOM_MIN,
            room_max: DEFAULT_ROOM_MAX,
            max_rooms: DEFAULT_MAX_ROOMS,
            maze_connections: DEFAULT_MAZE_CONNECTIONS,
            seed: None,
        }
    }
}

impl MapConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self, width: usize, height: usize) -> Result<(), ConfigError> {
        if width < MIN_MAP_SIDE || height < MIN_MAP_SIDE {
            return Err(ConfigError::MapTooSmall {
                width,
                height,
                min: MIN_MAP_SIDE,
            });
        }
        if self.room_min == 0 || self.room_min > self.room_max {
            return Err(ConfigError::RoomBounds {
                min: self.room_min,
                max: self.room_max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub map: MapConfig,
    /// Half-side of the square window the adversary scans for trail tiles.
    pub vision_radius: usize,
    /// Half-side of the square the player uncovers each turn.
    pub reveal_radius: usize,
    /// Draw the whole map, ignoring fog of war.
    pub debug: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAP_W,
            height: DEFAULT_MAP_H,
            map: MapConfig::default(),
            vision_radius: DEFAULT_VISION_RADIUS,
            reveal_radius: DEFAULT_REVEAL_RADIUS,
            debug: false,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.map.validate(self.width, self.height)
    }
}
