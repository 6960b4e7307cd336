use thiserror::Error;

/// Raised by grid accessors handed a coordinate outside the map.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("map must be at least {min}x{min} tiles, got {width}x{height}")]
    MapTooSmall {
        width: usize,
        height: usize,
        min: usize,
    },

    #[error("room side bounds must satisfy 1 <= min <= max, got min={min} max={max}")]
    RoomBounds { min: usize, max: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapGenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grid(#[from] GridError),
}
