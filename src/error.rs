use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level has no rows")]
    Empty,
    #[error("row {row} is {found} cells wide, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("unknown glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },
    #[error("border cell ({x}, {y}) must be a wall")]
    OpenBorder { x: usize, y: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cell size must be positive")]
    ZeroCellSize,
    #[error("grid of {cols}x{rows} cells is too small, need at least 3x3")]
    GridTooSmall { cols: usize, rows: usize },
    #[error("tick rate must be positive")]
    ZeroTickRate,
    #[error("{what} spawn ({x}, {y}) is not an interior cell")]
    SpawnOutside { what: &'static str, x: usize, y: usize },
    #[error("two ghosts spawn on ({x}, {y})")]
    DuplicateSpawn { x: usize, y: usize },
    #[error("turn threshold {threshold} must be below the roll size {sides}")]
    TurnThreshold { sides: u8, threshold: u8 },
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
