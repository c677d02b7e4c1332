use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::components::{Pos, Rgb};
use crate::error::ConfigError;
use crate::ghost::TurnPolicy;

const DEFAULT_SCREEN_W: u32 = 500;
const DEFAULT_SCREEN_H: u32 = 500;
const DEFAULT_CELL_SIZE: u32 = 25;
const DEFAULT_TICK_RATE: u32 = 30;
const DEFAULT_EXTRA_WALLS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostSpawn {
    pub pos: Pos,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub screen_width: u32,
    pub screen_height: u32,
    pub cell_size: u32,
    pub tick_rate: u32,
    pub extra_walls: usize,
    pub seed: Option<u64>,
    pub player_start: Pos,
    pub ghosts: Vec<GhostSpawn>,
    pub turn_policy: TurnPolicy,
    pub stop_when_cleared: bool,
}

impl Default for Config {
    fn default() -> Self {
        let rows = (DEFAULT_SCREEN_H / DEFAULT_CELL_SIZE) as usize;
        let cols = (DEFAULT_SCREEN_W / DEFAULT_CELL_SIZE) as usize;
        Self {
            screen_width: DEFAULT_SCREEN_W,
            screen_height: DEFAULT_SCREEN_H,
            cell_size: DEFAULT_CELL_SIZE,
            tick_rate: DEFAULT_TICK_RATE,
            extra_walls: DEFAULT_EXTRA_WALLS,
            seed: None,
            player_start: Pos::new(1, 1),
            ghosts: vec![
                GhostSpawn { pos: Pos::new(cols - 2, rows - 2), color: Rgb::RED },
                GhostSpawn { pos: Pos::new(2, rows - 2), color: Rgb::WHITE },
            ],
            turn_policy: TurnPolicy::default(),
            stop_when_cleared: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(rate) = read_var::<u32>(&lookup, "PACMAN_FPS").filter(|v| *v > 0) {
            self.tick_rate = rate;
        }
        if let Some(walls) = read_var::<usize>(&lookup, "PACMAN_WALLS") {
            self.extra_walls = walls;
        }
        if let Some(seed) = read_var::<u64>(&lookup, "PACMAN_SEED") {
            self.seed = Some(seed);
        }
        if let Some(flag) = read_var::<bool>(&lookup, "PACMAN_STOP_WHEN_CLEARED") {
            self.stop_when_cleared = flag;
        }
        self
    }

    pub fn rows(&self) -> usize {
        if self.cell_size == 0 {
            return 0;
        }
        (self.screen_height / self.cell_size) as usize
    }

    pub fn cols(&self) -> usize {
        if self.cell_size == 0 {
            return 0;
        }
        (self.screen_width / self.cell_size) as usize
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.tick_rate.max(1)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        let (rows, cols) = (self.rows(), self.cols());
        if rows < 3 || cols < 3 {
            return Err(ConfigError::GridTooSmall { cols, rows });
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        let interior = |p: Pos| p.x >= 1 && p.y >= 1 && p.x + 1 < cols && p.y + 1 < rows;
        if !interior(self.player_start) {
            return Err(ConfigError::SpawnOutside {
                what: "player",
                x: self.player_start.x,
                y: self.player_start.y,
            });
        }
        if let Some(spawn) = self.ghosts.iter().find(|g| !interior(g.pos)) {
            return Err(ConfigError::SpawnOutside { what: "ghost", x: spawn.pos.x, y: spawn.pos.y });
        }
        for (idx, spawn) in self.ghosts.iter().enumerate() {
            if self.ghosts[..idx].iter().any(|g| g.pos == spawn.pos) {
                return Err(ConfigError::DuplicateSpawn { x: spawn.pos.x, y: spawn.pos.y });
            }
        }
        let policy = self.turn_policy;
        if policy.threshold >= policy.sides {
            return Err(ConfigError::TurnThreshold {
                sides: policy.sides,
                threshold: policy.threshold,
            });
        }
        Ok(())
    }
}

fn read_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable override");
            None
        }
    }
}
