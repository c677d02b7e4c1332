use std::collections::BTreeSet;

use rand::Rng;
use tracing::{debug, trace};

use crate::components::Pos;
use crate::config::Config;
use crate::error::GameError;
use crate::ghost::{Ghost, TurnPolicy};
use crate::input::TickInput;
use crate::level::Maze;
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Caught { ghost: usize },
    Quit,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Over(Ending),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PelletSet {
    remaining: BTreeSet<Pos>,
}

impl PelletSet {
    pub fn fill(maze: &Maze) -> Self {
        Self { remaining: maze.open_cells().into_iter().collect() }
    }

    pub fn take(&mut self, pos: Pos) -> bool {
        self.remaining.remove(&pos)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.remaining.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.remaining.iter().copied()
    }
}

pub struct GameState {
    pub maze: Maze,
    pub player: Player,
    pub ghosts: Vec<Ghost>,
    pub pellets: PelletSet,
    pub score: u32,
    pub ticks: u64,
    pub status: Status,
    pub turn_policy: TurnPolicy,
    pub stop_when_cleared: bool,
}

impl GameState {
    pub fn new(config: &Config, rng: &mut impl Rng) -> Result<Self, GameError> {
        config.validate()?;
        let maze = Maze::generate(config.rows(), config.cols(), config.extra_walls, rng);
        Ok(Self::with_maze(maze, config, rng))
    }

    /// Starts a game on an existing maze. Spawns are taken from `config`
    /// as-is, even when they sit on a wall.
    pub fn with_maze(maze: Maze, config: &Config, rng: &mut impl Rng) -> Self {
        let ghosts = config
            .ghosts
            .iter()
            .map(|spawn| Ghost::new(spawn.pos, spawn.color, &mut *rng))
            .collect();
        Self {
            pellets: PelletSet::fill(&maze),
            maze,
            player: Player::new(config.player_start),
            ghosts,
            score: 0,
            ticks: 0,
            status: Status::Running,
            turn_policy: config.turn_policy,
            stop_when_cleared: config.stop_when_cleared,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn tick(&mut self, input: TickInput, rng: &mut impl Rng) -> Status {
        if !self.is_running() {
            return self.status;
        }
        self.ticks += 1;

        if input.quit {
            self.status = Status::Over(Ending::Quit);
            return self.status;
        }
        if let Some(dir) = input.dir {
            self.player.steer(dir);
        }

        self.player.advance(&self.maze);
        if self.pellets.take(self.player.pos) {
            self.score += 1;
            debug!(x = self.player.pos.x, y = self.player.pos.y, score = self.score, "pellet eaten");
            if self.stop_when_cleared && self.pellets.is_empty() {
                self.status = Status::Over(Ending::Cleared);
                return self.status;
            }
        }

        // Every ghost moves even after a catch earlier in the same tick.
        for (idx, ghost) in self.ghosts.iter_mut().enumerate() {
            ghost.wander(&self.maze, self.turn_policy, rng);
            if ghost.pos == self.player.pos && self.status == Status::Running {
                debug!(ghost = idx, x = ghost.pos.x, y = ghost.pos.y, "player caught");
                self.status = Status::Over(Ending::Caught { ghost: idx });
            }
        }

        trace!(
            tick = self.ticks,
            x = self.player.pos.x,
            y = self.player.pos.y,
            pellets = self.pellets.len(),
            "tick"
        );
        self.status
    }
}
