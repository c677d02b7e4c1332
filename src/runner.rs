use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::info;

use crate::error::GameError;
use crate::game::{Ending, GameState, Status};
use crate::input::{InputSource, TickInput};
use crate::render::{draw_frame, Canvas, Layout};

/// Paces the loop to a fixed tick period. A tick that overruns is not
/// made up for later.
#[derive(Debug)]
pub struct FrameClock {
    period: Duration,
    tick_start: Instant,
}

impl FrameClock {
    pub fn new(period: Duration) -> Self {
        Self { period, tick_start: Instant::now() }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn wait(&mut self) {
        let elapsed = self.tick_start.elapsed();
        if elapsed < self.period {
            thread::sleep(self.period - elapsed);
        }
        self.tick_start = Instant::now();
    }
}

pub struct GameContext<C, I> {
    pub canvas: C,
    pub input: I,
    pub clock: FrameClock,
    pub layout: Layout,
}

impl<C: Canvas, I: InputSource> GameContext<C, I> {
    pub fn new(canvas: C, input: I, clock: FrameClock, layout: Layout) -> Self {
        Self { canvas, input, clock, layout }
    }

    pub fn run(&mut self, game: &mut GameState, rng: &mut impl Rng) -> Result<Ending, GameError> {
        info!(
            rows = game.maze.rows(),
            cols = game.maze.cols(),
            pellets = game.pellets.len(),
            ghosts = game.ghosts.len(),
            tick_ms = self.clock.period().as_millis() as u64,
            "game started"
        );
        draw_frame(&mut self.canvas, game, &self.layout)?;
        self.clock.wait();

        loop {
            let input = TickInput::from_events(self.input.drain()?);
            match game.tick(input, rng) {
                Status::Running => {
                    draw_frame(&mut self.canvas, game, &self.layout)?;
                    self.clock.wait();
                }
                Status::Over(ending) => {
                    info!(?ending, score = game.score, ticks = game.ticks, "game over");
                    return Ok(ending);
                }
            }
        }
    }
}
