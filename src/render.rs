use std::io;

use crate::components::{Cell, Pos, Rgb};
use crate::game::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

pub trait Canvas {
    fn clear(&mut self, color: Rgb) -> io::Result<()>;
    fn fill_rect(&mut self, rect: Rect, color: Rgb) -> io::Result<()>;
    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb) -> io::Result<()>;
    fn draw_text(&mut self, text: &str, at: Point, color: Rgb) -> io::Result<()>;
    fn present(&mut self) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub cell_size: u32,
    pub hud_at: Point,
}

impl Layout {
    pub fn new(cell_size: u32) -> Self {
        Self { cell_size, hud_at: Point { x: 10, y: 10 } }
    }

    pub fn cell_rect(&self, pos: Pos) -> Rect {
        Rect {
            x: pos.x as u32 * self.cell_size,
            y: pos.y as u32 * self.cell_size,
            w: self.cell_size,
            h: self.cell_size,
        }
    }

    pub fn cell_center(&self, pos: Pos) -> Point {
        let half = self.cell_size / 2;
        Point {
            x: pos.x as u32 * self.cell_size + half,
            y: pos.y as u32 * self.cell_size + half,
        }
    }

    pub fn player_radius(&self) -> u32 {
        self.cell_size.saturating_sub(5) / 2
    }

    pub fn ghost_radius(&self) -> u32 {
        self.cell_size / 2
    }

    pub fn pellet_radius(&self) -> u32 {
        (self.cell_size / 5).max(1)
    }
}

/// Draws one full frame. Later primitives cover earlier ones, so the
/// player goes on top of the ghosts and the score on top of everything.
pub fn draw_frame(canvas: &mut impl Canvas, game: &GameState, layout: &Layout) -> io::Result<()> {
    canvas.clear(Rgb::BLACK)?;

    for pos in game.maze.positions() {
        if game.maze.cell(pos) == Cell::Wall {
            canvas.fill_rect(layout.cell_rect(pos), Rgb::BLUE)?;
        }
    }
    for pos in game.pellets.iter() {
        canvas.fill_circle(layout.cell_center(pos), layout.pellet_radius(), Rgb::WHITE)?;
    }
    for ghost in &game.ghosts {
        canvas.fill_circle(layout.cell_center(ghost.pos), layout.ghost_radius(), ghost.color)?;
    }
    canvas.fill_circle(layout.cell_center(game.player.pos), layout.player_radius(), Rgb::YELLOW)?;

    canvas.draw_text(&format!("Score: {}", game.score), layout.hud_at, Rgb::WHITE)?;
    canvas.present()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Clear(Rgb),
    Rect(Rect, Rgb),
    Circle(Point, u32, Rgb),
    Text(String, Point, Rgb),
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pending: Vec<DrawOp>,
    pub frames: Vec<Vec<DrawOp>>,
}

impl RecordingCanvas {
    pub fn last_frame(&self) -> Option<&[DrawOp]> {
        self.frames.last().map(Vec::as_slice)
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Rgb) -> io::Result<()> {
        self.pending.push(DrawOp::Clear(color));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) -> io::Result<()> {
        self.pending.push(DrawOp::Rect(rect, color));
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb) -> io::Result<()> {
        self.pending.push(DrawOp::Circle(center, radius, color));
        Ok(())
    }

    fn draw_text(&mut self, text: &str, at: Point, color: Rgb) -> io::Result<()> {
        self.pending.push(DrawOp::Text(text.to_string(), at, color));
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.frames.push(std::mem::take(&mut self.pending));
        Ok(())
    }
}
