use crate::components::{step, Dir, Pos};
use crate::level::Maze;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub pos: Pos,
    pub dir: Dir,
}

impl Player {
    pub fn new(pos: Pos) -> Self {
        Self { pos, dir: Dir::Right }
    }

    pub fn steer(&mut self, dir: Dir) {
        self.dir = dir;
    }

    pub fn advance(&mut self, maze: &Maze) {
        self.pos = step(self.pos, self.dir, maze);
    }
}
