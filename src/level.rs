use rand::Rng;

use crate::components::{Cell, Pos};
use crate::error::LevelError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Maze {
    /// Walled border, open interior, then `extra_walls` random interior
    /// cells turned into walls. Draws may repeat, so the number of interior
    /// walls is at most `extra_walls`.
    pub fn generate(rows: usize, cols: usize, extra_walls: usize, rng: &mut impl Rng) -> Maze {
        let mut cells = Vec::with_capacity(rows * cols);
        for y in 0..rows {
            for x in 0..cols {
                let border = x == 0 || y == 0 || x + 1 == cols || y + 1 == rows;
                cells.push(if border { Cell::Wall } else { Cell::Open });
            }
        }
        let mut maze = Maze { rows, cols, cells };

        if rows < 3 || cols < 3 {
            return maze;
        }
        for _ in 0..extra_walls {
            let x = rng.gen_range(1..=cols - 2);
            let y = rng.gen_range(1..=rows - 2);
            maze.set(Pos { x, y }, Cell::Wall);
        }
        maze
    }

    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Maze, LevelError> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.as_ref().chars().count()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(LevelError::Empty);
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for (y, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let width = line.chars().count();
            if width != cols {
                return Err(LevelError::Ragged { row: y, expected: cols, found: width });
            }
            for (x, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '#' => Cell::Wall,
                    '.' | ' ' => Cell::Open,
                    other => return Err(LevelError::UnknownGlyph { glyph: other, x, y }),
                };
                let border = x == 0 || y == 0 || x + 1 == cols || y + 1 == rows;
                if border && cell != Cell::Wall {
                    return Err(LevelError::OpenBorder { x, y });
                }
                cells.push(cell);
            }
        }
        Ok(Maze { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.cols && pos.y < self.rows
    }

    /// Anything outside the grid reads as a wall.
    pub fn cell(&self, pos: Pos) -> Cell {
        if self.contains(pos) {
            self.cells[pos.y * self.cols + pos.x]
        } else {
            Cell::Wall
        }
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        self.cell(pos) == Cell::Open
    }

    pub fn open_cells(&self) -> Vec<Pos> {
        self.positions().filter(|p| self.is_open(*p)).collect()
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Wall).count()
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.cols).map(move |x| Pos { x, y }))
    }

    fn set(&mut self, pos: Pos, cell: Cell) {
        let idx = pos.y * self.cols + pos.x;
        self.cells[idx] = cell;
    }
}
