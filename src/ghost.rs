use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{step, Dir, Pos, Rgb};
use crate::level::Maze;

/// Chance of a ghost picking a new heading on a given tick: a roll over
/// `0..sides` turns the ghost when it lands above `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnPolicy {
    pub sides: u8,
    pub threshold: u8,
}

impl Default for TurnPolicy {
    fn default() -> Self {
        Self { sides: 11, threshold: 8 }
    }
}

impl TurnPolicy {
    pub fn triggers(self, roll: u8) -> bool {
        roll > self.threshold
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ghost {
    pub pos: Pos,
    pub dir: Dir,
    pub color: Rgb,
}

impl Ghost {
    pub fn new(pos: Pos, color: Rgb, rng: &mut impl Rng) -> Self {
        Self { pos, dir: random_dir(rng), color }
    }

    /// One tick of memoryless wandering: maybe turn, then try to move.
    /// A ghost facing a wall stalls until a later roll turns it.
    pub fn wander(&mut self, maze: &Maze, policy: TurnPolicy, rng: &mut impl Rng) {
        let roll = rng.gen_range(0..policy.sides.max(1));
        self.dir = resample(self.dir, roll, policy, || random_dir(rng));
        self.pos = step(self.pos, self.dir, maze);
    }
}

/// Heading after a roll. `pick` is only consulted when the roll triggers,
/// and may hand back the current heading.
pub fn resample(current: Dir, roll: u8, policy: TurnPolicy, pick: impl FnOnce() -> Dir) -> Dir {
    if policy.triggers(roll) {
        pick()
    } else {
        current
    }
}

pub fn random_dir(rng: &mut impl Rng) -> Dir {
    *Dir::ALL.choose(rng).unwrap_or(&Dir::Left)
}
