//! Dice, pools of identical dice, and roll results.
//!
//! A Razzle roll throws a pool of identical dice and only the total matters.
//! The standard game throws 3d6, but any positive face count works.

pub mod pool;
pub mod roll;

pub use pool::DicePool;
pub use roll::RollResult;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A fair die with faces numbered `1..=faces`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Die {
    faces: u32,
}

impl Die {
    /// The ordinary six-sided die.
    pub const D6: Die = Die { faces: 6 };

    /// A die with `faces` faces.
    pub fn new(faces: u32) -> Self {
        Self { faces }
    }

    /// Number of faces.
    pub fn faces(self) -> u32 {
        self.faces
    }

    /// Draw one face uniformly.
    pub fn roll<R: Rng + ?Sized>(self, rng: &mut R) -> u32 {
        rng.random_range(1..=self.faces)
    }
}

impl Default for Die {
    fn default() -> Self {
        Self::D6
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.faces)
    }
}
