//! Faces shown by one throw of a pool.

use serde::{Deserialize, Serialize};

/// The faces a pool showed, in throw order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    faces: Vec<u32>,
}

impl RollResult {
    /// Wrap the faces of a throw.
    pub fn new(faces: Vec<u32>) -> Self {
        Self { faces }
    }

    /// The individual faces.
    pub fn faces(&self) -> &[u32] {
        &self.faces
    }

    /// Sum of the faces.
    pub fn total(&self) -> u32 {
        self.faces.iter().sum()
    }

    /// Number of dice thrown.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if no dice were thrown.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let faces: Vec<String> = self.faces.iter().map(u32::to_string).collect();
        write!(f, "[{}] = {}", faces.join(", "), self.total())
    }
}
