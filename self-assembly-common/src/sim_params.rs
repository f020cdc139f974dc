use serde::{Deserialize, Serialize};

/// Lattice dimensions derived from the configuration (or a backup record).
/// Range validation happens when the engine constructs a lattice from them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeParams {
    /// Side length of the square toroidal grid.
    pub size: usize,
    /// Number of cells every particle occupies.
    pub particle_length: usize,
}

impl LatticeParams {
    pub fn new(size: usize, particle_length: usize) -> Self {
        LatticeParams { size, particle_length }
    }

    /// Total number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Directory name used when the output directory isn't configured explicitly.
    pub fn default_dir_name(&self) -> String {
        format!("S_{}_P_{}", self.size, self.particle_length)
    }
}
