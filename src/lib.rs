pub mod backup;
pub mod clusters;
pub mod diffusion;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod lattice;
pub mod particle;
pub mod placement;
pub mod rng;
pub mod simulation;
pub mod visualization;

// Re-export key types for easier use by dependent crates
pub use clusters::{AssemblyReport, ClusterDetector, ClusterStats};
pub use error::{LatticeError, Result};
pub use geometry::{Direction, Point};
pub use lattice::{Lattice, MAX_LATTICE_SIZE, MAX_PARTICLE_LENGTH, MIN_LATTICE_SIZE, MIN_PARTICLE_LENGTH};
pub use particle::{Particle, ParticleId};
pub use rng::RandomSource;
pub use simulation::{RunSummary, Simulation};
pub use visualization::{Symbol, SymbolMap};

pub use self_assembly_common::{
    AssemblyRecord, BackupFormat, CheckStrategy, LatticeBackup, LatticeParams, Orientation,
    ParticleRecord, SimulationConfig,
};
