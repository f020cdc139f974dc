pub mod config;
pub mod orientation;
pub mod sim_params;
pub mod snapshot;
pub mod strategy;

// Re-export key types for easier use by dependent crates
pub use config::{LatticeConfig, OutputConfig, RunConfig, SelfAssemblyConfig, SimulationConfig};
pub use orientation::Orientation;
pub use sim_params::LatticeParams;
pub use snapshot::{AssemblyRecord, BackupFormat, LatticeBackup, ParticleRecord};
pub use strategy::CheckStrategy;
