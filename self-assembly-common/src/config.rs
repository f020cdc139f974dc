use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::sim_params::LatticeParams;
use crate::snapshot::BackupFormat;
use crate::strategy::CheckStrategy;
use std::path::{Path, PathBuf};

// Lattice geometry
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LatticeConfig {
    #[serde(default = "default_size")]
    pub size: usize,
    #[serde(default = "default_particle_length")]
    pub particle_length: usize,
}

// How the diffusion run is driven
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RunConfig {
    #[serde(default)]
    pub seed: Option<u64>, // Random seed is drawn (and logged) when absent
    #[serde(default)]
    pub max_steps: Option<u64>, // Unlimited when absent
    #[serde(default)]
    pub log_lattice_every: u64, // 0 disables printing the lattice
    #[serde(default)]
    pub monochrome: bool,
    #[serde(default)]
    pub restore_from: Option<PathBuf>, // Backup to resume from instead of filling a new lattice
    #[serde(default = "default_status_interval_secs")]
    pub status_interval_secs: f64,
}

// Self-assembly detection settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SelfAssemblyConfig {
    #[serde(default)]
    pub check: bool,
    #[serde(default)]
    pub strategy: CheckStrategy,
    #[serde(default)]
    pub threshold: Option<f64>, // Overrides the strategy threshold when set
    #[serde(default = "default_every")]
    pub check_every: u64,
    #[serde(default)]
    pub stop_when_found: bool,
}

// Output settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default)]
    pub save_backups: bool,
    #[serde(default = "default_save_every")]
    pub save_every: u64,
    #[serde(default)]
    pub format: BackupFormat,
    #[serde(default)]
    pub save_stats: bool,
}

fn default_size() -> usize {
    256
}

fn default_particle_length() -> usize {
    8
}

fn default_status_interval_secs() -> f64 {
    5.0
}

fn default_every() -> u64 {
    1
}

fn default_save_every() -> u64 {
    1000
}

impl Default for LatticeConfig {
    fn default() -> Self {
        LatticeConfig {
            size: default_size(),
            particle_length: default_particle_length(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            seed: None,
            max_steps: None,
            log_lattice_every: 0,
            monochrome: false,
            restore_from: None,
            status_interval_secs: default_status_interval_secs(),
        }
    }
}

impl Default for SelfAssemblyConfig {
    fn default() -> Self {
        SelfAssemblyConfig {
            check: false,
            strategy: CheckStrategy::Clusters,
            threshold: None,
            check_every: default_every(),
            stop_when_found: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            directory: None,
            save_backups: false,
            save_every: default_save_every(),
            format: BackupFormat::Json,
            save_stats: false,
        }
    }
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SimulationConfig {
    #[serde(default)]
    pub lattice: LatticeConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub self_assembly: SelfAssemblyConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config = Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))?;

        Ok(config)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings that the engine itself doesn't validate.
    /// Lattice bounds are checked when the lattice is built.
    pub fn validate(&self) -> Result<()> {
        if self.self_assembly.check_every == 0 {
            anyhow::bail!("self_assembly.check_every must be greater than 0.");
        }
        if self.output.save_every == 0 {
            anyhow::bail!("output.save_every must be greater than 0.");
        }
        if let Some(threshold) = self.self_assembly.threshold {
            if !(threshold > 0.0 && threshold <= 1.0) {
                anyhow::bail!("self_assembly.threshold must be in (0, 1], got {}.", threshold);
            }
        }
        if !(self.run.status_interval_secs >= 0.0) {
            anyhow::bail!("run.status_interval_secs must not be negative.");
        }
        if self.self_assembly.stop_when_found && !self.self_assembly.check {
            anyhow::bail!("self_assembly.stop_when_found requires self_assembly.check = true.");
        }
        Ok(())
    }

    /// Lattice dimensions requested by this configuration.
    pub fn lattice_params(&self) -> LatticeParams {
        LatticeParams::new(self.lattice.size, self.lattice.particle_length)
    }

    /// Threshold actually used by self-assembly checks.
    pub fn check_threshold(&self) -> f64 {
        self.self_assembly
            .threshold
            .unwrap_or_else(|| self.self_assembly.strategy.threshold())
    }

    /// Output directory, falling back to a name derived from the lattice dimensions.
    pub fn output_dir(&self) -> PathBuf {
        self.output
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.lattice_params().default_dir_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config.lattice_params(), LatticeParams::new(256, 8));
        assert_eq!(config.run.max_steps, None);
        assert_eq!(config.self_assembly.strategy, CheckStrategy::Clusters);
        assert_eq!(config.check_threshold(), 0.5);
        assert_eq!(config.output.format, BackupFormat::Json);
        assert_eq!(config.output_dir(), PathBuf::from("S_256_P_8"));
    }

    #[test]
    fn parses_full_config() {
        let text = r#"
            [lattice]
            size = 128
            particle_length = 12

            [run]
            seed = 7
            max_steps = 400000
            restore_from = "runs/S_128_P_12_STEP_1000.json"

            [self_assembly]
            check = true
            strategy = "clusters-95"
            check_every = 100
            stop_when_found = true

            [output]
            directory = "runs"
            save_backups = true
            save_every = 500
            format = "messagepack"
            save_stats = true
        "#;
        let config = SimulationConfig::from_toml_str(text).unwrap();
        assert_eq!(config.lattice_params(), LatticeParams::new(128, 12));
        assert_eq!(config.run.seed, Some(7));
        assert_eq!(config.self_assembly.strategy, CheckStrategy::Clusters95);
        assert_eq!(config.check_threshold(), 0.95);
        assert_eq!(config.output.format, BackupFormat::MessagePack);
        assert_eq!(config.output_dir(), PathBuf::from("runs"));
    }

    #[test]
    fn explicit_threshold_overrides_strategy() {
        let text = "[self_assembly]\nstrategy = \"clusters-99\"\nthreshold = 0.75\n";
        let config = SimulationConfig::from_toml_str(text).unwrap();
        assert_eq!(config.check_threshold(), 0.75);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(SimulationConfig::from_toml_str("[output]\nsave_every = 0\n").is_err());
        assert!(SimulationConfig::from_toml_str("[self_assembly]\ncheck_every = 0\n").is_err());
        assert!(SimulationConfig::from_toml_str("[self_assembly]\nthreshold = 1.5\n").is_err());
        assert!(SimulationConfig::from_toml_str("[self_assembly]\nstop_when_found = true\n").is_err());
        assert!(SimulationConfig::from_toml_str("[lattice]\nsize = 12.5\n").is_err());
        assert!(SimulationConfig::from_toml_str("[self_assembly]\nstrategy = \"nope\"\n").is_err());
    }
}
