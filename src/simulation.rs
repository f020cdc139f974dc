use crate::clusters::{AssemblyReport, ClusterDetector};
use crate::lattice::Lattice;
use crate::visualization::SymbolMap;
use anyhow::{Context, Result};
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use self_assembly_common::{AssemblyRecord, LatticeBackup, SimulationConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Name of the statistics file written into the output directory.
pub const STATS_FILE_NAME: &str = "self_assembly_stats.csv";

/// Outcome of [`Simulation::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Diffusion steps performed by this run (not counting restored ones).
    pub steps: u64,
    /// Lattice step counter when self-assembly was first detected.
    pub self_assembled_at: Option<u64>,
    pub final_density: f64,
    pub last_backup: Option<PathBuf>,
    pub stats_file: Option<PathBuf>,
}

/// Drives one lattice through placement and diffusion, checking for
/// self-assembly and saving backups as configured.
pub struct Simulation {
    /// The configuration the run was built from.
    pub config: SimulationConfig,
    /// The lattice being simulated.
    pub lattice: Lattice,
    /// Seed of the lattice's random source, for reproducing the run.
    pub seed: u64,
    detector: ClusterDetector,
    threshold: f64,
    output_dir: PathBuf,
    output_ready: bool,
    /// Results of every self-assembly check, in order.
    recorded: Vec<AssemblyRecord>,
    last_backup: Option<(u64, PathBuf)>,
}

impl Simulation {
    /// Builds the lattice: restored from a backup when configured, otherwise
    /// freshly created and filled.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.run.seed.unwrap_or_else(rand::random);
        info!("Using random seed {}.", seed);
        let rng = StdRng::seed_from_u64(seed);

        let lattice = match &config.run.restore_from {
            Some(path) => {
                let backup = LatticeBackup::load(path)?;
                if backup.size != config.lattice.size
                    || backup.particle_length != config.lattice.particle_length
                {
                    warn!(
                        "Backup '{}' has size {} and particle length {}; ignoring configured {} and {}.",
                        path.display(),
                        backup.size,
                        backup.particle_length,
                        config.lattice.size,
                        config.lattice.particle_length
                    );
                }
                let lattice = Lattice::restore_with_rng(&backup, rng)
                    .with_context(|| format!("Failed to restore lattice from '{}'", path.display()))?;
                info!(
                    "Restored lattice {}x{} with {} particles at diffusion step {} from '{}'.",
                    lattice.size(),
                    lattice.size(),
                    lattice.particle_count(),
                    lattice.diffusion_steps(),
                    path.display()
                );
                lattice
            }
            None => {
                let mut lattice = Lattice::from_params(config.lattice_params(), rng)?;
                let fill_start = Instant::now();
                lattice.fill()?;
                info!(
                    "Filled lattice {}x{} with {} particles of length {} (density {:.4}) in {:.3} s.",
                    lattice.size(),
                    lattice.size(),
                    lattice.particle_count(),
                    lattice.particle_length(),
                    lattice.density(),
                    fill_start.elapsed().as_secs_f64()
                );
                lattice
            }
        };

        let threshold = config.check_threshold();
        let output_dir = config.output_dir();
        Ok(Simulation {
            config,
            lattice,
            seed,
            detector: ClusterDetector::new(),
            threshold,
            output_dir,
            output_ready: false,
            recorded: Vec::new(),
            last_backup: None,
        })
    }

    /// Advances the lattice by one diffusion step.
    pub fn step(&mut self) {
        self.lattice.step();
    }

    /// Threshold used for self-assembly classification.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Analyzes the current state and records the result.
    pub fn check(&mut self) -> Result<AssemblyReport> {
        let report = self.detector.analyze(&self.lattice)?;
        let record = report.to_record(
            self.lattice.diffusion_steps(),
            self.lattice.density(),
            self.threshold,
        );
        debug!(
            "Self-assembly check at step {}: horizontal {:?}, vertical {:?}, assembled: {}",
            record.step, record.horizontal_ratio, record.vertical_ratio, record.self_assembled
        );
        self.recorded.push(record);
        Ok(report)
    }

    /// Results of all checks made so far.
    pub fn recorded(&self) -> &[AssemblyRecord] {
        &self.recorded
    }

    /// Saves a backup of the current state into the output directory.
    /// Saving twice at the same diffusion step reuses the first file.
    pub fn save_backup(&mut self) -> Result<PathBuf> {
        let step = self.lattice.diffusion_steps();
        if let Some((saved_step, path)) = &self.last_backup {
            if *saved_step == step {
                return Ok(path.clone());
            }
        }

        self.prepare_output_dir()?;
        let path = self
            .lattice
            .backup()
            .save_to_dir(&self.output_dir, self.config.output.format)?;
        debug!("Saved backup of step {} to {}", step, path.display());
        self.last_backup = Some((step, path.clone()));
        Ok(path)
    }

    /// Writes every recorded check to the statistics CSV.
    pub fn write_stats(&mut self) -> Result<PathBuf> {
        self.prepare_output_dir()?;
        let path = self.output_dir.join(STATS_FILE_NAME);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create stats file '{}'", path.display()))?;
        for record in &self.recorded {
            writer.serialize(record)?;
        }
        writer.flush()?;
        info!("Wrote {} self-assembly checks to {}", self.recorded.len(), path.display());
        Ok(path)
    }

    fn prepare_output_dir(&mut self) -> Result<()> {
        if self.output_ready {
            return Ok(());
        }
        let dir = &self.output_dir;
        if dir.is_dir() {
            let non_empty = fs::read_dir(dir)
                .with_context(|| format!("Failed to read output directory '{}'", dir.display()))?
                .next()
                .is_some();
            if non_empty {
                warn!("Output directory '{}' is not empty; files may be overwritten.", dir.display());
            }
        } else {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory '{}'", dir.display()))?;
            info!("Created output directory '{}'.", dir.display());
        }
        self.output_ready = true;
        Ok(())
    }

    fn print_lattice(&self, symbols: &SymbolMap, title: &str) {
        println!("{}", title);
        println!("{}", self.lattice.visualization(symbols));
    }

    /// Runs diffusion until `max_steps` is reached or, when configured, until
    /// self-assembly is detected.
    pub fn run(&mut self) -> Result<RunSummary> {
        let run_config = self.config.run.clone();
        let assembly = self.config.self_assembly.clone();
        let output = self.config.output.clone();
        let symbols = if run_config.monochrome {
            SymbolMap::default()
        } else {
            SymbolMap::colored()
        };

        match run_config.max_steps {
            Some(max) => info!("Running up to {} diffusion steps.", max),
            None if assembly.stop_when_found => {
                info!("Running until self-assembly is detected (no step limit).")
            }
            None => warn!("No step limit and no stop condition: the run only ends when interrupted."),
        }
        if assembly.check {
            info!(
                "Checking self-assembly every {} steps with strategy '{}' (threshold {}).",
                assembly.check_every, assembly.strategy, self.threshold
            );
        }

        if output.save_backups {
            let path = self.save_backup()?;
            info!("Initial backup saved to {}", path.display());
        }
        if run_config.log_lattice_every > 0 {
            self.print_lattice(&symbols, "Generated lattice:");
        }

        let start_time = Instant::now();
        let mut previous_status_time = start_time;
        let mut steps: u64 = 0;
        let mut self_assembled_at = None;

        loop {
            if run_config.max_steps.is_some_and(|max| steps >= max) {
                break;
            }

            let step_start = Instant::now();
            self.step();
            steps += 1;
            let step_duration = step_start.elapsed();
            let diffusion_step = self.lattice.diffusion_steps();

            let mut stop = false;
            if assembly.check && diffusion_step % assembly.check_every == 0 {
                let report = self.check()?;
                if self_assembled_at.is_none() && report.is_self_assembled(self.threshold) {
                    self_assembled_at = Some(diffusion_step);
                    info!("Self-assembly detected at diffusion step {}.", diffusion_step);
                    stop = assembly.stop_when_found;
                }
            }

            if output.save_backups && (diffusion_step % output.save_every == 0 || stop) {
                self.save_backup()?;
            }

            if run_config.log_lattice_every > 0 && steps % run_config.log_lattice_every == 0 {
                self.print_lattice(
                    &symbols,
                    &format!("Lattice after {} diffusion steps:", diffusion_step),
                );
            }

            let now = Instant::now();
            if now.duration_since(previous_status_time).as_secs_f64() >= run_config.status_interval_secs {
                info!(
                    "Step {} | Particles: {} | Step Time: {:6.2} ms | Elapsed: {:.2} s",
                    diffusion_step,
                    self.lattice.particle_count(),
                    step_duration.as_secs_f64() * 1000.0,
                    start_time.elapsed().as_secs_f64()
                );
                previous_status_time = now;
            } else {
                trace!(
                    "Step {} completed in {:.2} ms",
                    diffusion_step,
                    step_duration.as_secs_f64() * 1000.0
                );
            }

            if stop {
                break;
            }
        }

        info!(
            "Finished {} diffusion steps in {:.3} seconds (lattice at step {}).",
            steps,
            start_time.elapsed().as_secs_f64(),
            self.lattice.diffusion_steps()
        );

        let stats_file = if output.save_stats {
            Some(self.write_stats()?)
        } else {
            None
        };

        Ok(RunSummary {
            steps,
            self_assembled_at,
            final_density: self.lattice.density(),
            last_backup: self.last_backup.as_ref().map(|(_, path)| path.clone()),
            stats_file,
        })
    }
}
