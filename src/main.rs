use anyhow::Result;
use log::{debug, info};
use self_assembly_engine::{Simulation, SimulationConfig};

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting Self-Assembly Engine...");

    // --- Load Configuration ---
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = SimulationConfig::load(&config_path)?;
    info!("Loaded configuration from '{}'.", config_path);
    debug!("Simulation configuration: {:#?}", config);

    // --- Initialize Lattice ---
    let mut sim = Simulation::new(config)?;

    // --- Diffusion Loop ---
    let summary = sim.run()?;

    match summary.self_assembled_at {
        Some(step) => info!("Self-assembly first detected at diffusion step {}.", step),
        None if sim.config.self_assembly.check => info!("No self-assembly detected."),
        None => {}
    }
    info!(
        "Final density {:.4} after {} diffusion steps (seed {}).",
        summary.final_density, summary.steps, sim.seed
    );
    if let Some(path) = &summary.last_backup {
        info!("Last backup: {}", path.display());
    }
    if let Some(path) = &summary.stats_file {
        info!("Self-assembly statistics: {}", path.display());
    }

    info!("Simulation Complete.");
    Ok(())
}
