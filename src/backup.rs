use crate::error::{LatticeError, Result};
use crate::geometry::Point;
use crate::lattice::Lattice;
use crate::particle::Particle;
use rand::rngs::StdRng;
use rand::SeedableRng;
use self_assembly_common::{LatticeBackup, ParticleRecord};
use std::collections::HashSet;

impl<R> Lattice<R> {
    /// Captures identity, orientation and head point of every particle.
    pub fn backup(&self) -> LatticeBackup {
        LatticeBackup {
            size: self.size(),
            particle_length: self.particle_length(),
            diffusion_steps: self.diffusion_steps,
            particles: self
                .particles_with_heads()
                .map(|(particle, head)| ParticleRecord {
                    id: particle.id(),
                    orientation: particle.orientation(),
                    x: head.x,
                    y: head.y,
                })
                .collect(),
        }
    }

    /// Rebuilds a lattice from a backup, driven by `rng` from here on.
    ///
    /// Particles are replayed in record order so the particle list (and thus
    /// diffusion sampling under a fixed seed) matches the original. Jamming is
    /// not re-checked, but records that can't describe a lattice at all
    /// (heads off the grid, zero or repeated ids, overlapping particles) are
    /// rejected.
    pub fn restore_with_rng(record: &LatticeBackup, rng: R) -> Result<Self> {
        let mut lattice = Lattice::with_rng(record.size, record.particle_length, rng)?;
        lattice.particles.reserve(record.particles.len());
        lattice.heads.reserve(record.particles.len());

        let mut ids = HashSet::with_capacity(record.particles.len());
        for entry in &record.particles {
            if entry.id == 0 || !ids.insert(entry.id) {
                return Err(LatticeError::InvalidBackup(format!(
                    "particle id {} is zero or repeated",
                    entry.id
                )));
            }
            if entry.x >= record.size || entry.y >= record.size {
                return Err(LatticeError::InvalidBackup(format!(
                    "particle {} has head ({}, {}) outside a lattice of size {}",
                    entry.id, entry.x, entry.y, record.size
                )));
            }
            let head = Point::new(entry.x, entry.y);
            if !lattice.is_area_free(head, entry.orientation) {
                return Err(LatticeError::InvalidBackup(format!(
                    "particle {} at ({}, {}) overlaps another particle",
                    entry.id, entry.x, entry.y
                )));
            }
            lattice.place(
                Particle::new(entry.id, entry.orientation, record.particle_length),
                head,
            );
        }

        lattice.diffusion_steps = record.diffusion_steps;
        Ok(lattice)
    }
}

impl Lattice<StdRng> {
    /// Rebuilds a lattice from a backup with an OS-seeded random source.
    pub fn restore(record: &LatticeBackup) -> Result<Self> {
        Self::restore_with_rng(record, StdRng::from_os_rng())
    }

    /// Rebuilds a lattice from a backup with a reproducible random source.
    pub fn restore_with_seed(record: &LatticeBackup, seed: u64) -> Result<Self> {
        Self::restore_with_rng(record, StdRng::seed_from_u64(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use self_assembly_common::Orientation;

    fn record(particles: Vec<ParticleRecord>) -> LatticeBackup {
        LatticeBackup { size: 10, particle_length: 3, diffusion_steps: 42, particles }
    }

    fn entry(id: u32, orientation: Orientation, x: usize, y: usize) -> ParticleRecord {
        ParticleRecord { id, orientation, x, y }
    }

    #[test]
    fn restore_replays_particles_in_order() {
        let backup = record(vec![
            entry(2, Orientation::Vertical, 9, 8),
            entry(1, Orientation::Horizontal, 0, 0),
        ]);
        let lattice = Lattice::restore_with_seed(&backup, 1).unwrap();

        assert_eq!(lattice.diffusion_steps(), 42);
        assert_eq!(lattice.particles()[0].id(), 2);
        assert_eq!(lattice.particles()[1].id(), 1);
        assert_eq!(lattice.get_cell(9, 0).map(|p| p.id()), Some(2));
        assert_eq!(lattice.get_cell(2, 0).map(|p| p.id()), Some(1));
        assert_eq!(lattice.backup(), backup);
        assert!(lattice.validate().is_ok());
    }

    #[test]
    fn restore_keeps_dimension_validation() {
        let mut backup = record(vec![]);
        backup.size = 600;
        assert!(matches!(
            Lattice::restore_with_seed(&backup, 1),
            Err(LatticeError::InvalidSize { actual: 600, .. })
        ));
    }

    #[test]
    fn restore_rejects_rods_longer_than_the_lattice() {
        let mut backup = record(vec![entry(1, Orientation::Horizontal, 0, 0)]);
        backup.particle_length = 20;
        assert!(matches!(
            Lattice::restore_with_seed(&backup, 1),
            Err(LatticeError::InvalidParticleLength { actual: 20, max: 9, .. })
        ));

        backup.particle_length = 10;
        assert!(Lattice::restore_with_seed(&backup, 1).is_err());
    }

    #[test]
    fn restore_rejects_broken_records() {
        let off_grid = record(vec![entry(1, Orientation::Horizontal, 10, 0)]);
        assert!(matches!(
            Lattice::restore_with_seed(&off_grid, 1),
            Err(LatticeError::InvalidBackup(_))
        ));

        let overlapping = record(vec![
            entry(1, Orientation::Horizontal, 0, 0),
            entry(2, Orientation::Vertical, 2, 9),
        ]);
        assert!(matches!(
            Lattice::restore_with_seed(&overlapping, 1),
            Err(LatticeError::InvalidBackup(_))
        ));

        let repeated = record(vec![
            entry(1, Orientation::Horizontal, 0, 0),
            entry(1, Orientation::Horizontal, 0, 5),
        ]);
        assert!(matches!(
            Lattice::restore_with_seed(&repeated, 1),
            Err(LatticeError::InvalidBackup(_))
        ));
    }

    #[test]
    fn restored_lattice_diffuses_like_the_original() {
        let mut original = Lattice::with_seed(20, 4, 8).unwrap();
        original.fill().unwrap();
        let mut restored = Lattice::restore_with_seed(&original.backup(), 77).unwrap();
        let mut reference = Lattice::restore_with_seed(&original.backup(), 77).unwrap();

        for _ in 0..10 {
            restored.step();
            reference.step();
        }
        assert_eq!(restored.backup(), reference.backup());
        assert_eq!(restored.diffusion_steps(), 10);
    }
}
