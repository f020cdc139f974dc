use crate::error::{LatticeError, Result};
use crate::geometry::Point;
use crate::grid::cell_index;
use crate::lattice::Lattice;
use crate::particle::{Particle, ParticleId};
use crate::rng::RandomSource;
use log::debug;
use self_assembly_common::Orientation;

impl<R: RandomSource> Lattice<R> {
    /// Fills the empty lattice up to the jamming limit by random sequential adsorption.
    ///
    /// Every (orientation, head point) candidate is drawn at random and examined
    /// exactly once; draws of already examined candidates are rejected without
    /// touching the budget. A candidate whose area is free becomes a particle.
    /// When the budget of `2 * size^2` candidates runs out, no further particle
    /// of either orientation fits.
    ///
    /// Returns the number of placed particles.
    pub fn fill(&mut self) -> Result<usize> {
        if !self.particles.is_empty() {
            return Err(LatticeError::AlreadyFilled(self.particles.len()));
        }

        let size = self.size();
        let cell_count = self.params().cell_count();
        // One "already tried" grid per orientation, indexed like the cells.
        let mut tried = [vec![false; cell_count], vec![false; cell_count]];
        let mut budget = 2 * cell_count;
        let mut draws: u64 = 0;

        while budget > 0 {
            let orientation = Orientation::from_coin(self.rng.coin_flip());
            let head = Point::new(self.rng.index_below(size), self.rng.index_below(size));
            draws += 1;

            let seen = &mut tried[orientation.index()][cell_index(head, size)];
            if *seen {
                continue;
            }
            *seen = true;
            budget -= 1;

            if self.is_area_free(head, orientation) {
                let id = (self.particles.len() + 1) as ParticleId;
                self.place(Particle::new(id, orientation, self.particle_length()), head);
            }
        }

        debug!(
            "Filled {}x{} lattice with {} particles of length {} (density {:.4}, {} draws).",
            size,
            size,
            self.particles.len(),
            self.particle_length(),
            self.density(),
            draws
        );
        Ok(self.particles.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;

    #[test]
    fn fill_reaches_jamming_limit() {
        let mut lattice = Lattice::with_seed(20, 4, 11).unwrap();
        let placed = lattice.fill().unwrap();

        assert!(placed > 0);
        assert_eq!(lattice.particle_count(), placed);
        assert_eq!(lattice.occupied_cells(), placed * 4);
        assert!(lattice.is_jammed());
        assert!(lattice.validate().is_ok());
        assert!(lattice.density() < 1.0);
    }

    #[test]
    fn ids_follow_placement_order() {
        let mut lattice = Lattice::with_seed(16, 3, 5).unwrap();
        lattice.fill().unwrap();
        let ids: Vec<ParticleId> = lattice.particles().iter().map(|p| p.id()).collect();
        let expected: Vec<ParticleId> = (1..=ids.len() as ParticleId).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn fill_twice_is_rejected() {
        let mut lattice = Lattice::with_seed(10, 2, 1).unwrap();
        let placed = lattice.fill().unwrap();
        assert_eq!(lattice.fill(), Err(LatticeError::AlreadyFilled(placed)));
        assert_eq!(lattice.particle_count(), placed);
    }

    #[test]
    fn same_seed_gives_same_configuration() {
        let mut a = Lattice::with_seed(24, 5, 99).unwrap();
        let mut b = Lattice::with_seed(24, 5, 99).unwrap();
        a.fill().unwrap();
        b.fill().unwrap();
        assert_eq!(a.backup(), b.backup());
    }

    #[test]
    fn first_draw_is_placed_at_the_drawn_head() {
        // Vertical at (3, 7), then a repeated draw that must be skipped, then
        // every remaining candidate in raster order.
        let size = 10;
        let mut draws = vec![1, 3, 7, 1, 3, 7];
        for orientation in [0, 1] {
            for y in 0..size {
                for x in 0..size {
                    draws.extend_from_slice(&[orientation, x, y]);
                }
            }
        }
        let mut lattice = Lattice::with_rng(size, 3, ScriptedSource::new(&draws)).unwrap();
        lattice.fill().unwrap();

        let first = lattice.particles()[0];
        assert_eq!(first.id(), 1);
        assert_eq!(first.orientation(), Orientation::Vertical);
        assert_eq!(lattice.head(0), Some(Point::new(3, 7)));
        assert!(lattice.is_jammed());
        assert!(lattice.validate().is_ok());
    }
}
