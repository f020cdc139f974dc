use crate::geometry::{Direction, Point};
use crate::grid::area_cells;
use crate::lattice::{Lattice, Slot};
use crate::rng::RandomSource;
use log::trace;

impl<R: RandomSource> Lattice<R> {
    /// Advances the lattice by one diffusion step.
    ///
    /// A step is `particle_count()` independent move attempts. Each attempt
    /// draws a particle (with replacement) and tries the four directions in a
    /// random order; the first legal one is taken. Particles that can't move
    /// stay put.
    pub fn step(&mut self) {
        let attempts = self.particles.len();
        let mut moved = 0usize;

        for _ in 0..attempts {
            let slot = self.rng.index_below(attempts);
            let mut directions = Direction::ALL;
            self.rng.shuffle_slice(&mut directions);

            for direction in directions {
                if self.try_move(slot, direction) {
                    moved += 1;
                    break;
                }
            }
        }

        self.diffusion_steps += 1;
        trace!(
            "Diffusion step {}: {} of {} attempts moved a particle.",
            self.diffusion_steps,
            moved,
            attempts
        );
    }
}

impl<R> Lattice<R> {
    /// Moves the particle in `slot` one cell towards `direction` if its shifted
    /// area only overlaps empty cells or the particle itself.
    pub(crate) fn try_move(&mut self, slot: usize, direction: Direction) -> bool {
        let size = self.size();
        let length = self.particle_length();
        let orientation = self.particles[slot].orientation();
        let old_head = self.heads[slot];
        let new_head: Point = old_head.shifted(direction, size);
        let own = Some(slot as Slot);

        let legal = area_cells(new_head, orientation, length, size)
            .all(|index| self.cells[index].is_none() || self.cells[index] == own);
        if !legal {
            return false;
        }

        for index in area_cells(old_head, orientation, length, size) {
            self.cells[index] = None;
        }
        for index in area_cells(new_head, orientation, length, size) {
            self.cells[index] = own;
        }
        self.heads[slot] = new_head;
        true
    }
}
