use crate::error::{LatticeError, Result};
use crate::geometry::Point;
use crate::grid::{area_cells, area_contains, cell_index, cell_point};
use crate::particle::Particle;
use rand::rngs::StdRng;
use rand::SeedableRng;
use self_assembly_common::{LatticeParams, Orientation};

pub const MIN_LATTICE_SIZE: usize = 10;
pub const MAX_LATTICE_SIZE: usize = 512;
pub const MIN_PARTICLE_LENGTH: usize = 2;
pub const MAX_PARTICLE_LENGTH: usize = 128;

/// Slot of a particle in the lattice's particle arena (placement order).
pub(crate) type Slot = u32;

/// Square toroidal lattice of rod-like particles.
///
/// The lattice owns its particles in an arena: `particles[slot]` is the
/// particle, `heads[slot]` its head point, and every occupied cell of `cells`
/// stores the slot of the particle covering it.
pub struct Lattice<R = StdRng> {
    /// Side length of the grid.
    size: usize,
    /// Cells covered by every particle.
    particle_length: usize,
    /// Row-major `size * size` occupancy; `None` marks an empty cell.
    pub(crate) cells: Vec<Option<Slot>>,
    /// Live particles in placement order.
    pub(crate) particles: Vec<Particle>,
    /// Head point of each particle, indexed like `particles`.
    pub(crate) heads: Vec<Point>,
    /// Completed diffusion steps.
    pub(crate) diffusion_steps: u64,
    /// Random decisions for placement and diffusion.
    pub(crate) rng: R,
}

impl Lattice<StdRng> {
    /// Creates an empty lattice driven by an OS-seeded random source.
    pub fn new(size: usize, particle_length: usize) -> Result<Self> {
        Self::with_rng(size, particle_length, StdRng::from_os_rng())
    }

    /// Creates an empty lattice whose random decisions are reproducible.
    pub fn with_seed(size: usize, particle_length: usize, seed: u64) -> Result<Self> {
        Self::with_rng(size, particle_length, StdRng::seed_from_u64(seed))
    }
}

impl<R> Lattice<R> {
    /// Creates an empty lattice with an injected random source.
    pub fn with_rng(size: usize, particle_length: usize, rng: R) -> Result<Self> {
        if !(MIN_LATTICE_SIZE..=MAX_LATTICE_SIZE).contains(&size) {
            return Err(LatticeError::InvalidSize {
                actual: size,
                min: MIN_LATTICE_SIZE,
                max: MAX_LATTICE_SIZE,
            });
        }
        // A rod must cover distinct cells, so it has to be shorter than a grid side.
        let max_length = MAX_PARTICLE_LENGTH.min(size - 1);
        if !(MIN_PARTICLE_LENGTH..=max_length).contains(&particle_length) {
            return Err(LatticeError::InvalidParticleLength {
                actual: particle_length,
                min: MIN_PARTICLE_LENGTH,
                max: max_length,
            });
        }

        Ok(Lattice {
            size,
            particle_length,
            cells: vec![None; size * size],
            particles: Vec::new(),
            heads: Vec::new(),
            diffusion_steps: 0,
            rng,
        })
    }

    /// Creates an empty lattice from configuration parameters.
    pub fn from_params(params: LatticeParams, rng: R) -> Result<Self> {
        Self::with_rng(params.size, params.particle_length, rng)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn particle_length(&self) -> usize {
        self.particle_length
    }

    pub fn params(&self) -> LatticeParams {
        LatticeParams::new(self.size, self.particle_length)
    }

    pub fn diffusion_steps(&self) -> u64 {
        self.diffusion_steps
    }

    /// Live particles in placement order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Head point of the particle placed `index`-th.
    pub fn head(&self, index: usize) -> Option<Point> {
        self.heads.get(index).copied()
    }

    /// Particles paired with their head points, in placement order.
    pub fn particles_with_heads(&self) -> impl Iterator<Item = (&Particle, Point)> + '_ {
        self.particles.iter().zip(self.heads.iter().copied())
    }

    /// Fraction of cells covered by particles.
    pub fn density(&self) -> f64 {
        (self.particles.len() * self.particle_length) as f64 / (self.size * self.size) as f64
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Particle covering cell `(x, y)`. Coordinates wrap around the torus.
    pub fn get_cell(&self, x: usize, y: usize) -> Option<&Particle> {
        let index = cell_index(Point::wrapped(x, y, self.size), self.size);
        self.particle_at(index)
    }

    #[inline(always)]
    pub(crate) fn particle_at(&self, index: usize) -> Option<&Particle> {
        self.cells[index].map(|slot| &self.particles[slot as usize])
    }

    /// Orientation of the particle covering the cell at row-major `index`.
    #[inline(always)]
    pub(crate) fn orientation_at(&self, index: usize) -> Option<Orientation> {
        self.particle_at(index).map(|particle| particle.orientation())
    }

    /// Returns `true` when every cell of the area anchored at `head` is empty.
    #[inline(always)]
    pub fn is_area_free(&self, head: Point, orientation: Orientation) -> bool {
        area_cells(head, orientation, self.particle_length, self.size)
            .all(|index| self.cells[index].is_none())
    }

    /// Returns `true` when no particle of either orientation fits anywhere.
    pub fn is_jammed(&self) -> bool {
        (0..self.size * self.size).all(|index| {
            let head = cell_point(index, self.size);
            Orientation::ALL
                .iter()
                .all(|&orientation| !self.is_area_free(head, orientation))
        })
    }

    /// Writes a new particle into its (already checked) free area.
    pub(crate) fn place(&mut self, particle: Particle, head: Point) {
        let slot = self.particles.len() as Slot;
        for index in area_cells(head, particle.orientation(), self.particle_length, self.size) {
            self.cells[index] = Some(slot);
        }
        self.particles.push(particle);
        self.heads.push(head);
    }

    /// Checks that the grid and the particle registry agree:
    /// every particle covers exactly its own area, and every occupied cell lies
    /// inside the area of the particle it references.
    pub fn validate(&self) -> Result<()> {
        if self.particles.len() != self.heads.len() {
            return Err(LatticeError::InvariantViolation(format!(
                "{} particles but {} head points",
                self.particles.len(),
                self.heads.len()
            )));
        }

        let mut seen_ids = std::collections::HashSet::with_capacity(self.particles.len());
        for (slot, (particle, head)) in self.particles_with_heads().enumerate() {
            if !seen_ids.insert(particle.id()) {
                return Err(LatticeError::InvariantViolation(format!(
                    "particle id {} appears twice",
                    particle.id()
                )));
            }
            if particle.length() != self.particle_length {
                return Err(LatticeError::InvariantViolation(format!(
                    "particle {} has length {} instead of {}",
                    particle.id(),
                    particle.length(),
                    self.particle_length
                )));
            }
            if head.x >= self.size || head.y >= self.size {
                return Err(LatticeError::InvariantViolation(format!(
                    "particle {} has head ({}, {}) outside the lattice",
                    particle.id(),
                    head.x,
                    head.y
                )));
            }
            for index in area_cells(head, particle.orientation(), self.particle_length, self.size) {
                if self.cells[index] != Some(slot as Slot) {
                    let cell = cell_point(index, self.size);
                    return Err(LatticeError::InvariantViolation(format!(
                        "cell ({}, {}) of particle {} is not covered by it",
                        cell.x,
                        cell.y,
                        particle.id()
                    )));
                }
            }
        }

        for (index, cell) in self.cells.iter().enumerate() {
            let Some(slot) = *cell else { continue };
            let point = cell_point(index, self.size);
            let (Some(particle), Some(&head)) =
                (self.particles.get(slot as usize), self.heads.get(slot as usize))
            else {
                return Err(LatticeError::InvariantViolation(format!(
                    "cell ({}, {}) references unknown particle slot {}",
                    point.x, point.y, slot
                )));
            };
            if !area_contains(head, particle.orientation(), self.particle_length, self.size, point) {
                return Err(LatticeError::InvariantViolation(format!(
                    "cell ({}, {}) references particle {} outside its area",
                    point.x,
                    point.y,
                    particle.id()
                )));
            }
        }

        Ok(())
    }
}
