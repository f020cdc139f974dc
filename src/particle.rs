use self_assembly_common::Orientation;

/// Particle identifier, unique within one lattice. Starts at 1.
pub type ParticleId = u32;

/// An immutable rod-like particle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Particle {
    id: ParticleId,
    orientation: Orientation,
    length: usize,
}

impl Particle {
    pub fn new(id: ParticleId, orientation: Orientation, length: usize) -> Self {
        Particle { id, orientation, length }
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Number of cells the particle covers. Shared by every particle of a lattice.
    pub fn length(&self) -> usize {
        self.length
    }
}
