use thiserror::Error;

/// Errors raised by the lattice core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LatticeError {
    #[error("Lattice size must be >={min} and <={max}, but {actual} is provided")]
    InvalidSize { actual: usize, min: usize, max: usize },

    #[error("Particle length must be >={min} and <={max}, but {actual} is provided")]
    InvalidParticleLength { actual: usize, min: usize, max: usize },

    #[error("Lattice is already filled with {0} particles")]
    AlreadyFilled(usize),

    #[error("Invalid backup record: {0}")]
    InvalidBackup(String),

    #[error("Lattice invariant violated: {0}")]
    InvariantViolation(String),

    /// Cluster labeling met a state that a structurally valid grid can't produce.
    #[error("Cluster labeling reached an impossible state at ({x}, {y}): {reason}")]
    LabelingInvariant {
        x: usize,
        y: usize,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, LatticeError>;
