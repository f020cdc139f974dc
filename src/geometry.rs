/// Integer grid coordinate. Always kept inside `0..size` by the lattice.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Point { x, y }
    }

    /// Wraps arbitrary coordinates onto a torus of side `size`.
    #[inline(always)]
    pub fn wrapped(x: usize, y: usize, size: usize) -> Self {
        Point { x: x % size, y: y % size }
    }

    /// Moves one cell in `direction`, wrapping around the torus.
    #[inline(always)]
    pub fn shifted(self, direction: Direction, size: usize) -> Self {
        match direction {
            Direction::Up => Point { x: self.x, y: (self.y + size - 1) % size },
            Direction::Down => Point { x: self.x, y: (self.y + 1) % size },
            Direction::Left => Point { x: (self.x + size - 1) % size, y: self.y },
            Direction::Right => Point { x: (self.x + 1) % size, y: self.y },
        }
    }
}

/// Single-cell moves available to a diffusing particle.
/// Up/Down change y, Left/Right change x, whatever the particle's orientation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
}
