use crate::lattice::Lattice;
use crate::particle::Particle;
use colored::{Color, Colorize};
use self_assembly_common::Orientation;

/// How one kind of cell is drawn in the text view.
#[derive(Debug, Clone, Copy)]
pub enum Symbol {
    /// Plain character.
    Literal(char),
    /// Character painted with a terminal color.
    Painted(char, Color),
    /// Computed per cell from the particle occupying it.
    PerCell(fn(&Particle) -> String),
}

impl Symbol {
    fn render(&self, particle: &Particle, out: &mut String) {
        match self {
            Symbol::Literal(symbol) => out.push(*symbol),
            Symbol::Painted(symbol, color) => {
                out.push_str(&symbol.to_string().color(*color).to_string())
            }
            Symbol::PerCell(render) => out.push_str(&render(particle)),
        }
    }
}

/// Symbols for empty cells and for each orientation.
#[derive(Debug, Clone, Copy)]
pub struct SymbolMap {
    pub empty: char,
    pub horizontal: Symbol,
    pub vertical: Symbol,
}

impl Default for SymbolMap {
    fn default() -> Self {
        SymbolMap {
            empty: ' ',
            horizontal: Symbol::Literal('-'),
            vertical: Symbol::Literal('|'),
        }
    }
}

impl SymbolMap {
    /// Horizontal particles in red, vertical in blue.
    pub fn colored() -> Self {
        SymbolMap {
            empty: ' ',
            horizontal: Symbol::Painted('-', Color::Red),
            vertical: Symbol::Painted('|', Color::Blue),
        }
    }

    pub fn symbol(&self, orientation: Orientation) -> &Symbol {
        match orientation {
            Orientation::Horizontal => &self.horizontal,
            Orientation::Vertical => &self.vertical,
        }
    }
}

impl<R> Lattice<R> {
    /// Text picture of the lattice: one line per row, each cell followed by a space.
    pub fn visualization(&self, symbols: &SymbolMap) -> String {
        let size = self.size();
        let mut out = String::with_capacity(size * (2 * size + 1));
        for y in 0..size {
            for x in 0..size {
                match self.get_cell(x, y) {
                    Some(particle) => symbols.symbol(particle.orientation()).render(particle, &mut out),
                    None => out.push(symbols.empty),
                }
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}
