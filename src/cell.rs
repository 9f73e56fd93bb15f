use std::fmt::{Display, Formatter};

const CELL_UNCOLLAPSED: &str = "*";

/// Committed state of a single grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    /// No particle committed yet.
    #[default]
    Uncollapsed,
    /// Holds the catalog index of the committed particle.
    Collapsed(usize),
}

impl Cell {
    /// True once a particle has been committed.
    #[must_use]
    pub fn is_collapsed(self) -> bool {
        matches!(self, Cell::Collapsed(_))
    }

    /// Catalog index of the committed particle, if any.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        match self {
            Cell::Uncollapsed => None,
            Cell::Collapsed(index) => Some(index),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let text = match self {
            Cell::Uncollapsed => CELL_UNCOLLAPSED.to_string(),
            Cell::Collapsed(index) => index.to_string(),
        };
        f.pad(&text)
    }
}
