use ndarray::Array2;
use std::fmt::{Display, Formatter};

use crate::{ALL_DIRECTIONS, Cell, Error, Result};

/// Committed particles plus the current candidate set of every cell.
///
/// Storage is `(height, width)`; every public method takes `(x, y)` with
/// `y` growing upwards.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Array2<Cell>,
    candidates: Array2<Vec<usize>>,
}

impl Grid {
    /// An all-uncollapsed `width` x `height` grid with empty candidate sets.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            cells: Array2::from_elem((height, width), Cell::Uncollapsed),
            candidates: Array2::from_elem((height, width), Vec::new()),
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Never true for a grid built by [`Grid::new`].
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// State of `(x, y)`.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        debug_assert!(x < self.width(), "Index out of bounds for grid width");
        debug_assert!(y < self.height(), "Index out of bounds for grid height");
        self.cells[(y, x)]
    }

    /// True once `(x, y)` holds a particle.
    #[inline]
    pub fn is_collapsed(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).is_collapsed()
    }

    /// Catalog index of the particle committed at `(x, y)`.
    #[inline]
    pub fn committed(&self, x: usize, y: usize) -> Option<usize> {
        self.cell(x, y).index()
    }

    /// Commits `index` to `(x, y)`. A cell can only be written once.
    pub fn set_committed(&mut self, x: usize, y: usize, index: usize) -> Result<()> {
        match self.cell(x, y) {
            Cell::Collapsed(_) => Err(Error::AlreadyCollapsed { x, y }),
            Cell::Uncollapsed => {
                self.cells[(y, x)] = Cell::Collapsed(index);
                Ok(())
            }
        }
    }

    /// Candidate catalog indices of `(x, y)`, in catalog order. Stale once the cell is collapsed.
    pub fn candidates(&self, x: usize, y: usize) -> &[usize] {
        &self.candidates[(y, x)]
    }

    /// Replaces the candidate set of `(x, y)`.
    pub fn set_candidates(&mut self, x: usize, y: usize, candidates: Vec<usize>) {
        self.candidates[(y, x)] = candidates;
    }

    /// Committed neighbours in `[right, below, left, above]` order.
    ///
    /// Off-grid and not-yet-collapsed neighbours are both `None`.
    pub fn neighbours(&self, x: usize, y: usize) -> [Option<usize>; 4] {
        let (width, height) = (self.width(), self.height());
        ALL_DIRECTIONS.map(|dir| {
            dir.step((x, y), width, height)
                .and_then(|(nx, ny)| self.committed(nx, ny))
        })
    }

    /// Positions still waiting for a particle, in row-major order from `y = 0`.
    pub fn uncollapsed(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| !cell.is_collapsed())
            .map(|((y, x), _)| (x, y))
    }

    /// Number of committed cells.
    pub fn collapsed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_collapsed()).count()
    }

    /// True when every cell holds a particle.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_collapsed())
    }

    /// Raw `(height, width)` storage, indexed `[(y, x)]`.
    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    fn max_index(&self) -> Option<usize> {
        self.cells.iter().filter_map(|cell| cell.index()).max()
    }
}

impl Display for Grid {
    /// Rows are printed top (`y = height - 1`) to bottom.
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let print_width = self.max_index().unwrap_or(1).max(1).ilog10() as usize + 1;
        for y in (0..self.height()).rev() {
            for x in 0..self.width() {
                write!(f, "{:print_width$} ", self.cells[(y, x)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
