use log::warn;
use rayon::prelude::*;

use crate::{ALL_DIRECTIONS, Error, Grid, ParticleCatalog, Result};

/// Catalog indices allowed at `(x, y)` by its committed neighbours.
///
/// Each present neighbour contributes the set it accepts on the side facing
/// this cell; absent neighbours contribute the whole catalog. The result is
/// the intersection, in catalog order.
pub fn candidates_for<P>(grid: &Grid, catalog: &ParticleCatalog<P>, x: usize, y: usize) -> Vec<usize> {
    let neighbours = grid.neighbours(x, y);
    if neighbours.iter().all(Option::is_none) {
        return (0..catalog.len()).collect();
    }

    let mut allowed = catalog.full_mask().clone();
    for (dir, neighbour) in ALL_DIRECTIONS.iter().zip(neighbours) {
        if let Some(index) = neighbour {
            // Our right neighbour constrains what sits to its left, and so on
            allowed.intersect_with(catalog.mask(index, dir.opposite()));
        }
    }
    allowed.ones().collect()
}

/// Recomputes the candidate set of every uncollapsed cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyCalculator {
    parallel: bool,
    fallback: Option<usize>,
}

impl EntropyCalculator {
    /// Sequential pass; contradictions are errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute candidate sets on the rayon pool. Results match the sequential pass.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Catalog index substituted for an empty candidate set. `None` makes
    /// an empty set a [`Error::Contradiction`].
    #[must_use]
    pub fn with_fallback(mut self, fallback: Option<usize>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Full pass over the grid. Collapsed cells are skipped and keep their last set.
    ///
    /// On a contradiction the first offending cell in row-major order is
    /// reported and no candidate set is written.
    pub fn calculate<P: Sync>(&self, grid: &mut Grid, catalog: &ParticleCatalog<P>) -> Result<()> {
        let cells: Vec<(usize, usize)> = grid.uncollapsed().collect();

        let view: &Grid = grid;
        let mut sets: Vec<Vec<usize>> = if self.parallel {
            cells
                .par_iter()
                .map(|&(x, y)| candidates_for(view, catalog, x, y))
                .collect()
        } else {
            cells
                .iter()
                .map(|&(x, y)| candidates_for(view, catalog, x, y))
                .collect()
        };

        for (&(x, y), set) in cells.iter().zip(sets.iter_mut()) {
            if set.is_empty() {
                match self.fallback {
                    Some(index) => {
                        warn!("No particle fits at ({x}, {y}), substituting fallback {index}");
                        set.push(index);
                    }
                    None => return Err(Error::Contradiction { x, y }),
                }
            }
        }

        for ((x, y), set) in cells.into_iter().zip(sets) {
            grid.set_candidates(x, y, set);
        }
        Ok(())
    }
}
