use rand::prelude::*;

use crate::{Error, Grid, Result};

/// Picks the uncollapsed cell with the fewest candidates, breaking ties
/// uniformly at random.
///
/// Expects candidate sets to be fresh. A cell whose set is empty is
/// reported as a contradiction rather than selected.
pub fn select_cell(grid: &Grid, rng: &mut impl Rng) -> Result<(usize, usize)> {
    let mut lowest_entropy = usize::MAX;
    let mut lowest_entropy_cells = Vec::new();

    for (x, y) in grid.uncollapsed() {
        let entropy = grid.candidates(x, y).len();
        if entropy < lowest_entropy {
            lowest_entropy = entropy;
            lowest_entropy_cells.clear();
            lowest_entropy_cells.push((x, y));
        } else if entropy == lowest_entropy {
            lowest_entropy_cells.push((x, y));
        }
    }

    if lowest_entropy == 0 {
        let (x, y) = lowest_entropy_cells[0];
        return Err(Error::Contradiction { x, y });
    }

    lowest_entropy_cells
        .choose(rng)
        .copied()
        .ok_or(Error::NoCandidates)
}
