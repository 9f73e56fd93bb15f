use rand::{distr::weighted::WeightedIndex, prelude::*};

use crate::{ALL_DIRECTIONS, Error, Grid, Particle, ParticleCatalog, Result};

/// Product of the weights `particle` gives to each committed neighbour.
///
/// Absent neighbours contribute 1. A neighbour missing from the relevant
/// table contributes 0, which happens with asymmetric catalogs.
pub fn score<P>(
    particle: &Particle<P>,
    neighbours: &[Option<usize>; 4],
    catalog: &ParticleCatalog<P>,
) -> f64 {
    ALL_DIRECTIONS
        .iter()
        .zip(neighbours)
        .map(|(&dir, neighbour)| match neighbour {
            Some(index) => particle.affinity(dir, catalog.get(*index).id()),
            None => 1.0,
        })
        .product()
}

/// Index into `weights` drawn proportionally to the weights, or uniformly
/// when none of them is usable (all zero).
pub fn choose_weighted(weights: &[f64], rng: &mut impl Rng) -> usize {
    debug_assert!(!weights.is_empty(), "Cannot choose from no weights");
    match WeightedIndex::new(weights) {
        Ok(dist) => dist.sample(rng),
        Err(_) => rng.random_range(0..weights.len()),
    }
}

/// Commits one of the candidates of `(x, y)` and returns its catalog index.
///
/// A single candidate is committed without touching `rng`.
pub fn collapse_cell<P>(
    grid: &mut Grid,
    catalog: &ParticleCatalog<P>,
    (x, y): (usize, usize),
    rng: &mut impl Rng,
) -> Result<usize> {
    let choice = match grid.candidates(x, y) {
        [] => return Err(Error::Contradiction { x, y }),
        [only] => *only,
        options => {
            let neighbours = grid.neighbours(x, y);
            let weights: Vec<f64> = options
                .iter()
                .map(|&option| score(catalog.get(option), &neighbours, catalog))
                .collect();
            options[choose_weighted(&weights, rng)]
        }
    };

    grid.set_committed(x, y, choice)?;
    Ok(choice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;
    use rand::{RngCore, rngs::StdRng};

    /// Panics if asked for randomness.
    struct NoRng;

    impl RngCore for NoRng {
        fn next_u32(&mut self) -> u32 {
            panic!("singleton collapse must not draw")
        }

        fn next_u64(&mut self) -> u64 {
            panic!("singleton collapse must not draw")
        }

        fn fill_bytes(&mut self, _dst: &mut [u8]) {
            panic!("singleton collapse must not draw")
        }
    }

    fn biased_catalog() -> ParticleCatalog<char> {
        // Anchor at index 0; A and B both accept it below them, A three times as much
        ParticleCatalog::new(vec![
            Particle::new(0, '#').allow(Direction::Above, &[1, 2]),
            Particle::new(1, 'A').with_affinity(Direction::Below, 0, 3.0),
            Particle::new(2, 'B').with_affinity(Direction::Below, 0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn scores_multiply_present_sides() {
        let catalog = biased_catalog();
        assert_eq!(score(catalog.get(1), &[None, Some(0), None, None], &catalog), 3.0);
        assert_eq!(score(catalog.get(2), &[None, Some(0), None, None], &catalog), 1.0);
        assert_eq!(score(catalog.get(1), &[None; 4], &catalog), 1.0);
        // A lists nothing on its right
        assert_eq!(score(catalog.get(1), &[Some(0), Some(0), None, None], &catalog), 0.0);
    }

    #[test]
    fn weighted_choice_follows_weights() {
        let mut rng = StdRng::seed_from_u64(3);
        let trials = 20_000;
        let hits = (0..trials)
            .filter(|_| choose_weighted(&[3.0, 1.0], &mut rng) == 0)
            .count();
        let share = hits as f64 / trials as f64;
        assert!((share - 0.75).abs() < 0.02, "share {share} too far from 0.75");
    }

    #[test]
    fn zero_weights_fall_back_to_uniform() {
        let mut rng = StdRng::seed_from_u64(9);
        let trials = 10_000;
        let hits = (0..trials)
            .filter(|_| choose_weighted(&[0.0, 0.0], &mut rng) == 0)
            .count();
        let share = hits as f64 / trials as f64;
        assert!((share - 0.5).abs() < 0.03, "share {share} too far from 0.5");
    }

    #[test]
    fn singleton_commits_without_randomness() {
        let catalog = biased_catalog();
        let mut grid = Grid::new(1, 1).unwrap();
        grid.set_candidates(0, 0, vec![2]);
        assert_eq!(collapse_cell(&mut grid, &catalog, (0, 0), &mut NoRng).unwrap(), 2);
        assert_eq!(grid.committed(0, 0), Some(2));
    }

    #[test]
    fn neighbour_affinity_biases_collapse() {
        let catalog = biased_catalog();
        let mut rng = StdRng::seed_from_u64(11);
        let trials = 10_000;
        let mut a = 0;
        for _ in 0..trials {
            let mut grid = Grid::new(1, 2).unwrap();
            grid.set_committed(0, 0, 0).unwrap();
            grid.set_candidates(0, 1, vec![1, 2]);
            if collapse_cell(&mut grid, &catalog, (0, 1), &mut rng).unwrap() == 1 {
                a += 1;
            }
        }
        let share = a as f64 / trials as f64;
        assert!((share - 0.75).abs() < 0.02, "share {share} too far from 0.75");
    }

    #[test]
    fn empty_candidates_do_not_commit() {
        let catalog = biased_catalog();
        let mut grid = Grid::new(1, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            collapse_cell(&mut grid, &catalog, (0, 0), &mut rng),
            Err(Error::Contradiction { x: 0, y: 0 })
        );
        assert!(!grid.is_collapsed(0, 0));
    }
}
