use log::{debug, info, warn};
use rand::{prelude::*, rngs::StdRng};
use std::{
    sync::{Arc, mpsc},
    thread::{self, JoinHandle},
};

use crate::{
    ContradictionPolicy, Error, GeneratorConfig, Grid, ParticleCatalog, ParticleId, Result, Rgb,
    algorithm::{EntropyCalculator, GenerationProgress, collapse_cell, select_cell},
};

/// Emitted once per cell, in collapse order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitEvent<P = Rgb> {
    /// Column of the collapsed cell.
    pub x: usize,
    /// Row of the collapsed cell.
    pub y: usize,
    /// Committed particle.
    pub id: ParticleId,
    /// Copy of the committed particle's payload.
    pub payload: P,
}

/// Drives a generation: one entropy pass, one selection and one collapse per cell.
///
/// The generator exclusively owns its grid; the catalog is shared read-only.
pub struct Generator<P = Rgb> {
    catalog: Arc<ParticleCatalog<P>>,
    grid: Grid,
    entropy: EntropyCalculator,
    seed: Option<u64>,
    progress: bool,
}

impl Generator<Rgb> {
    /// A `width` x `height` generator over the built-in landscape catalog.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_catalog(ParticleCatalog::landscape(), width, height)
    }

    /// Builds a generator from `config`, loading its catalog file when one is named.
    pub fn from_config(config: &GeneratorConfig) -> anyhow::Result<Self> {
        let catalog = match &config.catalog {
            Some(path) => ParticleCatalog::load(path)?,
            None => ParticleCatalog::landscape(),
        };
        let mut generator = Self::with_catalog(catalog, config.width, config.height)?
            .with_parallel(config.parallel)
            .with_progress(config.progress)
            .with_contradiction_policy(config.contradiction)?;
        generator.seed = config.seed;
        Ok(generator)
    }
}

impl<P> Generator<P> {
    /// A `width` x `height` generator over `catalog`.
    pub fn with_catalog(
        catalog: impl Into<Arc<ParticleCatalog<P>>>,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        Ok(Self {
            catalog: catalog.into(),
            grid: Grid::new(width, height)?,
            entropy: EntropyCalculator::new(),
            seed: None,
            progress: false,
        })
    }

    /// Fixes the seed used by [`Generator::rng`].
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Runs the entropy pass on the rayon pool.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.entropy = self.entropy.parallel(parallel);
        self
    }

    /// Shows a progress bar during [`Generator::run`].
    #[must_use]
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Fails with [`Error::UnknownFallback`] when the fallback particle is not in the catalog.
    pub fn with_contradiction_policy(mut self, policy: ContradictionPolicy) -> Result<Self> {
        let fallback = match policy {
            ContradictionPolicy::Fail => None,
            ContradictionPolicy::Fallback(id) => Some(
                self.catalog
                    .index_of(id)
                    .ok_or(Error::UnknownFallback(id))?,
            ),
        };
        self.entropy = self.entropy.with_fallback(fallback);
        Ok(self)
    }

    /// The shared catalog.
    pub fn catalog(&self) -> &ParticleCatalog<P> {
        &self.catalog
    }

    /// Grid in its current state.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Consumes the generator, keeping the grid.
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// The seeded generator when a seed was given, otherwise one seeded from the OS.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

impl<P: Copy + Sync> Generator<P> {
    /// Collapses exactly one cell.
    pub fn step(&mut self, rng: &mut impl Rng) -> Result<CommitEvent<P>> {
        self.entropy.calculate(&mut self.grid, &self.catalog)?;
        let (x, y) = select_cell(&self.grid, rng)?;
        let index = collapse_cell(&mut self.grid, &self.catalog, (x, y), rng)?;

        let particle = self.catalog.get(index);
        debug!(
            "Collapsed ({x}, {y}) to particle {} out of {} candidates",
            particle.id(),
            self.grid.candidates(x, y).len()
        );
        Ok(CommitEvent {
            x,
            y,
            id: particle.id(),
            payload: *particle.payload(),
        })
    }

    /// Runs the generation to completion on the calling thread.
    ///
    /// `on_commit` sees every cell exactly once. On a contradiction the loop
    /// stops before touching the offending cell and the error is returned.
    pub fn run(&mut self, rng: &mut impl Rng, mut on_commit: impl FnMut(CommitEvent<P>)) -> Result<()> {
        let remaining = self.grid.len() - self.grid.collapsed_count();
        info!(
            "Generating {}x{} grid from {} particles",
            self.grid.width(),
            self.grid.height(),
            self.catalog.len()
        );

        let progress = GenerationProgress::new(remaining, self.progress);
        for _ in 0..remaining {
            match self.step(rng) {
                Ok(event) => {
                    progress.increment();
                    on_commit(event);
                }
                Err(err) => {
                    progress.finish();
                    warn!("Generation stopped: {err}");
                    return Err(err);
                }
            }
        }
        progress.finish();

        info!("Generation complete: {} cells", self.grid.collapsed_count());
        Ok(())
    }
}

impl<P: Copy + Send + Sync + 'static> Generator<P> {
    /// Starts the generation on a worker thread and returns immediately.
    ///
    /// `on_commit` is invoked synchronously from the worker, in collapse
    /// order. Joining the handle yields the finished grid or the error that
    /// stopped the run.
    pub fn generate<F>(mut self, on_commit: F) -> JoinHandle<Result<Grid>>
    where
        F: FnMut(CommitEvent<P>) + Send + 'static,
    {
        thread::spawn(move || {
            let mut rng = self.rng();
            self.run(&mut rng, on_commit)?;
            Ok(self.grid)
        })
    }

    /// Like [`Generator::generate`], delivering events over a channel.
    ///
    /// Events stop arriving when the run ends; the handle tells whether it
    /// completed or hit a contradiction.
    pub fn generate_channel(self) -> (mpsc::Receiver<CommitEvent<P>>, JoinHandle<Result<Grid>>) {
        let (sender, receiver) = mpsc::channel();
        let handle = self.generate(move |event| {
            sender.send(event).ok();
        });
        (receiver, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_dimensions() {
        assert!(matches!(
            Generator::new(0, 4),
            Err(Error::InvalidDimensions { width: 0, height: 4 })
        ));
    }

    #[test]
    fn unknown_fallback_is_rejected() {
        let result = Generator::new(2, 2)
            .unwrap()
            .with_contradiction_policy(ContradictionPolicy::Fallback(ParticleId(42)));
        assert!(matches!(result, Err(Error::UnknownFallback(ParticleId(42)))));
    }

    #[test]
    fn single_cell_sees_full_catalog() {
        let mut generator = Generator::new(1, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let event = generator.step(&mut rng).unwrap();
        assert_eq!((event.x, event.y), (0, 0));
        assert_eq!(generator.grid().candidates(0, 0), &[0, 1]);
        assert!(generator.grid().is_complete());
    }

    #[test]
    fn step_commits_a_candidate() {
        let mut generator = Generator::new(5, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..25 {
            let event = generator.step(&mut rng).unwrap();
            let index = generator.catalog().index_of(event.id).unwrap();
            assert!(generator.grid().candidates(event.x, event.y).contains(&index));
            assert_eq!(generator.grid().committed(event.x, event.y), Some(index));
        }
        assert!(matches!(generator.step(&mut rng), Err(Error::NoCandidates)));
    }

    #[test]
    fn dropped_receiver_does_not_stop_generation() {
        let (events, handle) = Generator::new(4, 4).unwrap().with_seed(8).generate_channel();
        drop(events);
        let grid = handle.join().unwrap().unwrap();
        assert!(grid.is_complete());
        assert_eq!(grid.collapsed_count(), 16);
    }

    #[test]
    fn same_seed_same_grid() {
        let mut first = Generator::new(6, 6).unwrap().with_seed(5);
        let mut second = Generator::new(6, 6).unwrap().with_seed(5);
        let mut events = (Vec::new(), Vec::new());
        let mut rng = first.rng();
        first.run(&mut rng, |e| events.0.push(e)).unwrap();
        let mut rng = second.rng();
        second.run(&mut rng, |e| events.1.push(e)).unwrap();
        assert_eq!(events.0, events.1);
        assert_eq!(first.grid().cells(), second.grid().cells());
    }
}
