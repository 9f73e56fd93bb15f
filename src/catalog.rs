use anyhow::{Context, Result};
use fixedbitset::FixedBitSet;
use serde::{Deserialize, de::DeserializeOwned};
use std::{collections::HashMap, path::Path};

use crate::{ALL_DIRECTIONS, CatalogError, Direction, Particle, ParticleId, Rgb};

/// On-disk layout of a catalog file.
#[derive(Deserialize)]
struct CatalogFile<P> {
    particles: Vec<ParticleDef<P>>,
}

#[derive(Deserialize)]
struct ParticleDef<P> {
    id: ParticleId,
    #[serde(default)]
    name: Option<String>,
    payload: P,
    #[serde(default)]
    right: HashMap<ParticleId, f64>,
    #[serde(default)]
    below: HashMap<ParticleId, f64>,
    #[serde(default)]
    left: HashMap<ParticleId, f64>,
    #[serde(default)]
    above: HashMap<ParticleId, f64>,
}

impl<P> ParticleDef<P> {
    fn into_particle(self) -> Particle<P> {
        let mut particle = Particle::new(self.id.0, self.payload);
        if let Some(name) = self.name {
            particle = particle.with_name(name);
        }
        let tables = [self.right, self.below, self.left, self.above];
        for (dir, table) in ALL_DIRECTIONS.into_iter().zip(tables) {
            for (neighbour, weight) in table {
                particle = particle.with_affinity(dir, neighbour.0, weight);
            }
        }
        particle
    }
}

/// The fixed, read-only set of particle types available to a generation.
///
/// Particles are addressed internally by their position in the catalog
/// ("index"), which is what the grid stores and what the affinity masks
/// are keyed by.
#[derive(Debug, Clone)]
pub struct ParticleCatalog<P = Rgb> {
    particles: Vec<Particle<P>>,
    ids: Vec<ParticleId>,
    index: HashMap<ParticleId, usize>,
    full_mask: FixedBitSet,
}

impl<P> ParticleCatalog<P> {
    /// Validates `particles` and builds their neighbour masks.
    ///
    /// Ids must be unique, every affinity key must name a catalog particle
    /// and every weight must be finite and non-negative.
    pub fn new(mut particles: Vec<Particle<P>>) -> Result<Self, CatalogError> {
        if particles.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = HashMap::with_capacity(particles.len());
        for (i, particle) in particles.iter().enumerate() {
            if index.insert(particle.id(), i).is_some() {
                return Err(CatalogError::DuplicateId(particle.id()));
            }
        }

        for particle in &particles {
            for dir in ALL_DIRECTIONS {
                for (&neighbour, &weight) in particle.allowed(dir) {
                    if !index.contains_key(&neighbour) {
                        return Err(CatalogError::UnknownNeighbour {
                            particle: particle.id(),
                            neighbour,
                        });
                    }
                    if !weight.is_finite() || weight < 0.0 {
                        return Err(CatalogError::InvalidWeight {
                            particle: particle.id(),
                            neighbour,
                            weight,
                        });
                    }
                }
            }
        }

        let num_particles = particles.len();
        for particle in &mut particles {
            particle.build_masks(num_particles, |id| index[&id]);
        }

        let ids = particles.iter().map(Particle::id).collect();
        let mut full_mask = FixedBitSet::with_capacity(num_particles);
        full_mask.insert_range(..);

        Ok(Self {
            particles,
            ids,
            index,
            full_mask,
        })
    }

    /// Number of particle types.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Always false for a validated catalog.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particles in catalog order.
    pub fn particles(&self) -> &[Particle<P>] {
        &self.particles
    }

    /// Ids in catalog order.
    pub fn ids(&self) -> &[ParticleId] {
        &self.ids
    }

    /// Particle at catalog `index`.
    pub fn get(&self, index: usize) -> &Particle<P> {
        debug_assert!(
            index < self.particles.len(),
            "Index out of bounds: {} >= {}",
            index,
            self.particles.len()
        );
        &self.particles[index]
    }

    /// Catalog index of `id`.
    pub fn index_of(&self, id: ParticleId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Particle with the given `id`.
    pub fn by_id(&self, id: ParticleId) -> Option<&Particle<P>> {
        self.index_of(id).map(|i| &self.particles[i])
    }

    /// Every catalog index; what an unconstrained side contributes.
    pub fn full_mask(&self) -> &FixedBitSet {
        &self.full_mask
    }

    /// Catalog indices that particle `index` accepts on side `direction`.
    /// Only nonzero weights count.
    pub fn mask(&self, index: usize, direction: Direction) -> &FixedBitSet {
        self.get(index).mask(direction)
    }

    /// True when every nonzero entry "a accepts b on side d" is matched by
    /// "b accepts a on the opposite side". Tables are never symmetrised.
    pub fn is_symmetric(&self) -> bool {
        self.particles.iter().enumerate().all(|(a, particle)| {
            ALL_DIRECTIONS.iter().all(|&dir| {
                particle
                    .mask(dir)
                    .ones()
                    .all(|b| self.particles[b].mask(dir.opposite()).contains(a))
            })
        })
    }
}

impl<P: DeserializeOwned> ParticleCatalog<P> {
    /// Parses a catalog document with a top-level `particles` list.
    pub fn from_yaml_str(data: &str) -> Result<Self> {
        let file: CatalogFile<P> =
            serde_yaml::from_str(data).context("Failed to parse particle catalog")?;
        let particles = file.particles.into_iter().map(ParticleDef::into_particle).collect();
        Ok(Self::new(particles)?)
    }

    /// Reads and parses a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        Self::from_yaml_str(&data).with_context(|| format!("Invalid catalog {}", path.display()))
    }
}

impl ParticleCatalog<Rgb> {
    /// Grass below, sky above.
    pub fn landscape() -> Self {
        let grass = Particle::new(0, Rgb::GREEN)
            .with_name("grass")
            .allow(Direction::Above, &[0, 1])
            .allow(Direction::Below, &[0])
            .allow(Direction::Left, &[0])
            .allow(Direction::Right, &[0]);

        let sky = Particle::new(1, Rgb::SKY_BLUE)
            .with_name("sky")
            .allow(Direction::Above, &[1])
            .allow(Direction::Below, &[0, 1])
            .allow(Direction::Left, &[1])
            .allow(Direction::Right, &[1]);

        Self::new(vec![grass, sky]).expect("landscape catalog is well formed")
    }
}
