use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
};

use crate::{ALL_DIRECTIONS, Direction};

/// Identifier of a particle type, unique within a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticleId(pub u32);

impl Display for ParticleId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ParticleId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Drawable colour attached to a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Grass.
    pub const GREEN: Rgb = Rgb(0, 128, 0);
    /// Sky.
    pub const SKY_BLUE: Rgb = Rgb(135, 206, 235);
}

/// A tile type: identity, payload and one weighted affinity table per side.
///
/// `affinity(Direction::Right, n)` is the weight this particle gives to having
/// particle `n` directly to its right. Weights are relative sampling chances
/// and need not sum to one.
#[derive(Debug, Clone)]
pub struct Particle<P = Rgb> {
    id: ParticleId,
    name: Option<String>,
    payload: P,
    affinities: [HashMap<ParticleId, f64>; 4],
    // Catalog-index keyed, nonzero weights only; filled in by the catalog
    masks: [FixedBitSet; 4],
}

impl<P> Particle<P> {
    /// A particle with no name and empty affinity tables.
    pub fn new(id: u32, payload: P) -> Self {
        Self {
            id: ParticleId(id),
            name: None,
            payload,
            affinities: Default::default(),
            masks: Default::default(),
        }
    }

    /// Human-readable label, used in catalog files and logs.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the weight for `neighbour` on side `direction`, replacing any previous entry.
    #[must_use]
    pub fn with_affinity(
        mut self,
        direction: Direction,
        neighbour: u32,
        weight: f64,
    ) -> Self {
        self.affinities[direction.index()].insert(ParticleId(neighbour), weight);
        self
    }

    /// Allows each of `neighbours` on side `direction` with weight 1.
    #[must_use]
    pub fn allow(mut self, direction: Direction, neighbours: &[u32]) -> Self {
        for &n in neighbours {
            self.affinities[direction.index()].insert(ParticleId(n), 1.0);
        }
        self
    }

    /// Identifier within the catalog.
    pub fn id(&self) -> ParticleId {
        self.id
    }

    /// Optional label.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Data handed back with every commit of this particle.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// The weighted table for side `direction`.
    pub fn allowed(&self, direction: Direction) -> &HashMap<ParticleId, f64> {
        &self.affinities[direction.index()]
    }

    /// Table for the cell at `y + 1`.
    pub fn allowed_above(&self) -> &HashMap<ParticleId, f64> {
        self.allowed(Direction::Above)
    }

    /// Table for the cell at `y - 1`.
    pub fn allowed_below(&self) -> &HashMap<ParticleId, f64> {
        self.allowed(Direction::Below)
    }

    /// Table for the cell at `x - 1`.
    pub fn allowed_left(&self) -> &HashMap<ParticleId, f64> {
        self.allowed(Direction::Left)
    }

    /// Table for the cell at `x + 1`.
    pub fn allowed_right(&self) -> &HashMap<ParticleId, f64> {
        self.allowed(Direction::Right)
    }

    /// Weight given to `neighbour` on side `direction`; a missing entry counts as zero.
    pub fn affinity(&self, direction: Direction, neighbour: ParticleId) -> f64 {
        self.affinities[direction.index()]
            .get(&neighbour)
            .copied()
            .unwrap_or(0.0)
    }

    /// Catalog indices of the particles this one accepts on side `direction`.
    ///
    /// Empty until [`ParticleCatalog::new`](crate::ParticleCatalog::new) builds the masks.
    pub(crate) fn mask(&self, direction: Direction) -> &FixedBitSet {
        &self.masks[direction.index()]
    }

    pub(crate) fn build_masks(&mut self, num_particles: usize, index_of: impl Fn(ParticleId) -> usize) {
        for dir in ALL_DIRECTIONS {
            let mut mask = FixedBitSet::with_capacity(num_particles);
            for (&neighbour, &weight) in &self.affinities[dir.index()] {
                if weight > 0.0 {
                    mask.insert(index_of(neighbour));
                }
            }
            self.masks[dir.index()] = mask;
        }
    }
}
