use thiserror::Error;

use crate::ParticleId;

/// Problems found while assembling a [`ParticleCatalog`](crate::ParticleCatalog).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// No particles were given.
    #[error("Catalog must contain at least one particle")]
    Empty,
    /// Two particles share an id.
    #[error("Particle id {0} is declared more than once")]
    DuplicateId(ParticleId),
    /// An affinity table names a particle that is not in the catalog.
    #[error("Particle {particle} refers to unknown neighbour {neighbour}")]
    UnknownNeighbour {
        /// Owner of the table.
        particle: ParticleId,
        /// The missing id.
        neighbour: ParticleId,
    },
    /// A weight is negative, infinite or NaN.
    #[error("Particle {particle} has invalid weight {weight} for neighbour {neighbour}")]
    InvalidWeight {
        /// Owner of the table.
        particle: ParticleId,
        /// Entry holding the bad weight.
        neighbour: ParticleId,
        /// The rejected value.
        weight: f64,
    },
}

/// Errors raised while building or running a generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Width or height was zero.
    #[error("Grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// No particle is compatible with the committed neighbours of a cell.
    #[error("Contradiction: no particle fits at ({x}, {y})")]
    Contradiction {
        /// Column of the cell.
        x: usize,
        /// Row of the cell.
        y: usize,
    },
    /// Collapse is write-once per cell.
    #[error("Cell ({x}, {y}) is already collapsed")]
    AlreadyCollapsed {
        /// Column of the cell.
        x: usize,
        /// Row of the cell.
        y: usize,
    },
    /// Selection was asked for a cell when every cell is already collapsed.
    #[error("No uncollapsed cell remains")]
    NoCandidates,
    /// The contradiction fallback names a particle outside the catalog.
    #[error("Fallback particle {0} is not in the catalog")]
    UnknownFallback(ParticleId),
    /// The catalog failed validation.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Result alias for generation.
pub type Result<T> = std::result::Result<T, Error>;
