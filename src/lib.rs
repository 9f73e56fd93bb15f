//! # `ParticleCollapse`
//!
//! `ParticleCollapse` fills a 2D grid with tiles ("particles") by repeatedly
//! collapsing the most constrained cell to a particle compatible with its
//! committed neighbours.

// #![deny(warnings)]
#![deny(missing_docs)]
// #![deny(unused)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_errors_doc)]

pub mod algorithm;
mod catalog;
mod cell;
mod config;
mod direction;
mod error;
mod generator;
mod grid;
mod particle;

pub use catalog::ParticleCatalog;
pub use cell::Cell;
pub use config::{ContradictionPolicy, GeneratorConfig};
pub use direction::{ALL_DIRECTIONS, DIRECTION_DELTAS, Direction};
pub use error::{CatalogError, Error, Result};
pub use generator::{CommitEvent, Generator};
pub use grid::Grid;
pub use particle::{Particle, ParticleId, Rgb};
