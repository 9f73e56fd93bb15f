//! Per-iteration steps of a generation.

mod collapser;
mod entropy;
mod progress;
mod selector;

pub use collapser::{choose_weighted, collapse_cell, score};
pub use entropy::{EntropyCalculator, candidates_for};
pub use progress::GenerationProgress;
pub use selector::select_cell;
