use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ParticleId;

const DEFAULT_WIDTH: usize = 64;
const DEFAULT_HEIGHT: usize = 64;

/// What to do when a cell has no compatible particle left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionPolicy {
    /// Stop the generation and report the cell.
    #[default]
    Fail,
    /// Commit this particle to the cell regardless of its neighbours.
    Fallback(ParticleId),
}

/// Settings for a [`Generator`](crate::Generator), usually read from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Fixed seed for reproducible output; drawn from the OS when absent.
    pub seed: Option<u64>,
    /// Run the entropy pass on the rayon pool.
    pub parallel: bool,
    /// Show a terminal progress bar while generating.
    pub progress: bool,
    /// Written `fail` or `{ fallback: <id> }`.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub contradiction: ContradictionPolicy,
    /// Particle catalog file; the built-in landscape catalog when absent.
    pub catalog: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: None,
            parallel: false,
            progress: false,
            contradiction: ContradictionPolicy::Fail,
            catalog: None,
        }
    }
}

impl GeneratorConfig {
    /// Parses a YAML document; absent fields keep their defaults.
    pub fn from_yaml_str(data: &str) -> Result<Self> {
        serde_yaml::from_str(data).context("Failed to parse generator config")
    }

    /// Loads a config file; a relative `catalog` path is resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config = Self::from_yaml_str(&data)?;
        if let (Some(catalog), Some(dir)) = (&config.catalog, path.parent()) {
            if catalog.is_relative() {
                config.catalog = Some(dir.join(catalog));
            }
        }
        Ok(config)
    }
}
