//! Training configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, SomError};
use crate::lattice::LatticeDims;
use crate::training::schedule::NeighborhoodMode;

/// Configuration for a SOM training run.
///
/// `epochs = 0` selects load-only mode: no schedule is derived, the store is
/// created with placeholder weights, and the trainer only accepts snapshot
/// loads and inference calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SomConfig {
    pub input_dim: usize,
    pub dims: LatticeDims,
    pub initial_learning_rate: f64,
    pub epochs: usize,
    pub mode: NeighborhoodMode,
    /// Override for the derived initial radius (`max_dim/2`). Small lattices
    /// need this to reach a non-degenerate covering radius.
    pub initial_radius: Option<f64>,
    /// Seed for prototype weight initialization, so runs are reproducible.
    pub seed: u64,
}

impl SomConfig {
    pub fn new(input_dim: usize, dims: LatticeDims) -> Self {
        Self {
            input_dim,
            dims,
            initial_learning_rate: 0.5,
            epochs: 10,
            mode: NeighborhoodMode::default(),
            initial_radius: None,
            seed: 42,
        }
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.initial_learning_rate = lr;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_mode(mut self, mode: NeighborhoodMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_initial_radius(mut self, radius: f64) -> Self {
        self.initial_radius = Some(radius);
        self
    }

    /// Load-only configuration: no training schedule, placeholder weights.
    pub fn load_only(input_dim: usize, dims: LatticeDims) -> Self {
        Self::new(input_dim, dims).with_epochs(0)
    }

    /// Initial neighborhood radius: the configured override, or half the
    /// largest lattice dimension.
    pub fn initial_radius(&self) -> f64 {
        self.initial_radius
            .unwrap_or(self.dims.max_dim() as f64 / 2.0)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.input_dim == 0 {
            return Err(SomError::ConfigError("input_dim must be positive".to_string()));
        }
        Ok(())
    }
}
