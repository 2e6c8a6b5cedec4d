//! Prototype weight vectors and their container

use ndarray::ArrayView1;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SomError};
use crate::lattice::LatticeDims;

/// Sentinel label for a prototype no validation sample has reached.
pub const UNLABELED: i32 = -1;

/// A single lattice cell: one learned weight vector and an optional class label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prototype {
    weights: Vec<f64>,
    label: i32,
}

impl Prototype {
    pub(crate) fn new(weights: Vec<f64>) -> Self {
        Self {
            weights,
            label: UNLABELED,
        }
    }

    /// Squared Euclidean distance to an input vector.
    ///
    /// The caller guarantees `input.len() == weights.len()`; dimension checks
    /// happen once per dataset at the trainer boundary, not per scan.
    pub fn distance_sq(&self, input: ArrayView1<'_, f64>) -> f64 {
        self.weights
            .iter()
            .zip(input.iter())
            .map(|(&w, &s)| {
                let d = s - w;
                d * d
            })
            .sum()
    }

    /// Nudge the weights toward `input` by `rate · influence`.
    pub fn update(&mut self, input: ArrayView1<'_, f64>, rate: f64, influence: f64) {
        let step = rate * influence;
        for (w, &s) in self.weights.iter_mut().zip(input.iter()) {
            *w += step * (s - *w);
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn label(&self) -> i32 {
        self.label
    }

    pub fn set_label(&mut self, label: i32) {
        self.label = label;
    }
}

/// All prototypes of a map, in flat-index order.
///
/// Invariant: every prototype's weight length equals `input_dim` for the
/// lifetime of the store; enforced at construction and at snapshot load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrototypeStore {
    dims: LatticeDims,
    input_dim: usize,
    prototypes: Vec<Prototype>,
}

impl PrototypeStore {
    /// Create a store with seeded uniform-random weights in `[0, 1)`.
    pub fn random(dims: LatticeDims, input_dim: usize, seed: u64) -> Result<Self> {
        if input_dim == 0 {
            return Err(SomError::ConfigError("input_dim must be positive".to_string()));
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let prototypes = (0..dims.total())
            .map(|_| Prototype::new((0..input_dim).map(|_| rng.gen::<f64>()).collect()))
            .collect();
        Ok(Self {
            dims,
            input_dim,
            prototypes,
        })
    }

    /// Create a store with zeroed placeholder weights, for load-only use.
    pub fn placeholder(dims: LatticeDims, input_dim: usize) -> Result<Self> {
        if input_dim == 0 {
            return Err(SomError::ConfigError("input_dim must be positive".to_string()));
        }
        let prototypes = (0..dims.total())
            .map(|_| Prototype::new(vec![0.0; input_dim]))
            .collect();
        Ok(Self {
            dims,
            input_dim,
            prototypes,
        })
    }

    /// Assemble a store from already-validated weight rows (snapshot load path).
    pub(crate) fn from_weight_rows(dims: LatticeDims, input_dim: usize, rows: Vec<Vec<f64>>) -> Self {
        Self {
            dims,
            input_dim,
            prototypes: rows.into_iter().map(Prototype::new).collect(),
        }
    }

    pub fn dims(&self) -> LatticeDims {
        self.dims
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Number of prototypes actually held. Equals `dims().total()` except
    /// after a soft-failed snapshot load, which callers must treat as degraded.
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    pub fn prototypes(&self) -> &[Prototype] {
        &self.prototypes
    }

    pub fn prototypes_mut(&mut self) -> &mut [Prototype] {
        &mut self.prototypes
    }

    pub fn prototype(&self, index: usize) -> Option<&Prototype> {
        self.prototypes.get(index)
    }

    /// Clear all labels back to the [`UNLABELED`] sentinel.
    pub fn clear_labels(&mut self) {
        for p in &mut self.prototypes {
            p.label = UNLABELED;
        }
    }
}
