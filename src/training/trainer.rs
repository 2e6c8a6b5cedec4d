//! Training orchestration
//!
//! One trainer owns the prototype store for the duration of a run. Samples
//! within an epoch are presented strictly in dataset order (online learning:
//! later samples see the effect of earlier ones); parallelism fans out only
//! inside a single sample's BMU scan and neighborhood update, where every
//! worker writes a distinct prototype.

use std::path::{Path, PathBuf};
use std::time::Instant;

use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SomError};
use crate::lattice::PrototypeStore;
use crate::snapshot::{self, SnapshotFormat};
use crate::training::bmu::find_bmu;
use crate::training::config::SomConfig;
use crate::training::evaluation;
use crate::training::labeler;
use crate::training::schedule::DecaySchedule;

/// Per-epoch metrics record handed back to the caller for logging/display.
/// The trainer itself never prints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochReport {
    pub epoch: usize,
    pub learning_rate: f64,
    /// None in BMU-only mode, where no radius is in play.
    pub radius: Option<f64>,
    pub elapsed_secs: f64,
    pub val_accuracy: Option<f64>,
    pub test_accuracy: Option<f64>,
}

/// Labeled sets evaluated after each epoch. Accuracy is reported, never
/// branched on.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalSets<'a> {
    /// Drives per-epoch relabeling and validation accuracy.
    pub validation: Option<(&'a Array2<f64>, &'a Array1<i32>)>,
    /// Held-out set; also selects the best snapshot when checkpointing.
    pub test: Option<(&'a Array2<f64>, &'a Array1<i32>)>,
}

/// Snapshot persistence during a training run: a periodic `checkpoint`, a
/// `best_model` tracking the highest test accuracy seen, and a `final`
/// snapshot after the last epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    pub dir: PathBuf,
    /// Save a periodic checkpoint every this many epochs; 0 disables it.
    pub every: usize,
    pub format: SnapshotFormat,
}

impl CheckpointConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            every: 5,
            format: SnapshotFormat::Text,
        }
    }

    pub fn with_every(mut self, every: usize) -> Self {
        self.every = every;
        self
    }

    pub fn with_format(mut self, format: SnapshotFormat) -> Self {
        self.format = format;
        self
    }

    fn path(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", stem, self.format.extension()))
    }
}

/// SOM trainer: owns the store, the configuration, and the derived schedule.
#[derive(Debug, Clone)]
pub struct SomTrainer {
    config: SomConfig,
    /// None in load-only mode (`epochs = 0`).
    schedule: Option<DecaySchedule>,
    store: PrototypeStore,
}

impl SomTrainer {
    /// Build a trainer. With `epochs > 0` the store gets seeded random
    /// weights and the annealing schedule is derived up front; with
    /// `epochs = 0` the store is a placeholder awaiting a snapshot load.
    pub fn new(config: SomConfig) -> Result<Self> {
        config.validate()?;
        let schedule = if config.epochs > 0 {
            Some(DecaySchedule::new(
                config.mode,
                config.initial_learning_rate,
                config.initial_radius(),
                config.epochs,
            )?)
        } else {
            None
        };
        let store = if config.epochs > 0 {
            PrototypeStore::random(config.dims, config.input_dim, config.seed)?
        } else {
            PrototypeStore::placeholder(config.dims, config.input_dim)?
        };
        Ok(Self {
            config,
            schedule,
            store,
        })
    }

    pub fn config(&self) -> &SomConfig {
        &self.config
    }

    pub fn store(&self) -> &PrototypeStore {
        &self.store
    }

    /// Hand the store to a consumer (e.g. an external renderer) once the
    /// trainer is done with it.
    pub fn into_store(self) -> PrototypeStore {
        self.store
    }

    /// Run one epoch over `x_train` in dataset order.
    pub fn train_epoch(&mut self, epoch: usize, x_train: &Array2<f64>) -> Result<EpochReport> {
        let start = Instant::now();
        let (learning_rate, radius) = self.run_epoch(epoch, x_train)?;
        Ok(EpochReport {
            epoch,
            learning_rate,
            radius,
            elapsed_secs: start.elapsed().as_secs_f64(),
            val_accuracy: None,
            test_accuracy: None,
        })
    }

    /// Run the full configured number of epochs.
    pub fn train(&mut self, x_train: &Array2<f64>) -> Result<Vec<EpochReport>> {
        self.train_with_eval(x_train, EvalSets::default(), None)
    }

    /// Run all epochs, interleaving per-epoch labeling/evaluation and
    /// checkpoint persistence.
    pub fn train_with_eval(
        &mut self,
        x_train: &Array2<f64>,
        eval: EvalSets<'_>,
        checkpoints: Option<&CheckpointConfig>,
    ) -> Result<Vec<EpochReport>> {
        let epochs = self.config.epochs;
        if epochs == 0 {
            return Err(SomError::TrainingError(
                "trainer is configured load-only (epochs = 0)".to_string(),
            ));
        }
        if let Some(cp) = checkpoints {
            std::fs::create_dir_all(&cp.dir)?;
        }

        let mut reports = Vec::with_capacity(epochs);
        let mut best_test_acc = f64::NEG_INFINITY;
        for epoch in 0..epochs {
            let start = Instant::now();
            let (learning_rate, radius) = self.run_epoch(epoch, x_train)?;

            let val_accuracy = match eval.validation {
                Some((x_val, y_val)) => {
                    labeler::assign_labels(&mut self.store, x_val, y_val)?;
                    Some(evaluation::accuracy(&self.store, x_val, y_val)?)
                }
                None => None,
            };
            let test_accuracy = match eval.test {
                Some((x_test, y_test)) => {
                    Some(evaluation::accuracy(&self.store, x_test, y_test)?)
                }
                None => None,
            };

            if let Some(cp) = checkpoints {
                if cp.every > 0 && (epoch + 1) % cp.every == 0 {
                    snapshot::save(&self.store, &cp.path("checkpoint"), cp.format)?;
                }
                if let Some(acc) = test_accuracy {
                    if acc > best_test_acc {
                        best_test_acc = acc;
                        snapshot::save(&self.store, &cp.path("best_model"), cp.format)?;
                    }
                }
            }

            reports.push(EpochReport {
                epoch,
                learning_rate,
                radius,
                elapsed_secs: start.elapsed().as_secs_f64(),
                val_accuracy,
                test_accuracy,
            });
        }

        if let Some(cp) = checkpoints {
            snapshot::save(&self.store, &cp.path("final"), cp.format)?;
        }
        Ok(reports)
    }

    /// Majority-vote relabeling from a validation set.
    pub fn assign_labels(&mut self, x_val: &Array2<f64>, y_val: &Array1<i32>) -> Result<()> {
        labeler::assign_labels(&mut self.store, x_val, y_val)
    }

    /// Class of the BMU of `sample`.
    pub fn predict(&self, sample: ArrayView1<'_, f64>) -> Result<i32> {
        evaluation::predict(&self.store, sample)
    }

    /// Classification accuracy of the labeled lattice on `(x, y)`.
    pub fn accuracy(&self, x: &Array2<f64>, y: &Array1<i32>) -> Result<f64> {
        evaluation::accuracy(&self.store, x, y)
    }

    /// Persist the current weights.
    pub fn save_weights(&self, path: &Path, format: SnapshotFormat) -> Result<()> {
        snapshot::save(&self.store, path, format)
    }

    /// Replace the store from a text snapshot; lattice dimensions come from
    /// the file header.
    pub fn load_weights_text(&mut self, path: &Path) -> Result<()> {
        let store = snapshot::text::load(path)?;
        self.adopt_store(store)
    }

    /// Replace the store from a binary snapshot laid out on the configured
    /// lattice dimensions.
    pub fn load_weights_binary(&mut self, path: &Path) -> Result<()> {
        let store = snapshot::binary::load(path, self.config.dims)?;
        self.adopt_store(store)
    }

    /// Swap in a fully loaded store. All validation happens before any field
    /// is touched, so a failed load leaves the trainer unchanged.
    fn adopt_store(&mut self, store: PrototypeStore) -> Result<()> {
        if store.input_dim() != self.config.input_dim {
            return Err(SomError::ShapeError {
                expected: format!("{} weights per prototype", self.config.input_dim),
                actual: format!("{} weights per prototype", store.input_dim()),
            });
        }
        let schedule = if self.config.epochs > 0 {
            let dims = store.dims();
            let radius = self
                .config
                .initial_radius
                .unwrap_or(dims.max_dim() as f64 / 2.0);
            Some(DecaySchedule::new(
                self.config.mode,
                self.config.initial_learning_rate,
                radius,
                self.config.epochs,
            )?)
        } else {
            None
        };
        self.config.dims = store.dims();
        self.schedule = schedule;
        self.store = store;
        Ok(())
    }

    /// The sample presentation loop of one epoch. Returns the epoch's
    /// `(rate, radius)` so reports carry the exact coefficients used.
    fn run_epoch(&mut self, epoch: usize, x_train: &Array2<f64>) -> Result<(f64, Option<f64>)> {
        let schedule = self.schedule.as_ref().ok_or_else(|| {
            SomError::TrainingError("trainer is configured load-only (epochs = 0)".to_string())
        })?;
        if x_train.nrows() == 0 {
            return Err(SomError::TrainingError("empty training set".to_string()));
        }
        if x_train.ncols() != self.config.input_dim {
            return Err(SomError::ShapeError {
                expected: format!("{} columns", self.config.input_dim),
                actual: format!("{} columns", x_train.ncols()),
            });
        }

        let rate = schedule.rate_at(epoch);
        let radius = schedule.radius_at(epoch);
        let mode = self.config.mode;
        let dims = self.store.dims();

        for sample in x_train.rows() {
            let bmu = find_bmu(&self.store, sample);
            match radius {
                // BMU-only mode: one cell, no scan.
                None => self.store.prototypes_mut()[bmu].update(sample, rate, 1.0),
                Some(r) => {
                    self.store
                        .prototypes_mut()
                        .par_iter_mut()
                        .enumerate()
                        .for_each(|(i, prototype)| {
                            let dist_sq = dims.distance_sq(i, bmu);
                            if let Some(influence) = mode.influence(dist_sq, r) {
                                prototype.update(sample, rate, influence);
                            }
                        });
                }
            }
        }

        Ok((rate, radius))
    }
}
