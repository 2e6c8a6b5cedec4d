//! kohonet - Self-organizing map training and inference engine
//!
//! A 3D-lattice Kohonen network: prototypes learn the distribution of a
//! sample stream unsupervised, then majority-vote labeling over validation
//! data turns the lattice into a nearest-prototype classifier.
//!
//! # Modules
//!
//! - [`lattice`] - grid indexing and the prototype store
//! - [`training`] - BMU search, annealing schedule, epoch loop, labeling,
//!   evaluation
//! - [`snapshot`] - text and binary weight persistence
//! - [`utils`] - dataset adapters (one-hot conversion, validation split)
//!
//! # Example
//!
//! ```no_run
//! use kohonet::prelude::*;
//! use ndarray::{array, Array1, Array2};
//!
//! # fn main() -> kohonet::Result<()> {
//! let config = SomConfig::new(2, LatticeDims::new(10, 10, 10)?)
//!     .with_learning_rate(0.5)
//!     .with_epochs(10)
//!     .with_seed(42);
//! let mut trainer = SomTrainer::new(config)?;
//!
//! let x_train: Array2<f64> = array![[0.1, 0.2], [0.8, 0.9]];
//! let x_val: Array2<f64> = array![[0.0, 0.0], [1.0, 1.0]];
//! let y_val: Array1<i32> = array![0, 1];
//!
//! let reports = trainer.train_with_eval(
//!     &x_train,
//!     EvalSets { validation: Some((&x_val, &y_val)), test: None },
//!     None,
//! )?;
//! for report in &reports {
//!     println!("epoch {} lr {:.4}", report.epoch, report.learning_rate);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;

pub mod lattice;
pub mod snapshot;
pub mod training;
pub mod utils;

pub use error::{Result, SomError};

/// Re-export of the commonly used types
pub mod prelude {
    pub use crate::error::{Result, SomError};
    pub use crate::lattice::{LatticeDims, Prototype, PrototypeStore, UNLABELED};
    pub use crate::snapshot::SnapshotFormat;
    pub use crate::training::{
        CheckpointConfig, EpochReport, EvalSets, NeighborhoodMode, SomConfig, SomTrainer,
    };
    pub use crate::utils::{onehot_to_labels, validation_split};
}
