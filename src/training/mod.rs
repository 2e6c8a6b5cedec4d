//! SOM training and inference
//!
//! The epoch loop and everything it drives:
//! - [`config`] - run configuration and validation
//! - [`schedule`] - neighborhood modes and the annealing schedule
//! - [`bmu`] - parallel Best Matching Unit search
//! - [`trainer`] - the epoch/sample orchestration and checkpointing
//! - [`labeler`] - majority-vote prototype labeling
//! - [`evaluation`] - nearest-prototype classification and accuracy

mod config;
mod trainer;
pub mod bmu;
pub mod evaluation;
pub mod labeler;
pub mod schedule;

pub use bmu::{find_bmu, find_bmu_coords};
pub use config::SomConfig;
pub use evaluation::{accuracy, predict, predict_batch};
pub use labeler::assign_labels;
pub use schedule::{DecaySchedule, NeighborhoodMode};
pub use trainer::{CheckpointConfig, EpochReport, EvalSets, SomTrainer};
