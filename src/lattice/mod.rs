//! Lattice data structures
//!
//! The fixed 3D grid of prototypes that gives the map its topology:
//! - [`LatticeDims`] - grid dimensions and the coordinate/flat-index bijection
//! - [`Prototype`] - a single cell's weight vector and optional class label
//! - [`PrototypeStore`] - all prototypes of a map in flat-index order

mod grid;
mod store;

pub use grid::LatticeDims;
pub use store::{Prototype, PrototypeStore, UNLABELED};
