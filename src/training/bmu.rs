//! Best Matching Unit search
//!
//! Full-lattice nearest-prototype scan by squared Euclidean distance. The scan
//! runs as a rayon fork-join: each worker reduces its partition to a local
//! `(distance, index)` minimum and the merge applies the same comparison, so
//! the lowest flat index wins exact ties for any worker count or schedule.

use ndarray::ArrayView1;
use rayon::prelude::*;

use crate::lattice::PrototypeStore;

/// Flat index of the prototype closest to `sample`.
///
/// Ties on distance resolve to the lowest flat index. The caller guarantees
/// `sample.len() == store.input_dim()` and a non-empty store; both are checked
/// once per dataset at the trainer/evaluator boundary.
pub fn find_bmu(store: &PrototypeStore, sample: ArrayView1<'_, f64>) -> usize {
    debug_assert_eq!(sample.len(), store.input_dim());
    debug_assert!(!store.is_empty());

    store
        .prototypes()
        .par_iter()
        .enumerate()
        .map(|(i, p)| (p.distance_sq(sample), i))
        .reduce(|| (f64::INFINITY, usize::MAX), merge_min)
        .1
}

/// Lexicographic `(distance, index)` minimum: a strictly smaller distance
/// wins, an equal distance keeps the lower index.
fn merge_min(a: (f64, usize), b: (f64, usize)) -> (f64, usize) {
    if b.0 < a.0 || (b.0 == a.0 && b.1 < a.1) {
        b
    } else {
        a
    }
}

/// BMU flat index together with its lattice coordinates, for callers that
/// place results spatially (e.g. an external renderer).
pub fn find_bmu_coords(
    store: &PrototypeStore,
    sample: ArrayView1<'_, f64>,
) -> (usize, (usize, usize, usize)) {
    let idx = find_bmu(store, sample);
    let coords = store
        .dims()
        .to_coords(idx)
        .unwrap_or((0, 0, 0));
    (idx, coords)
}
