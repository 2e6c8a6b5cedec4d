//! Majority-vote prototype labeling

use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::error::{Result, SomError};
use crate::lattice::PrototypeStore;
use crate::training::bmu::find_bmu;

/// Assign each prototype the majority class among the validation samples that
/// chose it as BMU.
///
/// Each call is a full re-labeling pass over a fresh hit accumulation, so
/// repeated invocations never double count. Ties resolve to the lowest class
/// index. Prototypes reached by zero samples retain their previous label.
pub fn assign_labels(
    store: &mut PrototypeStore,
    x_val: &Array2<f64>,
    y_val: &Array1<i32>,
) -> Result<()> {
    check_labeled_set(store, x_val, y_val)?;
    if x_val.nrows() == 0 {
        return Ok(());
    }

    let num_classes = y_val.iter().max().copied().unwrap_or(0) as usize + 1;

    // Read-only BMU pass, parallel over samples.
    let bmus: Vec<usize> = {
        let store_ref: &PrototypeStore = store;
        (0..x_val.nrows())
            .into_par_iter()
            .map(|i| find_bmu(store_ref, x_val.row(i)))
            .collect()
    };

    // Fresh per-prototype class counts.
    let mut hits = vec![vec![0u32; num_classes]; store.len()];
    for (&bmu, &label) in bmus.iter().zip(y_val.iter()) {
        hits[bmu][label as usize] += 1;
    }

    store
        .prototypes_mut()
        .par_iter_mut()
        .zip(hits.par_iter())
        .for_each(|(prototype, counts)| {
            if let Some(majority) = majority_class(counts) {
                prototype.set_label(majority);
            }
        });

    Ok(())
}

/// Index of the most frequent class, or `None` when the prototype got no
/// hits. Scanning upward with a strictly-greater comparison makes the lowest
/// class index win exact ties.
fn majority_class(counts: &[u32]) -> Option<i32> {
    let mut best_class = None;
    let mut best_count = 0u32;
    for (class, &count) in counts.iter().enumerate() {
        if count > best_count {
            best_count = count;
            best_class = Some(class as i32);
        }
    }
    best_class
}

fn check_labeled_set(
    store: &PrototypeStore,
    x: &Array2<f64>,
    y: &Array1<i32>,
) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(SomError::ShapeError {
            expected: format!("{} labels", x.nrows()),
            actual: format!("{} labels", y.len()),
        });
    }
    if x.nrows() > 0 && x.ncols() != store.input_dim() {
        return Err(SomError::ShapeError {
            expected: format!("{} columns", store.input_dim()),
            actual: format!("{} columns", x.ncols()),
        });
    }
    if let Some(&bad) = y.iter().find(|&&l| l < 0) {
        return Err(SomError::DataError(format!(
            "class labels must be non-negative, got {}",
            bad
        )));
    }
    if store.is_empty() {
        return Err(SomError::DataError(
            "prototype store is empty; nothing to label".to_string(),
        ));
    }
    Ok(())
}
