//! Nearest-prototype classification and accuracy

use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;

use crate::error::{Result, SomError};
use crate::lattice::PrototypeStore;
use crate::training::bmu::find_bmu;

/// Predicted class of a single sample: the label of its BMU.
///
/// Returns the [`UNLABELED`](crate::lattice::UNLABELED) sentinel when the BMU
/// was never labeled.
pub fn predict(store: &PrototypeStore, sample: ArrayView1<'_, f64>) -> Result<i32> {
    check_samples(store, sample.len(), 1)?;
    let bmu = find_bmu(store, sample);
    Ok(store.prototypes()[bmu].label())
}

/// Predicted classes for every row of `x`, parallel over samples.
pub fn predict_batch(store: &PrototypeStore, x: &Array2<f64>) -> Result<Array1<i32>> {
    check_samples(store, x.ncols(), x.nrows())?;
    let labels: Vec<i32> = (0..x.nrows())
        .into_par_iter()
        .map(|i| {
            let bmu = find_bmu(store, x.row(i));
            store.prototypes()[bmu].label()
        })
        .collect();
    Ok(Array1::from_vec(labels))
}

/// Fraction of samples whose predicted class matches `y`.
///
/// An empty evaluation set is rejected rather than dividing by zero.
pub fn accuracy(store: &PrototypeStore, x: &Array2<f64>, y: &Array1<i32>) -> Result<f64> {
    if x.nrows() == 0 {
        return Err(SomError::InvalidInput(
            "cannot compute accuracy on an empty evaluation set".to_string(),
        ));
    }
    if x.nrows() != y.len() {
        return Err(SomError::ShapeError {
            expected: format!("{} labels", x.nrows()),
            actual: format!("{} labels", y.len()),
        });
    }
    check_samples(store, x.ncols(), x.nrows())?;

    let correct: usize = (0..x.nrows())
        .into_par_iter()
        .filter(|&i| {
            let bmu = find_bmu(store, x.row(i));
            store.prototypes()[bmu].label() == y[i]
        })
        .count();

    Ok(correct as f64 / x.nrows() as f64)
}

fn check_samples(store: &PrototypeStore, width: usize, rows: usize) -> Result<()> {
    if store.is_empty() {
        return Err(SomError::DataError(
            "prototype store is empty; nothing to predict with".to_string(),
        ));
    }
    if rows > 0 && width != store.input_dim() {
        return Err(SomError::ShapeError {
            expected: format!("{} columns", store.input_dim()),
            actual: format!("{} columns", width),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{LatticeDims, Prototype, UNLABELED};
    use ndarray::array;

    fn labeled_store() -> PrototypeStore {
        let dims = LatticeDims::new(2, 1, 1).unwrap();
        let mut store = PrototypeStore::placeholder(dims, 2).unwrap();
        store.prototypes_mut()[0] = Prototype::new(vec![0.0, 0.0]);
        store.prototypes_mut()[1] = Prototype::new(vec![10.0, 10.0]);
        store.prototypes_mut()[0].set_label(0);
        store.prototypes_mut()[1].set_label(1);
        store
    }

    #[test]
    fn test_predict() {
        let store = labeled_store();
        assert_eq!(predict(&store, array![1.0, 1.0].view()).unwrap(), 0);
        assert_eq!(predict(&store, array![9.0, 9.0].view()).unwrap(), 1);
    }

    #[test]
    fn test_predict_unlabeled_returns_sentinel() {
        let mut store = labeled_store();
        store.clear_labels();
        assert_eq!(predict(&store, array![1.0, 1.0].view()).unwrap(), UNLABELED);
    }

    #[test]
    fn test_predict_batch() {
        let store = labeled_store();
        let x = array![[0.0, 0.0], [10.0, 10.0], [1.0, 2.0]];
        let preds = predict_batch(&store, &x).unwrap();
        assert_eq!(preds, array![0, 1, 0]);
    }

    #[test]
    fn test_accuracy_three_of_four() {
        let store = labeled_store();
        let x = array![[0.0, 0.0], [10.0, 10.0], [1.0, 1.0], [9.0, 9.0]];
        // Last label is wrong on purpose.
        let y = array![0, 1, 0, 0];
        assert_eq!(accuracy(&store, &x, &y).unwrap(), 0.75);
    }

    #[test]
    fn test_accuracy_empty_set_is_error() {
        let store = labeled_store();
        let x = Array2::zeros((0, 2));
        let y = Array1::zeros(0);
        let err = accuracy(&store, &x, &y);
        assert!(matches!(err, Err(SomError::InvalidInput(_))));
    }

    #[test]
    fn test_dimension_mismatch_is_error() {
        let store = labeled_store();
        let x = array![[0.0, 0.0, 0.0]];
        let y = array![0];
        assert!(matches!(
            accuracy(&store, &x, &y),
            Err(SomError::ShapeError { .. })
        ));
        assert!(predict(&store, array![1.0].view()).is_err());
    }
}
