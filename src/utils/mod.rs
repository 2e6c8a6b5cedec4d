//! Dataset adapter utilities
//!
//! Glue between caller-side dataset ingestion and the engine: one-hot label
//! conversion and the leading-fraction validation split. Parsing delimited
//! files stays on the caller's side of the boundary.

use ndarray::{Array1, Array2};

use crate::error::{Result, SomError};

/// Convert one-hot label rows to class indices by per-row arg-max.
///
/// The first maximum wins on ties, so an all-zero row maps to class 0.
pub fn onehot_to_labels(y_onehot: &Array2<f64>) -> Array1<i32> {
    let labels: Vec<i32> = y_onehot
        .rows()
        .into_iter()
        .map(|row| {
            let mut best = 0usize;
            let mut best_val = f64::NEG_INFINITY;
            for (i, &v) in row.iter().enumerate() {
                if v > best_val {
                    best_val = v;
                    best = i;
                }
            }
            best as i32
        })
        .collect();
    Array1::from_vec(labels)
}

/// Split `(x, y)` into a leading validation slice and the remaining training
/// slice, in dataset order.
///
/// Returns `(x_val, y_val, x_train, y_train)`. `fraction` must lie in
/// `[0, 1)` so at least one training sample remains.
pub fn validation_split(
    x: &Array2<f64>,
    y: &Array1<i32>,
    fraction: f64,
) -> Result<(Array2<f64>, Array1<i32>, Array2<f64>, Array1<i32>)> {
    if x.nrows() != y.len() {
        return Err(SomError::ShapeError {
            expected: format!("{} labels", x.nrows()),
            actual: format!("{} labels", y.len()),
        });
    }
    if !(0.0..1.0).contains(&fraction) {
        return Err(SomError::InvalidInput(format!(
            "validation fraction must be in [0, 1), got {}",
            fraction
        )));
    }
    if x.nrows() == 0 {
        return Err(SomError::InvalidInput("cannot split an empty dataset".to_string()));
    }

    let val_size = (x.nrows() as f64 * fraction) as usize;
    let x_val = x.slice(ndarray::s![..val_size, ..]).to_owned();
    let y_val = y.slice(ndarray::s![..val_size]).to_owned();
    let x_train = x.slice(ndarray::s![val_size.., ..]).to_owned();
    let y_train = y.slice(ndarray::s![val_size..]).to_owned();
    Ok((x_val, y_val, x_train, y_train))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_onehot_to_labels() {
        let y = array![
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.9, 0.1],
        ];
        assert_eq!(onehot_to_labels(&y), array![2, 0, 1]);
    }

    #[test]
    fn test_onehot_tie_takes_first() {
        let y = array![[0.5, 0.5], [0.0, 0.0]];
        assert_eq!(onehot_to_labels(&y), array![0, 0]);
    }

    #[test]
    fn test_validation_split() {
        let x = array![[0.0], [1.0], [2.0], [3.0], [4.0]];
        let y = array![0, 1, 2, 3, 4];
        let (x_val, y_val, x_train, y_train) = validation_split(&x, &y, 0.4).unwrap();
        assert_eq!(x_val.nrows(), 2);
        assert_eq!(y_val, array![0, 1]);
        assert_eq!(x_train.nrows(), 3);
        assert_eq!(y_train, array![2, 3, 4]);
    }

    #[test]
    fn test_validation_split_zero_fraction() {
        let x = array![[0.0], [1.0]];
        let y = array![0, 1];
        let (x_val, _, x_train, _) = validation_split(&x, &y, 0.0).unwrap();
        assert_eq!(x_val.nrows(), 0);
        assert_eq!(x_train.nrows(), 2);
    }

    #[test]
    fn test_validation_split_bad_inputs() {
        let x = array![[0.0], [1.0]];
        let y = array![0, 1];
        assert!(validation_split(&x, &y, 1.0).is_err());
        assert!(validation_split(&x, &y, -0.1).is_err());

        let y_short = array![0];
        assert!(validation_split(&x, &y_short, 0.5).is_err());
    }
}
