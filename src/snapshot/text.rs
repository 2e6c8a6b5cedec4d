//! Text snapshot format
//!
//! First line: `dim_x dim_y dim_z`. Then one line per prototype in flat-index
//! order, weights as comma-separated decimals. Labels are not persisted.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::warn;

use crate::error::{Result, SomError};
use crate::lattice::{LatticeDims, PrototypeStore};
use crate::snapshot::write_atomic;

/// Save the store's weights as text, atomically.
pub fn save(store: &PrototypeStore, path: &Path) -> Result<()> {
    let dims = store.dims();
    let mut out = String::new();
    let _ = writeln!(out, "{} {} {}", dims.x, dims.y, dims.z);
    for prototype in store.prototypes() {
        let weights = prototype.weights();
        for (i, w) in weights.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "{}", w);
        }
        out.push('\n');
    }
    write_atomic(path, out.as_bytes())
}

/// Load a text snapshot into a fresh store.
///
/// Zero declared dimensions are rejected. A malformed or wrong-width line is
/// skipped with a warning; a prototype count that disagrees with the declared
/// dimensions is warned about and the partial store is returned, leaving the
/// soft-fail decision to the caller. Labels come back as the unset sentinel.
pub fn load(path: &Path) -> Result<PrototypeStore> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let header = lines
        .next()
        .transpose()?
        .ok_or_else(|| SomError::SnapshotError(format!("{}: empty snapshot file", path.display())))?;
    let dims = parse_dims(&header)
        .ok_or_else(|| SomError::SnapshotError(format!("{}: malformed dimension header {:?}", path.display(), header)))?;

    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(dims.total());
    let mut input_dim = 0usize;
    for (line_no, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed: std::result::Result<Vec<f64>, _> =
            line.split(',').map(|v| v.trim().parse::<f64>()).collect();
        let weights = match parsed {
            Ok(w) => w,
            Err(_) => {
                warn!(line = line_no + 2, path = %path.display(), "skipping malformed weight line");
                continue;
            }
        };
        if input_dim == 0 {
            input_dim = weights.len();
        } else if weights.len() != input_dim {
            warn!(
                line = line_no + 2,
                expected = input_dim,
                actual = weights.len(),
                path = %path.display(),
                "skipping weight line of wrong width"
            );
            continue;
        }
        rows.push(weights);
    }

    if rows.is_empty() {
        return Err(SomError::SnapshotError(format!(
            "{}: snapshot contains no weight rows",
            path.display()
        )));
    }
    if rows.len() != dims.total() {
        warn!(
            loaded = rows.len(),
            expected = dims.total(),
            path = %path.display(),
            "loaded prototype count does not match declared dimensions"
        );
    }

    Ok(PrototypeStore::from_weight_rows(dims, input_dim, rows))
}

fn parse_dims(header: &str) -> Option<LatticeDims> {
    let mut parts = header.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    let z = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    LatticeDims::new(x, y, z).ok()
}
