//! Binary snapshot format
//!
//! Fixed header of two little-endian `u64`s `(num_prototypes, weights_dim)`
//! followed by `num_prototypes × weights_dim` packed little-endian `f64`
//! weights in flat-index order. Labels are not persisted. The format carries
//! no lattice geometry; the caller supplies dimensions on load.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{Result, SomError};
use crate::lattice::{LatticeDims, PrototypeStore};
use crate::snapshot::write_atomic;

const HEADER_LEN: usize = 16;

/// Save the store's weights in binary form, atomically.
pub fn save(store: &PrototypeStore, path: &Path) -> Result<()> {
    let num = store.len() as u64;
    let dim = store.input_dim() as u64;
    let mut out = Vec::with_capacity(HEADER_LEN + store.len() * store.input_dim() * 8);
    out.extend_from_slice(&num.to_le_bytes());
    out.extend_from_slice(&dim.to_le_bytes());
    for prototype in store.prototypes() {
        for w in prototype.weights() {
            out.extend_from_slice(&w.to_le_bytes());
        }
    }
    write_atomic(path, &out)
}

/// Load a binary snapshot into a fresh store laid out on `dims`.
///
/// Zero declared header fields are rejected, as is a payload whose byte
/// length disagrees with the header (a truncated or padded file is never
/// silently accepted). A prototype count differing from `dims.total()` is
/// warned about and the store is returned as loaded.
pub fn load(path: &Path, dims: LatticeDims) -> Result<PrototypeStore> {
    let bytes = fs::read(path)?;
    if bytes.len() < HEADER_LEN {
        return Err(SomError::SnapshotError(format!(
            "{}: file too short for header ({} bytes)",
            path.display(),
            bytes.len()
        )));
    }

    let num = read_u64(&bytes[0..8]) as usize;
    let dim = read_u64(&bytes[8..16]) as usize;
    if num == 0 || dim == 0 {
        return Err(SomError::SnapshotError(format!(
            "{}: header declares zero prototypes or zero weight dimension",
            path.display()
        )));
    }

    let expected_payload = num
        .checked_mul(dim)
        .and_then(|n| n.checked_mul(8))
        .ok_or_else(|| {
            SomError::SnapshotError(format!("{}: header sizes overflow", path.display()))
        })?;
    let payload = &bytes[HEADER_LEN..];
    if payload.len() != expected_payload {
        return Err(SomError::SnapshotError(format!(
            "{}: payload is {} bytes but header declares {} ({}x{} weights)",
            path.display(),
            payload.len(),
            expected_payload,
            num,
            dim
        )));
    }

    let mut rows = Vec::with_capacity(num);
    for p in 0..num {
        let row_start = p * dim * 8;
        let row = (0..dim)
            .map(|j| {
                let at = row_start + j * 8;
                read_f64(&payload[at..at + 8])
            })
            .collect();
        rows.push(row);
    }

    if num != dims.total() {
        warn!(
            loaded = num,
            expected = dims.total(),
            path = %path.display(),
            "loaded prototype count does not match lattice dimensions"
        );
    }

    Ok(PrototypeStore::from_weight_rows(dims, dim, rows))
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

fn read_f64(bytes: &[u8]) -> f64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    f64::from_le_bytes(buf)
}
