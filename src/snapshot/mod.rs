//! Weight snapshot persistence
//!
//! Two interchangeable snapshot shapes:
//! - [`text`] - one comma-separated weight line per prototype, with a
//!   `dim_x dim_y dim_z` header line so dimensions can be recovered on load
//! - [`binary`] - `(num_prototypes, weights_dim)` header followed by packed
//!   little-endian `f64` weights, no labels
//!
//! Saves go through a write-then-rename so a partially written file is never
//! left behind under the target name.

pub mod binary;
pub mod text;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SomError};
use crate::lattice::PrototypeStore;

/// Snapshot file shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotFormat {
    Text,
    Binary,
}

impl SnapshotFormat {
    /// Conventional file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            SnapshotFormat::Text => "txt",
            SnapshotFormat::Binary => "bin",
        }
    }
}

/// Save a store in the given format.
pub fn save(store: &PrototypeStore, path: &Path, format: SnapshotFormat) -> Result<()> {
    match format {
        SnapshotFormat::Text => text::save(store, path),
        SnapshotFormat::Binary => binary::save(store, path),
    }
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| SomError::SnapshotError(format!("invalid snapshot path {:?}", path)))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::LatticeDims;
    use tempfile::tempdir;

    #[test]
    fn test_format_extensions() {
        assert_eq!(SnapshotFormat::Text.extension(), "txt");
        assert_eq!(SnapshotFormat::Binary.extension(), "bin");
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weights.txt");
        write_atomic(&path, b"1,2,3\n").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"1,2,3\n");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_save_dispatch() {
        let dir = tempdir().unwrap();
        let store =
            PrototypeStore::random(LatticeDims::new(2, 1, 1).unwrap(), 3, 42).unwrap();
        let text_path = dir.path().join("w.txt");
        let bin_path = dir.path().join("w.bin");
        save(&store, &text_path, SnapshotFormat::Text).unwrap();
        save(&store, &bin_path, SnapshotFormat::Binary).unwrap();
        assert!(text_path.exists());
        assert!(bin_path.exists());
    }
}
