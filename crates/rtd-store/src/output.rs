//! Dataset output files.
//!
//! Panels and triangles are written as CSV, one pair per table type, and
//! fully rewritten on every run through a sibling temp file and rename.

use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use rtd_model::Frequency;

use crate::error::{Result, StoreError};

/// Path of the vintage panel for one table type.
pub fn panel_path(root: &Path, frequency: Frequency) -> PathBuf {
    root.join(format!("panel_{frequency}.csv"))
}

/// Path of the revision triangle for one table type.
pub fn triangle_path(root: &Path, frequency: Frequency) -> PathBuf {
    root.join(format!("triangle_{frequency}.csv"))
}

/// Write a dataset as CSV via temp-then-rename.
pub fn write_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::io(parent, source))?;
    }
    let tmp = path.with_extension("tmp");
    {
        let mut file =
            std::fs::File::create(&tmp).map_err(|source| StoreError::io(&tmp, source))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)?;
    }
    std::fs::rename(&tmp, path).map_err(|source| StoreError::io(path, source))?;
    Ok(())
}
