//! Writing datasets back out in their own layout.

use super::Dataset;
use crate::error::LiftError;
use crate::io::create_output;
use std::io::Write;
use std::path::Path;

/// Write every marker row in dataset order, separated by the dataset's delimiter.
pub fn write_dataset<W: Write>(writer: &mut W, dataset: &Dataset) -> std::io::Result<()> {
    let sep = dataset.delimiter().as_separator();
    for marker in dataset {
        writeln!(writer, "{}", marker.fields().join(sep))?;
    }
    Ok(())
}

/// Write a dataset to `path`.
pub fn write_dataset_path<P: AsRef<Path>>(path: P, dataset: &Dataset) -> Result<(), LiftError> {
    let path = path.as_ref();
    let mut writer = create_output(path)?;
    write_dataset(&mut writer, dataset)
        .and_then(|_| writer.flush())
        .map_err(|e| LiftError::io(format!("Failed to write {}", path.display()), e))
}
