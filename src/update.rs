//! Apply lifted positions to a dataset.

use crate::error::LiftError;
use crate::liftover::{normalize_label, ChromStyle};
use crate::marker::Dataset;
use crate::partition::MappedRecord;
use std::collections::HashMap;
use tracing::debug;

/// Build the lifted dataset.
///
/// The result holds exactly the markers named in `mapped`, in the order of
/// `original`, with chromosome and position replaced and every other column
/// kept verbatim. Chromosomes are rendered in `style`; a record without a
/// chromosome keeps the marker's own label (also rendered in `style`).
///
/// Records from [`partition`](crate::partition::partition) carry their row
/// and are joined by it, so tables read without the duplicate check still
/// relocate the right rows. Records read from a file are joined by
/// identifier, which needs `original` to have unique identifiers.
///
/// Fails with [`LiftError::Join`] when `mapped` names a marker twice, names
/// one that `original` lacks, or joins by identifier against a table with
/// repeated identifiers.
///
/// ```
/// use ferro_liftover::coords::OneBasedPos;
/// use ferro_liftover::liftover::ChromStyle;
/// use ferro_liftover::marker::Dataset;
/// use ferro_liftover::partition::MappedRecord;
/// use ferro_liftover::update::update_dataset;
///
/// let original = Dataset::from_records([("1", 1_000_000, "rs1"), ("23", 2_000_000, "rs2")]).unwrap();
/// let mapped = vec![MappedRecord {
///     id: "rs1".to_string(),
///     chromosome: Some("chr1".to_string()),
///     position: OneBasedPos::try_new(1_100_100).unwrap(),
///     row: None,
/// }];
///
/// let lifted = update_dataset(&original, &mapped, ChromStyle::Canonical).unwrap();
/// assert_eq!(lifted.len(), 1);
/// assert_eq!(lifted.markers()[0].chromosome, "1");
/// assert_eq!(lifted.markers()[0].position.value(), 1_100_100);
/// ```
pub fn update_dataset(
    original: &Dataset,
    mapped: &[MappedRecord],
    style: ChromStyle,
) -> Result<Dataset, LiftError> {
    let rows_by_id = if mapped.iter().any(|r| r.row.is_none()) {
        Some(rows_by_identifier(original)?)
    } else {
        None
    };

    let mut slots: Vec<Option<&MappedRecord>> = vec![None; original.len()];
    for record in mapped {
        let row = match record.row {
            Some(row) => match original.markers().get(row) {
                Some(marker) if marker.id == record.id => Some(row),
                _ => None,
            },
            None => rows_by_id
                .as_ref()
                .and_then(|rows| rows.get(record.id.as_str()).copied()),
        };
        let Some(row) = row else {
            return Err(LiftError::join(format!(
                "mapped identifier '{}' is not in {}",
                record.id,
                original.source_name()
            )));
        };
        if slots[row].replace(record).is_some() {
            return Err(LiftError::join(format!(
                "identifier '{}' appears more than once in the mapped records",
                record.id
            )));
        }
    }

    let mut markers = Vec::with_capacity(mapped.len());
    for (marker, record) in original.iter().zip(slots) {
        let Some(record) = record else {
            continue;
        };
        let chromosome = record.chromosome.as_deref().unwrap_or(&marker.chromosome);
        let label = normalize_label(chromosome, style).label;
        markers.push(marker.relocated(original.layout(), &label, record.position));
    }

    debug!(
        "Updated {} of {} marker(s) from {}",
        markers.len(),
        original.len(),
        original.source_name()
    );
    Ok(original.with_markers(markers))
}

fn rows_by_identifier(dataset: &Dataset) -> Result<HashMap<&str, usize>, LiftError> {
    let mut rows = HashMap::with_capacity(dataset.len());
    for (row, marker) in dataset.iter().enumerate() {
        if rows.insert(marker.id.as_str(), row).is_some() {
            return Err(LiftError::join(format!(
                "identifier '{}' appears more than once in {}; positions cannot be joined by identifier",
                marker.id,
                dataset.source_name()
            )));
        }
    }
    Ok(rows)
}
