//! Split mapping outcomes into mapped and unmapped streams.
//!
//! Both streams keep dataset order and together cover every marker exactly
//! once.

use crate::coords::OneBasedPos;
use crate::error::{ErrorCode, LiftError};
use crate::io::{create_output, open_input, read_lines};
use crate::liftover::{MappingOutcome, UnmappedReason};
use crate::marker::Dataset;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// A marker at its new position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedRecord {
    pub id: String,
    /// Target chromosome as named by the chain; None keeps the marker's own.
    pub chromosome: Option<String>,
    pub position: OneBasedPos,
    /// Row of the marker in its dataset; None for records read from a file.
    #[serde(skip)]
    pub row: Option<usize>,
}

/// A marker that could not be lifted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmappedRecord {
    pub id: String,
    pub reason: UnmappedReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub mapped: Vec<MappedRecord>,
    pub unmapped: Vec<UnmappedRecord>,
}

/// Pair each marker with its outcome.
///
/// `outcomes` must hold exactly one entry per marker, in dataset order.
pub fn partition(dataset: &Dataset, outcomes: &[MappingOutcome]) -> Result<Partition, LiftError> {
    if outcomes.len() != dataset.len() {
        return Err(LiftError::join(format!(
            "{} mapping outcome(s) for {} marker(s) in {}",
            outcomes.len(),
            dataset.len(),
            dataset.source_name()
        )));
    }

    let mut result = Partition::default();
    for (row, (marker, outcome)) in dataset.iter().zip(outcomes).enumerate() {
        match outcome {
            MappingOutcome::Mapped {
                chromosome,
                interval,
                ..
            } => result.mapped.push(MappedRecord {
                id: marker.id.clone(),
                chromosome: Some(chromosome.clone()),
                position: interval.first_one_based(),
                row: Some(row),
            }),
            MappingOutcome::Unmapped { reason } => result.unmapped.push(UnmappedRecord {
                id: marker.id.clone(),
                reason: *reason,
            }),
            MappingOutcome::Ambiguous { .. } => result.unmapped.push(UnmappedRecord {
                id: marker.id.clone(),
                reason: UnmappedReason::Ambiguous,
            }),
        }
    }

    debug!(
        "Partitioned {} marker(s): {} mapped, {} unmapped",
        dataset.len(),
        result.mapped.len(),
        result.unmapped.len()
    );
    Ok(result)
}

/// Write `identifier<TAB>position` rows.
pub fn write_mapped<W: Write>(writer: &mut W, records: &[MappedRecord]) -> std::io::Result<()> {
    for record in records {
        writeln!(writer, "{}\t{}", record.id, record.position)?;
    }
    Ok(())
}

/// Write `identifier<TAB>reason` rows.
pub fn write_unmapped<W: Write>(writer: &mut W, records: &[UnmappedRecord]) -> std::io::Result<()> {
    for record in records {
        writeln!(writer, "{}\t{}", record.id, record.reason)?;
    }
    Ok(())
}

/// Write both streams to their files.
pub fn write_partition_files<P: AsRef<Path>>(
    partition: &Partition,
    mapped_path: P,
    unmapped_path: P,
) -> Result<(), LiftError> {
    let mapped_path = mapped_path.as_ref();
    let mut out = create_output(mapped_path)?;
    write_mapped(&mut out, &partition.mapped)
        .and_then(|_| out.flush())
        .map_err(|e| LiftError::io(mapped_path.display(), e))?;

    let unmapped_path = unmapped_path.as_ref();
    let mut out = create_output(unmapped_path)?;
    write_unmapped(&mut out, &partition.unmapped)
        .and_then(|_| out.flush())
        .map_err(|e| LiftError::io(unmapped_path.display(), e))
}

/// Read a mapped-position file: `identifier position [chromosome]`.
///
/// Tabs or spaces separate fields. Identifiers are not checked for
/// duplicates here; the updater rejects them.
pub fn read_mapped<R: Read>(reader: R, source_name: &str) -> Result<Vec<MappedRecord>, LiftError> {
    let mut records = Vec::new();
    for entry in read_lines(reader, source_name) {
        let (line_num, line) = entry?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if !(2..=3).contains(&fields.len()) {
            return Err(LiftError::format(
                source_name,
                line_num,
                ErrorCode::InvalidRowShape,
                format!("expected 2 or 3 columns, got {}", fields.len()),
            ));
        }

        let position = fields[1]
            .parse::<u64>()
            .ok()
            .and_then(OneBasedPos::try_new)
            .ok_or_else(|| {
                LiftError::format(
                    source_name,
                    line_num,
                    ErrorCode::InvalidPosition,
                    format!("position '{}' is not a positive integer", fields[1]),
                )
            })?;

        records.push(MappedRecord {
            id: fields[0].to_string(),
            chromosome: fields.get(2).map(|c| c.to_string()),
            position,
            row: None,
        });
    }
    Ok(records)
}

/// Read a mapped-position file from a path (supports `.gz`).
pub fn read_mapped_path<P: AsRef<Path>>(path: P) -> Result<Vec<MappedRecord>, LiftError> {
    let path = path.as_ref();
    read_mapped(open_input(path)?, &path.display().to_string())
}

/// True when every marker of `dataset` appears in exactly one stream.
///
/// Repeated identifiers must appear as many times as the dataset holds them.
pub fn covers_dataset(dataset: &Dataset, partition: &Partition) -> bool {
    let mut remaining: HashMap<&str, usize> = HashMap::with_capacity(dataset.len());
    for id in dataset.identifiers() {
        *remaining.entry(id).or_default() += 1;
    }
    let streams = partition
        .mapped
        .iter()
        .map(|r| r.id.as_str())
        .chain(partition.unmapped.iter().map(|r| r.id.as_str()));
    for id in streams {
        match remaining.get_mut(id) {
            Some(count) if *count > 0 => *count -= 1,
            _ => return false,
        }
    }
    remaining.values().all(|&count| count == 0)
}
