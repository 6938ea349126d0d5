//! Marker positions to chain-ready intervals.
//!
//! Each 1-based marker position `p` becomes the half-open interval
//! `[p - 1, p)` on the chromosome label the chain uses.

use super::aliases::{normalize_label, ChromStyle};
use crate::coords::ZeroBasedInterval;
use crate::marker::Dataset;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use tracing::warn;

/// One marker, ready for chain lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerInterval {
    /// Index of the marker in its dataset.
    pub index: usize,
    /// Chromosome label in the chain's naming style.
    pub chromosome: String,
    pub interval: ZeroBasedInterval,
}

/// A chromosome label outside the recognized set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnrecognizedChromosome {
    pub label: String,
    /// Number of markers carrying the label.
    pub count: usize,
    /// Identifier of the first such marker.
    pub first_marker: String,
}

/// Output of [`translate`].
#[derive(Debug, Clone, Default)]
pub struct Translation {
    /// One interval per marker, in dataset order.
    pub intervals: Vec<MarkerInterval>,
    /// Labels that passed through unnormalized, sorted by label.
    pub warnings: Vec<UnrecognizedChromosome>,
}

/// Translate every marker of `dataset` for a chain named in `chain_style`.
pub fn translate(dataset: &Dataset, chain_style: ChromStyle) -> Translation {
    let mut intervals = Vec::with_capacity(dataset.len());
    let mut unrecognized: BTreeMap<String, UnrecognizedChromosome> = BTreeMap::new();

    for (index, marker) in dataset.iter().enumerate() {
        let normalized = normalize_label(&marker.chromosome, chain_style);
        if !normalized.recognized {
            unrecognized
                .entry(marker.chromosome.clone())
                .and_modify(|w| w.count += 1)
                .or_insert_with(|| UnrecognizedChromosome {
                    label: marker.chromosome.clone(),
                    count: 1,
                    first_marker: marker.id.clone(),
                });
        }

        intervals.push(MarkerInterval {
            index,
            chromosome: normalized.label,
            interval: ZeroBasedInterval::point(marker.position.to_zero_based()),
        });
    }

    for w in unrecognized.values() {
        warn!(
            "Unrecognized chromosome '{}' on {} marker(s) (first: {}); passing through unchanged",
            w.label, w.count, w.first_marker
        );
    }

    Translation {
        intervals,
        warnings: unrecognized.into_values().collect(),
    }
}

/// Write intervals as BED-like rows: `chrom start end identifier`.
pub fn write_intervals<W: Write>(
    writer: &mut W,
    dataset: &Dataset,
    translation: &Translation,
) -> io::Result<()> {
    for iv in &translation.intervals {
        let marker = &dataset.markers()[iv.index];
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            iv.chromosome, iv.interval.start, iv.interval.end, marker.id
        )?;
    }
    Ok(())
}
