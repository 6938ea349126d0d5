//! Parallel mapping support
//!
//! Chain rules and marker intervals partition cleanly by chromosome, so each
//! chromosome's intervals are mapped as one rayon task. Outcomes are written
//! back by original input index, giving the same sequence as
//! [`Liftover::map_intervals`]. Enable with the `parallel` feature.
//!
//! # Example
//!
//! ```
//! # #[cfg(feature = "parallel")]
//! # fn main() {
//! use ferro_liftover::liftover::{translate, AmbiguityPolicy, ChainFile, ChromStyle, Liftover, OverlapPolicy};
//! use ferro_liftover::marker::Dataset;
//! use ferro_liftover::parallel::map_by_chromosome;
//!
//! let rules = "chr1\t0\t1000\tchr1\t500\t1500\t+\n";
//! let chain = ChainFile::parse(rules.as_bytes(), "rules.tsv", OverlapPolicy::Ambiguous).unwrap();
//! let liftover = Liftover::new(chain, AmbiguityPolicy::Conservative);
//!
//! let dataset = Dataset::from_records([("1", 10, "rs1"), ("2", 10, "rs2")]).unwrap();
//! let translation = translate(&dataset, ChromStyle::Ucsc);
//!
//! let outcomes = map_by_chromosome(&liftover, &translation.intervals, 0).unwrap();
//! assert_eq!(outcomes, liftover.map_intervals(&translation.intervals));
//! # }
//! # #[cfg(not(feature = "parallel"))]
//! # fn main() {}
//! ```

use rayon::prelude::*;
use std::collections::HashMap;

use crate::error::LiftError;
use crate::liftover::{Liftover, MappingOutcome, MarkerInterval};

/// Map intervals with one rayon task per chromosome
///
/// `threads == 0` runs on the global pool; any other value builds a
/// dedicated pool of that size for this call. Order is preserved.
pub fn map_by_chromosome(
    liftover: &Liftover,
    intervals: &[MarkerInterval],
    threads: usize,
) -> Result<Vec<MappingOutcome>, LiftError> {
    if threads == 0 {
        return Ok(map_groups(liftover, intervals));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| LiftError::Config {
            msg: format!("Failed to build a {}-thread pool: {}", threads, e),
        })?;
    Ok(pool.install(|| map_groups(liftover, intervals)))
}

fn map_groups(liftover: &Liftover, intervals: &[MarkerInterval]) -> Vec<MappingOutcome> {
    // positions within `intervals`, grouped by chromosome
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (pos, iv) in intervals.iter().enumerate() {
        groups.entry(iv.chromosome.as_str()).or_default().push(pos);
    }

    let mapped: Vec<(usize, MappingOutcome)> = groups
        .into_par_iter()
        .flat_map_iter(|(chromosome, positions)| {
            positions.into_iter().map(move |pos| {
                (pos, liftover.map_interval(chromosome, &intervals[pos].interval))
            })
        })
        .collect();

    let mut slots: Vec<Option<MappingOutcome>> = vec![None; intervals.len()];
    for (pos, outcome) in mapped {
        slots[pos] = Some(outcome);
    }
    slots.into_iter().flatten().collect()
}

/// Map intervals with plain order-preserving `par_iter`
pub fn map_intervals_parallel(
    liftover: &Liftover,
    intervals: &[MarkerInterval],
) -> Vec<MappingOutcome> {
    intervals
        .par_iter()
        .map(|iv| liftover.map_interval(&iv.chromosome, &iv.interval))
        .collect()
}
