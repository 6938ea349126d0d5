// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-liftover: coordinate lifting for genotype marker tables
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! # Example
//!
//! ```
//! use ferro_liftover::liftover::{AmbiguityPolicy, ChainFile, Liftover, OverlapPolicy};
//! use ferro_liftover::marker::Dataset;
//! use ferro_liftover::LiftPipeline;
//!
//! // A marker table in build A
//! let dataset = Dataset::from_records([("1", 1_000_000, "rs1"), ("23", 2_000_000, "rs2")]).unwrap();
//!
//! // One chr1 rule, nothing for chrX
//! let rules = "chr1\t999900\t1000100\tchr1\t1100000\t1100200\t+\n";
//! let chain = ChainFile::parse(rules.as_bytes(), "rules.tsv", OverlapPolicy::Ambiguous).unwrap();
//! let liftover = Liftover::new(chain, AmbiguityPolicy::Conservative);
//!
//! let run = LiftPipeline::default().run(&dataset, &liftover).unwrap();
//! assert_eq!(run.partition.mapped[0].position.value(), 1_100_100);
//! assert_eq!(run.partition.unmapped[0].reason.to_string(), "no overlap");
//! ```

pub mod config;
pub mod coords;
pub mod error;
pub mod io;
pub mod liftover;
pub mod marker;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod partition;
pub mod pipeline;
pub mod update;

// Re-export commonly used types
pub use config::LiftConfig;
pub use error::{ErrorCode, LiftError};
pub use liftover::{ChainFile, ChromStyle, Liftover, MappingOutcome, UnmappedReason};
pub use marker::{Dataset, Marker};
pub use partition::{partition, MappedRecord, Partition, UnmappedRecord};
pub use pipeline::{LiftPipeline, LiftRun, LiftSummary};
pub use update::update_dataset;

// Re-export coordinate types for type-safe position handling
pub use coords::{OneBasedPos, ZeroBasedInterval, ZeroBasedPos};

/// Result type alias for ferro-liftover operations
pub type Result<T> = std::result::Result<T, LiftError>;
