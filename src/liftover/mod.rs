//! Coordinate lifting between genome builds.
//!
//! Markers go through three stages:
//!
//! 1. [`translate`]: 1-based marker positions become 0-based half-open
//!    intervals on chromosome labels in the chain's naming style.
//! 2. [`ChainFile`]: UCSC chain files or flat rule tables, validated and
//!    indexed per source chromosome.
//! 3. [`Liftover`]: each interval is classified as mapped, unmapped (with a
//!    reason) or ambiguous.
//!
//! # Example
//!
//! ```
//! use ferro_liftover::coords::OneBasedPos;
//! use ferro_liftover::liftover::{AmbiguityPolicy, ChainFile, Liftover, OverlapPolicy};
//!
//! let rules = "chr1\t999900\t1000100\tchr1\t1100000\t1100200\t+\n";
//! let chain = ChainFile::parse(rules.as_bytes(), "rules.tsv", OverlapPolicy::Ambiguous).unwrap();
//! let liftover = Liftover::new(chain, AmbiguityPolicy::Conservative);
//!
//! let outcome = liftover.lift_position("chr1", OneBasedPos::try_new(1_000_000).unwrap());
//! assert!(outcome.is_mapped());
//! ```
//!
//! # Chain File Format
//!
//! UCSC chain files for human builds can be downloaded from:
//! - <https://hgdownload.cse.ucsc.edu/goldenpath/hg18/liftOver/hg18ToHg19.over.chain.gz>
//! - <https://hgdownload.cse.ucsc.edu/goldenpath/hg19/liftOver/hg19ToHg38.over.chain.gz>

pub mod aliases;
pub mod chain;
pub mod index;
pub mod lift;
pub mod translate;

pub use aliases::{normalize_label, ChromStyle, Chromosome, NormalizedLabel};
pub use chain::{ChainFile, ChainFormat, ChainRule, ChainSpan, OverlapPolicy, Strand};
pub use index::{IntervalIndex, Span};
pub use lift::{
    AmbiguityPolicy, Candidate, Liftover, MappingOutcome, OutcomeCounts, UnmappedReason,
};
pub use translate::{translate, write_intervals, MarkerInterval, Translation, UnrecognizedChromosome};
