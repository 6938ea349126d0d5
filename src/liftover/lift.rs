//! Interval mapping through a loaded chain.
//!
//! # Coordinate System
//!
//! | Context | Basis | Notes |
//! |---------|-------|-------|
//! | Queries and results | 0-based half-open | [`ZeroBasedInterval`] |
//! | [`Liftover::lift_position`] | 1-based | Converted to `[p - 1, p)` |
//!
//! # Decision policy
//!
//! For a query `[qs, qe)`:
//!
//! | Overlapping rules | Containing rules | Outcome |
//! |-------------------|------------------|---------|
//! | 0 | 0 | `DeletedRegion` inside a chain, `NoOverlap` otherwise |
//! | 1+ | 0 | `SplitMapping` |
//! | 1 | 1 | `Mapped` |
//! | 2+ | 1+ | `Ambiguous` (or resolved under [`AmbiguityPolicy::HighestScore`]) |

use super::chain::{ChainFile, ChainRule, Strand};
use super::translate::{MarkerInterval, Translation};
use crate::coords::{OneBasedPos, ZeroBasedInterval};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Why a marker could not be lifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnmappedReason {
    #[serde(rename = "no overlap")]
    NoOverlap,
    #[serde(rename = "split mapping")]
    SplitMapping,
    #[serde(rename = "deleted region")]
    DeletedRegion,
    #[serde(rename = "ambiguous")]
    Ambiguous,
}

impl UnmappedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnmappedReason::NoOverlap => "no overlap",
            UnmappedReason::SplitMapping => "split mapping",
            UnmappedReason::DeletedRegion => "deleted region",
            UnmappedReason::Ambiguous => "ambiguous",
        }
    }
}

impl fmt::Display for UnmappedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnmappedReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no overlap" => Ok(UnmappedReason::NoOverlap),
            "split mapping" => Ok(UnmappedReason::SplitMapping),
            "deleted region" => Ok(UnmappedReason::DeletedRegion),
            "ambiguous" => Ok(UnmappedReason::Ambiguous),
            other => Err(format!("unknown unmapped reason '{}'", other)),
        }
    }
}

/// One possible placement of an ambiguous query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub chromosome: String,
    pub interval: ZeroBasedInterval,
    pub strand: Strand,
    pub chain_id: u64,
    pub score: u64,
}

/// Result of mapping one interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOutcome {
    Mapped {
        /// Target chromosome, as named in the chain.
        chromosome: String,
        interval: ZeroBasedInterval,
        strand: Strand,
        chain_id: u64,
    },
    Unmapped {
        reason: UnmappedReason,
    },
    /// Several rules contain the query.
    Ambiguous {
        candidates: Vec<Candidate>,
    },
}

impl MappingOutcome {
    pub fn is_mapped(&self) -> bool {
        matches!(self, MappingOutcome::Mapped { .. })
    }

    /// Reason the outcome lands in the unmapped stream, if it does.
    pub fn unmapped_reason(&self) -> Option<UnmappedReason> {
        match self {
            MappingOutcome::Mapped { .. } => None,
            MappingOutcome::Unmapped { reason } => Some(*reason),
            MappingOutcome::Ambiguous { .. } => Some(UnmappedReason::Ambiguous),
        }
    }

    fn from_rule(rule: &ChainRule, interval: ZeroBasedInterval) -> Self {
        MappingOutcome::Mapped {
            chromosome: rule.target_chrom.clone(),
            interval,
            strand: rule.strand,
            chain_id: rule.chain_id,
        }
    }
}

/// How to treat queries contained by more than one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbiguityPolicy {
    /// Report every multiply-mapped query as ambiguous.
    #[default]
    Conservative,
    /// Use the candidate with the strictly highest chain score; ties stay ambiguous.
    HighestScore,
}

impl FromStr for AmbiguityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conservative" => Ok(AmbiguityPolicy::Conservative),
            "highest-score" | "highest_score" => Ok(AmbiguityPolicy::HighestScore),
            other => Err(format!(
                "unknown ambiguity policy '{}' (expected conservative or highest-score)",
                other
            )),
        }
    }
}

/// Per-outcome tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub mapped: usize,
    pub no_overlap: usize,
    pub split_mapping: usize,
    pub deleted_region: usize,
    pub ambiguous: usize,
}

impl OutcomeCounts {
    pub fn tally(outcomes: &[MappingOutcome]) -> Self {
        let mut counts = Self::default();
        for outcome in outcomes {
            match outcome.unmapped_reason() {
                None => counts.mapped += 1,
                Some(UnmappedReason::NoOverlap) => counts.no_overlap += 1,
                Some(UnmappedReason::SplitMapping) => counts.split_mapping += 1,
                Some(UnmappedReason::DeletedRegion) => counts.deleted_region += 1,
                Some(UnmappedReason::Ambiguous) => counts.ambiguous += 1,
            }
        }
        counts
    }

    pub fn unmapped(&self) -> usize {
        self.no_overlap + self.split_mapping + self.deleted_region + self.ambiguous
    }
}

/// Liftover engine over one chain.
#[derive(Debug, Clone)]
pub struct Liftover {
    chain: ChainFile,
    ambiguity: AmbiguityPolicy,
}

impl Liftover {
    pub fn new(chain: ChainFile, ambiguity: AmbiguityPolicy) -> Self {
        Self { chain, ambiguity }
    }

    pub fn chain(&self) -> &ChainFile {
        &self.chain
    }

    pub fn ambiguity_policy(&self) -> AmbiguityPolicy {
        self.ambiguity
    }

    /// Map one interval on `chromosome` (named as in the chain).
    pub fn map_interval(&self, chromosome: &str, interval: &ZeroBasedInterval) -> MappingOutcome {
        let (qs, qe) = (interval.start.value(), interval.end.value());
        let rules = self.chain.find_rules(chromosome, qs, qe);

        if rules.is_empty() {
            let reason = if self.chain.is_in_gap(chromosome, qs, qe) {
                UnmappedReason::DeletedRegion
            } else {
                UnmappedReason::NoOverlap
            };
            return MappingOutcome::Unmapped { reason };
        }

        let containing: Vec<(&ChainRule, ZeroBasedInterval)> = rules
            .iter()
            .filter_map(|rule| rule.lift(qs, qe).map(|lifted| (*rule, lifted)))
            .collect();

        match (rules.len(), containing.as_slice()) {
            (_, []) => MappingOutcome::Unmapped {
                reason: UnmappedReason::SplitMapping,
            },
            (1, [(rule, lifted)]) => MappingOutcome::from_rule(rule, *lifted),
            _ => self.resolve_ambiguous(&containing),
        }
    }

    fn resolve_ambiguous(&self, containing: &[(&ChainRule, ZeroBasedInterval)]) -> MappingOutcome {
        if self.ambiguity == AmbiguityPolicy::HighestScore {
            let best = containing.iter().map(|(rule, _)| rule.score).max();
            let mut top = containing
                .iter()
                .filter(|(rule, _)| Some(rule.score) == best);
            if let (Some((rule, lifted)), None) = (top.next(), top.next()) {
                return MappingOutcome::from_rule(rule, *lifted);
            }
        }

        MappingOutcome::Ambiguous {
            candidates: containing
                .iter()
                .map(|(rule, lifted)| Candidate {
                    chromosome: rule.target_chrom.clone(),
                    interval: *lifted,
                    strand: rule.strand,
                    chain_id: rule.chain_id,
                    score: rule.score,
                })
                .collect(),
        }
    }

    /// Map a single 1-based position.
    pub fn lift_position(&self, chromosome: &str, pos: OneBasedPos) -> MappingOutcome {
        self.map_interval(chromosome, &ZeroBasedInterval::point(pos.to_zero_based()))
    }

    /// Map intervals sequentially; outcomes follow input order.
    pub fn map_intervals(&self, intervals: &[MarkerInterval]) -> Vec<MappingOutcome> {
        intervals
            .iter()
            .map(|iv| self.map_interval(&iv.chromosome, &iv.interval))
            .collect()
    }

    /// Map every interval of a translation.
    pub fn map_all(&self, translation: &Translation) -> Vec<MappingOutcome> {
        let outcomes = self.map_intervals(&translation.intervals);
        let counts = OutcomeCounts::tally(&outcomes);
        debug!(
            "Mapped {} of {} interval(s) ({} no overlap, {} split, {} deleted, {} ambiguous)",
            counts.mapped,
            outcomes.len(),
            counts.no_overlap,
            counts.split_mapping,
            counts.deleted_region,
            counts.ambiguous
        );
        outcomes
    }
}
