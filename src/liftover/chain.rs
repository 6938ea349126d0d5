//! Chain file parser.
//!
//! Two layouts are accepted, detected from the first non-comment line:
//!
//! - UCSC chain files (`chain score tName tSize tStrand tStart tEnd qName
//!   qSize qStrand qStart qEnd id` headers followed by `size dt dq` block
//!   lines). UCSC calls the genome we lift *from* the "target" and the genome
//!   we lift *to* the "query"; here they are `source` and `target`.
//! - Flat rule tables: one ungapped block per row,
//!   `source_chrom source_start source_end target_chrom target_start target_end strand`,
//!   0-based half-open.
//!
//! Both are expanded into [`ChainRule`]s (one per ungapped block) and indexed
//! per source chromosome. Everything is validated at load time; a malformed
//! file fails with [`LiftError::ChainFormat`] naming the offending line.

use super::index::{IntervalIndex, Span};
use crate::coords::ZeroBasedInterval;
use crate::error::LiftError;
use crate::io::{open_input, read_lines};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Orientation of a rule's target relative to its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    #[default]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Strand::Plus),
            "-" => Some(Strand::Minus),
            _ => None,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
        }
    }
}

/// What to do when two rules on one source chromosome overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Accept the chain; queries hitting several rules are classified as ambiguous.
    #[default]
    Ambiguous,
    /// Reject the chain at load time.
    Reject,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ambiguous" => Ok(OverlapPolicy::Ambiguous),
            "reject" => Ok(OverlapPolicy::Reject),
            other => Err(format!(
                "unknown overlap policy '{}' (expected ambiguous or reject)",
                other
            )),
        }
    }
}

/// Layout the chain was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFormat {
    Ucsc,
    RuleTable,
}

/// One ungapped block: `source` maps base-for-base onto `target`.
///
/// `target` is always in forward-strand coordinates of the target genome,
/// even for minus-strand rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRule {
    pub source_chrom: String,
    pub source: ZeroBasedInterval,
    pub target_chrom: String,
    pub target: ZeroBasedInterval,
    pub strand: Strand,
    /// Chain id (UCSC) or rule number (rule tables).
    pub chain_id: u64,
    /// Alignment score; 0 for rule tables.
    pub score: u64,
    /// Line the block was read from.
    pub line: usize,
}

impl ChainRule {
    /// Lift `[start, end)`, which must lie inside `self.source`.
    ///
    /// Returns None when the query is not fully contained.
    pub fn lift(&self, start: u64, end: u64) -> Option<ZeroBasedInterval> {
        if start >= end || !self.source.contains(start, end) {
            return None;
        }

        let from_start = start - self.source.start.value();
        let from_end = end - self.source.start.value();
        match self.strand {
            Strand::Plus => ZeroBasedInterval::try_new(
                self.target.start.value() + from_start,
                self.target.start.value() + from_end,
            ),
            Strand::Minus => ZeroBasedInterval::try_new(
                self.target.end.value() - from_end,
                self.target.end.value() - from_start,
            ),
        }
    }
}

impl Span for ChainRule {
    fn span_start(&self) -> u64 {
        self.source.start.value()
    }
    fn span_end(&self) -> u64 {
        self.source.end.value()
    }
}

/// Source extent of a whole UCSC chain, gaps included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSpan {
    pub source: ZeroBasedInterval,
    pub chain_id: u64,
    pub line: usize,
}

impl Span for ChainSpan {
    fn span_start(&self) -> u64 {
        self.source.start.value()
    }
    fn span_end(&self) -> u64 {
        self.source.end.value()
    }
}

#[derive(Debug, Clone, Default)]
struct ContigRules {
    rules: IntervalIndex<ChainRule>,
    spans: IntervalIndex<ChainSpan>,
}

/// A loaded chain, indexed by source chromosome. Immutable after loading.
#[derive(Debug, Clone, Default)]
pub struct ChainFile {
    contigs: HashMap<String, ContigRules>,
    format: Option<ChainFormat>,
    chain_count: usize,
}

/// Header fields of the UCSC chain currently being read.
struct OpenChain {
    id: u64,
    score: u64,
    source_chrom: String,
    source_end: u64,
    target_chrom: String,
    target_size: u64,
    target_strand: Strand,
    target_end: u64,
    header_line: usize,
    span: Option<ZeroBasedInterval>,
    // cursors advance block by block
    source_pos: u64,
    target_pos: u64,
    blocks: usize,
    closed: bool,
}

/// Accumulates rules before indexing.
struct ChainBuilder<'a> {
    source_name: &'a str,
    rules: HashMap<String, Vec<ChainRule>>,
    spans: HashMap<String, Vec<ChainSpan>>,
    chain_count: usize,
    // last start per chromosome, for the rule-table sort check
    last_start: HashMap<String, u64>,
}

impl ChainFile {
    /// Create a new empty chain file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a chain from a path (supports `.gz`).
    pub fn from_file<P: AsRef<Path>>(path: P, policy: OverlapPolicy) -> Result<Self, LiftError> {
        let path = path.as_ref();
        let reader = open_input(path)?;
        let chain = Self::parse(reader, &path.display().to_string(), policy)?;
        info!(
            "Loaded {} chain(s), {} rule(s) on {} source contig(s) from {}",
            chain.chain_count(),
            chain.rule_count(),
            chain.contigs.len(),
            path.display()
        );
        Ok(chain)
    }

    /// Parse a chain from a reader. `source_name` is used in error messages.
    pub fn parse<R: Read>(
        reader: R,
        source_name: &str,
        policy: OverlapPolicy,
    ) -> Result<Self, LiftError> {
        let mut builder = ChainBuilder::new(source_name);
        let mut format: Option<ChainFormat> = None;
        let mut open: Option<OpenChain> = None;

        for entry in read_lines(reader, source_name) {
            let (line_num, line) = entry.map_err(|e| match e {
                LiftError::Format { line, msg, .. } => LiftError::chain(source_name, line, msg),
                other => other,
            })?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let is_header = line.starts_with("chain");
            let detected = *format.get_or_insert(if is_header {
                ChainFormat::Ucsc
            } else {
                ChainFormat::RuleTable
            });

            match detected {
                ChainFormat::Ucsc if is_header => {
                    if let Some(chain) = open.take() {
                        builder.close_chain(chain)?;
                    }
                    open = Some(builder.parse_header(line, line_num)?);
                }
                ChainFormat::Ucsc => match open.as_mut() {
                    Some(chain) => builder.parse_block(chain, line, line_num)?,
                    None => {
                        return Err(LiftError::chain(
                            source_name,
                            line_num,
                            "alignment block before any chain header",
                        ))
                    }
                },
                ChainFormat::RuleTable if is_header => {
                    return Err(LiftError::chain(
                        source_name,
                        line_num,
                        "chain header in a rule table",
                    ))
                }
                ChainFormat::RuleTable => builder.parse_rule(line, line_num)?,
            }
        }

        if let Some(chain) = open.take() {
            builder.close_chain(chain)?;
        }

        let mut chain = builder.finish();
        chain.format = format;

        if policy == OverlapPolicy::Reject {
            chain.reject_overlaps(source_name)?;
        }

        debug!(
            "Parsed {} rule(s) from {} ({:?})",
            chain.rule_count(),
            source_name,
            chain.format
        );
        Ok(chain)
    }

    fn reject_overlaps(&self, source_name: &str) -> Result<(), LiftError> {
        let mut names: Vec<&String> = self.contigs.keys().collect();
        names.sort();
        for name in names {
            if let Some((earlier, later)) = self.contigs[name].rules.first_overlap() {
                return Err(LiftError::chain(
                    source_name,
                    later.line,
                    format!(
                        "source interval {}:{} overlaps {}:{} from line {}",
                        later.source_chrom,
                        later.source,
                        earlier.source_chrom,
                        earlier.source,
                        earlier.line
                    ),
                ));
            }
        }
        Ok(())
    }

    /// All rules on `contig` overlapping `[start, end)`, ordered by source start.
    pub fn find_rules(&self, contig: &str, start: u64, end: u64) -> Vec<&ChainRule> {
        self.contigs
            .get(contig)
            .map(|c| c.rules.overlapping(start, end))
            .unwrap_or_default()
    }

    /// True when `[start, end)` lies within a chain's extent but hits none of its blocks.
    pub fn is_in_gap(&self, contig: &str, start: u64, end: u64) -> bool {
        self.contigs.get(contig).is_some_and(|c| {
            c.spans.any_overlapping(start, end) && !c.rules.any_overlapping(start, end)
        })
    }

    /// Get all rules for a contig.
    pub fn rules_for_contig(&self, contig: &str) -> Option<&IntervalIndex<ChainRule>> {
        self.contigs.get(contig).map(|c| &c.rules)
    }

    /// Get all source contig names.
    pub fn contig_names(&self) -> impl Iterator<Item = &str> {
        self.contigs.keys().map(|s| s.as_str())
    }

    /// Total number of ungapped blocks.
    pub fn rule_count(&self) -> usize {
        self.contigs.values().map(|c| c.rules.len()).sum()
    }

    /// Number of UCSC chains, or of rows for a rule table.
    pub fn chain_count(&self) -> usize {
        self.chain_count
    }

    /// Layout the chain was read from; None for an empty file.
    pub fn format(&self) -> Option<ChainFormat> {
        self.format
    }
}

impl<'a> ChainBuilder<'a> {
    fn new(source_name: &'a str) -> Self {
        Self {
            source_name,
            rules: HashMap::new(),
            spans: HashMap::new(),
            chain_count: 0,
            last_start: HashMap::new(),
        }
    }

    fn err(&self, line: usize, msg: impl Into<String>) -> LiftError {
        LiftError::chain(self.source_name, line, msg)
    }

    fn number(&self, field: &str, what: &str, line: usize) -> Result<u64, LiftError> {
        field
            .parse::<u64>()
            .map_err(|_| self.err(line, format!("invalid {} '{}'", what, field)))
    }

    fn strand(&self, field: &str, what: &str, line: usize) -> Result<Strand, LiftError> {
        Strand::parse(field).ok_or_else(|| self.err(line, format!("invalid {} '{}'", what, field)))
    }

    /// Parse a chain header line.
    fn parse_header(&mut self, line: &str, line_num: usize) -> Result<OpenChain, LiftError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts[0] != "chain" || !(12..=13).contains(&parts.len()) {
            return Err(self.err(
                line_num,
                format!("expected 12 or 13 header fields, got {}", parts.len()),
            ));
        }

        let score = self.number(parts[1], "score", line_num)?;
        let source_size = self.number(parts[3], "source size", line_num)?;
        let source_strand = self.strand(parts[4], "source strand", line_num)?;
        let source_start = self.number(parts[5], "source start", line_num)?;
        let source_end = self.number(parts[6], "source end", line_num)?;
        let target_size = self.number(parts[8], "target size", line_num)?;
        let target_strand = self.strand(parts[9], "target strand", line_num)?;
        let target_start = self.number(parts[10], "target start", line_num)?;
        let target_end = self.number(parts[11], "target end", line_num)?;
        let id = match parts.get(12) {
            Some(field) => self.number(field, "chain id", line_num)?,
            None => self.chain_count as u64 + 1,
        };

        if source_strand != Strand::Plus {
            return Err(self.err(line_num, "source strand must be '+'"));
        }
        if source_start > source_end || source_end > source_size {
            return Err(self.err(
                line_num,
                format!(
                    "source range {}-{} is invalid for size {}",
                    source_start, source_end, source_size
                ),
            ));
        }
        if target_start > target_end || target_end > target_size {
            return Err(self.err(
                line_num,
                format!(
                    "target range {}-{} is invalid for size {}",
                    target_start, target_end, target_size
                ),
            ));
        }

        self.chain_count += 1;
        Ok(OpenChain {
            id,
            score,
            source_chrom: parts[2].to_string(),
            source_end,
            target_chrom: parts[7].to_string(),
            target_size,
            target_strand,
            target_end,
            header_line: line_num,
            span: ZeroBasedInterval::try_new(source_start, source_end),
            source_pos: source_start,
            target_pos: target_start,
            blocks: 0,
            closed: false,
        })
    }

    /// Parse a `size [dt dq]` line of the open chain.
    fn parse_block(
        &mut self,
        chain: &mut OpenChain,
        line: &str,
        line_num: usize,
    ) -> Result<(), LiftError> {
        if chain.closed {
            return Err(self.err(line_num, "alignment block after the final block of a chain"));
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let (size, gaps) = match parts.as_slice() {
            [size] => (self.number(size, "block size", line_num)?, None),
            [size, dt, dq] => (
                self.number(size, "block size", line_num)?,
                Some((
                    self.number(dt, "source gap", line_num)?,
                    self.number(dq, "target gap", line_num)?,
                )),
            ),
            _ => {
                return Err(self.err(
                    line_num,
                    format!("expected 1 or 3 block fields, got {}", parts.len()),
                ))
            }
        };

        if size == 0 {
            return Err(self.err(line_num, "zero-length alignment block"));
        }

        let past_end = || self.err(line_num, "alignment block extends past the chain header range");
        let source_block_end = chain
            .source_pos
            .checked_add(size)
            .filter(|&end| end <= chain.source_end)
            .ok_or_else(&past_end)?;
        let target_block_end = chain
            .target_pos
            .checked_add(size)
            .filter(|&end| end <= chain.target_end)
            .ok_or_else(&past_end)?;

        // Minus-strand target coordinates count from the end of the reverse complement
        let target = match chain.target_strand {
            Strand::Plus => ZeroBasedInterval::try_new(chain.target_pos, target_block_end),
            Strand::Minus => ZeroBasedInterval::try_new(
                chain.target_size - target_block_end,
                chain.target_size - chain.target_pos,
            ),
        };
        let source = ZeroBasedInterval::try_new(chain.source_pos, source_block_end);
        let (Some(source), Some(target)) = (source, target) else {
            return Err(self.err(line_num, "empty alignment block"));
        };

        self.rules
            .entry(chain.source_chrom.clone())
            .or_default()
            .push(ChainRule {
                source_chrom: chain.source_chrom.clone(),
                source,
                target_chrom: chain.target_chrom.clone(),
                target,
                strand: chain.target_strand,
                chain_id: chain.id,
                score: chain.score,
                line: line_num,
            });
        chain.blocks += 1;

        match gaps {
            Some((dt, dq)) => {
                // overshooting gaps surface as a header mismatch when the chain closes
                chain.source_pos = source_block_end.saturating_add(dt);
                chain.target_pos = target_block_end.saturating_add(dq);
            }
            None => {
                chain.source_pos = source_block_end;
                chain.target_pos = target_block_end;
                chain.closed = true;
            }
        }
        Ok(())
    }

    /// Check the finished chain against its header and record its span.
    fn close_chain(&mut self, chain: OpenChain) -> Result<(), LiftError> {
        if chain.blocks == 0 {
            return Err(self.err(chain.header_line, "chain has no alignment blocks"));
        }
        if !chain.closed {
            return Err(self.err(
                chain.header_line,
                "chain does not end with a single-field block line",
            ));
        }
        if chain.source_pos != chain.source_end || chain.target_pos != chain.target_end {
            return Err(self.err(
                chain.header_line,
                format!(
                    "block lengths do not match header: blocks end at {}/{}, header says {}/{}",
                    chain.source_pos, chain.target_pos, chain.source_end, chain.target_end
                ),
            ));
        }

        if let Some(source) = chain.span {
            self.spans
                .entry(chain.source_chrom)
                .or_default()
                .push(ChainSpan {
                    source,
                    chain_id: chain.id,
                    line: chain.header_line,
                });
        }
        Ok(())
    }

    /// Parse one row of a flat rule table.
    fn parse_rule(&mut self, line: &str, line_num: usize) -> Result<(), LiftError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 7 {
            return Err(self.err(
                line_num,
                format!("expected 7 rule fields, got {}", parts.len()),
            ));
        }

        let source_start = self.number(parts[1], "source start", line_num)?;
        let source_end = self.number(parts[2], "source end", line_num)?;
        let target_start = self.number(parts[4], "target start", line_num)?;
        let target_end = self.number(parts[5], "target end", line_num)?;
        let strand = self.strand(parts[6], "strand", line_num)?;

        let source = ZeroBasedInterval::try_new(source_start, source_end)
            .ok_or_else(|| self.err(line_num, "source start must be less than source end"))?;
        let target = ZeroBasedInterval::try_new(target_start, target_end)
            .ok_or_else(|| self.err(line_num, "target start must be less than target end"))?;
        if source.len() != target.len() {
            return Err(self.err(
                line_num,
                format!(
                    "source length {} differs from target length {}",
                    source.len(),
                    target.len()
                ),
            ));
        }

        let source_chrom = parts[0].to_string();
        if let Some(&previous) = self.last_start.get(&source_chrom) {
            if source_start < previous {
                return Err(self.err(
                    line_num,
                    format!(
                        "rules for {} are not sorted by source start ({} after {})",
                        source_chrom, source_start, previous
                    ),
                ));
            }
        }
        self.last_start.insert(source_chrom.clone(), source_start);

        self.chain_count += 1;
        self.rules
            .entry(source_chrom.clone())
            .or_default()
            .push(ChainRule {
                source_chrom,
                source,
                target_chrom: parts[3].to_string(),
                target,
                strand,
                chain_id: self.chain_count as u64,
                score: 0,
                line: line_num,
            });
        Ok(())
    }

    fn finish(self) -> ChainFile {
        let mut contigs: HashMap<String, ContigRules> = HashMap::new();
        for (name, rules) in self.rules {
            contigs.entry(name).or_default().rules = IntervalIndex::new(rules);
        }
        for (name, spans) in self.spans {
            contigs.entry(name).or_default().spans = IntervalIndex::new(spans);
        }
        ChainFile {
            contigs,
            format: None,
            chain_count: self.chain_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn simple_chain_data() -> &'static str {
        r#"chain 1000 chr1 1000 + 0 1000 chr1 1100 + 0 1010 1
100	10	20
200	5	5
685

"#
    }

    fn parse(data: &str) -> Result<ChainFile, LiftError> {
        ChainFile::parse(data.as_bytes(), "test.chain", OverlapPolicy::Ambiguous)
    }

    fn chain_error_line(data: &str) -> usize {
        let err = parse(data).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidChain, "{}", err);
        err.line().unwrap()
    }

    #[test]
    fn test_parse_chain_file() {
        let chain_file = parse(simple_chain_data()).unwrap();
        assert_eq!(chain_file.chain_count(), 1);
        assert_eq!(chain_file.rule_count(), 3);
        assert_eq!(chain_file.format(), Some(ChainFormat::Ucsc));

        let rules: Vec<_> = chain_file.rules_for_contig("chr1").unwrap().iter().collect();
        assert_eq!(rules[0].source, ZeroBasedInterval::try_new(0, 100).unwrap());
        assert_eq!(rules[0].target, ZeroBasedInterval::try_new(0, 100).unwrap());
        // Source: 0-99 (block1), 100-109 (gap), 110-309 (block2)
        // Target: 0-99 (block1), 100-119 (gap), 120-319 (block2)
        assert_eq!(rules[1].source, ZeroBasedInterval::try_new(110, 310).unwrap());
        assert_eq!(rules[1].target, ZeroBasedInterval::try_new(120, 320).unwrap());
        assert_eq!(rules[2].source, ZeroBasedInterval::try_new(315, 1000).unwrap());
        assert_eq!(rules[2].target, ZeroBasedInterval::try_new(325, 1010).unwrap());
        assert!(rules.iter().all(|r| r.chain_id == 1 && r.score == 1000));
        assert_eq!(rules[1].line, 3);
    }

    #[test]
    fn test_rule_lift_plus_strand() {
        let chain_file = parse(simple_chain_data()).unwrap();
        let rules = chain_file.find_rules("chr1", 110, 111);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].lift(110, 111).unwrap().start.value(), 120);
        assert_eq!(rules[0].lift(309, 310).unwrap().start.value(), 319);
        assert!(rules[0].lift(309, 311).is_none());
    }

    #[test]
    fn test_gap_detection() {
        let chain_file = parse(simple_chain_data()).unwrap();
        // 105 is in the source gap after the first block (100-109)
        assert!(chain_file.find_rules("chr1", 105, 106).is_empty());
        assert!(chain_file.is_in_gap("chr1", 105, 106));
        assert!(!chain_file.is_in_gap("chr1", 50, 51));
        // Outside the chain entirely is not a gap
        assert!(!chain_file.is_in_gap("chr1", 1500, 1501));
        assert!(!chain_file.is_in_gap("chr2", 50, 51));
    }

    #[test]
    fn test_minus_strand_blocks() {
        // Target size 1000, minus strand: target block [0,100) on the reverse
        // complement is forward [900,1000)
        let data = "chain 500 chr1 1000 + 0 100 chr5 1000 - 0 100 7\n100\n";
        let chain_file = parse(data).unwrap();
        let rule = chain_file.find_rules("chr1", 0, 1)[0];
        assert_eq!(rule.strand, Strand::Minus);
        assert_eq!(rule.target, ZeroBasedInterval::try_new(900, 1000).unwrap());
        assert_eq!(rule.target_chrom, "chr5");
        // First source base maps to last target base
        assert_eq!(rule.lift(0, 1).unwrap(), ZeroBasedInterval::try_new(999, 1000).unwrap());
        assert_eq!(rule.lift(99, 100).unwrap(), ZeroBasedInterval::try_new(900, 901).unwrap());
        assert_eq!(rule.lift(10, 20).unwrap(), ZeroBasedInterval::try_new(980, 990).unwrap());
    }

    #[test]
    fn test_multiple_chains_and_default_ids() {
        let data = "chain 1000 chr1 1000 + 0 500 chr1 1000 + 0 500\n500\n\nchain 2000 chr2 1000 + 0 800 chr2 1000 + 100 900\n800\n";
        let chain_file = parse(data).unwrap();
        assert_eq!(chain_file.chain_count(), 2);
        let r2 = chain_file.find_rules("chr2", 0, 1)[0];
        assert_eq!(r2.chain_id, 2);
        assert_eq!(r2.lift(0, 1).unwrap().start.value(), 100);
        let mut names: Vec<_> = chain_file.contig_names().collect();
        names.sort();
        assert_eq!(names, vec!["chr1", "chr2"]);
    }

    #[test]
    fn test_parse_rule_table() {
        let data = "# source\n1\t0\t100\tchr1\t1000\t1100\t+\n1\t200\t300\tchr1\t5000\t5100\t-\nX\t0\t10\tchrX\t0\t10\t+\n";
        let chain_file = parse(data).unwrap();
        assert_eq!(chain_file.format(), Some(ChainFormat::RuleTable));
        assert_eq!(chain_file.rule_count(), 3);
        let minus = chain_file.find_rules("1", 250, 251)[0];
        assert_eq!(minus.strand, Strand::Minus);
        assert_eq!(minus.chain_id, 2);
        assert_eq!(minus.lift(250, 251).unwrap().start.value(), 5049);
        // rule tables have no chain spans, so nothing is ever a gap
        assert!(!chain_file.is_in_gap("1", 150, 151));
    }

    #[test]
    fn test_empty_chain_file() {
        let chain_file = parse("# nothing here\n\n").unwrap();
        assert_eq!(chain_file.rule_count(), 0);
        assert_eq!(chain_file.format(), None);
        assert!(chain_file.find_rules("chr1", 0, 1).is_empty());
    }

    #[test]
    fn test_header_errors() {
        assert_eq!(chain_error_line("chain 1000 chr1 1000 + 0 1000\n100\n"), 1);
        assert_eq!(
            chain_error_line("chain abc chr1 1000 + 0 100 chr1 1000 + 0 100 1\n100\n"),
            1
        );
        // strand symbol
        assert_eq!(
            chain_error_line("chain 1 chr1 1000 + 0 100 chr1 1000 ? 0 100 1\n100\n"),
            1
        );
        // source strand must be +
        assert_eq!(
            chain_error_line("chain 1 chr1 1000 - 0 100 chr1 1000 + 0 100 1\n100\n"),
            1
        );
        // end past size
        assert_eq!(
            chain_error_line("chain 1 chr1 50 + 0 100 chr1 1000 + 0 100 1\n100\n"),
            1
        );
    }

    #[test]
    fn test_block_errors() {
        let header = "chain 1 chr1 1000 + 0 100 chr1 1000 + 0 100 1\n";
        // two-field block line
        assert_eq!(chain_error_line(&format!("{}50\t10\n40\n", header)), 2);
        // zero-length block
        assert_eq!(chain_error_line(&format!("{}0\n", header)), 2);
        // non-numeric gap
        assert_eq!(chain_error_line(&format!("{}50\tx\t0\n50\n", header)), 2);
        // block after the final one
        assert_eq!(chain_error_line(&format!("{}100\n5\n", header)), 3);
        // blocks run past header range
        assert_eq!(chain_error_line(&format!("{}150\n", header)), 2);
        // blocks stop short of the header range
        assert_eq!(chain_error_line(&format!("{}60\n", header)), 1);
        // header without blocks
        assert_eq!(chain_error_line(header), 1);
        // block before header
        assert_eq!(chain_error_line("100\t0\t0\nchain 1 chr1 1000 + 0 100 chr1 1000 + 0 100 1\n100\n"), 1);
    }

    #[test]
    fn test_rule_table_errors() {
        // wrong column count
        assert_eq!(chain_error_line("1\t0\t100\tchr1\t0\t100\n"), 1);
        // empty interval
        assert_eq!(chain_error_line("1\t100\t100\tchr1\t0\t0\t+\n"), 1);
        // length mismatch
        assert_eq!(chain_error_line("1\t0\t100\tchr1\t0\t99\t+\n"), 1);
        // unsorted blocks
        assert_eq!(
            chain_error_line("1\t500\t600\tchr1\t0\t100\t+\n2\t0\t10\tchr2\t0\t10\t+\n1\t0\t100\tchr1\t0\t100\t+\n"),
            3
        );
        // mixing formats
        assert_eq!(
            chain_error_line("1\t0\t100\tchr1\t0\t100\t+\nchain 1 chr1 1000 + 0 100 chr1 1000 + 0 100 1\n"),
            2
        );
    }

    #[test]
    fn test_overlap_policy() {
        let data = "1\t0\t100\tchr1\t0\t100\t+\n1\t50\t150\tchr1\t1000\t1100\t+\n";
        let chain_file = parse(data).unwrap();
        assert_eq!(chain_file.find_rules("1", 60, 61).len(), 2);

        let err = ChainFile::parse(data.as_bytes(), "rules.tsv", OverlapPolicy::Reject).unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("overlaps"));
    }

    #[test]
    fn test_invalid_utf8_is_chain_error() {
        let data = b"chr1\t0\t100\tchr1\t0\t100\t+\nchr\xff2\t0\t100\tchr2\t0\t100\t+\n";
        let err = ChainFile::parse(&data[..], "rules.tsv", OverlapPolicy::Ambiguous).unwrap_err();
        assert!(matches!(err, LiftError::ChainFormat { .. }));
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_overlap_policy_from_str() {
        assert_eq!("reject".parse::<OverlapPolicy>().unwrap(), OverlapPolicy::Reject);
        assert_eq!("Ambiguous".parse::<OverlapPolicy>().unwrap(), OverlapPolicy::Ambiguous);
        assert!("other".parse::<OverlapPolicy>().is_err());
    }

    #[test]
    fn test_from_file_gz() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hg18ToHg19.over.chain.gz");
        let mut encoder = GzEncoder::new(
            std::fs::File::create(&path).unwrap(),
            Compression::default(),
        );
        encoder.write_all(simple_chain_data().as_bytes()).unwrap();
        encoder.finish().unwrap();

        let chain_file = ChainFile::from_file(&path, OverlapPolicy::Ambiguous).unwrap();
        assert_eq!(chain_file.rule_count(), 3);
    }
}
