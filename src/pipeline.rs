//! End-to-end lift runs.
//!
//! A run is a chain of typed stages, each usable on its own:
//!
//! ```text
//! Dataset -> Translation -> Vec<MappingOutcome> -> Partition -> Dataset
//! ```
//!
//! [`LiftPipeline::run`] works in memory; [`LiftPipeline::run_files`] reads
//! the inputs and writes the four output files named by
//! [`OutputConfig::path_for`](crate::config::OutputConfig::path_for).

use crate::config::LiftConfig;
use crate::error::LiftError;
use crate::liftover::{
    translate, ChainFile, Liftover, MappingOutcome, OutcomeCounts, Translation,
    UnrecognizedChromosome,
};
use crate::marker::{write_dataset_path, Dataset, MarkerReader};
use crate::partition::{partition, write_partition_files, Partition};
use crate::update::update_dataset;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const MAPPED_SUFFIX: &str = "mapped.txt";
pub const UNMAPPED_SUFFIX: &str = "unmapped.txt";
pub const LIFTED_SUFFIX: &str = "lifted.txt";
pub const SUMMARY_SUFFIX: &str = "summary.json";

/// Output files of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPaths {
    pub mapped: PathBuf,
    pub unmapped: PathBuf,
    pub lifted: PathBuf,
    pub summary: PathBuf,
}

/// What happened in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiftSummary {
    /// Marker table the run read.
    pub source: String,
    /// Chain file, when the run loaded one.
    pub chain: Option<String>,
    pub total: usize,
    pub mapped: usize,
    pub unmapped: usize,
    pub outcomes: OutcomeCounts,
    pub unrecognized_chromosomes: Vec<UnrecognizedChromosome>,
    pub outputs: Option<OutputPaths>,
}

impl fmt::Display for LiftSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Source:          {}", self.source)?;
        if let Some(chain) = &self.chain {
            writeln!(f, "Chain:           {}", chain)?;
        }
        writeln!(f, "Markers:         {}", self.total)?;
        writeln!(f, "Mapped:          {}", self.mapped)?;
        writeln!(f, "Unmapped:        {}", self.unmapped)?;
        writeln!(f, "  no overlap:     {}", self.outcomes.no_overlap)?;
        writeln!(f, "  split mapping:  {}", self.outcomes.split_mapping)?;
        writeln!(f, "  deleted region: {}", self.outcomes.deleted_region)?;
        write!(f, "  ambiguous:      {}", self.outcomes.ambiguous)?;
        for w in &self.unrecognized_chromosomes {
            write!(
                f,
                "\nUnrecognized chromosome '{}' on {} marker(s)",
                w.label, w.count
            )?;
        }
        if let Some(outputs) = &self.outputs {
            write!(f, "\nMapped positions: {}", outputs.mapped.display())?;
            write!(f, "\nUnmapped markers: {}", outputs.unmapped.display())?;
            write!(f, "\nLifted table:     {}", outputs.lifted.display())?;
        }
        Ok(())
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct LiftRun {
    pub translation: Translation,
    pub outcomes: Vec<MappingOutcome>,
    pub partition: Partition,
    pub lifted: Dataset,
    pub summary: LiftSummary,
}

/// Runs lifts with one configuration.
#[derive(Debug, Clone, Default)]
pub struct LiftPipeline {
    config: LiftConfig,
}

impl LiftPipeline {
    pub fn new(config: LiftConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LiftConfig {
        &self.config
    }

    /// Read the marker table with the configured layout.
    pub fn read_dataset<P: AsRef<Path>>(&self, path: P) -> Result<Dataset, LiftError> {
        let dataset = MarkerReader::new(&self.config.table).read_path(path.as_ref())?;
        info!(
            "Read {} marker(s) from {}",
            dataset.len(),
            path.as_ref().display()
        );
        Ok(dataset)
    }

    /// Load a chain with the configured policies.
    pub fn load_liftover<P: AsRef<Path>>(&self, path: P) -> Result<Liftover, LiftError> {
        let chain = ChainFile::from_file(path, self.config.mapping.overlap_policy)?;
        Ok(Liftover::new(chain, self.config.mapping.ambiguity_policy))
    }

    /// Lift a dataset in memory.
    pub fn run(&self, dataset: &Dataset, liftover: &Liftover) -> Result<LiftRun, LiftError> {
        let translation = translate(dataset, self.config.chromosomes.chain_style);
        let outcomes = self.map(liftover, &translation)?;
        let partition = partition(dataset, &outcomes)?;
        let lifted = update_dataset(
            dataset,
            &partition.mapped,
            self.config.chromosomes.output_style,
        )?;

        let counts = OutcomeCounts::tally(&outcomes);
        if counts.unmapped() > 0 {
            warn!(
                "{} of {} marker(s) could not be lifted and were dropped",
                counts.unmapped(),
                dataset.len()
            );
        }

        let summary = LiftSummary {
            source: dataset.source_name().to_string(),
            chain: None,
            total: dataset.len(),
            mapped: partition.mapped.len(),
            unmapped: partition.unmapped.len(),
            outcomes: counts,
            unrecognized_chromosomes: translation.warnings.clone(),
            outputs: None,
        };
        info!(
            "Lifted {} of {} marker(s) from {}",
            summary.mapped, summary.total, summary.source
        );

        Ok(LiftRun {
            translation,
            outcomes,
            partition,
            lifted,
            summary,
        })
    }

    #[cfg(feature = "parallel")]
    fn map(
        &self,
        liftover: &Liftover,
        translation: &Translation,
    ) -> Result<Vec<MappingOutcome>, LiftError> {
        crate::parallel::map_by_chromosome(
            liftover,
            &translation.intervals,
            self.config.mapping.threads,
        )
    }

    #[cfg(not(feature = "parallel"))]
    fn map(
        &self,
        liftover: &Liftover,
        translation: &Translation,
    ) -> Result<Vec<MappingOutcome>, LiftError> {
        Ok(liftover.map_all(translation))
    }

    /// Output paths under the configured directory and prefix.
    pub fn output_paths(&self) -> OutputPaths {
        let output = &self.config.output;
        OutputPaths {
            mapped: output.path_for(MAPPED_SUFFIX),
            unmapped: output.path_for(UNMAPPED_SUFFIX),
            lifted: output.path_for(LIFTED_SUFFIX),
            summary: output.path_for(SUMMARY_SUFFIX),
        }
    }

    /// Read `table` and `chain`, lift, and write every output file.
    pub fn run_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        table: P,
        chain: Q,
    ) -> Result<LiftRun, LiftError> {
        let dataset = self.read_dataset(table)?;
        let liftover = self.load_liftover(chain.as_ref())?;

        let mut run = self.run(&dataset, &liftover)?;
        run.summary.chain = Some(chain.as_ref().display().to_string());

        let paths = self.output_paths();
        write_partition_files(&run.partition, &paths.mapped, &paths.unmapped)?;
        write_dataset_path(&paths.lifted, &run.lifted)?;
        run.summary.outputs = Some(paths.clone());
        write_summary(&paths.summary, &run.summary)?;

        info!("Wrote outputs to {}", self.config.output.directory.display());
        Ok(run)
    }
}

/// Write a summary as pretty-printed JSON.
pub fn write_summary<P: AsRef<Path>>(path: P, summary: &LiftSummary) -> Result<(), LiftError> {
    let path = path.as_ref();
    let mut out = crate::io::create_output(path)?;
    serde_json::to_writer_pretty(&mut out, summary)
        .map_err(std::io::Error::from)
        .and_then(|_| writeln!(out))
        .and_then(|_| out.flush())
        .map_err(|e| LiftError::io(path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liftover::{AmbiguityPolicy, OverlapPolicy, UnmappedReason};

    fn liftover(rules: &str) -> Liftover {
        let chain = ChainFile::parse(rules.as_bytes(), "rules.tsv", OverlapPolicy::Ambiguous).unwrap();
        Liftover::new(chain, AmbiguityPolicy::Conservative)
    }

    #[test]
    fn test_run_in_memory() {
        let dataset = Dataset::from_records([("1", 1_000_000, "rs1"), ("23", 2_000_000, "rs2")]).unwrap();
        let lo = liftover("chr1\t999900\t1000100\tchr1\t1100000\t1100200\t+\n");
        let run = LiftPipeline::default().run(&dataset, &lo).unwrap();

        assert_eq!(run.partition.mapped[0].id, "rs1");
        assert_eq!(run.partition.mapped[0].position.value(), 1_100_100);
        assert_eq!(run.partition.unmapped[0].reason, UnmappedReason::NoOverlap);
        assert_eq!(run.lifted.len(), 1);
        assert_eq!(run.lifted.markers()[0].chromosome, "1");
        assert_eq!(run.summary.mapped, 1);
        assert_eq!(run.summary.unmapped, 1);
        assert_eq!(run.summary.outcomes.no_overlap, 1);
        assert!(run.summary.unrecognized_chromosomes.is_empty());
    }

    #[test]
    fn test_summary_display() {
        let dataset = Dataset::from_records([("GL000192.1", 5, "rs9")]).unwrap();
        let run = LiftPipeline::default().run(&dataset, &liftover("")).unwrap();
        let text = run.summary.to_string();
        assert!(text.contains("Markers:         1"));
        assert!(text.contains("Unrecognized chromosome 'GL000192.1'"));
    }

    #[test]
    fn test_output_paths() {
        let mut config = LiftConfig::default();
        config.output.directory = PathBuf::from("out");
        config.output.prefix = "hg19".to_string();
        let paths = LiftPipeline::new(config).output_paths();
        assert_eq!(paths.mapped, PathBuf::from("out/hg19.mapped.txt"));
        assert_eq!(paths.summary, PathBuf::from("out/hg19.summary.json"));
    }
}
