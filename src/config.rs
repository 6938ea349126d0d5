//! Run configuration.
//!
//! Every setting of a lift run lives in [`LiftConfig`]; nothing is read from
//! the environment. Configuration can be loaded from TOML, and CLI flags
//! override file values.
//!
//! # Example Configuration
//!
//! ```toml
//! [table]
//! delimiter = "whitespace"
//! check_duplicates = true
//!
//! [table.layout]
//! chromosome = 0
//! identifier = 1
//! position = 3
//!
//! [chromosomes]
//! chain_style = "ucsc"
//! output_style = "canonical"
//!
//! [mapping]
//! overlap_policy = "ambiguous"
//! ambiguity_policy = "conservative"
//! threads = 0
//!
//! [output]
//! directory = "lifted"
//! prefix = "hapmap3_hg19"
//! ```

use crate::error::LiftError;
use crate::liftover::{AmbiguityPolicy, ChromStyle, OverlapPolicy};
use crate::marker::{ColumnLayout, Delimiter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete configuration of a lift run
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LiftConfig {
    /// Marker table parsing
    pub table: TableConfig,
    /// Chromosome naming on each side of the chain
    pub chromosomes: ChromosomeConfig,
    /// Chain handling and mapping
    pub mapping: MappingConfig,
    /// Output file naming
    pub output: OutputConfig,
}

/// Marker table layout
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TableConfig {
    pub delimiter: Delimiter,
    /// Reject tables with repeated identifiers (default: true)
    pub check_duplicates: bool,
    pub layout: ColumnLayout,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            layout: ColumnLayout::default(),
            delimiter: Delimiter::default(),
            check_duplicates: true,
        }
    }
}

/// Chromosome naming conventions
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChromosomeConfig {
    /// Style the chain names its source chromosomes in (default: ucsc)
    pub chain_style: ChromStyle,
    /// Style written to the lifted table (default: canonical)
    pub output_style: ChromStyle,
}

impl Default for ChromosomeConfig {
    fn default() -> Self {
        Self {
            chain_style: ChromStyle::Ucsc,
            output_style: ChromStyle::Canonical,
        }
    }
}

/// Mapping policies
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MappingConfig {
    pub overlap_policy: OverlapPolicy,
    pub ambiguity_policy: AmbiguityPolicy,
    /// Worker threads for parallel mapping; 0 uses the global pool
    pub threads: usize,
}

/// Output location
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for all output files (default: ".")
    pub directory: PathBuf,
    /// File name prefix (default: "lifted")
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            prefix: "lifted".to_string(),
        }
    }
}

impl OutputConfig {
    /// `{directory}/{prefix}.{suffix}`
    pub fn path_for(&self, suffix: &str) -> PathBuf {
        self.directory.join(format!("{}.{}", self.prefix, suffix))
    }
}

impl LiftConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LiftError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LiftError::Config {
            msg: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content).map_err(|e| LiftError::Config {
            msg: format!("{}: {}", path.display(), e),
        })
    }

    /// Parse configuration from TOML content
    pub fn from_toml_str(content: &str) -> Result<Self, LiftError> {
        let config: LiftConfig = toml::from_str(content).map_err(|e| LiftError::Config {
            msg: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), LiftError> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|e| LiftError::io(path.display(), e))
    }

    pub fn to_toml_string(&self) -> Result<String, LiftError> {
        toml::to_string_pretty(self).map_err(|e| LiftError::Config { msg: e.to_string() })
    }

    /// Configuration for a PLINK `.map` table lifted with a UCSC chain
    pub fn sample() -> Self {
        Self {
            table: TableConfig {
                layout: ColumnLayout::plink_map(),
                delimiter: Delimiter::Whitespace,
                check_duplicates: true,
            },
            output: OutputConfig {
                directory: PathBuf::from("lifted"),
                prefix: "hapmap3_hg19".to_string(),
            },
            ..Self::default()
        }
    }

    /// Check settings that deserialize but cannot work
    pub fn validate(&self) -> Result<(), LiftError> {
        if self.table.layout.has_collisions() {
            return Err(LiftError::Config {
                msg: format!(
                    "table layout uses one column for several fields: {:?}",
                    self.table.layout
                ),
            });
        }
        if self.output.prefix.is_empty() {
            return Err(LiftError::Config {
                msg: "output prefix must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
