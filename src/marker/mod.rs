//! Marker annotation tables.
//!
//! A [`Dataset`] is the ordered list of markers read from one annotation
//! table (chromosome, position, identifier, plus any passthrough columns).
//! Datasets are never edited in place: [`crate::update::update_dataset`]
//! builds a new one for the lifted build.

pub mod reader;
pub mod writer;

pub use reader::MarkerReader;
pub use writer::{write_dataset, write_dataset_path};

use crate::coords::OneBasedPos;
use crate::error::{ErrorCode, LiftError};
use serde::{Deserialize, Serialize};

/// Zero-based column indices of the required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub chromosome: usize,
    pub position: usize,
    pub identifier: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            chromosome: 0,
            position: 1,
            identifier: 2,
        }
    }
}

impl std::str::FromStr for ColumnLayout {
    type Err = String;

    /// Preset name (`default`, `plink-map`) or `chromosome,position,identifier` column indices.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => return Ok(ColumnLayout::default()),
            "plink-map" | "plink" | "map" => return Ok(ColumnLayout::plink_map()),
            _ => {}
        }

        let cols: Vec<usize> = s
            .split(',')
            .map(|c| c.trim().parse::<usize>())
            .collect::<Result<_, _>>()
            .map_err(|_| format!("invalid column layout '{}'", s))?;
        match cols.as_slice() {
            [chromosome, position, identifier] => Ok(Self {
                chromosome: *chromosome,
                position: *position,
                identifier: *identifier,
            }),
            _ => Err(format!(
                "column layout '{}' needs three indices: chromosome,position,identifier",
                s
            )),
        }
    }
}

impl ColumnLayout {
    /// PLINK `.map` layout: chromosome, identifier, genetic distance, position.
    pub const fn plink_map() -> Self {
        Self {
            chromosome: 0,
            identifier: 1,
            position: 3,
        }
    }

    /// Minimum number of columns a row needs for this layout.
    pub fn min_columns(&self) -> usize {
        self.chromosome.max(self.position).max(self.identifier) + 1
    }

    /// True when two of the required fields point at the same column.
    pub fn has_collisions(&self) -> bool {
        self.chromosome == self.position
            || self.chromosome == self.identifier
            || self.position == self.identifier
    }
}

/// Field separator of an annotation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Delimiter {
    /// Single tab characters; empty fields are preserved
    #[default]
    Tab,
    /// Runs of spaces or tabs (PLINK `.map`/`.bim`)
    Whitespace,
}

impl std::str::FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tab" => Ok(Delimiter::Tab),
            "whitespace" | "space" => Ok(Delimiter::Whitespace),
            other => Err(format!(
                "unknown delimiter '{}' (expected tab or whitespace)",
                other
            )),
        }
    }
}

impl Delimiter {
    /// Field separator used when writing rows.
    pub fn as_separator(&self) -> &'static str {
        match self {
            Delimiter::Tab => "\t",
            Delimiter::Whitespace => " ",
        }
    }

    /// Split a line into fields.
    pub fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Delimiter::Tab => line.split('\t').collect(),
            Delimiter::Whitespace => line.split_whitespace().collect(),
        }
    }
}

/// A single genotyped position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Marker identifier (e.g. an rsID).
    pub id: String,
    /// Chromosome label exactly as it appears in the table.
    pub chromosome: String,
    /// 1-based position.
    pub position: OneBasedPos,
    /// 1-based line number in the source table (0 for markers built in memory).
    pub line: usize,
    /// Every field of the source row, including the three above.
    fields: Vec<String>,
}

impl Marker {
    /// Build a marker from a split row.
    ///
    /// The caller is responsible for checking the row is wide enough.
    pub(crate) fn from_fields(
        fields: Vec<String>,
        layout: &ColumnLayout,
        line: usize,
        source_name: &str,
    ) -> Result<Self, LiftError> {
        let raw_pos = &fields[layout.position];
        let position = raw_pos
            .parse::<u64>()
            .ok()
            .and_then(OneBasedPos::try_new)
            .ok_or_else(|| {
                LiftError::format(
                    source_name,
                    line,
                    ErrorCode::InvalidPosition,
                    format!("position '{}' is not a positive integer", raw_pos),
                )
            })?;

        let id = fields[layout.identifier].clone();
        if id.is_empty() {
            return Err(LiftError::format(
                source_name,
                line,
                ErrorCode::InvalidRowShape,
                "empty marker identifier",
            ));
        }

        Ok(Self {
            id,
            chromosome: fields[layout.chromosome].clone(),
            position,
            line,
            fields,
        })
    }

    /// All fields of the original row.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Copy of this marker at a new chromosome and position; every other field is kept.
    pub fn relocated(&self, layout: &ColumnLayout, chromosome: &str, position: OneBasedPos) -> Self {
        let mut fields = self.fields.clone();
        fields[layout.chromosome] = chromosome.to_string();
        fields[layout.position] = position.to_string();
        Self {
            id: self.id.clone(),
            chromosome: chromosome.to_string(),
            position,
            line: self.line,
            fields,
        }
    }
}

/// Ordered markers sharing one coordinate system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    markers: Vec<Marker>,
    layout: ColumnLayout,
    delimiter: Delimiter,
    source_name: String,
}

impl Dataset {
    /// Wrap markers that were read with `layout`.
    pub fn new(
        markers: Vec<Marker>,
        layout: ColumnLayout,
        delimiter: Delimiter,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            markers,
            layout,
            delimiter,
            source_name: source_name.into(),
        }
    }

    /// Build a dataset in the default layout from `(chromosome, position, identifier)` triples.
    ///
    /// ```
    /// use ferro_liftover::marker::Dataset;
    ///
    /// let dataset = Dataset::from_records([("1", 1_000_000, "rs1"), ("23", 2_000_000, "rs2")]).unwrap();
    /// assert_eq!(dataset.len(), 2);
    /// assert_eq!(dataset.markers()[1].chromosome, "23");
    /// ```
    pub fn from_records<'a, I>(records: I) -> Result<Self, LiftError>
    where
        I: IntoIterator<Item = (&'a str, u64, &'a str)>,
    {
        let layout = ColumnLayout::default();
        let markers = records
            .into_iter()
            .map(|(chrom, pos, id)| {
                let fields = vec![chrom.to_string(), pos.to_string(), id.to_string()];
                Marker::from_fields(fields, &layout, 0, "<memory>")
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(markers, layout, Delimiter::Tab, "<memory>"))
    }

    /// Same layout, delimiter and source, different markers.
    pub fn with_markers(&self, markers: Vec<Marker>) -> Self {
        Self {
            markers,
            layout: self.layout,
            delimiter: self.delimiter,
            source_name: self.source_name.clone(),
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Name of the file (or stream) this dataset was read from.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    /// Marker identifiers in dataset order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(|m| m.id.as_str())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}
