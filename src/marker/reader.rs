//! Marker annotation table reader.

use super::{ColumnLayout, Dataset, Delimiter, Marker};
use crate::config::TableConfig;
use crate::error::{ErrorCode, LiftError};
use crate::io::{open_input, read_lines};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Reads annotation tables into [`Dataset`]s.
///
/// Blank lines and `#` comments are skipped. The first malformed row aborts
/// the read; no partial dataset is returned.
#[derive(Debug, Clone)]
pub struct MarkerReader {
    layout: ColumnLayout,
    delimiter: Delimiter,
    check_duplicates: bool,
}

impl Default for MarkerReader {
    fn default() -> Self {
        Self::new(&TableConfig::default())
    }
}

impl MarkerReader {
    pub fn new(config: &TableConfig) -> Self {
        Self {
            layout: config.layout,
            delimiter: config.delimiter,
            check_duplicates: config.check_duplicates,
        }
    }

    /// Read a table from a path (supports `.gz`).
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Dataset, LiftError> {
        let path = path.as_ref();
        let reader = open_input(path)?;
        self.parse(reader, &path.display().to_string())
    }

    /// Parse a table from a reader. `source_name` is used in error messages.
    pub fn parse<R: Read>(&self, reader: R, source_name: &str) -> Result<Dataset, LiftError> {
        if self.layout.has_collisions() {
            return Err(LiftError::Config {
                msg: format!(
                    "column layout uses the same column twice: {:?}",
                    self.layout
                ),
            });
        }

        let mut markers = Vec::new();
        let mut expected_columns: Option<usize> = None;
        let mut seen: HashMap<String, usize> = HashMap::new();

        for entry in read_lines(reader, source_name) {
            let (line_num, line) = entry?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let fields = self.delimiter.split(line);
            let expected = *expected_columns.get_or_insert(fields.len());
            if fields.len() != expected {
                return Err(LiftError::format(
                    source_name,
                    line_num,
                    ErrorCode::InvalidRowShape,
                    format!("expected {} columns, got {}", expected, fields.len()),
                ));
            }
            if fields.len() < self.layout.min_columns() {
                return Err(LiftError::format(
                    source_name,
                    line_num,
                    ErrorCode::InvalidRowShape,
                    format!(
                        "expected at least {} columns, got {}",
                        self.layout.min_columns(),
                        fields.len()
                    ),
                ));
            }

            let fields = fields.into_iter().map(String::from).collect();
            let marker = Marker::from_fields(fields, &self.layout, line_num, source_name)?;

            if self.check_duplicates {
                if let Some(first) = seen.insert(marker.id.clone(), line_num) {
                    return Err(LiftError::format(
                        source_name,
                        line_num,
                        ErrorCode::DuplicateIdentifier,
                        format!(
                            "duplicate identifier '{}' (first seen at line {})",
                            marker.id, first
                        ),
                    ));
                }
            }

            markers.push(marker);
        }

        debug!("Read {} markers from {}", markers.len(), source_name);
        Ok(Dataset::new(
            markers,
            self.layout,
            self.delimiter,
            source_name,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader() -> MarkerReader {
        MarkerReader::default()
    }

    #[test]
    fn test_parse_simple_table() {
        let data = "# chrom\tpos\tid\n1\t1000000\trs1\n23\t2000000\trs2\n\n";
        let dataset = reader().parse(data.as_bytes(), "markers.tsv").unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.markers()[0].id, "rs1");
        assert_eq!(dataset.markers()[0].position.value(), 1_000_000);
        assert_eq!(dataset.markers()[1].chromosome, "23");
        assert_eq!(dataset.markers()[1].line, 3);
        assert_eq!(dataset.source_name(), "markers.tsv");
    }

    #[test]
    fn test_passthrough_columns_kept() {
        let data = "1\t100\trs1\tA\tG\n";
        let dataset = reader().parse(data.as_bytes(), "t").unwrap();
        assert_eq!(dataset.markers()[0].fields(), &["1", "100", "rs1", "A", "G"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let data = "1\t100\trs1\r\n2\t200\trs2\r\n";
        let dataset = reader().parse(data.as_bytes(), "t").unwrap();
        assert_eq!(dataset.markers()[1].id, "rs2");
    }

    #[test]
    fn test_inconsistent_column_count() {
        let data = "1\t100\trs1\n1\t200\n";
        let err = reader().parse(data.as_bytes(), "t").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRowShape);
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_too_few_columns() {
        let err = reader().parse("1\t100\n".as_bytes(), "t").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRowShape);
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_non_numeric_position() {
        let data = "1\t100\trs1\n1\tabc\trs2\n";
        let err = reader().parse(data.as_bytes(), "markers.tsv").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPosition);
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("markers.tsv"));
    }

    #[test]
    fn test_zero_position_rejected() {
        let err = reader().parse("1\t0\trs1\n".as_bytes(), "t").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPosition);
    }

    #[test]
    fn test_duplicate_identifier_fails_fast() {
        let data = "1\t100\trs1\n2\t200\trs1\n";
        let err = reader().parse(data.as_bytes(), "t").unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateIdentifier);
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_duplicate_check_can_be_deferred() {
        let config = TableConfig {
            check_duplicates: false,
            ..TableConfig::default()
        };
        let data = "1\t100\trs1\n2\t200\trs1\n";
        let dataset = MarkerReader::new(&config).parse(data.as_bytes(), "t").unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_plink_map_layout() {
        let config = TableConfig {
            layout: ColumnLayout::plink_map(),
            delimiter: Delimiter::Whitespace,
            ..TableConfig::default()
        };
        let data = "1 rs3094315 0 752566\n23  rs5  0.5  2000000\n";
        let dataset = MarkerReader::new(&config).parse(data.as_bytes(), "hapmap3.map").unwrap();
        assert_eq!(dataset.markers()[0].id, "rs3094315");
        assert_eq!(dataset.markers()[0].position.value(), 752_566);
        assert_eq!(dataset.markers()[1].chromosome, "23");
    }

    #[test]
    fn test_layout_collision_is_config_error() {
        let config = TableConfig {
            layout: ColumnLayout {
                chromosome: 0,
                position: 0,
                identifier: 1,
            },
            ..TableConfig::default()
        };
        let err = MarkerReader::new(&config).parse("1\t2\n".as_bytes(), "t").unwrap_err();
        assert!(matches!(err, LiftError::Config { .. }));
    }

    #[test]
    fn test_invalid_utf8_row() {
        let err = reader().parse(&b"1\t10\trs\xff1\n"[..], "t").unwrap_err();
        assert!(matches!(err, LiftError::Format { .. }));
        assert_eq!(err.code(), ErrorCode::InvalidRowShape);
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_empty_input() {
        let dataset = reader().parse("".as_bytes(), "t").unwrap();
        assert!(dataset.is_empty());
    }
}
