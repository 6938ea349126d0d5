//! File helpers shared by the table and chain readers.

use crate::error::{ErrorCode, LiftError};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read};
use std::path::Path;

/// Open a file for line-oriented reading, decompressing `.gz` transparently.
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>, LiftError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| LiftError::io(format!("Failed to open {}", path.display()), e))?;

    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Iterate `(line_number, line)` pairs, line numbers starting at 1.
///
/// A line that is not valid UTF-8 is a format error at that line, not an
/// I/O failure.
pub(crate) fn read_lines<'a, R: Read + 'a>(
    reader: R,
    source_name: &'a str,
) -> impl Iterator<Item = Result<(usize, String), LiftError>> + 'a {
    BufReader::new(reader)
        .lines()
        .enumerate()
        .map(move |(idx, line)| {
            let line_num = idx + 1;
            line.map(|l| (line_num, l)).map_err(|e| match e.kind() {
                ErrorKind::InvalidData => LiftError::format(
                    source_name,
                    line_num,
                    ErrorCode::InvalidRowShape,
                    "line is not valid UTF-8",
                ),
                _ => LiftError::Io {
                    msg: format!("Failed to read line {} of {}: {}", line_num, source_name, e),
                },
            })
        })
}

/// Create (or truncate) an output file, creating parent directories as needed.
pub fn create_output<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>, LiftError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LiftError::io(format!("Failed to create directory {}", parent.display()), e)
            })?;
        }
    }
    let file = File::create(path)
        .map_err(|e| LiftError::io(format!("Failed to create {}", path.display()), e))?;
    Ok(BufWriter::new(file))
}

fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_open_plain_and_gz() {
        let dir = tempfile::tempdir().unwrap();

        let plain = dir.path().join("markers.tsv");
        std::fs::write(&plain, "1\t100\trs1\n").unwrap();
        let mut line = String::new();
        open_input(&plain).unwrap().read_line(&mut line).unwrap();
        assert_eq!(line, "1\t100\trs1\n");

        let gz = dir.path().join("markers.tsv.gz");
        let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(b"2\t200\trs2\n").unwrap();
        encoder.finish().unwrap();
        let mut line = String::new();
        open_input(&gz).unwrap().read_line(&mut line).unwrap();
        assert_eq!(line, "2\t200\trs2\n");
    }

    #[test]
    fn test_open_missing_file() {
        let err = open_input("/nonexistent/markers.tsv").err().unwrap();
        assert!(matches!(err, LiftError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/markers.tsv"));
    }

    #[test]
    fn test_create_output_makes_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");
        let mut writer = create_output(&path).unwrap();
        writeln!(writer, "ok").unwrap();
        drop(writer);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ok\n");
    }

    #[test]
    fn test_read_lines_numbers_from_one() {
        let lines: Vec<_> = read_lines("a\nb\n".as_bytes(), "mem")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(lines, vec![(1, "a".to_string()), (2, "b".to_string())]);
    }

    #[test]
    fn test_read_lines_invalid_utf8_is_format_error() {
        let err = read_lines(&b"1\t10\trs1\n1\t20\trs\xff2\n"[..], "markers.tsv")
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRowShape);
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("markers.tsv"));
    }
}
