//! CSV parsing into Polars DataFrames.
//!
//! Every column is read as text. Type conversion happens afterwards in
//! [`conform_schema`](crate::conform_schema), where an unparseable cell can be
//! treated as absent instead of failing the whole file.

use std::io::Cursor;
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};

use crate::error::{IngestError, Result};

/// Returns a `CsvReadOptions` that reads a header row and keeps every column
/// as text.
fn text_read_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Reads a local CSV file.
///
/// A path that does not exist maps to [`IngestError::FileNotFound`] so callers
/// can decide whether to fall back to another source.
pub fn read_csv_file(path: &Path) -> Result<DataFrame> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    if metadata.len() == 0 {
        return Err(IngestError::EmptyCsv {
            origin: path.display().to_string(),
        });
    }

    text_read_options()
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            origin: path.display().to_string(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            origin: path.display().to_string(),
            message: e.to_string(),
        })
}

/// Parses CSV content that is already in memory (e.g. a downloaded body).
pub fn read_csv_bytes(bytes: Vec<u8>, origin: &str) -> Result<DataFrame> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::EmptyCsv {
            origin: origin.to_string(),
        });
    }

    text_read_options()
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            origin: origin.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_file_reads_all_as_text() {
        let file = create_temp_csv("location,total_cases\nKenya,100\nKenya,\n");
        let df = read_csv_file(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
        let cases = df.column("total_cases").unwrap();
        assert_eq!(cases.dtype(), &polars::prelude::DataType::String);
    }

    #[test]
    fn test_read_csv_file_missing() {
        let result = read_csv_file(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_read_csv_file_empty() {
        let file = create_temp_csv("");
        let result = read_csv_file(file.path());
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_csv_bytes() {
        let df = read_csv_bytes(b"a,b\n1,2\n3,4\n".to_vec(), "memory").unwrap();
        assert_eq!(df.height(), 2);
        assert!(matches!(
            read_csv_bytes(b"  \n".to_vec(), "memory"),
            Err(IngestError::EmptyCsv { .. })
        ));
    }
}
