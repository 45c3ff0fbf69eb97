//! Loaded dataset and its provenance.

use std::fmt;
use std::path::PathBuf;

use covid_model::DatasetTable;

/// Where a dataset was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    /// A file on the local file system.
    Local(PathBuf),
    /// A remote URL fetched after the local file was not found.
    Remote(String),
}

impl SourceOrigin {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

/// Raw daily observations as loaded, with a conformed schema.
///
/// The table is not modified after loading; pipeline stages read it and
/// produce new tables.
#[derive(Debug, Clone)]
pub struct RecordSet {
    table: DatasetTable,
    origin: SourceOrigin,
}

impl RecordSet {
    pub fn new(table: DatasetTable, origin: SourceOrigin) -> Self {
        Self { table, origin }
    }

    pub fn table(&self) -> &DatasetTable {
        &self.table
    }

    pub fn origin(&self) -> &SourceOrigin {
        &self.origin
    }

    /// Returns the number of raw rows.
    pub fn height(&self) -> usize {
        self.table.height()
    }

    pub fn into_table(self) -> DatasetTable {
        self.table
    }
}
