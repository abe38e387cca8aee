//! Error taxonomy for the filter-project transform.
//!
//! Every variant is fatal: the pipeline aborts on the first error and never
//! retries.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading, reshaping, or persisting a table.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Source file missing, unreadable, or not parseable as CSV.
    #[error("failed to load '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A column the operation needs is absent from the table header.
    #[error("column '{column}' not found in '{}'", path.display())]
    Schema { path: PathBuf, column: String },

    /// Destination could not be created or written.
    #[error("failed to write '{}': {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

impl TransformError {
    pub fn load(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Load {
            path: path.into(),
            source,
        }
    }

    /// Source parsed as CSV but is not a usable table (no header row,
    /// rows of the wrong width).
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, reason.into());
        Self::load(path, csv::Error::from(io))
    }

    pub fn schema(path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            column: column.into(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Short category name, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Load { .. } => "load",
            Self::Schema { .. } => "schema",
            Self::Write { .. } => "write",
        }
    }
}
