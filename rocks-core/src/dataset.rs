//! Built-in dataset definitions.
//!
//! Two listings ship with the tool: US-listed equities and US-market ETFs,
//! both sourced from FinanceDatabase dumps under `raw_data/`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::allow_list::AllowList;

/// Exchanges whose equities make it into the universe.
pub const EQUITY_MARKETS: [&str; 3] = [
    "New York Stock Exchange",
    "NYSE MKT",
    "NASDAQ Global Select",
];

/// Market tag carried by US-listed funds.
pub const ETF_MARKET: &str = "us_market";

/// Column the allow-list is tested against.
pub const DEFAULT_FILTER_COLUMN: &str = "market";

/// Columns kept in the filtered output, in order.
pub const DEFAULT_COLUMNS: [&str; 2] = ["symbol", "name"];

/// How to turn one raw listing into a filtered one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    #[serde(default = "default_filter_column")]
    pub filter_column: String,
    pub allow_list: AllowList,
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,
}

fn default_filter_column() -> String {
    DEFAULT_FILTER_COLUMN.to_string()
}

fn default_columns() -> Vec<String> {
    DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect()
}

impl DatasetSpec {
    /// Dataset with the default filter column and projection.
    pub fn new(
        name: impl Into<String>,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        allow_list: AllowList,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            destination: destination.into(),
            filter_column: default_filter_column(),
            allow_list,
            columns: default_columns(),
        }
    }

    pub fn equities() -> Self {
        Self::new(
            "equities",
            "raw_data/equities.csv",
            "filtered_data/equities.csv",
            AllowList::new(EQUITY_MARKETS),
        )
    }

    pub fn etfs() -> Self {
        Self::new(
            "etfs",
            "raw_data/etfs.csv",
            "filtered_data/etfs.csv",
            AllowList::single(ETF_MARKET),
        )
    }

    /// Source path, joined onto `root` when relative.
    pub fn source_in(&self, root: &Path) -> PathBuf {
        root.join(&self.source)
    }

    /// Destination path, joined onto `root` when relative.
    pub fn destination_in(&self, root: &Path) -> PathBuf {
        root.join(&self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equities_defaults() {
        let spec = DatasetSpec::equities();
        assert_eq!(spec.filter_column, "market");
        assert_eq!(spec.columns, vec!["symbol", "name"]);
        assert!(spec.allow_list.contains("NYSE MKT"));
        assert!(spec.allow_list.contains("NASDAQ Global Select"));
        assert!(spec.allow_list.contains("New York Stock Exchange"));
        assert_eq!(spec.allow_list.len(), 3);
    }

    #[test]
    fn etfs_defaults() {
        let spec = DatasetSpec::etfs();
        assert_eq!(spec.allow_list, AllowList::single("us_market"));
        assert_eq!(spec.destination, PathBuf::from("filtered_data/etfs.csv"));
    }

    #[test]
    fn absolute_paths_ignore_root() {
        let mut spec = DatasetSpec::etfs();
        spec.source = PathBuf::from("/data/etfs.csv");
        assert_eq!(
            spec.source_in(Path::new("/work")),
            PathBuf::from("/data/etfs.csv")
        );
        assert_eq!(
            spec.destination_in(Path::new("/work")),
            PathBuf::from("/work/filtered_data/etfs.csv")
        );
    }
}
