//! The simplify pipeline: load → filter → project → persist.
//!
//! Every dataset is loaded and reshaped before anything is written, so a
//! load or schema failure in any dataset leaves all destinations untouched.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::SimplifyConfig;
use crate::dataset::DatasetSpec;
use crate::error::TransformError;
use crate::table::Table;

/// Outcome for one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetReport {
    pub name: String,
    pub destination: PathBuf,
    pub rows_read: usize,
    pub rows_written: usize,
}

/// Outcome of a full run, in config order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimplifyReport {
    pub datasets: Vec<DatasetReport>,
}

impl SimplifyReport {
    pub fn rows_written(&self) -> usize {
        self.datasets.iter().map(|d| d.rows_written).sum()
    }
}

/// A reshaped table waiting to be written.
#[derive(Debug, Clone)]
pub struct StagedDataset {
    pub name: String,
    pub destination: PathBuf,
    pub rows_read: usize,
    pub table: Table,
}

/// Filter `table` by the dataset's allow-list and project its columns.
pub fn transform(spec: &DatasetSpec, table: &Table) -> Result<Table, TransformError> {
    // Column presence is checked up front so a missing projection column is
    // reported even when no row survives the filter.
    for column in &spec.columns {
        table.column_index(column)?;
    }
    let kept = table.filter_in(&spec.filter_column, &spec.allow_list)?;
    kept.select(&spec.columns)
}

/// Load one dataset's source under `root` and reshape it in memory.
pub fn stage(spec: &DatasetSpec, root: &Path) -> Result<StagedDataset, TransformError> {
    let source = spec.source_in(root);
    debug!(dataset = %spec.name, source = %source.display(), "loading");

    let raw = Table::load(&source)?;
    let table = transform(spec, &raw)?;

    info!(
        dataset = %spec.name,
        rows_read = raw.len(),
        rows_kept = table.len(),
        "filtered"
    );

    Ok(StagedDataset {
        name: spec.name.clone(),
        destination: spec.destination_in(root),
        rows_read: raw.len(),
        table,
    })
}

/// Run every dataset in `config` against files under `root`.
pub fn simplify(config: &SimplifyConfig, root: &Path) -> Result<SimplifyReport, TransformError> {
    let staged = config
        .datasets
        .iter()
        .map(|spec| stage(spec, root))
        .collect::<Result<Vec<_>, _>>()?;

    let mut report = SimplifyReport::default();
    for ds in staged {
        ds.table.persist(&ds.destination)?;
        info!(
            dataset = %ds.name,
            destination = %ds.destination.display(),
            rows = ds.table.len(),
            "written"
        );
        report.datasets.push(DatasetReport {
            name: ds.name,
            destination: ds.destination,
            rows_read: ds.rows_read,
            rows_written: ds.table.len(),
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> Table {
        Table::from_reader(csv.as_bytes(), Path::new("mem.csv")).unwrap()
    }

    #[test]
    fn equities_scenario() {
        let raw = table(
            "symbol,name,market\n\
             AAPL,Apple Inc.,NASDAQ Global Select\n\
             XYZ,Foo Corp,Toronto Stock Exchange\n",
        );
        let out = transform(&DatasetSpec::equities(), &raw).unwrap();
        assert_eq!(out.to_csv_string().unwrap(), "symbol,name\nAAPL,Apple Inc.\n");
    }

    #[test]
    fn etfs_scenario() {
        let raw = table(
            "symbol,name,market\n\
             SPY,SPDR S&P 500,us_market\n\
             EFA,iShares EAFE,other_market\n",
        );
        let out = transform(&DatasetSpec::etfs(), &raw).unwrap();
        assert_eq!(out.to_csv_string().unwrap(), "symbol,name\nSPY,SPDR S&P 500\n");
    }

    #[test]
    fn missing_projection_column_fails_even_with_no_matches() {
        let raw = table("symbol,market\nXYZ,Toronto Stock Exchange\n");
        let err = transform(&DatasetSpec::equities(), &raw).unwrap_err();
        match err {
            TransformError::Schema { column, .. } => assert_eq!(column, "name"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn missing_market_column_is_schema_error() {
        let raw = table("symbol,name\nSPY,SPDR S&P 500\n");
        let err = transform(&DatasetSpec::etfs(), &raw).unwrap_err();
        assert!(matches!(err, TransformError::Schema { ref column, .. } if column == "market"));
    }

    #[test]
    fn header_only_source_gives_header_only_output() {
        let raw = table("symbol,name,market\n");
        let out = transform(&DatasetSpec::etfs(), &raw).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.to_csv_string().unwrap(), "symbol,name\n");
    }
}
