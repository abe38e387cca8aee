//! In-memory string tables loaded from CSV.
//!
//! A [`Table`] is an ordered header plus rows of equal width. Tables are
//! loaded wholesale and never mutated: [`Table::filter_in`] and
//! [`Table::select`] build new tables, leaving the source intact.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::allow_list::AllowList;
use crate::error::TransformError;

/// Ordered collection of records sharing one field set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Where the rows came from. Used to attribute schema errors.
    origin: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// A borrowed row, addressable by field name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl<'a> Record<'a> {
    /// Value of the named field, or `None` if the table has no such column.
    pub fn get(&self, field: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|h| h == field)
            .map(|i| self.values[i].as_str())
    }

    pub fn values(&self) -> &'a [String] {
        self.values
    }
}

impl Table {
    /// Build a table from already-split rows.
    ///
    /// Fails with a load error when the header is empty or any row's width
    /// differs from the header's.
    pub fn new(
        origin: impl Into<PathBuf>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, TransformError> {
        let origin = origin.into();
        if headers.is_empty() {
            return Err(TransformError::malformed(origin, "empty file, no header row"));
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != headers.len())
        {
            return Err(TransformError::malformed(
                origin,
                format!(
                    "row {} has {} fields, header has {}",
                    i + 1,
                    row.len(),
                    headers.len()
                ),
            ));
        }
        Ok(Self::from_parts(origin, headers, rows))
    }

    /// Rows are known to match the header width.
    fn from_parts(origin: PathBuf, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            origin,
            headers,
            rows,
        }
    }

    /// Load a comma-separated file with a header row.
    pub fn load(path: &Path) -> Result<Self, TransformError> {
        let file = File::open(path).map_err(|e| TransformError::load(path, e.into()))?;
        Self::from_reader(file, path)
    }

    /// Parse CSV from any reader. `origin` labels the table in errors.
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self, TransformError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| TransformError::load(origin, e))?
            .iter()
            .map(String::from)
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| TransformError::load(origin, e))?;
            rows.push(record.iter().map(String::from).collect());
        }

        Self::new(origin, headers, rows)
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Position of `column` in the header. The first match wins when a
    /// header repeats a name.
    pub fn column_index(&self, column: &str) -> Result<usize, TransformError> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| TransformError::schema(&self.origin, column))
    }

    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|values| Record {
            headers: &self.headers,
            values,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |values| Record {
            headers: &self.headers,
            values,
        })
    }

    /// Keep rows whose `column` value is in `allow`, preserving order.
    pub fn filter_in(&self, column: &str, allow: &AllowList) -> Result<Self, TransformError> {
        let idx = self.column_index(column)?;
        let rows = self
            .rows
            .iter()
            .filter(|row| allow.contains(&row[idx]))
            .cloned()
            .collect();
        Ok(Self::from_parts(
            self.origin.clone(),
            self.headers.clone(),
            rows,
        ))
    }

    /// Project onto `columns`, in the order given.
    ///
    /// Fails on the first column missing from the header; no partial
    /// projection is returned.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Result<Self, TransformError> {
        let indices = columns
            .iter()
            .map(|c| self.column_index(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let headers = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Self::from_parts(self.origin.clone(), headers, rows))
    }

    /// Serialize header and rows as CSV into `writer`.
    ///
    /// Fields are quoted only when they contain a delimiter, quote, or
    /// line break. Lines end in `\n`.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Render the table as a CSV string.
    pub fn to_csv_string(&self) -> Result<String, TransformError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf).map_err(|e| TransformError::write(&self.origin, e))?;
        String::from_utf8(buf).map_err(|e| TransformError::write(&self.origin, e))
    }

    /// Write the table to `path`, replacing any existing file and creating
    /// missing parent directories.
    pub fn persist(&self, path: &Path) -> Result<(), TransformError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TransformError::write(path, e))?;
        }
        let file = File::create(path).map_err(|e| TransformError::write(path, e))?;
        self.write_to(file).map_err(|e| TransformError::write(path, e))
    }
}
