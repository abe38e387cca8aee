//! Ticker directory built from the filtered listings.
//!
//! `rocks lookup` reads `filtered_data/*.csv` back in and resolves tickers
//! or company names against them.

use std::collections::HashMap;
use std::path::Path;

use crate::error::TransformError;
use crate::table::Table;

/// One listed instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Ticker, upper-cased.
    pub symbol: String,
    pub name: String,
    /// Dataset the listing came from (`equities`, `etfs`, ...).
    pub dataset: String,
}

/// Searchable collection of listings, in load order.
#[derive(Debug, Clone, Default)]
pub struct SymbolDirectory {
    listings: Vec<Listing>,
    by_symbol: HashMap<String, usize>,
}

impl SymbolDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a filtered `symbol,name` file and tag its rows with `dataset`.
    pub fn load(dataset: &str, path: &Path) -> Result<Self, TransformError> {
        let mut dir = Self::new();
        dir.extend_from_file(dataset, path)?;
        Ok(dir)
    }

    pub fn extend_from_file(&mut self, dataset: &str, path: &Path) -> Result<(), TransformError> {
        let table = Table::load(path)?;
        self.extend_from_table(dataset, &table)
    }

    pub fn extend_from_table(&mut self, dataset: &str, table: &Table) -> Result<(), TransformError> {
        let symbol_idx = table.column_index("symbol")?;
        let name_idx = table.column_index("name")?;

        for record in table.records() {
            let values = record.values();
            self.insert(Listing {
                symbol: values[symbol_idx].trim().to_uppercase(),
                name: values[name_idx].clone(),
                dataset: dataset.to_string(),
            });
        }
        Ok(())
    }

    /// Add a listing. A ticker seen before keeps its first entry for
    /// [`get`](Self::get) but still takes part in searches.
    pub fn insert(&mut self, listing: Listing) {
        if listing.symbol.is_empty() {
            return;
        }
        let idx = self.listings.len();
        self.by_symbol.entry(listing.symbol.clone()).or_insert(idx);
        self.listings.push(listing);
    }

    /// Exact ticker lookup, case-insensitive.
    pub fn get(&self, symbol: &str) -> Option<&Listing> {
        self.by_symbol
            .get(&symbol.trim().to_uppercase())
            .map(|&i| &self.listings[i])
    }

    /// Listings whose ticker or name contains `query`, ignoring case.
    ///
    /// Exact ticker matches come first; the rest keep load order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Listing> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let (mut exact, partial): (Vec<&Listing>, Vec<&Listing>) = self
            .listings
            .iter()
            .filter(|l| {
                l.symbol.to_lowercase().contains(&needle) || l.name.to_lowercase().contains(&needle)
            })
            .partition(|l| l.symbol.to_lowercase() == needle);

        exact.extend(partial);
        exact.truncate(limit);
        exact
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listing> {
        self.listings.iter()
    }
}
