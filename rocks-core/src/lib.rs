//! Rocks Core — symbol universe preparation and lookup.
//!
//! This crate turns raw FinanceDatabase listings into the compact
//! `symbol,name` files the `rocks` tool ships with:
//! - CSV-backed immutable tables with filter and projection
//! - Market allow-lists (exact, case-sensitive membership)
//! - Built-in equities/ETF datasets and TOML overrides
//! - The simplify pipeline (stage every dataset, then write)
//! - A ticker directory over the filtered output
//! - Live quotes for tickers in that directory (Yahoo Finance)

pub mod allow_list;
pub mod config;
pub mod dataset;
pub mod directory;
pub mod error;
pub mod pipeline;
pub mod quote;
pub mod table;

pub use allow_list::AllowList;
pub use config::{ConfigError, SimplifyConfig};
pub use dataset::{DatasetSpec, EQUITY_MARKETS, ETF_MARKET};
pub use directory::{Listing, SymbolDirectory};
pub use error::TransformError;
pub use pipeline::{simplify, stage, transform, DatasetReport, SimplifyReport, StagedDataset};
pub use quote::{quote_listing, Quote, QuoteError, QuoteProvider, YahooQuoteProvider};
pub use table::{Record, Table};
