//! Rocks CLI — prepare and query the ticker universe.
//!
//! Commands:
//! - `simplify` — filter `raw_data/*.csv` down to `filtered_data/*.csv`
//! - `lookup` — resolve a ticker or company name against the filtered files
//! - `quote` — fetch the latest price and daily change for a listed ticker
//! - `config show` — print the effective dataset configuration as TOML

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use rocks_core::{quote_listing, simplify, SimplifyConfig, SymbolDirectory, YahooQuoteProvider};

#[derive(Parser)]
#[command(
    name = "rocks",
    version,
    about = "Rocks CLI — US equity and ETF ticker universe"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter raw listings by market and keep only symbol and name.
    Simplify {
        /// Directory holding raw_data/ and receiving filtered_data/. Defaults to cwd.
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// TOML file replacing the built-in dataset list.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Look up a ticker or search company names.
    Lookup {
        /// Ticker (exact) or name fragment.
        query: String,

        /// Directory with the filtered equities.csv and etfs.csv.
        #[arg(long, default_value = "filtered_data")]
        data_dir: PathBuf,

        /// Maximum number of matches to print.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Fetch the latest price and daily change from Yahoo Finance.
    Quote {
        /// Ticker; must be in the filtered universe.
        ticker: String,

        /// Directory with the filtered equities.csv and etfs.csv.
        #[arg(long, default_value = "filtered_data")]
        data_dir: PathBuf,
    },
    /// Configuration commands.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show {
        /// Config file to validate and print instead of the defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simplify { root, config } => run_simplify(&root, config.as_deref()),
        Commands::Lookup {
            query,
            data_dir,
            limit,
        } => run_lookup(&query, &data_dir, limit),
        Commands::Quote { ticker, data_dir } => run_quote(&ticker, &data_dir),
        Commands::Config { action } => match action {
            ConfigAction::Show { config } => run_config_show(config.as_deref()),
        },
    }
}

fn load_config(path: Option<&Path>) -> Result<SimplifyConfig> {
    match path {
        Some(path) => SimplifyConfig::from_file(path)
            .with_context(|| format!("invalid config {}", path.display())),
        None => Ok(SimplifyConfig::default()),
    }
}

fn run_simplify(root: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    debug!(datasets = config.datasets.len(), root = %root.display(), "simplify");

    let report = simplify(&config, root).context("simplify aborted")?;

    for ds in &report.datasets {
        println!(
            "{:<10} {:>7} -> {:>7} rows  {}",
            ds.name,
            ds.rows_read,
            ds.rows_written,
            ds.destination.display()
        );
    }
    Ok(())
}

fn load_directory(data_dir: &Path) -> Result<SymbolDirectory> {
    let mut directory = SymbolDirectory::new();
    for dataset in ["equities", "etfs"] {
        let path = data_dir.join(format!("{dataset}.csv"));
        if !path.exists() {
            warn!(path = %path.display(), "filtered file missing, skipping");
            continue;
        }
        directory
            .extend_from_file(dataset, &path)
            .with_context(|| format!("failed to load {}", path.display()))?;
    }

    if directory.is_empty() {
        bail!(
            "no listings found in {} (run `rocks simplify` first)",
            data_dir.display()
        );
    }
    Ok(directory)
}

fn run_lookup(query: &str, data_dir: &Path, limit: usize) -> Result<()> {
    let directory = load_directory(data_dir)?;

    if let Some(listing) = directory.get(query) {
        println!("{}  {}  [{}]", listing.symbol, listing.name, listing.dataset);
        return Ok(());
    }

    let hits = directory.search(query, limit);
    if hits.is_empty() {
        bail!("no ticker or name matches '{query}'");
    }
    println!("{:<8} {:<9} Name", "Symbol", "Dataset");
    println!("{}", "-".repeat(48));
    for listing in hits {
        println!("{:<8} {:<9} {}", listing.symbol, listing.dataset, listing.name);
    }
    Ok(())
}

fn run_quote(ticker: &str, data_dir: &Path) -> Result<()> {
    let directory = load_directory(data_dir)?;
    let provider = YahooQuoteProvider::new()?;
    let (listing, quote) = quote_listing(&directory, &provider, ticker)
        .with_context(|| format!("no quote for '{ticker}'"))?;

    println!("{}  {}", listing.symbol, listing.name);
    println!(
        "Price: {:.2}{} | Daily Change: {:+.2} | Pct Change: {:+.2}%",
        quote.price,
        quote
            .currency
            .as_deref()
            .map(|c| format!(" {c}"))
            .unwrap_or_default(),
        quote.change,
        quote.change_pct
    );
    Ok(())
}

fn run_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn simplify_defaults_to_cwd_without_config() {
        let cli = Cli::try_parse_from(["rocks", "simplify"]).unwrap();
        match cli.command {
            Commands::Simplify { root, config } => {
                assert_eq!(root, PathBuf::from("."));
                assert!(config.is_none());
            }
            _ => panic!("expected simplify"),
        }
    }

    #[test]
    fn quote_takes_ticker_and_data_dir() {
        let cli =
            Cli::try_parse_from(["rocks", "quote", "AAPL", "--data-dir", "dist/data"]).unwrap();
        match cli.command {
            Commands::Quote { ticker, data_dir } => {
                assert_eq!(ticker, "AAPL");
                assert_eq!(data_dir, PathBuf::from("dist/data"));
            }
            _ => panic!("expected quote"),
        }
        assert!(Cli::try_parse_from(["rocks", "quote"]).is_err());
    }

    #[test]
    fn lookup_parses_limit() {
        let cli = Cli::try_parse_from(["rocks", "lookup", "apple", "--limit", "3"]).unwrap();
        match cli.command {
            Commands::Lookup { query, limit, data_dir } => {
                assert_eq!(query, "apple");
                assert_eq!(limit, 3);
                assert_eq!(data_dir, PathBuf::from("filtered_data"));
            }
            _ => panic!("expected lookup"),
        }
    }
}
