//! Property tests for filter/project invariants.
//!
//! 1. Order preservation — kept rows appear in source order
//! 2. Exact membership — a row survives iff its market is allow-listed
//! 3. Projection shape — output header is exactly `symbol,name`
//! 4. Determinism — identical input renders byte-identical CSV

use proptest::prelude::*;
use rocks_core::{transform, DatasetSpec, Table, EQUITY_MARKETS};
use std::path::Path;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_market() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("New York Stock Exchange".to_string()),
        Just("NYSE MKT".to_string()),
        Just("NASDAQ Global Select".to_string()),
        Just("nyse mkt".to_string()),
        Just("Toronto Stock Exchange".to_string()),
        Just("us_market".to_string()),
        Just(String::new()),
    ]
}

fn arb_field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,&.\"-]{0,12}"
}

fn arb_rows() -> impl Strategy<Value = Vec<(String, String, String)>> {
    prop::collection::vec((arb_field(), arb_field(), arb_market()), 0..40)
}

fn build_table(rows: &[(String, String, String)]) -> Table {
    let headers = vec![
        "symbol".to_string(),
        "name".to_string(),
        "currency".to_string(),
        "market".to_string(),
    ];
    let rows = rows
        .iter()
        .map(|(s, n, m)| vec![s.clone(), n.clone(), "USD".to_string(), m.clone()])
        .collect();
    Table::new("prop.csv", headers, rows).unwrap()
}

proptest! {
    /// Kept rows are exactly the allow-listed ones, in source order.
    #[test]
    fn equities_filter_is_exact_and_ordered(rows in arb_rows()) {
        let out = transform(&DatasetSpec::equities(), &build_table(&rows)).unwrap();

        let expected: Vec<Vec<String>> = rows
            .iter()
            .filter(|(_, _, m)| EQUITY_MARKETS.contains(&m.as_str()))
            .map(|(s, n, _)| vec![s.clone(), n.clone()])
            .collect();
        let actual: Vec<Vec<String>> = out.records().map(|r| r.values().to_vec()).collect();

        prop_assert_eq!(actual, expected);
        prop_assert!(out.len() <= rows.len());
    }

    /// Funds survive iff market == "us_market".
    #[test]
    fn etf_filter_matches_single_market(rows in arb_rows()) {
        let out = transform(&DatasetSpec::etfs(), &build_table(&rows)).unwrap();
        let expected = rows.iter().filter(|(_, _, m)| m == "us_market").count();
        prop_assert_eq!(out.len(), expected);
    }

    /// Output always carries exactly the projected header.
    #[test]
    fn output_header_is_symbol_name(rows in arb_rows()) {
        let out = transform(&DatasetSpec::equities(), &build_table(&rows)).unwrap();
        let expected = ["symbol".to_string(), "name".to_string()];
        prop_assert_eq!(out.headers(), expected.as_slice());
        let csv = out.to_csv_string().unwrap();
        prop_assert!(csv.starts_with("symbol,name\n"));
    }

    /// Rendering survives a parse round trip and is deterministic.
    #[test]
    fn rendering_is_deterministic(rows in arb_rows()) {
        let table = build_table(&rows);
        let first = transform(&DatasetSpec::equities(), &table).unwrap().to_csv_string().unwrap();
        let second = transform(&DatasetSpec::equities(), &table).unwrap().to_csv_string().unwrap();
        prop_assert_eq!(&first, &second);

        let reparsed = Table::from_reader(first.as_bytes(), Path::new("out.csv")).unwrap();
        let out = transform(&DatasetSpec::equities(), &table).unwrap();
        prop_assert_eq!(reparsed.len(), out.len());
    }
}
