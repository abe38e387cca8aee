//! Market allow-lists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of market identifiers a row must match to survive the filter.
///
/// Matching is exact and case-sensitive: `"NYSE MKT"` does not admit
/// `"nyse mkt"` or `"NYSE MKT "`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList {
    markets: BTreeSet<String>,
}

impl AllowList {
    pub fn new<I, S>(markets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markets: markets.into_iter().map(Into::into).collect(),
        }
    }

    /// Allow-list admitting exactly one market.
    pub fn single(market: impl Into<String>) -> Self {
        Self::new([market])
    }

    pub fn contains(&self, market: &str) -> bool {
        self.markets.contains(market)
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.markets.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_exact() {
        let allow = AllowList::new(["New York Stock Exchange", "NYSE MKT"]);
        assert!(allow.contains("NYSE MKT"));
        assert!(!allow.contains("nyse mkt"));
        assert!(!allow.contains("NYSE MKT "));
        assert!(!allow.contains("NYSE"));
        assert!(!allow.contains(""));
    }

    #[test]
    fn single_admits_one_value() {
        let allow = AllowList::single("us_market");
        assert_eq!(allow.len(), 1);
        assert!(allow.contains("us_market"));
        assert!(!allow.contains("other_market"));
    }

    #[test]
    fn duplicates_collapse() {
        let allow = AllowList::new(["a", "a", "b"]);
        assert_eq!(allow.len(), 2);
        assert_eq!(allow.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
