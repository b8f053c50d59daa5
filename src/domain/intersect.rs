//! Issuers held in common across several filers.
//!
//! Presence-only: values and share counts play no part. Issuer names must match
//! exactly, so "Apple Inc." and "APPLE INC" are different issuers.

use crate::domain::aggregator::HoldingsTable;
use crate::domain::filing::FilerId;
use std::collections::HashSet;

/// Result of trying to build one filer's holdings table.
#[derive(Debug, Clone)]
pub enum FilerOutcome {
    Retrieved(HoldingsTable),
    Failed { filer: FilerId, reason: String },
}

impl FilerOutcome {
    pub fn filer(&self) -> &FilerId {
        match self {
            FilerOutcome::Retrieved(table) => &table.filer,
            FilerOutcome::Failed { filer, .. } => filer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedFiler {
    pub filer: FilerId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonHoldings {
    /// Issuers present in every included table, in the first included table's order.
    pub issuers: Vec<String>,
    pub included: Vec<FilerId>,
    pub excluded: Vec<ExcludedFiler>,
}

/// Intersects the issuer-name sets of `tables`. The output follows the first
/// table's row order. No tables, or any empty table, gives an empty list.
pub fn common_issuers(tables: &[&HoldingsTable]) -> Vec<String> {
    let Some((first, rest)) = tables.split_first() else {
        return Vec::new();
    };

    let others: Vec<HashSet<&str>> = rest.iter().map(|t| t.issuers().collect()).collect();

    let mut seen = HashSet::new();
    first
        .issuers()
        .filter(|issuer| others.iter().all(|set| set.contains(issuer)))
        .filter(|issuer| seen.insert(*issuer))
        .map(str::to_string)
        .collect()
}

/// Intersects the retrieved tables and reports the filers that were left out.
pub fn intersect(outcomes: &[FilerOutcome]) -> CommonHoldings {
    let mut tables = Vec::new();
    let mut excluded = Vec::new();

    for outcome in outcomes {
        match outcome {
            FilerOutcome::Retrieved(table) => tables.push(table),
            FilerOutcome::Failed { filer, reason } => excluded.push(ExcludedFiler {
                filer: filer.clone(),
                reason: reason.clone(),
            }),
        }
    }

    CommonHoldings {
        issuers: common_issuers(&tables),
        included: tables.iter().map(|t| t.filer.clone()).collect(),
        excluded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregator::aggregate_holdings;
    use crate::domain::filing::FilingDate;
    use crate::domain::holding::HoldingRecord;

    fn table(filer: &str, issuers: &[(&str, u64)]) -> HoldingsTable {
        let records: Vec<HoldingRecord> = issuers
            .iter()
            .map(|(name, value)| HoldingRecord::new(*name, *value, 1, FilingDate::Label("q3".into())))
            .collect();
        aggregate_holdings(FilerId::parse(filer).unwrap(), &records)
    }

    #[test]
    fn single_table_is_identity() {
        let t = table("1", &[("Apple", 30), ("Bank", 20), ("Coke", 10)]);
        assert_eq!(common_issuers(&[&t]), vec!["Apple", "Bank", "Coke"]);
    }

    #[test]
    fn intersection_of_three() {
        let a = table("1", &[("Apple", 30), ("Bank", 20), ("Coke", 10)]);
        let b = table("2", &[("Coke", 99), ("Apple", 1)]);
        let c = table("3", &[("Apple", 5), ("Coke", 5), ("Dell", 5)]);
        assert_eq!(common_issuers(&[&a, &b, &c]), vec!["Apple", "Coke"]);
    }

    #[test]
    fn order_follows_first_table() {
        let a = table("1", &[("Apple", 10), ("Coke", 30)]);
        let b = table("2", &[("Apple", 50), ("Coke", 1)]);
        assert_eq!(common_issuers(&[&a, &b]), vec!["Coke", "Apple"]);
        assert_eq!(common_issuers(&[&b, &a]), vec!["Apple", "Coke"]);
    }

    #[test]
    fn disjoint_tables_give_empty() {
        let a = table("1", &[("Apple", 1)]);
        let b = table("2", &[("Bank", 1)]);
        assert!(common_issuers(&[&a, &b]).is_empty());
    }

    #[test]
    fn empty_table_empties_intersection() {
        let a = table("1", &[("Apple", 1)]);
        let empty = table("2", &[]);
        assert!(common_issuers(&[&a, &empty]).is_empty());
        assert!(common_issuers(&[&empty]).is_empty());
    }

    #[test]
    fn names_match_exactly() {
        let a = table("1", &[("Apple Inc.", 1)]);
        let b = table("2", &[("APPLE INC.", 1)]);
        assert!(common_issuers(&[&a, &b]).is_empty());
    }

    #[test]
    fn failed_filers_are_excluded_and_reported() {
        let a = table("1", &[("Apple", 1), ("Bank", 1)]);
        let b = table("2", &[("Bank", 1)]);
        let outcomes = vec![
            FilerOutcome::Retrieved(a),
            FilerOutcome::Failed {
                filer: FilerId::parse("3").unwrap(),
                reason: "timed out".into(),
            },
            FilerOutcome::Retrieved(b),
        ];

        let result = intersect(&outcomes);
        assert_eq!(result.issuers, vec!["Bank"]);
        assert_eq!(result.included.len(), 2);
        assert_eq!(result.excluded.len(), 1);
        assert_eq!(result.excluded[0].filer.as_str(), "0000000003");
        assert_eq!(result.excluded[0].reason, "timed out");
    }

    #[test]
    fn all_failed_gives_empty_result() {
        let outcomes = vec![FilerOutcome::Failed {
            filer: FilerId::parse("9").unwrap(),
            reason: "gone".into(),
        }];
        let result = intersect(&outcomes);
        assert!(result.issuers.is_empty());
        assert!(result.included.is_empty());
        assert_eq!(outcomes[0].filer().as_str(), "0000000009");
    }
}
