//! Unified per-year budget table and horizon reconciliation

use log::warn;
use serde::{Deserialize, Serialize};

/// One row of the unified budget, $ billions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedBudgetRow {
    pub year: u32,
    pub total_revenue: f64,
    pub healthcare_spending: f64,
    pub social_security_spending: f64,
    pub medicare_spending: f64,
    pub medicaid_spending: f64,
    pub discretionary_spending: f64,
    pub interest_spending: f64,
    pub mandatory_spending: f64,
    pub total_spending: f64,
    pub deficit_surplus: f64,
    pub primary_deficit: f64,

    /// Nominal GDP, used for share-of-output reporting
    pub gdp: f64,
}

impl UnifiedBudgetRow {
    /// Build a row from component values, deriving every identity column
    #[allow(clippy::too_many_arguments)]
    pub fn from_components(
        year: u32,
        total_revenue: f64,
        social_security_spending: f64,
        medicare_spending: f64,
        medicaid_spending: f64,
        discretionary_spending: f64,
        interest_spending: f64,
        gdp: f64,
    ) -> Self {
        let healthcare_spending = medicare_spending + medicaid_spending;
        let mandatory_spending = social_security_spending + healthcare_spending;
        let total_spending = mandatory_spending + discretionary_spending + interest_spending;

        Self {
            year,
            total_revenue,
            healthcare_spending,
            social_security_spending,
            medicare_spending,
            medicaid_spending,
            discretionary_spending,
            interest_spending,
            mandatory_spending,
            total_spending,
            deficit_surplus: total_revenue - total_spending,
            primary_deficit: total_revenue - (total_spending - interest_spending),
            gdp,
        }
    }

    pub fn deficit_share_of_gdp(&self) -> f64 {
        if self.gdp > 0.0 {
            self.deficit_surplus / self.gdp
        } else {
            0.0
        }
    }
}

/// Full unified budget for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedBudget {
    pub rows: Vec<UnifiedBudgetRow>,
}

impl UnifiedBudget {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn years(&self) -> Vec<u32> {
        self.rows.iter().map(|r| r.year).collect()
    }

    /// Extract one column
    pub fn column<F>(&self, f: F) -> Vec<f64>
    where
        F: Fn(&UnifiedBudgetRow) -> f64,
    {
        self.rows.iter().map(f).collect()
    }

    /// Write the table as CSV with a header row
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Force a series to exactly `len` values
///
/// Short series repeat their last value, long series are truncated. Either
/// case is logged; neither is an error. An empty series becomes zeros.
pub fn reconcile_length(component: &str, mut values: Vec<f64>, len: usize) -> Vec<f64> {
    let actual = values.len();
    if actual < len {
        warn!(
            "{} produced {} years, expected {}: padded with final value",
            component, actual, len
        );
        let edge = values.last().copied().unwrap_or(0.0);
        values.resize(len, edge);
    } else if actual > len {
        warn!(
            "{} produced {} years, expected {}: truncated",
            component, actual, len
        );
        values.truncate(len);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reconcile_pads_with_edge_value() {
        assert_eq!(reconcile_length("x", vec![1.0, 2.0], 4), vec![1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_reconcile_truncates() {
        assert_eq!(reconcile_length("x", vec![1.0, 2.0, 3.0], 2), vec![1.0, 2.0]);
    }

    #[test]
    fn test_reconcile_empty_series() {
        assert_eq!(reconcile_length("x", vec![], 3), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_row_identities() {
        let row = UnifiedBudgetRow::from_components(2026, 5_000.0, 1_600.0, 1_000.0, 600.0, 1_900.0, 1_000.0, 30_000.0);
        assert_eq!(row.healthcare_spending, 1_600.0);
        assert_eq!(row.mandatory_spending, 3_200.0);
        assert_eq!(row.total_spending, 6_100.0);
        assert_eq!(row.deficit_surplus, -1_100.0);
        assert_eq!(row.primary_deficit, -100.0);
    }

    #[test]
    fn test_write_csv_has_header() {
        let budget = UnifiedBudget {
            rows: vec![UnifiedBudgetRow::from_components(2026, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0)],
        };
        let mut out = Vec::new();
        budget.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("year,total_revenue,healthcare_spending"));
        assert_eq!(text.lines().count(), 2);
    }

    proptest! {
        #[test]
        fn test_reconcile_length_is_exact(values in prop::collection::vec(-1e6f64..1e6, 0..100), len in 1usize..100) {
            prop_assert_eq!(reconcile_length("p", values, len).len(), len);
        }

        #[test]
        fn test_identities_hold(
            rev in 0f64..1e5, ss in 0f64..1e5, mc in 0f64..1e5,
            md in 0f64..1e5, disc in 0f64..1e5, int in 0f64..1e5,
        ) {
            let r = UnifiedBudgetRow::from_components(2030, rev, ss, mc, md, disc, int, 1e5);
            prop_assert!((r.mandatory_spending + r.discretionary_spending + r.interest_spending - r.total_spending).abs() <= 1e-9 * r.total_spending.max(1.0));
            prop_assert_eq!(r.deficit_surplus, r.total_revenue - r.total_spending);
            prop_assert_eq!(r.primary_deficit, r.total_revenue - (r.total_spending - r.interest_spending));
        }
    }
}
