//! Horizon-level queries over a unified budget

use serde::{Deserialize, Serialize};

use crate::projection::guarded_div;

use super::table::UnifiedBudget;

/// Totals and debt trajectory implied by a unified budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiscalSummary {
    pub start_year: u32,
    pub end_year: u32,
    pub total_revenue: f64,
    pub total_spending: f64,

    /// Sum of yearly deficits (negative) and surpluses (positive)
    pub cumulative_deficit: f64,

    /// Debt held by the public at the end of each year
    pub debt_path: Vec<f64>,
    pub debt_to_gdp: Vec<f64>,

    pub average_deficit_share: f64,
    pub final_deficit_share: f64,
    pub final_debt_to_gdp: f64,
}

impl FiscalSummary {
    /// Summarise `budget`, rolling debt forward from `initial_debt`
    ///
    /// Debt grows by each year's deficit: `debt(t) = debt(t-1) - deficit_surplus(t)`.
    pub fn from_budget(budget: &UnifiedBudget, initial_debt: f64) -> Self {
        let mut debt = initial_debt;
        let mut debt_path = Vec::with_capacity(budget.len());
        let mut debt_to_gdp = Vec::with_capacity(budget.len());
        for row in &budget.rows {
            debt -= row.deficit_surplus;
            debt_path.push(debt);
            debt_to_gdp.push(if row.gdp > 0.0 { debt / row.gdp } else { 0.0 });
        }

        let shares: Vec<f64> = budget.rows.iter().map(|r| r.deficit_share_of_gdp()).collect();
        let average_deficit_share = if shares.is_empty() {
            0.0
        } else {
            shares.iter().sum::<f64>() / shares.len() as f64
        };

        Self {
            start_year: budget.rows.first().map(|r| r.year).unwrap_or(0),
            end_year: budget.rows.last().map(|r| r.year).unwrap_or(0),
            total_revenue: budget.rows.iter().map(|r| r.total_revenue).sum(),
            total_spending: budget.rows.iter().map(|r| r.total_spending).sum(),
            cumulative_deficit: budget.rows.iter().map(|r| r.deficit_surplus).sum(),
            average_deficit_share,
            final_deficit_share: shares.last().copied().unwrap_or(0.0),
            final_debt_to_gdp: debt_to_gdp.last().copied().unwrap_or(0.0),
            debt_path,
            debt_to_gdp,
        }
    }
}

/// Permanent primary-balance adjustment, as a share of GDP, that brings debt
/// to `target_debt_ratio` of GDP at the end of the budget horizon
///
/// ```text
/// gap = (D0 - sum(pb_t * v^t) - target * GDP_T * v^T) / sum(GDP_t * v^t)
/// ```
///
/// where `pb_t` is the primary balance and `v = 1 / (1 + discount_rate)`. A
/// positive gap means revenue must rise or spending fall by that share of
/// GDP every year.
pub fn calculate_fiscal_gap(
    budget: &UnifiedBudget,
    initial_debt: f64,
    target_debt_ratio: f64,
    discount_rate: f64,
) -> f64 {
    let v = guarded_div(1.0, 1.0 + discount_rate, 1.0, "fiscal gap discount factor");

    let mut pv_primary = 0.0;
    let mut pv_gdp = 0.0;
    let mut factor = 1.0;
    for row in &budget.rows {
        factor *= v;
        pv_primary += row.primary_deficit * factor;
        pv_gdp += row.gdp * factor;
    }
    let terminal_gdp = budget.rows.last().map(|r| r.gdp).unwrap_or(0.0);
    let pv_target_debt = target_debt_ratio * terminal_gdp * factor;

    guarded_div(
        initial_debt - pv_primary - pv_target_debt,
        pv_gdp,
        0.0,
        "fiscal gap present value of GDP",
    )
}
