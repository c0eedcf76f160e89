//! Ledger state tracking for one trust fund within one iteration

use serde::{Deserialize, Serialize};

/// Flows and closing balance of one fund for one projection year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FundYear {
    /// Closing balance, never negative
    pub balance: f64,
    pub tax_income: f64,
    pub interest_income: f64,
    pub benefit_outlay: f64,
    pub admin_expense: f64,

    /// Cost the fund could not cover this year (zero while solvent)
    pub shortfall: f64,

    /// Whether the fund closed the year with a positive balance
    pub solvent: bool,
}

impl FundYear {
    /// Income minus cost, before the depletion floor
    pub fn net_flow(&self) -> f64 {
        self.tax_income + self.interest_income - self.benefit_outlay - self.admin_expense
    }
}

/// Running balance of one fund
///
/// The balance is floored at zero: a year whose unclamped update would go
/// negative marks the fund depleted and the next year starts from exactly
/// zero, never from the negative carry-forward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FundLedger {
    balance: f64,
    depleted: bool,
    first_depleted_year: Option<u32>,
}

impl FundLedger {
    pub fn new(opening_balance: f64) -> Self {
        let balance = opening_balance.max(0.0);
        Self {
            balance,
            depleted: balance <= 0.0,
            first_depleted_year: None,
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Whether the fund has been exhausted at any point so far
    pub fn depleted(&self) -> bool {
        self.depleted
    }

    /// Calendar year in which the fund was first exhausted
    pub fn first_depleted_year(&self) -> Option<u32> {
        self.first_depleted_year
    }

    /// Advance the ledger by one year
    ///
    /// Interest is credited only on a positive opening balance.
    pub fn step(
        &mut self,
        year: u32,
        tax_income: f64,
        benefit_outlay: f64,
        admin_expense: f64,
        interest_rate: f64,
    ) -> FundYear {
        let interest_income = if self.balance > 0.0 {
            self.balance * interest_rate
        } else {
            0.0
        };

        let unclamped = self.balance + tax_income + interest_income - benefit_outlay - admin_expense;
        let solvent = unclamped > 0.0;
        if !solvent {
            self.depleted = true;
            self.first_depleted_year.get_or_insert(year);
        }
        self.balance = unclamped.max(0.0);

        FundYear {
            balance: self.balance,
            tax_income,
            interest_income,
            benefit_outlay,
            admin_expense,
            shortfall: (-unclamped).max(0.0),
            solvent,
        }
    }
}

/// Demographic and benefit state of the program within one iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrustFundState {
    pub oasi: FundLedger,
    pub di: FundLedger,

    /// Beneficiaries in millions
    pub oasi_beneficiaries: f64,
    pub di_beneficiaries: f64,

    /// Average annual benefit in dollars, before the retirement-age factor
    pub oasi_average_benefit: f64,
    pub di_average_benefit: f64,

    /// Taxable payroll before coverage erosion and cap policy
    pub taxable_payroll: f64,
}

impl TrustFundState {
    pub fn combined_balance(&self) -> f64 {
        self.oasi.balance() + self.di.balance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_step_with_interest() {
        let mut ledger = FundLedger::new(100.0);
        let year = ledger.step(2026, 50.0, 40.0, 1.0, 0.05);
        assert_relative_eq!(year.interest_income, 5.0);
        assert_relative_eq!(year.balance, 114.0);
        assert!(year.solvent);
        assert!(!ledger.depleted());
    }

    #[test]
    fn test_depletion_clamps_to_zero() {
        let mut ledger = FundLedger::new(10.0);
        let year = ledger.step(2026, 0.0, 30.0, 0.0, 0.0);
        assert_eq!(year.balance, 0.0);
        assert_relative_eq!(year.shortfall, 20.0);
        assert!(!year.solvent);
        assert!(ledger.depleted());
        assert_eq!(ledger.first_depleted_year(), Some(2026));
    }

    #[test]
    fn test_recursion_restarts_from_zero() {
        let mut ledger = FundLedger::new(10.0);
        ledger.step(2026, 0.0, 30.0, 0.0, 0.10);

        // Restarts from 0, not from -20, and earns no interest on zero
        let year = ledger.step(2027, 25.0, 5.0, 0.0, 0.10);
        assert_eq!(year.interest_income, 0.0);
        assert_relative_eq!(year.balance, 20.0);
        assert!(year.solvent);
        assert_eq!(ledger.first_depleted_year(), Some(2026));
    }

    #[test]
    fn test_exact_zero_counts_as_depleted() {
        let mut ledger = FundLedger::new(10.0);
        let year = ledger.step(2026, 0.0, 10.0, 0.0, 0.0);
        assert_eq!(year.balance, 0.0);
        assert!(!year.solvent);
        assert!(ledger.depleted());
    }

    #[test]
    fn test_net_flow() {
        let year = FundYear {
            balance: 0.0,
            tax_income: 10.0,
            interest_income: 2.0,
            benefit_outlay: 15.0,
            admin_expense: 1.0,
            shortfall: 0.0,
            solvent: true,
        };
        assert_relative_eq!(year.net_flow(), -4.0);
    }
}
