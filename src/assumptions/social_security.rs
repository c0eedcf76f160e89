//! Social Security trust fund assumptions
//!
//! Dollar amounts are in $ billions, beneficiary counts in millions and
//! average benefits in dollars per year. The defaults are calibrated so that
//! the primary (OASI) fund is exhausted roughly a decade after the base year,
//! in line with published actuarial estimates.

use serde::{Deserialize, Serialize};

use crate::projection::guarded_div;

/// Assumptions for the two-ledger retirement/disability insurance program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialSecurityAssumptions {
    // ---- Opening balances ----
    /// Primary (old-age and survivors) fund balance
    pub oasi_balance: f64,

    /// Secondary (disability) fund balance
    pub di_balance: f64,

    // ---- Tax income ----
    /// Taxable payroll in the base year
    pub taxable_payroll: f64,

    /// Current combined payroll tax rate
    pub payroll_tax_rate: f64,

    /// Combined rate the fund allocations below were calibrated against
    pub baseline_payroll_rate: f64,

    /// OASI share of payroll at the calibration rate
    pub oasi_tax_rate: f64,

    /// DI share of payroll at the calibration rate
    pub di_tax_rate: f64,

    /// Annual wage-index growth
    pub wage_growth: f64,

    /// Standard deviation of the yearly wage-index noise factor
    pub wage_noise_sd: f64,

    /// Yearly erosion of the share of earnings under the taxable maximum
    pub cap_erosion_rate: f64,

    /// Floor on the eroded taxable coverage factor
    pub min_taxable_coverage: f64,

    /// Whether the taxable-wage cap has been removed
    pub taxable_maximum_removed: bool,

    /// Taxable payroll multiplier applied when the cap is removed
    pub cap_removal_multiplier: f64,

    /// Share of benefits returned to the funds through income taxation
    pub benefit_taxation_rate: f64,

    // ---- Demographics ----
    pub oasi_beneficiaries: f64,
    pub di_beneficiaries: f64,
    pub oasi_beneficiary_growth: f64,
    pub di_beneficiary_growth: f64,

    /// Standard deviation of the once-per-path demographic shock
    pub demographic_shock_sd: f64,

    // ---- Benefits ----
    pub oasi_average_benefit: f64,
    pub di_average_benefit: f64,

    /// Cost-of-living adjustment
    pub cola_rate: f64,
    pub cola_noise_sd: f64,

    /// Full retirement age in effect
    pub full_retirement_age: f64,

    /// Full retirement age the average benefits were measured under
    pub baseline_retirement_age: f64,

    /// Benefit reduction per year of retirement-age increase
    pub retirement_age_benefit_effect: f64,

    /// Lower bound on the retirement-age benefit factor
    pub benefit_factor_floor: f64,

    /// Upper bound on the retirement-age benefit factor
    pub benefit_factor_ceiling: f64,

    // ---- Fund operations ----
    /// Interest credited on positive fund balances
    pub trust_fund_interest_rate: f64,

    /// Administrative expense as a share of benefits
    pub oasi_admin_rate: f64,
    pub di_admin_rate: f64,
}

impl Default for SocialSecurityAssumptions {
    fn default() -> Self {
        Self {
            oasi_balance: 2_540.0,
            di_balance: 150.0,
            taxable_payroll: 10_000.0,
            payroll_tax_rate: 0.124,
            baseline_payroll_rate: 0.124,
            oasi_tax_rate: 0.106,
            di_tax_rate: 0.018,
            wage_growth: 0.038,
            wage_noise_sd: 0.01,
            cap_erosion_rate: 0.001,
            min_taxable_coverage: 0.80,
            taxable_maximum_removed: false,
            cap_removal_multiplier: 1.18,
            benefit_taxation_rate: 0.045,
            oasi_beneficiaries: 58.0,
            di_beneficiaries: 7.3,
            oasi_beneficiary_growth: 0.022,
            di_beneficiary_growth: 0.003,
            demographic_shock_sd: 0.08,
            oasi_average_benefit: 22_400.0,
            di_average_benefit: 18_500.0,
            cola_rate: 0.025,
            cola_noise_sd: 0.003,
            full_retirement_age: 67.0,
            baseline_retirement_age: 67.0,
            retirement_age_benefit_effect: 0.0667,
            benefit_factor_floor: 0.70,
            benefit_factor_ceiling: 1.10,
            trust_fund_interest_rate: 0.025,
            oasi_admin_rate: 0.0035,
            di_admin_rate: 0.02,
        }
    }
}

impl SocialSecurityAssumptions {
    /// Ratio of the current payroll tax rate to the calibration rate
    ///
    /// A zero calibration rate falls back to 1.0 (no scaling).
    pub fn payroll_rate_ratio(&self) -> f64 {
        guarded_div(
            self.payroll_tax_rate,
            self.baseline_payroll_rate,
            1.0,
            "social security payroll rate ratio",
        )
    }

    /// Benefit factor from the retirement-age policy, bounded to
    /// `[benefit_factor_floor, benefit_factor_ceiling]`
    ///
    /// Raising the eligibility age lowers the effective average benefit.
    pub fn retirement_age_factor(&self) -> f64 {
        let shift = self.full_retirement_age - self.baseline_retirement_age;
        (1.0 - self.retirement_age_benefit_effect * shift)
            .clamp(self.benefit_factor_floor, self.benefit_factor_ceiling)
    }

    /// Taxable payroll multiplier from the cap policy
    pub fn cap_multiplier(&self) -> f64 {
        if self.taxable_maximum_removed {
            self.cap_removal_multiplier
        } else {
            1.0
        }
    }

    /// Share of earnings still under the taxable maximum after `year` years
    pub fn taxable_coverage(&self, year: u32) -> f64 {
        (1.0 - self.cap_erosion_rate)
            .powi(year as i32)
            .max(self.min_taxable_coverage)
    }
}
