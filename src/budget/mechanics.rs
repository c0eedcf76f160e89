//! Structured policy-mechanics overrides
//!
//! A [`PolicyMechanics`] record is produced outside this crate (for example
//! by a bill-text extractor) and consumed as JSON. Every field is optional
//! and defaults to "no change". Unknown keys are rejected at parse time.
//!
//! Application is a pure function: [`PolicyMechanics::apply_to`] validates
//! the whole record first and only then builds a new [`Assumptions`] value.
//! The input is never touched, so a rejected record leaves the caller's
//! assumptions exactly as they were.

use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::error::OverrideError;
use crate::projection::MAX_YEARS;

/// Highest combined payroll tax rate a record may produce
pub const MAX_PAYROLL_RATE: f64 = 0.50;
/// Highest income or corporate rate a record may produce
pub const MAX_INCOME_RATE: f64 = 1.0;
/// Bounds on the full retirement age change, in years
pub const RETIREMENT_AGE_DELTA_RANGE: (f64, f64) = (-5.0, 10.0);
/// Bounds on any spending-growth delta
pub const GROWTH_DELTA_RANGE: (f64, f64) = (-0.10, 0.10);
/// Bounds on a healthcare target share of GDP
pub const TARGET_SHARE_RANGE: (f64, f64) = (0.0, 0.5);

/// Structural financing changes for the trust funds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingMechanism {
    /// Apply the payroll tax to all wages
    RemoveTaxableMaximum,
}

/// Additive changes to statutory tax rates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaxRateDeltas {
    pub payroll: f64,
    pub individual_income: f64,
    pub corporate: f64,
}

/// Additive changes to annual spending growth rates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpendingGrowthDeltas {
    pub defense: f64,
    pub nondefense: f64,
    pub medicare: f64,
    pub medicaid: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EligibilityExpansion {
    pub medicare: bool,
    pub medicaid: bool,
}

/// Externally supplied policy overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyMechanics {
    pub funding_mechanisms: Vec<FundingMechanism>,

    /// Federal healthcare spending target as a share of GDP
    pub target_spending_share: Option<f64>,

    /// Calendar year the target share is reached
    pub target_year: Option<u32>,

    pub tax_rate_deltas: TaxRateDeltas,

    /// Change to the full retirement age, in years
    pub retirement_age_delta: f64,

    pub spending_growth_deltas: SpendingGrowthDeltas,
    pub eligibility_expansion: EligibilityExpansion,
}

fn check_finite(field: &'static str, value: f64) -> Result<(), OverrideError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(OverrideError::NonFinite { field, value })
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), OverrideError> {
    check_finite(field, value)?;
    if value < min || value > max {
        return Err(OverrideError::OutOfRange { field, value, min, max });
    }
    Ok(())
}

impl PolicyMechanics {
    /// Parse a record from JSON, rejecting unknown keys
    pub fn from_json(json: &str) -> Result<Self, OverrideError> {
        Ok(serde_json::from_str(json)?)
    }

    /// True when the record changes nothing
    pub fn is_empty(&self) -> bool {
        *self == PolicyMechanics::default()
    }

    /// Healthcare target as `(share, year)`, when one is set
    pub fn healthcare_target(&self) -> Option<(f64, u32)> {
        self.target_spending_share.zip(self.target_year)
    }

    /// Check every field against the assumptions it would modify
    pub fn validate(&self, base: &Assumptions) -> Result<(), OverrideError> {
        let ss = &base.social_security;
        let rev = &base.revenue;
        let d = &self.tax_rate_deltas;

        check_range(
            "tax_rate_deltas.payroll",
            d.payroll,
            -ss.payroll_tax_rate,
            MAX_PAYROLL_RATE - ss.payroll_tax_rate,
        )?;
        check_range(
            "tax_rate_deltas.individual_income",
            d.individual_income,
            -rev.individual_income_rate,
            MAX_INCOME_RATE - rev.individual_income_rate,
        )?;
        check_range(
            "tax_rate_deltas.corporate",
            d.corporate,
            -rev.corporate_rate,
            MAX_INCOME_RATE - rev.corporate_rate,
        )?;

        let (age_min, age_max) = RETIREMENT_AGE_DELTA_RANGE;
        check_range("retirement_age_delta", self.retirement_age_delta, age_min, age_max)?;

        let g = &self.spending_growth_deltas;
        let (g_min, g_max) = GROWTH_DELTA_RANGE;
        check_range("spending_growth_deltas.defense", g.defense, g_min, g_max)?;
        check_range("spending_growth_deltas.nondefense", g.nondefense, g_min, g_max)?;
        check_range("spending_growth_deltas.medicare", g.medicare, g_min, g_max)?;
        check_range("spending_growth_deltas.medicaid", g.medicaid, g_min, g_max)?;

        match (self.target_spending_share, self.target_year) {
            (None, None) => {}
            (Some(share), Some(year)) => {
                let (s_min, s_max) = TARGET_SHARE_RANGE;
                check_range("target_spending_share", share, s_min, s_max)?;
                let first = base.economy.base_year;
                let last = first.saturating_add(MAX_YEARS);
                if year <= first || year > last {
                    return Err(OverrideError::TargetYear { year, first, last });
                }
            }
            _ => return Err(OverrideError::IncompleteTarget),
        }

        Ok(())
    }

    /// Validate, then return a new assumption set with the record applied
    pub fn apply_to(&self, base: &Assumptions) -> Result<Assumptions, OverrideError> {
        self.validate(base)?;

        let mut out = base.clone();
        let d = &self.tax_rate_deltas;
        let g = &self.spending_growth_deltas;

        out.social_security.payroll_tax_rate += d.payroll;
        out.revenue.payroll_rate += d.payroll;
        out.revenue.individual_income_rate += d.individual_income;
        out.revenue.corporate_rate += d.corporate;

        out.social_security.full_retirement_age += self.retirement_age_delta;

        for mechanism in &self.funding_mechanisms {
            match mechanism {
                FundingMechanism::RemoveTaxableMaximum => {
                    out.social_security.taxable_maximum_removed = true
                }
            }
        }

        out.discretionary.defense_growth += g.defense;
        out.discretionary.nondefense_growth += g.nondefense;
        out.medicare.cost_growth += g.medicare;
        out.medicaid.cost_growth += g.medicaid;

        out.medicare.expansion_enabled |= self.eligibility_expansion.medicare;
        out.medicaid.expansion_enabled |= self.eligibility_expansion.medicaid;

        Ok(out)
    }
}
