//! Medicare and Medicaid assumptions
//!
//! Enrollment in millions, per-enrollee costs in dollars per year.

use serde::{Deserialize, Serialize};

/// Medicare enrollment and per-enrollee cost assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicareAssumptions {
    pub enrollment: f64,
    pub enrollment_growth: f64,

    /// Standard deviation of the once-per-path demographic shock
    pub demographic_shock_sd: f64,

    /// Gross cost per enrollee in the base year
    pub cost_per_enrollee: f64,

    /// Nominal per-enrollee cost growth, including excess cost growth
    pub cost_growth: f64,
    pub cost_noise_sd: f64,

    /// Share of gross cost offset by beneficiary premiums
    pub premium_offset: f64,

    /// Eligibility expansion in effect
    pub expansion_enabled: bool,

    /// Proportional enrollment increase under expansion
    pub expansion_enrollment_boost: f64,
}

impl Default for MedicareAssumptions {
    fn default() -> Self {
        Self {
            enrollment: 68.0,
            enrollment_growth: 0.022,
            demographic_shock_sd: 0.08,
            cost_per_enrollee: 16_000.0,
            cost_growth: 0.045,
            cost_noise_sd: 0.02,
            premium_offset: 0.15,
            expansion_enabled: false,
            expansion_enrollment_boost: 0.10,
        }
    }
}

impl MedicareAssumptions {
    /// Enrollment multiplier from eligibility policy
    pub fn enrollment_factor(&self) -> f64 {
        if self.expansion_enabled {
            1.0 + self.expansion_enrollment_boost
        } else {
            1.0
        }
    }
}

/// Medicaid enrollment, cost and federal matching assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicaidAssumptions {
    pub enrollment: f64,
    pub enrollment_growth: f64,
    pub demographic_shock_sd: f64,

    /// Combined federal and state cost per enrollee
    pub cost_per_enrollee: f64,
    pub cost_growth: f64,
    pub cost_noise_sd: f64,

    /// Federal matching share for traditional enrollees
    pub federal_share: f64,

    pub expansion_enabled: bool,

    /// Additional enrollees under expansion
    pub expansion_enrollees: f64,

    /// Federal matching share for expansion enrollees
    pub expansion_federal_share: f64,
}

impl Default for MedicaidAssumptions {
    fn default() -> Self {
        Self {
            enrollment: 80.0,
            enrollment_growth: 0.008,
            demographic_shock_sd: 0.05,
            cost_per_enrollee: 12_000.0,
            cost_growth: 0.045,
            cost_noise_sd: 0.03,
            federal_share: 0.62,
            expansion_enabled: false,
            expansion_enrollees: 6.0,
            expansion_federal_share: 0.90,
        }
    }
}

impl MedicaidAssumptions {
    /// Expansion enrollees in the base year, zero when expansion is off
    pub fn base_expansion_enrollees(&self) -> f64 {
        if self.expansion_enabled {
            self.expansion_enrollees
        } else {
            0.0
        }
    }
}
