//! Social-Security-style trust fund simulation
//!
//! Two ledgers are simulated year over year for every iteration:
//! - **OASI**: the primary old-age and survivors fund
//! - **DI**: the smaller disability fund
//!
//! Each year, per fund:
//!
//! ```text
//! balance(t) = max(0, balance(t-1) + tax(t) + interest(t) - benefits(t) - admin(t))
//! ```
//!
//! Interest accrues only on a positive opening balance. Once a fund is
//! exhausted the recursion continues from zero. The full per-iteration table
//! feeds solvency estimation; the aggregator only sees per-year statistics.

mod demographics;
mod simulator;
mod state;

pub use demographics::{sample_demographic_shock, DemographicTrend, SHOCK_CEILING, SHOCK_FLOOR};
pub use simulator::{TrustFundPath, TrustFundRun, TrustFundSimulator, TrustFundYear, SERIES};
pub use state::{FundLedger, FundYear, TrustFundState};

use serde::{Deserialize, Serialize};

use crate::projection::ScenarioSet;

/// Which balance a query refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustFund {
    /// Primary old-age and survivors fund
    Oasi,
    /// Secondary disability fund
    Di,
    /// Hypothetical combined OASDI balance
    Combined,
}

impl TrustFund {
    pub const ALL: [TrustFund; 3] = [TrustFund::Oasi, TrustFund::Di, TrustFund::Combined];

    pub fn name(&self) -> &'static str {
        match self {
            TrustFund::Oasi => "OASI",
            TrustFund::Di => "DI",
            TrustFund::Combined => "OASDI",
        }
    }

    /// Name of the balance series in a trust fund projection
    pub fn series_name(&self) -> &'static str {
        match self {
            TrustFund::Oasi => "oasi_balance",
            TrustFund::Di => "di_balance",
            TrustFund::Combined => "combined_balance",
        }
    }
}

/// Demographic, economic and legislated-reform scenarios for the trust funds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialSecurityScenario {
    Baseline,
    /// Faster wage growth, slower beneficiary growth
    Optimistic,
    /// Slower wage growth, faster beneficiary growth
    Pessimistic,
    /// Payroll rate phased up 0.2pt per year to +2pt
    ReformPackage,
}

impl SocialSecurityScenario {
    pub fn wage_growth_adjustment(&self) -> f64 {
        match self {
            SocialSecurityScenario::Optimistic => 0.005,
            SocialSecurityScenario::Pessimistic => -0.005,
            _ => 0.0,
        }
    }

    pub fn beneficiary_growth_adjustment(&self) -> f64 {
        match self {
            SocialSecurityScenario::Optimistic => -0.003,
            SocialSecurityScenario::Pessimistic => 0.003,
            _ => 0.0,
        }
    }

    /// Legislated payroll rate increase in projection year `t` (1-indexed)
    pub fn payroll_rate_increase(&self, t: u32) -> f64 {
        match self {
            SocialSecurityScenario::ReformPackage => (0.002 * t as f64).min(0.02),
            _ => 0.0,
        }
    }
}

impl ScenarioSet for SocialSecurityScenario {
    const COMPONENT: &'static str = "social_security";
    const ALL: &'static [Self] = &[
        SocialSecurityScenario::Baseline,
        SocialSecurityScenario::Optimistic,
        SocialSecurityScenario::Pessimistic,
        SocialSecurityScenario::ReformPackage,
    ];

    fn name(&self) -> &'static str {
        match self {
            SocialSecurityScenario::Baseline => "baseline",
            SocialSecurityScenario::Optimistic => "optimistic",
            SocialSecurityScenario::Pessimistic => "pessimistic",
            SocialSecurityScenario::ReformPackage => "reform_package",
        }
    }
}
