//! Beneficiary projection under a persistent demographic shock
//!
//! Each iteration draws one shock multiplier before its first year. The
//! multiplier scales the beneficiary growth trend in every year of that
//! path, modelling a macro scenario ("higher longevity throughout") rather
//! than year-to-year noise.

use rand::Rng;

use crate::assumptions::SocialSecurityAssumptions;
use crate::projection::sample_normal;

use super::SocialSecurityScenario;

/// Bounds on the demographic shock multiplier
pub const SHOCK_FLOOR: f64 = 0.5;
pub const SHOCK_CEILING: f64 = 1.5;

/// Draw the once-per-path demographic shock
pub fn sample_demographic_shock<R: Rng + ?Sized>(rng: &mut R, std_dev: f64) -> f64 {
    sample_normal(rng, 1.0, std_dev).clamp(SHOCK_FLOOR, SHOCK_CEILING)
}

/// Yearly beneficiary growth rates for one path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemographicTrend {
    pub oasi_growth: f64,
    pub di_growth: f64,
}

impl DemographicTrend {
    /// Trend growth scaled by the path's shock plus the scenario adjustment
    pub fn shocked(ss: &SocialSecurityAssumptions, scenario: SocialSecurityScenario, shock: f64) -> Self {
        let adjustment = scenario.beneficiary_growth_adjustment();
        Self {
            oasi_growth: ss.oasi_beneficiary_growth * shock + adjustment,
            di_growth: ss.di_beneficiary_growth * shock,
        }
    }

    /// Beneficiary counts after one more year
    pub fn advance(&self, oasi: f64, di: f64) -> (f64, f64) {
        (
            (oasi * (1.0 + self.oasi_growth)).max(0.0),
            (di * (1.0 + self.di_growth)).max(0.0),
        )
    }

    /// Beneficiary counts for `years` years starting from the base year
    pub fn project(&self, ss: &SocialSecurityAssumptions, years: u32) -> Vec<(f64, f64)> {
        let mut counts = (ss.oasi_beneficiaries, ss.di_beneficiaries);
        (0..years)
            .map(|_| {
                counts = self.advance(counts.0, counts.1);
                counts
            })
            .collect()
    }
}
