//! Discretionary appropriations

use serde::{Deserialize, Serialize};

/// Base-year appropriations ($ billions) and growth by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscretionaryAssumptions {
    pub defense: f64,
    pub nondefense: f64,
    pub defense_growth: f64,
    pub nondefense_growth: f64,

    /// Yearly noise from supplemental appropriations
    pub noise_sd: f64,

    /// Years a nominal freeze lasts under the freeze scenario
    pub freeze_years: u32,
}

impl Default for DiscretionaryAssumptions {
    fn default() -> Self {
        Self {
            defense: 900.0,
            nondefense: 950.0,
            defense_growth: 0.023,
            nondefense_growth: 0.023,
            noise_sd: 0.01,
            freeze_years: 10,
        }
    }
}
