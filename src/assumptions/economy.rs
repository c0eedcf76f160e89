//! Shared economic baseline: calendar anchor, output and price growth

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Base years accepted from override files
pub const BASE_YEAR_RANGE: RangeInclusive<u32> = 1900..=2200;

/// Economic baseline used by every component and by the aggregator's
/// share-of-output calculations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicAssumptions {
    /// Last actual year; projections start at `base_year + 1`
    pub base_year: u32,

    /// Nominal GDP in the base year ($ billions)
    pub gdp: f64,

    /// Annual nominal GDP growth
    pub nominal_gdp_growth: f64,

    /// Annual price inflation
    pub inflation: f64,
}

impl Default for EconomicAssumptions {
    fn default() -> Self {
        Self {
            base_year: 2025,
            gdp: 29_000.0,
            nominal_gdp_growth: 0.040,
            inflation: 0.023,
        }
    }
}

impl EconomicAssumptions {
    /// First projected calendar year
    pub fn start_year(&self) -> u32 {
        self.base_year.saturating_add(1)
    }

    /// Deterministic nominal GDP path, one value per projection year
    pub fn gdp_path(&self, years: usize) -> Vec<f64> {
        let mut gdp = self.gdp;
        let mut path = Vec::with_capacity(years);
        for _ in 0..years {
            gdp *= 1.0 + self.nominal_gdp_growth;
            path.push(gdp);
        }
        path
    }
}
