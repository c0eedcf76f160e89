//! Depletion-year statistics for trust fund projections
//!
//! Two estimators with different statistical meaning:
//!
//! - [`estimate_from_trajectories`] works on raw per-iteration balances and
//!   reports an empirical depletion probability.
//! - [`estimate_from_mean_path`] works on a single averaged path. Its
//!   `depletes` flag is a yes/no answer about that path, not a probability.
//!
//! Neither estimate is stored anywhere; both are recomputed on request.

use serde::{Deserialize, Serialize};

use crate::projection::{mean, percentile_sorted, std_dev, ScenarioSet};
use crate::trust_fund::{TrustFund, TrustFundRun};

/// Depletion distribution over Monte Carlo iterations
///
/// The year statistics are computed only over iterations that depleted and
/// are `None` when none did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvencyEstimate {
    pub fund: TrustFund,
    pub iterations: usize,
    pub depleted_iterations: usize,

    /// Share of iterations that depleted within the horizon
    pub probability_depleted: f64,

    pub depletion_year_mean: Option<f64>,
    pub depletion_year_median: Option<f64>,
    pub depletion_year_std_dev: Option<f64>,
    pub depletion_year_p10: Option<f64>,
    pub depletion_year_p90: Option<f64>,
}

impl SolvencyEstimate {
    /// Median depletion year rounded to a calendar year
    pub fn headline_year(&self) -> Option<u32> {
        self.depletion_year_median
            .or(self.depletion_year_mean)
            .map(|y| y.round() as u32)
    }
}

/// Depletion of a single averaged trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanPathSolvency {
    pub fund: TrustFund,

    /// First calendar year the mean balance reaches zero
    pub depletion_year: Option<u32>,

    /// Whether the mean path depletes at all. Not an empirical probability.
    pub depletes: bool,
}

impl MeanPathSolvency {
    /// 1.0 if the mean path depletes, otherwise 0.0
    pub fn indicator(&self) -> f64 {
        if self.depletes {
            1.0
        } else {
            0.0
        }
    }
}

/// First calendar year a balance path reaches zero
pub fn first_depletion_year(balances: &[f64], start_year: u32) -> Option<u32> {
    balances
        .iter()
        .position(|b| *b <= 0.0)
        .map(|i| start_year + i as u32)
}

/// Estimate from raw per-iteration balances, `trajectories[iteration][year]`
pub fn estimate_from_trajectories(
    fund: TrustFund,
    trajectories: &[Vec<f64>],
    start_year: u32,
) -> SolvencyEstimate {
    let depletions: Vec<Option<u32>> = trajectories
        .iter()
        .map(|path| first_depletion_year(path, start_year))
        .collect();
    estimate_from_depletion_years(fund, &depletions)
}

/// Estimate from each iteration's first depletion year, `None` for
/// iterations that stay solvent through the horizon
pub fn estimate_from_depletion_years(fund: TrustFund, depletions: &[Option<u32>]) -> SolvencyEstimate {
    let mut years: Vec<f64> = depletions.iter().flatten().map(|y| *y as f64).collect();

    let iterations = depletions.len();
    let depleted_iterations = years.len();
    let probability_depleted = if iterations == 0 {
        0.0
    } else {
        depleted_iterations as f64 / iterations as f64
    };

    if years.is_empty() {
        return SolvencyEstimate {
            fund,
            iterations,
            depleted_iterations,
            probability_depleted,
            depletion_year_mean: None,
            depletion_year_median: None,
            depletion_year_std_dev: None,
            depletion_year_p10: None,
            depletion_year_p90: None,
        };
    }

    years.sort_by(|a, b| a.total_cmp(b));
    let avg = mean(&years);

    SolvencyEstimate {
        fund,
        iterations,
        depleted_iterations,
        probability_depleted,
        depletion_year_mean: Some(avg),
        depletion_year_median: Some(percentile_sorted(&years, 50.0)),
        depletion_year_std_dev: Some(std_dev(&years, avg)),
        depletion_year_p10: Some(percentile_sorted(&years, 10.0)),
        depletion_year_p90: Some(percentile_sorted(&years, 90.0)),
    }
}

/// Estimate from a single averaged balance path
pub fn estimate_from_mean_path(fund: TrustFund, mean_path: &[f64], start_year: u32) -> MeanPathSolvency {
    let depletion_year = first_depletion_year(mean_path, start_year);
    MeanPathSolvency {
        fund,
        depletion_year,
        depletes: depletion_year.is_some(),
    }
}

/// Solvency of every fund for one trust fund run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvencyReport {
    pub scenario: String,
    pub start_year: u32,
    pub horizon_years: u32,
    pub estimates: Vec<SolvencyEstimate>,
}

impl SolvencyReport {
    pub fn from_run(run: &TrustFundRun) -> Self {
        let horizon_years = run.paths.first().map(|p| p.years.len() as u32).unwrap_or(0);
        let depletions: Vec<[Option<u32>; 3]> = run
            .paths
            .iter()
            .map(|p| TrustFund::ALL.map(|fund| p.depletion_year(fund)))
            .collect();
        Self::from_depletion_years(run.scenario.name(), run.start_year, horizon_years, &depletions)
    }

    /// Build from per-iteration depletion years, one entry per fund in
    /// [`TrustFund::ALL`] order
    pub fn from_depletion_years(
        scenario: &str,
        start_year: u32,
        horizon_years: u32,
        depletions: &[[Option<u32>; 3]],
    ) -> Self {
        let estimates = TrustFund::ALL
            .iter()
            .enumerate()
            .map(|(i, fund)| {
                let per_iteration: Vec<Option<u32>> = depletions.iter().map(|d| d[i]).collect();
                estimate_from_depletion_years(*fund, &per_iteration)
            })
            .collect();

        Self {
            scenario: scenario.to_string(),
            start_year,
            horizon_years,
            estimates,
        }
    }

    pub fn fund(&self, fund: TrustFund) -> Option<&SolvencyEstimate> {
        self.estimates.iter().find(|e| e.fund == fund)
    }
}
