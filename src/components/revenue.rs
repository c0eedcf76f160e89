//! Federal receipts projection by source

use log::info;
use rand::Rng;

use crate::assumptions::{parameter_pairs, Assumptions, RevenueAssumptions};
use crate::projection::{
    noise_factor, sample_normal, ComponentKind, ComponentProjection, ExecutionMode,
    ProjectionRequest, ScenarioSet, StochasticComponent,
};

use super::RevenueScenario;

/// Series produced, in output order
pub const SERIES: [&str; 5] = ["total_revenue", "individual_income", "payroll", "corporate", "other"];

/// Receipts model: each source grows with GDP times its elasticity
#[derive(Debug, Clone)]
pub struct RevenueModel {
    assumptions: RevenueAssumptions,
    gdp_growth: f64,
    start_year: u32,
}

impl RevenueModel {
    pub fn new(assumptions: &Assumptions) -> Self {
        Self {
            assumptions: assumptions.revenue.clone(),
            gdp_growth: assumptions.economy.nominal_gdp_growth,
            start_year: assumptions.economy.start_year(),
        }
    }

    /// One iteration: `values[series][year]`
    fn simulate_path<R: Rng + ?Sized>(
        &self,
        years: u32,
        scenario: RevenueScenario,
        ratios: (f64, f64, f64),
        rng: &mut R,
    ) -> Vec<Vec<f64>> {
        let a = &self.assumptions;
        let (individual_ratio, payroll_ratio, corporate_ratio) = ratios;

        // Persists for the whole path
        let regime = sample_normal(rng, 0.0, a.growth_regime_sd);

        let mut individual = a.individual_income;
        let mut payroll = a.payroll;
        let mut corporate = a.corporate;
        let mut other = a.other;

        let mut out = vec![Vec::with_capacity(years as usize); SERIES.len()];
        for t in 1..=years {
            let growth = self.gdp_growth + regime + scenario.growth_adjustment(t);

            individual *= (1.0 + a.individual_income_elasticity * growth)
                * noise_factor(rng, a.individual_income_noise_sd);
            payroll *= (1.0 + a.payroll_elasticity * growth) * noise_factor(rng, a.payroll_noise_sd);
            corporate *=
                (1.0 + a.corporate_elasticity * growth) * noise_factor(rng, a.corporate_noise_sd);
            other *= (1.0 + a.other_elasticity * growth) * noise_factor(rng, a.other_noise_sd);

            let individual_out = individual * individual_ratio;
            let payroll_out = payroll * payroll_ratio;
            let corporate_out = corporate * corporate_ratio;

            out[0].push(individual_out + payroll_out + corporate_out + other);
            out[1].push(individual_out);
            out[2].push(payroll_out);
            out[3].push(corporate_out);
            out[4].push(other);
        }
        out
    }
}

impl StochasticComponent for RevenueModel {
    type Scenario = RevenueScenario;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Revenue
    }

    fn parameters(&self) -> Vec<(String, String)> {
        let mut params = parameter_pairs("revenue", &self.assumptions);
        params.push(("revenue.gdp_growth".to_string(), format!("{:?}", self.gdp_growth)));
        params.push(("revenue.start_year".to_string(), self.start_year.to_string()));
        params
    }

    fn project(
        &self,
        request: &ProjectionRequest<RevenueScenario>,
        mode: ExecutionMode,
    ) -> ComponentProjection {
        let scenario = request.scenario();
        info!(
            "projecting revenue: {} years x {} iterations, scenario {}",
            request.years(),
            request.iterations(),
            scenario.name()
        );

        let ratios = self.assumptions.rate_ratios();
        let matrices = self.runner(request, mode).run_series(
            request.iterations(),
            self.start_year,
            &SERIES,
            |_, rng| self.simulate_path(request.years(), scenario, ratios, rng),
        );

        let projection = ComponentProjection::from_matrices(
            ComponentKind::Revenue,
            scenario.name(),
            self.start_year,
            request.iterations(),
            matrices,
            request.keep_raw(),
        );

        info!(
            "revenue projection complete: final-year mean total_revenue {:.1}",
            projection.mean_series(SERIES[0]).last().copied().unwrap_or(0.0)
        );
        projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn project(assumptions: &Assumptions, scenario: RevenueScenario) -> ComponentProjection {
        let request = ProjectionRequest::new(10, 300, scenario).unwrap();
        RevenueModel::new(assumptions).project(&request, ExecutionMode::Parallel)
    }

    #[test]
    fn test_total_is_sum_of_sources() {
        let proj = project(&Assumptions::default_baseline(), RevenueScenario::Baseline);
        let total = proj.mean_series("total_revenue");
        let sum: Vec<f64> = (0..10)
            .map(|y| {
                ["individual_income", "payroll", "corporate", "other"]
                    .iter()
                    .map(|s| proj.mean_series(s)[y])
                    .sum()
            })
            .collect();
        for (t, s) in total.iter().zip(sum) {
            assert_relative_eq!(*t, s, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_revenue_grows_in_baseline() {
        let proj = project(&Assumptions::default_baseline(), RevenueScenario::Baseline);
        let total = proj.mean_series("total_revenue");
        assert!(total[9] > total[0]);
        assert!(total[0] > 5_030.0);
    }

    #[test]
    fn test_recession_lowers_early_revenue() {
        let a = Assumptions::default_baseline();
        let base = project(&a, RevenueScenario::Baseline).mean_series("total_revenue");
        let rec = project(&a, RevenueScenario::Recession).mean_series("total_revenue");
        assert!(rec[1] < base[1]);
    }

    #[test]
    fn test_corporate_rate_increase_raises_corporate_receipts() {
        let base = Assumptions::default_baseline();
        let mut higher = base.clone();
        higher.revenue.corporate_rate = 0.28;
        let b = project(&base, RevenueScenario::Baseline).mean_series("corporate");
        let h = project(&higher, RevenueScenario::Baseline).mean_series("corporate");
        assert_relative_eq!(h[4] / b[4], 0.28 / 0.21, max_relative = 1e-9);
    }

    #[test]
    fn test_percentile_band_brackets_median() {
        let proj = project(&Assumptions::default_baseline(), RevenueScenario::Baseline);
        for year in proj.series("total_revenue").unwrap() {
            assert!(year.p10 <= year.median && year.median <= year.p90);
            assert!(year.p90 > year.p10);
        }
    }
}
