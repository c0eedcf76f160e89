//! Net interest on debt held by the public
//!
//! The effective rate drifts from the current average toward the long-run
//! rate as a fixed share of the debt refinances each year. Each path draws
//! one persistent rate shock on top of the scenario adjustment, and each year
//! adds a small amount of noise. Debt grows by a primary-deficit share of GDP
//! plus the year's interest.

use log::{info, warn};
use rand::Rng;

use crate::assumptions::{parameter_pairs, Assumptions, EconomicAssumptions, InterestAssumptions};
use crate::projection::{
    sample_normal, ComponentKind, ComponentProjection, ExecutionMode,
    ProjectionRequest, ScenarioSet, StochasticComponent,
};

use super::InterestScenario;

pub const SERIES: [&str; 4] = ["interest_spending", "debt", "effective_rate", "debt_to_gdp"];

#[derive(Debug, Clone)]
pub struct InterestModel {
    assumptions: InterestAssumptions,
    economy: EconomicAssumptions,
}

impl InterestModel {
    pub fn new(assumptions: &Assumptions) -> Self {
        Self {
            assumptions: assumptions.interest.clone(),
            economy: assumptions.economy.clone(),
        }
    }

    fn simulate_path<R: Rng + ?Sized>(
        &self,
        gdp: &[f64],
        scenario: InterestScenario,
        rng: &mut R,
    ) -> Vec<Vec<f64>> {
        let a = &self.assumptions;
        let target = a.long_run_rate
            + scenario.rate_adjustment()
            + sample_normal(rng, 0.0, a.rate_regime_sd);

        let mut rate = a.current_average_rate;
        let mut debt = a.debt_held_by_public;

        let mut out = vec![Vec::with_capacity(gdp.len()); SERIES.len()];
        for &gdp_t in gdp {
            rate = (a.refinance(rate, target) + sample_normal(rng, 0.0, a.rate_noise_sd)).max(0.0);
            let interest = debt * rate;
            debt += a.primary_deficit_share * gdp_t + interest;

            out[0].push(interest);
            out[1].push(debt);
            out[2].push(rate);
            out[3].push(if gdp_t > 0.0 { debt / gdp_t } else { 0.0 });
        }
        out
    }
}

impl StochasticComponent for InterestModel {
    type Scenario = InterestScenario;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Interest
    }

    fn parameters(&self) -> Vec<(String, String)> {
        let mut params = parameter_pairs("interest", &self.assumptions);
        params.extend(parameter_pairs("economy", &self.economy));
        params
    }

    fn project(
        &self,
        request: &ProjectionRequest<InterestScenario>,
        mode: ExecutionMode,
    ) -> ComponentProjection {
        let scenario = request.scenario();
        info!(
            "projecting interest: {} years x {} iterations, scenario {}",
            request.years(),
            request.iterations(),
            scenario.name()
        );

        let gdp = self.economy.gdp_path(request.years() as usize);
        if self.economy.gdp <= 0.0 {
            warn!("interest: base GDP {} is not positive, reporting debt-to-GDP as 0", self.economy.gdp);
        }

        let start_year = self.economy.start_year();
        let matrices = self.runner(request, mode).run_series(
            request.iterations(),
            start_year,
            &SERIES,
            |_, rng| self.simulate_path(&gdp, scenario, rng),
        );

        let projection = ComponentProjection::from_matrices(
            ComponentKind::Interest,
            scenario.name(),
            start_year,
            request.iterations(),
            matrices,
            request.keep_raw(),
        );

        info!(
            "interest projection complete: final-year mean interest_spending {:.1}",
            projection.mean_series(SERIES[0]).last().copied().unwrap_or(0.0)
        );
        projection
    }
}
