//! Medicare spending projection

use log::{info, warn};
use rand::Rng;

use crate::assumptions::{parameter_pairs, Assumptions, MedicareAssumptions};
use crate::projection::{
    noise_factor, ComponentKind, ComponentProjection, ExecutionMode,
    ProjectionRequest, ScenarioSet, StochasticComponent,
};
use crate::trust_fund::sample_demographic_shock;

use super::HealthcareScenario;

pub const SERIES: [&str; 3] = ["medicare_spending", "enrollment", "cost_per_enrollee"];

/// Enrollment times per-enrollee cost, net of premiums
#[derive(Debug, Clone)]
pub struct MedicareModel {
    assumptions: MedicareAssumptions,
    start_year: u32,
}

impl MedicareModel {
    pub fn new(assumptions: &Assumptions) -> Self {
        Self {
            assumptions: assumptions.medicare.clone(),
            start_year: assumptions.economy.start_year(),
        }
    }

    fn simulate_path<R: Rng + ?Sized>(
        &self,
        years: u32,
        scenario: HealthcareScenario,
        rng: &mut R,
    ) -> Vec<Vec<f64>> {
        let a = &self.assumptions;
        let shock = sample_demographic_shock(rng, a.demographic_shock_sd);
        let enrollment_growth = a.enrollment_growth * shock;
        let cost_growth = a.cost_growth + scenario.cost_growth_adjustment();

        let mut enrollment = a.enrollment * a.enrollment_factor();
        let mut gross_cost = a.cost_per_enrollee;

        let mut out = vec![Vec::with_capacity(years as usize); SERIES.len()];
        for _ in 0..years {
            enrollment *= 1.0 + enrollment_growth;
            gross_cost *= (1.0 + cost_growth) * noise_factor(rng, a.cost_noise_sd);

            let net_cost = gross_cost * (1.0 - a.premium_offset);
            let spending = enrollment * net_cost / 1_000.0;
            let per_enrollee = if enrollment > 0.0 {
                spending * 1_000.0 / enrollment
            } else {
                0.0
            };

            out[0].push(spending);
            out[1].push(enrollment);
            out[2].push(per_enrollee);
        }
        out
    }
}

impl StochasticComponent for MedicareModel {
    type Scenario = HealthcareScenario;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Medicare
    }

    fn parameters(&self) -> Vec<(String, String)> {
        let mut params = parameter_pairs("medicare", &self.assumptions);
        params.push(("medicare.start_year".to_string(), self.start_year.to_string()));
        params
    }

    fn project(
        &self,
        request: &ProjectionRequest<HealthcareScenario>,
        mode: ExecutionMode,
    ) -> ComponentProjection {
        let scenario = request.scenario();
        info!(
            "projecting medicare: {} years x {} iterations, scenario {}",
            request.years(),
            request.iterations(),
            scenario.name()
        );

        // Checked once; the per-year loop reports zero per-enrollee cost silently
        if self.assumptions.enrollment <= 0.0 {
            warn!(
                "medicare: base enrollment {} is not positive, reporting cost per enrollee as 0",
                self.assumptions.enrollment
            );
        }

        let matrices = self.runner(request, mode).run_series(
            request.iterations(),
            self.start_year,
            &SERIES,
            |_, rng| self.simulate_path(request.years(), scenario, rng),
        );

        let projection = ComponentProjection::from_matrices(
            ComponentKind::Medicare,
            scenario.name(),
            self.start_year,
            request.iterations(),
            matrices,
            request.keep_raw(),
        );

        info!(
            "medicare projection complete: final-year mean medicare_spending {:.1}",
            projection.mean_series(SERIES[0]).last().copied().unwrap_or(0.0)
        );
        projection
    }
}
