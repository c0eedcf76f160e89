//! Federal Medicaid spending projection

use log::{info, warn};
use rand::Rng;

use crate::assumptions::{parameter_pairs, Assumptions, MedicaidAssumptions};
use crate::projection::{
    noise_factor, ComponentKind, ComponentProjection, ExecutionMode,
    ProjectionRequest, ScenarioSet, StochasticComponent,
};
use crate::trust_fund::sample_demographic_shock;

use super::HealthcareScenario;

pub const SERIES: [&str; 4] = [
    "medicaid_spending",
    "enrollment",
    "expansion_enrollment",
    "cost_per_enrollee",
];

/// Traditional and expansion enrollees at their own federal matching shares
#[derive(Debug, Clone)]
pub struct MedicaidModel {
    assumptions: MedicaidAssumptions,
    start_year: u32,
}

impl MedicaidModel {
    pub fn new(assumptions: &Assumptions) -> Self {
        Self {
            assumptions: assumptions.medicaid.clone(),
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

        let mut traditional = a.enrollment;
        let mut expansion = a.base_expansion_enrollees();
        let mut cost = a.cost_per_enrollee;

        let mut out = vec![Vec::with_capacity(years as usize); SERIES.len()];
        for _ in 0..years {
            traditional *= 1.0 + enrollment_growth;
            expansion *= 1.0 + enrollment_growth;
            cost *= (1.0 + cost_growth) * noise_factor(rng, a.cost_noise_sd);

            let spending = (traditional * cost * a.federal_share
                + expansion * cost * a.expansion_federal_share)
                / 1_000.0;
            let enrolled = traditional + expansion;
            let per_enrollee = if enrolled > 0.0 {
                spending * 1_000.0 / enrolled
            } else {
                0.0
            };

            out[0].push(spending);
            out[1].push(enrolled);
            out[2].push(expansion);
            out[3].push(per_enrollee);
        }
        out
    }
}

impl StochasticComponent for MedicaidModel {
    type Scenario = HealthcareScenario;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Medicaid
    }

    fn parameters(&self) -> Vec<(String, String)> {
        let mut params = parameter_pairs("medicaid", &self.assumptions);
        params.push(("medicaid.start_year".to_string(), self.start_year.to_string()));
        params
    }

    fn project(
        &self,
        request: &ProjectionRequest<HealthcareScenario>,
        mode: ExecutionMode,
    ) -> ComponentProjection {
        let scenario = request.scenario();
        info!(
            "projecting medicaid: {} years x {} iterations, scenario {}",
            request.years(),
            request.iterations(),
            scenario.name()
        );

        let base_enrolled = self.assumptions.enrollment + self.assumptions.base_expansion_enrollees();
        if base_enrolled <= 0.0 {
            warn!(
                "medicaid: base enrollment {} is not positive, reporting cost per enrollee as 0",
                base_enrolled
            );
        }

        let matrices = self.runner(request, mode).run_series(
            request.iterations(),
            self.start_year,
            &SERIES,
            |_, rng| self.simulate_path(request.years(), scenario, rng),
        );

        let projection = ComponentProjection::from_matrices(
            ComponentKind::Medicaid,
            scenario.name(),
            self.start_year,
            request.iterations(),
            matrices,
            request.keep_raw(),
        );

        info!(
            "medicaid projection complete: final-year mean medicaid_spending {:.1}",
            projection.mean_series(SERIES[0]).last().copied().unwrap_or(0.0)
        );
        projection
    }
}
