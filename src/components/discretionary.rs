//! Discretionary appropriations projection

use log::info;
use rand::Rng;

use crate::assumptions::{parameter_pairs, Assumptions, DiscretionaryAssumptions};
use crate::projection::{
    noise_factor, ComponentKind, ComponentProjection, ExecutionMode, ProjectionRequest,
    ScenarioSet, StochasticComponent,
};

use super::DiscretionaryScenario;

pub const SERIES: [&str; 3] = ["discretionary_spending", "defense", "nondefense"];

#[derive(Debug, Clone)]
pub struct DiscretionaryModel {
    assumptions: DiscretionaryAssumptions,
    start_year: u32,
}

impl DiscretionaryModel {
    pub fn new(assumptions: &Assumptions) -> Self {
        Self {
            assumptions: assumptions.discretionary.clone(),
            start_year: assumptions.economy.start_year(),
        }
    }

    /// Growth of one spending line in projection year `t` (1-indexed)
    fn line_growth(&self, base_growth: f64, scenario: DiscretionaryScenario, t: u32) -> f64 {
        match scenario {
            DiscretionaryScenario::Baseline => base_growth,
            DiscretionaryScenario::Freeze if t <= self.assumptions.freeze_years => 0.0,
            DiscretionaryScenario::Freeze => base_growth,
            DiscretionaryScenario::Expansion => base_growth + 0.02,
        }
    }

    fn simulate_path<R: Rng + ?Sized>(
        &self,
        years: u32,
        scenario: DiscretionaryScenario,
        rng: &mut R,
    ) -> Vec<Vec<f64>> {
        let a = &self.assumptions;
        let mut defense = a.defense;
        let mut nondefense = a.nondefense;

        let mut out = vec![Vec::with_capacity(years as usize); SERIES.len()];
        for t in 1..=years {
            defense *= (1.0 + self.line_growth(a.defense_growth, scenario, t))
                * noise_factor(rng, a.noise_sd);
            nondefense *= (1.0 + self.line_growth(a.nondefense_growth, scenario, t))
                * noise_factor(rng, a.noise_sd);

            out[0].push(defense + nondefense);
            out[1].push(defense);
            out[2].push(nondefense);
        }
        out
    }
}

impl StochasticComponent for DiscretionaryModel {
    type Scenario = DiscretionaryScenario;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Discretionary
    }

    fn parameters(&self) -> Vec<(String, String)> {
        let mut params = parameter_pairs("discretionary", &self.assumptions);
        params.push(("discretionary.start_year".to_string(), self.start_year.to_string()));
        params
    }

    fn project(
        &self,
        request: &ProjectionRequest<DiscretionaryScenario>,
        mode: ExecutionMode,
    ) -> ComponentProjection {
        let scenario = request.scenario();
        info!(
            "projecting discretionary: {} years x {} iterations, scenario {}",
            request.years(),
            request.iterations(),
            scenario.name()
        );

        let matrices = self.runner(request, mode).run_series(
            request.iterations(),
            self.start_year,
            &SERIES,
            |_, rng| self.simulate_path(request.years(), scenario, rng),
        );

        let projection = ComponentProjection::from_matrices(
            ComponentKind::Discretionary,
            scenario.name(),
            self.start_year,
            request.iterations(),
            matrices,
            request.keep_raw(),
        );

        info!(
            "discretionary projection complete: final-year mean discretionary_spending {:.1}",
            projection.mean_series(SERIES[0]).last().copied().unwrap_or(0.0)
        );
        projection
    }
}
