//! Scenario runner for batch projections and reform comparisons
//!
//! Holds one set of base assumptions and builds a fresh [`FiscalModel`] from
//! a copy for every comparison, so evaluating a reform can never leave the
//! base assumptions, or any caller's model, in a modified state.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::budget::{BudgetRequest, FiscalModel, ModelConfig, PolicyMechanics, UnifiedBudget};
use crate::error::{AssumptionLoadError, ScenarioError};
use crate::projection::{ProjectionRequest, ScenarioSet};
use crate::trust_fund::TrustFund;

/// Deficit change in one year, reform minus baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReformYear {
    pub year: u32,
    pub baseline_deficit: f64,
    pub reform_deficit: f64,

    /// Positive when the reform improves the balance
    pub deficit_change: f64,
}

/// Baseline and reform budgets side by side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReformComparison {
    pub baseline: UnifiedBudget,
    pub reform: UnifiedBudget,
    pub years: Vec<ReformYear>,
    pub cumulative_deficit_change: f64,

    /// Median OASI depletion year, `None` when no iteration depletes
    pub baseline_oasi_depletion: Option<u32>,
    pub reform_oasi_depletion: Option<u32>,
}

/// Pre-loaded runner for many projections over the same base assumptions
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_assumptions: Assumptions,
    config: ModelConfig,
}

impl ScenarioRunner {
    /// Runner with default baseline assumptions
    pub fn new() -> Self {
        Self::with_assumptions(Assumptions::default_baseline())
    }

    /// Runner whose base assumptions carry overrides from a CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self, AssumptionLoadError> {
        Ok(Self::with_assumptions(Assumptions::from_csv_path(path)?))
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            base_assumptions: assumptions,
            config: ModelConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }

    /// A model over a private copy of the base assumptions
    pub fn model(&self) -> FiscalModel {
        FiscalModel::with_assumptions(self.config.clone(), self.base_assumptions.clone())
    }

    /// Project one budget, optionally under a policy record
    pub fn run(
        &self,
        request: &BudgetRequest,
        mechanics: Option<&PolicyMechanics>,
    ) -> Result<UnifiedBudget, ScenarioError> {
        let mut model = self.model();
        model.apply_policy_mechanics(mechanics.cloned())?;
        Ok(model.project_unified_budget(request)?)
    }

    /// Project several requests on one model so repeated components share the cache
    pub fn run_batch(&self, requests: &[BudgetRequest]) -> Result<Vec<UnifiedBudget>, ScenarioError> {
        let mut model = self.model();
        requests
            .iter()
            .map(|r| model.project_unified_budget(r).map_err(ScenarioError::from))
            .collect()
    }

    /// Compare a reform against the unreformed baseline
    pub fn evaluate_reform(
        &self,
        request: &BudgetRequest,
        reform: &PolicyMechanics,
    ) -> Result<ReformComparison, ScenarioError> {
        // Reject a bad record before any projection runs
        reform.validate(&self.base_assumptions)?;

        let mut baseline_model = self.model();
        let mut reform_model = self.model();
        reform_model.apply_policy_mechanics(Some(reform.clone()))?;

        let baseline = baseline_model.project_unified_budget(request)?;
        let reformed = reform_model.project_unified_budget(request)?;

        let ss_request = ProjectionRequest::new(
            request.years(),
            request.iterations(),
            request.social_security,
        )?
        .with_seed(self.config.seed);
        let depletion = |model: &mut FiscalModel| {
            model
                .project_trust_fund(&ss_request)
                .solvency
                .fund(TrustFund::Oasi)
                .and_then(|e| e.headline_year())
        };
        let baseline_oasi_depletion = depletion(&mut baseline_model);
        let reform_oasi_depletion = depletion(&mut reform_model);

        let years: Vec<ReformYear> = baseline
            .rows
            .iter()
            .zip(&reformed.rows)
            .map(|(b, r)| ReformYear {
                year: b.year,
                baseline_deficit: b.deficit_surplus,
                reform_deficit: r.deficit_surplus,
                deficit_change: r.deficit_surplus - b.deficit_surplus,
            })
            .collect();
        let cumulative_deficit_change = years.iter().map(|y| y.deficit_change).sum();

        info!(
            "reform evaluated under {} social security scenario: cumulative deficit change {:.1}",
            request.social_security.name(),
            cumulative_deficit_change
        );

        Ok(ReformComparison {
            baseline,
            reform: reformed,
            years,
            cumulative_deficit_change,
            baseline_oasi_depletion,
            reform_oasi_depletion,
        })
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::FundingMechanism;
    use crate::error::OverrideError;

    fn payroll_reform() -> PolicyMechanics {
        PolicyMechanics {
            funding_mechanisms: vec![FundingMechanism::RemoveTaxableMaximum],
            tax_rate_deltas: crate::budget::TaxRateDeltas {
                payroll: 0.02,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_reform_improves_deficits_and_solvency() {
        let runner = ScenarioRunner::new();
        let request = BudgetRequest::new(30, 100).unwrap();
        let cmp = runner.evaluate_reform(&request, &payroll_reform()).unwrap();

        assert_eq!(cmp.years.len(), 30);
        assert!(cmp.years.iter().all(|y| y.deficit_change > 0.0));
        assert!(cmp.cumulative_deficit_change > 0.0);

        match (cmp.baseline_oasi_depletion, cmp.reform_oasi_depletion) {
            (Some(b), Some(r)) => assert!(r > b),
            (Some(_), None) => {}
            other => panic!("unexpected depletion years {:?}", other),
        }
    }

    #[test]
    fn test_reform_leaves_runner_untouched() {
        let runner = ScenarioRunner::new();
        let request = BudgetRequest::new(5, 100).unwrap();
        let before = runner.run(&request, None).unwrap();

        runner.evaluate_reform(&request, &payroll_reform()).unwrap();

        assert_eq!(runner.assumptions(), &Assumptions::default_baseline());
        assert_eq!(runner.run(&request, None).unwrap(), before);
    }

    #[test]
    fn test_invalid_reform_rejected() {
        let runner = ScenarioRunner::new();
        let request = BudgetRequest::new(5, 100).unwrap();
        let bad = PolicyMechanics {
            target_year: Some(2030),
            ..Default::default()
        };
        assert!(matches!(
            runner.evaluate_reform(&request, &bad),
            Err(ScenarioError::Override(OverrideError::IncompleteTarget))
        ));
    }

    #[test]
    fn test_batch_matches_individual_runs() {
        let runner = ScenarioRunner::new();
        let a = BudgetRequest::new(5, 100).unwrap();
        let b = BudgetRequest::parse(5, 100, "recession", "baseline", "high_cost", "freeze", "high_rates").unwrap();

        let batch = runner.run_batch(&[a, b]).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], runner.run(&a, None).unwrap());
        assert_eq!(batch[1], runner.run(&b, None).unwrap());
    }
}
