//! Combined fiscal model
//!
//! [`FiscalModel`] runs every component for a [`BudgetRequest`], merges the
//! mean paths into one [`UnifiedBudget`] and derives the accounting
//! identities. Component results are cached per component by a fingerprint
//! of their assumptions and request; identities are recomputed on every call.
//!
//! Policy overrides never mutate assumptions in place. The model keeps the
//! baseline set and an active set built from it by
//! [`PolicyMechanics::apply_to`]; applying a record replaces the active set
//! and clears every cache.

mod cache;
mod config;
mod mechanics;
mod summary;
mod table;

pub use cache::{fingerprint, CacheStats, ResultCache, FINGERPRINT_LEN};
pub use config::{ModelConfig, DEFAULT_HEALTHCARE_TARGET_RATIO, DEFAULT_POST_TARGET_SHARE_GROWTH};
pub use mechanics::{
    EligibilityExpansion, FundingMechanism, PolicyMechanics, SpendingGrowthDeltas, TaxRateDeltas,
};
pub use summary::{calculate_fiscal_gap, FiscalSummary};
pub use table::{reconcile_length, UnifiedBudget, UnifiedBudgetRow};

use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::components::{
    DiscretionaryModel, DiscretionaryScenario, HealthcareScenario, InterestModel,
    InterestScenario, MedicaidModel, MedicareModel, RevenueModel, RevenueScenario,
};
use crate::error::{OverrideError, ProjectionError};
use crate::projection::{
    guarded_div, validate_bounds, ComponentProjection, ExecutionMode, ProjectionRequest,
    ScenarioSet, StochasticComponent,
};
use crate::solvency::SolvencyReport;
use crate::trust_fund::{SocialSecurityScenario, TrustFundSimulator};

/// Validated request for a unified budget projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetRequest {
    years: u32,
    iterations: u32,
    pub revenue: RevenueScenario,
    pub social_security: SocialSecurityScenario,
    pub healthcare: HealthcareScenario,
    pub discretionary: DiscretionaryScenario,
    pub interest: InterestScenario,
}

impl BudgetRequest {
    /// Baseline scenarios for every component
    pub fn new(years: u32, iterations: u32) -> Result<Self, ProjectionError> {
        validate_bounds(years, iterations)?;
        Ok(Self {
            years,
            iterations,
            revenue: RevenueScenario::Baseline,
            social_security: SocialSecurityScenario::Baseline,
            healthcare: HealthcareScenario::Baseline,
            discretionary: DiscretionaryScenario::Baseline,
            interest: InterestScenario::Baseline,
        })
    }

    /// Parse scenario names; bounds are checked before any name
    #[allow(clippy::too_many_arguments)]
    pub fn parse(
        years: u32,
        iterations: u32,
        revenue: &str,
        social_security: &str,
        healthcare: &str,
        discretionary: &str,
        interest: &str,
    ) -> Result<Self, ProjectionError> {
        let base = Self::new(years, iterations)?;
        Ok(Self {
            revenue: RevenueScenario::parse(revenue)?,
            social_security: SocialSecurityScenario::parse(social_security)?,
            healthcare: HealthcareScenario::parse(healthcare)?,
            discretionary: DiscretionaryScenario::parse(discretionary)?,
            interest: InterestScenario::parse(interest)?,
            ..base
        })
    }

    pub fn years(&self) -> u32 {
        self.years
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    fn component<S: ScenarioSet>(&self, scenario: S, seed: u64) -> Result<ProjectionRequest<S>, ProjectionError> {
        Ok(ProjectionRequest::new(self.years, self.iterations, scenario)?.with_seed(seed))
    }
}

/// Trust fund statistics plus the solvency report from the same run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustFundOutcome {
    pub projection: ComponentProjection,
    pub solvency: SolvencyReport,
}

/// Orchestrates every component with caching and policy overrides
#[derive(Debug)]
pub struct FiscalModel {
    config: ModelConfig,
    baseline: Assumptions,
    active: Assumptions,
    mechanics: Option<PolicyMechanics>,

    trust_fund_cache: ResultCache<TrustFundOutcome>,
    revenue_cache: ResultCache<ComponentProjection>,
    medicare_cache: ResultCache<ComponentProjection>,
    medicaid_cache: ResultCache<ComponentProjection>,
    discretionary_cache: ResultCache<ComponentProjection>,
    interest_cache: ResultCache<ComponentProjection>,

    stochastic_runs: u64,
}

fn new_cache<T>(enabled: bool) -> ResultCache<T> {
    if enabled {
        ResultCache::new()
    } else {
        ResultCache::disabled()
    }
}

/// Cached projection of one peer component
fn cached_projection<C: StochasticComponent>(
    cache: &mut ResultCache<ComponentProjection>,
    runs: &mut u64,
    component: &C,
    request: &ProjectionRequest<C::Scenario>,
    mode: ExecutionMode,
) -> Arc<ComponentProjection> {
    let name = component.kind().name();
    let key = fingerprint(name, &component.fingerprint_params(request));
    if let Some(hit) = cache.get(&key) {
        debug!("cache hit for {} ({})", name, key);
        return hit;
    }
    debug!("cache miss for {} ({})", name, key);
    *runs += 1;
    cache.insert(key, component.project(request, mode))
}

impl FiscalModel {
    pub fn new(config: ModelConfig) -> Self {
        Self::with_assumptions(config, Assumptions::default_baseline())
    }

    pub fn with_assumptions(config: ModelConfig, baseline: Assumptions) -> Self {
        let enabled = config.cache_enabled;
        Self {
            config,
            active: baseline.clone(),
            baseline,
            mechanics: None,
            trust_fund_cache: new_cache(enabled),
            revenue_cache: new_cache(enabled),
            medicare_cache: new_cache(enabled),
            medicaid_cache: new_cache(enabled),
            discretionary_cache: new_cache(enabled),
            interest_cache: new_cache(enabled),
            stochastic_runs: 0,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn baseline_assumptions(&self) -> &Assumptions {
        &self.baseline
    }

    /// Assumptions in effect, with any policy mechanics applied
    pub fn assumptions(&self) -> &Assumptions {
        &self.active
    }

    pub fn mechanics(&self) -> Option<&PolicyMechanics> {
        self.mechanics.as_ref()
    }

    /// Number of stochastic projections actually executed (cache misses)
    pub fn stochastic_runs(&self) -> u64 {
        self.stochastic_runs
    }

    /// Hit and miss counts summed over every component cache
    pub fn cache_stats(&self) -> CacheStats {
        [
            self.trust_fund_cache.stats(),
            self.revenue_cache.stats(),
            self.medicare_cache.stats(),
            self.medicaid_cache.stats(),
            self.discretionary_cache.stats(),
            self.interest_cache.stats(),
        ]
        .iter()
        .fold(CacheStats::default(), |acc, s| CacheStats {
            hits: acc.hits + s.hits,
            misses: acc.misses + s.misses,
        })
    }

    pub fn clear_cache(&mut self) {
        self.trust_fund_cache.clear();
        self.revenue_cache.clear();
        self.medicare_cache.clear();
        self.medicaid_cache.clear();
        self.discretionary_cache.clear();
        self.interest_cache.clear();
    }

    /// Replace the active overrides
    ///
    /// `Some(record)` is applied on top of the baseline, not on top of the
    /// previous record. `None` restores the baseline. A rejected record
    /// leaves the active assumptions and the caches untouched.
    pub fn apply_policy_mechanics(
        &mut self,
        mechanics: Option<PolicyMechanics>,
    ) -> Result<(), OverrideError> {
        match mechanics {
            Some(record) => {
                let active = record.apply_to(&self.baseline)?;
                info!("applying policy mechanics: {:?}", record);
                self.active = active;
                self.mechanics = Some(record);
            }
            None => {
                info!("resetting policy mechanics to baseline");
                self.active = self.baseline.clone();
                self.mechanics = None;
            }
        }
        self.clear_cache();
        Ok(())
    }

    /// Trust fund projection and solvency for one scenario, cached
    pub fn project_trust_fund(
        &mut self,
        request: &ProjectionRequest<SocialSecurityScenario>,
    ) -> Arc<TrustFundOutcome> {
        let simulator = TrustFundSimulator::new(&self.active);
        let key = fingerprint(
            simulator.kind().name(),
            &simulator.fingerprint_params(request),
        );
        if let Some(hit) = self.trust_fund_cache.get(&key) {
            debug!("cache hit for social_security ({})", key);
            return hit;
        }
        debug!("cache miss for social_security ({})", key);

        self.stochastic_runs += 1;
        let (projection, solvency) =
            simulator.project_with_solvency(request, self.config.execution_mode());
        let outcome = TrustFundOutcome {
            projection,
            solvency,
        };
        self.trust_fund_cache.insert(key, outcome)
    }

    /// Depletion statistics for every fund under one scenario
    pub fn trust_fund_solvency(
        &mut self,
        years: u32,
        iterations: u32,
        scenario: SocialSecurityScenario,
    ) -> Result<SolvencyReport, ProjectionError> {
        let request = ProjectionRequest::new(years, iterations, scenario)?.with_seed(self.config.seed);
        Ok(self.project_trust_fund(&request).solvency.clone())
    }

    /// Project every component and merge them into one budget table
    ///
    /// All component requests are built before any stochastic work starts.
    pub fn project_unified_budget(
        &mut self,
        request: &BudgetRequest,
    ) -> Result<UnifiedBudget, ProjectionError> {
        let seed = self.config.seed;
        let revenue_req = request.component(request.revenue, seed)?;
        let ss_req = request.component(request.social_security, seed)?;
        let healthcare_req = request.component(request.healthcare, seed)?;
        let discretionary_req = request.component(request.discretionary, seed)?;
        let interest_req = request.component(request.interest, seed)?;

        info!(
            "projecting unified budget: {} years x {} iterations",
            request.years(),
            request.iterations()
        );

        let mode = self.config.execution_mode();
        let revenue = cached_projection(
            &mut self.revenue_cache,
            &mut self.stochastic_runs,
            &RevenueModel::new(&self.active),
            &revenue_req,
            mode,
        );
        let medicare = cached_projection(
            &mut self.medicare_cache,
            &mut self.stochastic_runs,
            &MedicareModel::new(&self.active),
            &healthcare_req,
            mode,
        );
        let medicaid = cached_projection(
            &mut self.medicaid_cache,
            &mut self.stochastic_runs,
            &MedicaidModel::new(&self.active),
            &healthcare_req,
            mode,
        );
        let discretionary = cached_projection(
            &mut self.discretionary_cache,
            &mut self.stochastic_runs,
            &DiscretionaryModel::new(&self.active),
            &discretionary_req,
            mode,
        );
        let interest = cached_projection(
            &mut self.interest_cache,
            &mut self.stochastic_runs,
            &InterestModel::new(&self.active),
            &interest_req,
            mode,
        );
        let trust_fund = self.project_trust_fund(&ss_req);

        let years = request.years() as usize;
        let revenue = reconcile_length("revenue", revenue.mean_series("total_revenue"), years);
        let social_security = reconcile_length(
            "social_security",
            trust_fund.projection.mean_series("social_security_spending"),
            years,
        );
        let mut medicare = reconcile_length("medicare", medicare.mean_series("medicare_spending"), years);
        let mut medicaid = reconcile_length("medicaid", medicaid.mean_series("medicaid_spending"), years);
        let discretionary = reconcile_length(
            "discretionary",
            discretionary.mean_series("discretionary_spending"),
            years,
        );
        let interest = reconcile_length("interest", interest.mean_series("interest_spending"), years);

        let economy = &self.active.economy;
        let start_year = economy.start_year();
        let gdp = economy.gdp_path(years);

        if let Some((share, target_year)) = self.mechanics.as_ref().and_then(|m| m.healthcare_target()) {
            self.apply_healthcare_target(
                &mut medicare,
                &mut medicaid,
                &gdp,
                start_year,
                share,
                target_year,
            );
        }

        let rows = (0..years)
            .map(|i| {
                UnifiedBudgetRow::from_components(
                    start_year + i as u32,
                    revenue[i],
                    social_security[i],
                    medicare[i],
                    medicaid[i],
                    discretionary[i],
                    interest[i],
                    gdp[i],
                )
            })
            .collect();

        Ok(UnifiedBudget { rows })
    }

    /// Federal healthcare share of GDP in each year under a target
    ///
    /// Linear from the first projected year's share to `target x ratio` in
    /// the target year, then growing at the configured slower rate.
    pub fn healthcare_share_path(
        &self,
        initial_share: f64,
        start_year: u32,
        years: usize,
        target_share: f64,
        target_year: u32,
    ) -> Vec<f64> {
        let federal_target = target_share * self.config.healthcare_target_ratio;
        let span = target_year.saturating_sub(start_year) as f64;

        (0..years as u32)
            .map(|i| {
                let year = start_year + i;
                if year <= target_year {
                    let progress = guarded_div(i as f64, span, 1.0, "healthcare target transition");
                    initial_share + (federal_target - initial_share) * progress
                } else {
                    let since = (year - target_year) as i32;
                    federal_target * (1.0 + self.config.post_target_share_growth).powi(since)
                }
            })
            .collect()
    }

    /// Rescale Medicare and Medicaid so their sum follows the target path
    fn apply_healthcare_target(
        &self,
        medicare: &mut [f64],
        medicaid: &mut [f64],
        gdp: &[f64],
        start_year: u32,
        target_share: f64,
        target_year: u32,
    ) {
        let first_total = medicare.first().copied().unwrap_or(0.0) + medicaid.first().copied().unwrap_or(0.0);
        let first_gdp = gdp.first().copied().unwrap_or(0.0);
        let initial_share = guarded_div(first_total, first_gdp, 0.0, "initial healthcare share");

        let path = self.healthcare_share_path(
            initial_share,
            start_year,
            gdp.len(),
            target_share,
            target_year,
        );

        for (i, share) in path.iter().enumerate() {
            let current = medicare[i] + medicaid[i];
            if current <= 0.0 {
                continue;
            }
            let factor = share * gdp[i] / current;
            medicare[i] *= factor;
            medicaid[i] *= factor;
        }
    }

    /// Totals and debt path, starting from the active debt assumption
    pub fn fiscal_summary(&self, budget: &UnifiedBudget) -> FiscalSummary {
        FiscalSummary::from_budget(budget, self.active.interest.debt_held_by_public)
    }

    /// Fiscal gap from the active debt assumption
    pub fn fiscal_gap(&self, budget: &UnifiedBudget, target_debt_ratio: f64, discount_rate: f64) -> f64 {
        calculate_fiscal_gap(
            budget,
            self.active.interest.debt_held_by_public,
            target_debt_ratio,
            discount_rate,
        )
    }
}

impl Default for FiscalModel {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> FiscalModel {
        FiscalModel::new(ModelConfig::default())
    }

    fn assert_identities(budget: &UnifiedBudget) {
        for r in &budget.rows {
            assert_relative_eq!(
                r.mandatory_spending + r.discretionary_spending + r.interest_spending,
                r.total_spending,
                max_relative = 1e-12
            );
            assert_eq!(r.deficit_surplus, r.total_revenue - r.total_spending);
            assert_eq!(r.primary_deficit, r.total_revenue - (r.total_spending - r.interest_spending));
            assert_eq!(r.healthcare_spending, r.medicare_spending + r.medicaid_spending);
        }
    }

    #[test]
    fn test_row_count_and_identities() {
        let mut m = model();
        let budget = m.project_unified_budget(&BudgetRequest::new(10, 100).unwrap()).unwrap();
        assert_eq!(budget.len(), 10);
        assert_eq!(budget.rows[0].year, 2026);
        assert_eq!(budget.rows[9].year, 2035);
        assert_identities(&budget);
    }

    #[test]
    fn test_boundary_horizons() {
        let mut m = model();
        let one = m.project_unified_budget(&BudgetRequest::new(1, 100).unwrap()).unwrap();
        assert_eq!(one.len(), 1);
        let full = m.project_unified_budget(&BudgetRequest::new(75, 100).unwrap()).unwrap();
        assert_eq!(full.len(), 75);
        assert_identities(&full);
    }

    #[test]
    fn test_iteration_bounds_both_run() {
        let mut m = model();
        let fewest = m.project_unified_budget(&BudgetRequest::new(1, 100).unwrap()).unwrap();
        let most = m.project_unified_budget(&BudgetRequest::new(1, 50_000).unwrap()).unwrap();
        assert_eq!(m.stochastic_runs(), 12);

        for budget in [&fewest, &most] {
            assert_eq!(budget.len(), 1);
            assert_eq!(budget.rows[0].year, 2026);
            assert!(budget.rows[0].total_revenue > 0.0);
            assert_identities(budget);
        }

        let solvency = m.trust_fund_solvency(1, 50_000, SocialSecurityScenario::Baseline).unwrap();
        assert!(solvency.estimates.iter().all(|e| e.iterations == 50_000));
        assert_eq!(m.stochastic_runs(), 12);
    }

    #[test]
    fn test_invalid_requests_do_no_work() {
        let m = model();
        for (years, iterations) in [(0, 100), (76, 100), (10, 50), (10, 50_001)] {
            assert!(matches!(
                BudgetRequest::new(years, iterations),
                Err(ProjectionError::Range { .. })
            ));
        }
        assert_eq!(m.stochastic_runs(), 0);
    }

    #[test]
    fn test_parse_rejects_unknown_scenario() {
        let err = BudgetRequest::parse(10, 100, "baseline", "baseline", "free_lunch", "baseline", "baseline");
        assert!(matches!(err, Err(ProjectionError::UnknownScenario { component: "healthcare", .. })));

        // Bounds are reported ahead of names
        let err = BudgetRequest::parse(0, 100, "nope", "baseline", "baseline", "baseline", "baseline");
        assert!(matches!(err, Err(ProjectionError::Range { field: "years", .. })));
    }

    #[test]
    fn test_second_call_served_from_cache() {
        let mut m = model();
        let request = BudgetRequest::new(5, 100).unwrap();
        let first = m.project_unified_budget(&request).unwrap();
        assert_eq!(m.stochastic_runs(), 6);

        let second = m.project_unified_budget(&request).unwrap();
        assert_eq!(m.stochastic_runs(), 6);
        assert_eq!(first, second);
        assert_eq!(m.cache_stats().hits, 6);
    }

    #[test]
    fn test_mutating_result_does_not_touch_cache() {
        let mut m = model();
        let request = BudgetRequest::new(5, 100).unwrap();
        let mut first = m.project_unified_budget(&request).unwrap();
        let pristine = first.clone();
        first.rows[0].total_revenue = -1.0;

        let ss_req = ProjectionRequest::new(5, 100, SocialSecurityScenario::Baseline).unwrap();
        let outcome = m.project_trust_fund(&ss_req);
        let mut copy = (*outcome).clone();
        copy.projection.series.clear();

        assert_eq!(m.project_unified_budget(&request).unwrap(), pristine);
        assert!(!m.project_trust_fund(&ss_req).projection.series.is_empty());
    }

    #[test]
    fn test_override_invalidates_cache() {
        let mut m = model();
        let request = BudgetRequest::new(5, 100).unwrap();
        let before = m.project_unified_budget(&request).unwrap();

        let mut mechanics = PolicyMechanics::default();
        mechanics.tax_rate_deltas.payroll = 0.02;
        m.apply_policy_mechanics(Some(mechanics)).unwrap();

        let after = m.project_unified_budget(&request).unwrap();
        assert_eq!(m.stochastic_runs(), 12);
        assert!(after.rows[4].total_revenue > before.rows[4].total_revenue);

        m.apply_policy_mechanics(None).unwrap();
        let reset = m.project_unified_budget(&request).unwrap();
        assert_eq!(reset, before);
    }

    #[test]
    fn test_rejected_override_keeps_state() {
        let mut m = model();
        let request = BudgetRequest::new(5, 100).unwrap();
        m.project_unified_budget(&request).unwrap();

        let bad = PolicyMechanics {
            retirement_age_delta: 40.0,
            ..Default::default()
        };
        assert!(m.apply_policy_mechanics(Some(bad)).is_err());
        assert_eq!(m.assumptions(), m.baseline_assumptions());
        assert!(m.mechanics().is_none());

        m.project_unified_budget(&request).unwrap();
        assert_eq!(m.stochastic_runs(), 6);
    }

    #[test]
    fn test_deterministic_across_models_and_modes() {
        let request = BudgetRequest::new(8, 150).unwrap();
        let a = model().project_unified_budget(&request).unwrap();
        let b = model().project_unified_budget(&request).unwrap();
        let c = FiscalModel::new(ModelConfig::default().sequential())
            .project_unified_budget(&request)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_seed_changes_results() {
        let request = BudgetRequest::new(8, 150).unwrap();
        let a = model().project_unified_budget(&request).unwrap();
        let b = FiscalModel::new(ModelConfig::default().with_seed(7))
            .project_unified_budget(&request)
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_healthcare_target_reached() {
        let mut m = model();
        let mechanics = PolicyMechanics {
            target_spending_share: Some(0.10),
            target_year: Some(2035),
            ..Default::default()
        };
        m.apply_policy_mechanics(Some(mechanics)).unwrap();
        let budget = m.project_unified_budget(&BudgetRequest::new(15, 100).unwrap()).unwrap();
        assert_identities(&budget);

        let ratio = DEFAULT_HEALTHCARE_TARGET_RATIO;
        let at_target = &budget.rows[9];
        assert_eq!(at_target.year, 2035);
        assert_relative_eq!(at_target.healthcare_spending / at_target.gdp, 0.10 * ratio, max_relative = 1e-9);

        let after = &budget.rows[10];
        assert_relative_eq!(
            after.healthcare_spending / after.gdp,
            0.10 * ratio * (1.0 + DEFAULT_POST_TARGET_SHARE_GROWTH),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_share_path_interpolates() {
        let m = model();
        let path = m.healthcare_share_path(0.06, 2026, 6, 0.10, 2030);
        let target = 0.10 * DEFAULT_HEALTHCARE_TARGET_RATIO;
        assert_relative_eq!(path[0], 0.06);
        assert_relative_eq!(path[2], 0.06 + (target - 0.06) * 0.5, max_relative = 1e-12);
        assert_relative_eq!(path[4], target, max_relative = 1e-12);
        assert!(path[5] > target);
    }

    #[test]
    fn test_solvency_report_from_model() {
        let mut m = model();
        let report = m.trust_fund_solvency(30, 200, SocialSecurityScenario::Baseline).unwrap();
        let oasi = report.fund(crate::trust_fund::TrustFund::Oasi).unwrap();
        assert!(oasi.probability_depleted > 0.9);
        assert!(m.trust_fund_solvency(30, 10, SocialSecurityScenario::Baseline).is_err());
    }

    #[test]
    fn test_fiscal_summary_uses_active_debt() {
        let mut m = model();
        let budget = m.project_unified_budget(&BudgetRequest::new(5, 100).unwrap()).unwrap();
        let summary = m.fiscal_summary(&budget);
        assert_relative_eq!(
            summary.debt_path[0],
            29_000.0 - budget.rows[0].deficit_surplus,
            max_relative = 1e-12
        );
        assert!(m.fiscal_gap(&budget, 1.0, 0.03).is_finite());
    }
}
