//! Year-over-year trust fund simulation under demographic and fiscal uncertainty

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::assumptions::{parameter_pairs, Assumptions, SocialSecurityAssumptions};
use crate::projection::{
    guarded_div, noise_factor, sample_normal, ComponentKind, ComponentProjection, ExecutionMode,
    IterationMatrix, MonteCarloRunner, ProjectionRequest, ScenarioSet, StochasticComponent,
};

use crate::solvency::SolvencyReport;

use super::demographics::{sample_demographic_shock, DemographicTrend};
use super::state::{FundLedger, FundYear, TrustFundState};
use super::{SocialSecurityScenario, TrustFund};

/// One projection year of one iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrustFundYear {
    pub year: u32,
    pub oasi: FundYear,
    pub di: FundYear,
    pub oasi_beneficiaries: f64,
    pub di_beneficiaries: f64,
}

impl TrustFundYear {
    pub fn combined_balance(&self) -> f64 {
        self.oasi.balance + self.di.balance
    }

    pub fn balance(&self, fund: TrustFund) -> f64 {
        match fund {
            TrustFund::Oasi => self.oasi.balance,
            TrustFund::Di => self.di.balance,
            TrustFund::Combined => self.combined_balance(),
        }
    }

    /// Benefits paid by both funds
    pub fn benefit_outlay(&self) -> f64 {
        self.oasi.benefit_outlay + self.di.benefit_outlay
    }

    /// Benefits plus administration for both funds
    pub fn total_cost(&self) -> f64 {
        self.benefit_outlay() + self.oasi.admin_expense + self.di.admin_expense
    }

    /// Both funds closed the year with a positive balance
    pub fn solvent(&self) -> bool {
        self.oasi.solvent && self.di.solvent
    }
}

/// Full table for one Monte Carlo iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustFundPath {
    pub iteration: u32,

    /// Demographic shock multiplier drawn once for this path
    pub demographic_shock: f64,

    pub years: Vec<TrustFundYear>,
}

impl TrustFundPath {
    pub fn balances(&self, fund: TrustFund) -> Vec<f64> {
        self.years.iter().map(|y| y.balance(fund)).collect()
    }

    /// First calendar year the fund's balance reaches zero
    pub fn depletion_year(&self, fund: TrustFund) -> Option<u32> {
        self.years
            .iter()
            .find(|y| y.balance(fund) <= 0.0)
            .map(|y| y.year)
    }

    /// Reduce the ledger table to its output series and depletion years
    fn series(&self) -> PathSeries {
        let mut values = vec![Vec::with_capacity(self.years.len()); SERIES.len()];
        for year in &self.years {
            for (k, v) in year_values(year).into_iter().enumerate() {
                values[k].push(v);
            }
        }
        PathSeries {
            values,
            depletion: TrustFund::ALL.map(|fund| self.depletion_year(fund)),
        }
    }
}

/// One iteration after its ledger table has been dropped
struct PathSeries {
    /// `values[series][year]`, in [`SERIES`] order
    values: Vec<Vec<f64>>,

    /// First depletion year per fund, in [`TrustFund::ALL`] order
    depletion: [Option<u32>; 3],
}

/// Every iteration of one trust fund projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustFundRun {
    pub scenario: SocialSecurityScenario,
    pub start_year: u32,
    pub paths: Vec<TrustFundPath>,
}

/// Series names produced by the trust fund projection
pub const SERIES: [&str; 11] = [
    "oasi_balance",
    "di_balance",
    "combined_balance",
    "tax_income",
    "interest_income",
    "benefit_outlay",
    "admin_expense",
    "oasi_beneficiaries",
    "di_beneficiaries",
    "social_security_spending",
    "solvent_share",
];

/// Output values for one year, in [`SERIES`] order
fn year_values(y: &TrustFundYear) -> [f64; 11] {
    [
        y.oasi.balance,
        y.di.balance,
        y.combined_balance(),
        y.oasi.tax_income + y.di.tax_income,
        y.oasi.interest_income + y.di.interest_income,
        y.benefit_outlay(),
        y.oasi.admin_expense + y.di.admin_expense,
        y.oasi_beneficiaries,
        y.di_beneficiaries,
        y.total_cost(),
        if y.solvent() { 1.0 } else { 0.0 },
    ]
}

/// Fold reduced iterations into per-year statistics
///
/// Each series is moved out of the iterations and summarized in turn. Raw
/// matrices are kept for the three balance series only; they are what
/// solvency estimation consumes.
fn fold_series(
    scenario: SocialSecurityScenario,
    start_year: u32,
    mut paths: Vec<PathSeries>,
    keep_raw: bool,
) -> ComponentProjection {
    let iterations = paths.len() as u32;
    let matrices: Vec<(&str, IterationMatrix)> = SERIES
        .iter()
        .enumerate()
        .map(|(k, name)| {
            let rows = paths
                .iter_mut()
                .map(|p| std::mem::take(&mut p.values[k]))
                .collect();
            (*name, IterationMatrix::new(start_year, rows))
        })
        .collect();
    drop(paths);

    let raw: Vec<(&str, IterationMatrix)> = if keep_raw {
        matrices[..3].to_vec()
    } else {
        Vec::new()
    };

    let mut projection = ComponentProjection::from_matrices(
        ComponentKind::SocialSecurity,
        scenario.name(),
        start_year,
        iterations,
        matrices,
        false,
    );
    for (name, matrix) in raw {
        projection.raw.insert(name.to_string(), matrix);
    }
    projection
}

impl TrustFundRun {
    /// Balance trajectories for one fund, `[iteration][year]`
    pub fn balance_trajectories(&self, fund: TrustFund) -> Vec<Vec<f64>> {
        self.paths.iter().map(|p| p.balances(fund)).collect()
    }

    /// Fold the per-iteration table into per-year statistics
    pub fn to_projection(&self, keep_raw: bool) -> ComponentProjection {
        fold_series(
            self.scenario,
            self.start_year,
            self.paths.iter().map(TrustFundPath::series).collect(),
            keep_raw,
        )
    }
}

/// Two-ledger retirement and disability insurance simulator
#[derive(Debug, Clone)]
pub struct TrustFundSimulator {
    assumptions: SocialSecurityAssumptions,
    start_year: u32,
}

impl TrustFundSimulator {
    pub fn new(assumptions: &Assumptions) -> Self {
        Self::from_parts(
            assumptions.social_security.clone(),
            assumptions.economy.start_year(),
        )
    }

    pub fn from_parts(assumptions: SocialSecurityAssumptions, start_year: u32) -> Self {
        Self {
            assumptions,
            start_year,
        }
    }

    pub fn assumptions(&self) -> &SocialSecurityAssumptions {
        &self.assumptions
    }

    /// Payroll tax scaling per projection year
    ///
    /// Computed once per run: the reform scenario phases its rate increase
    /// in over time, and a zero calibration rate degrades to no scaling with
    /// a single warning instead of one per iteration.
    fn rate_ratio_schedule(&self, years: u32, scenario: SocialSecurityScenario) -> Vec<f64> {
        let ss = &self.assumptions;
        let base = ss.payroll_rate_ratio();
        let degenerate = ss.baseline_payroll_rate == 0.0 || !ss.baseline_payroll_rate.is_finite();
        (1..=years)
            .map(|t| {
                if degenerate {
                    base
                } else {
                    guarded_div(
                        ss.payroll_tax_rate + scenario.payroll_rate_increase(t),
                        ss.baseline_payroll_rate,
                        1.0,
                        "social security payroll rate ratio",
                    )
                }
            })
            .collect()
    }

    /// Simulate one iteration with the supplied RNG
    ///
    /// Random draws happen in a fixed order (shock, then per year: wage
    /// noise, COLA noise), independent of the path's state, so two paths
    /// with the same stream differ only through their assumptions.
    fn simulate_with_rng<R: Rng + ?Sized>(
        &self,
        iteration: u32,
        scenario: SocialSecurityScenario,
        rate_ratios: &[f64],
        rng: &mut R,
    ) -> TrustFundPath {
        let ss = &self.assumptions;
        let shock = sample_demographic_shock(rng, ss.demographic_shock_sd);
        let trend = DemographicTrend::shocked(ss, scenario, shock);
        let benefit_factor = ss.retirement_age_factor();
        let cap_multiplier = ss.cap_multiplier();
        let wage_growth = ss.wage_growth + scenario.wage_growth_adjustment();

        let mut state = TrustFundState {
            oasi: FundLedger::new(ss.oasi_balance),
            di: FundLedger::new(ss.di_balance),
            oasi_beneficiaries: ss.oasi_beneficiaries,
            di_beneficiaries: ss.di_beneficiaries,
            oasi_average_benefit: ss.oasi_average_benefit,
            di_average_benefit: ss.di_average_benefit,
            taxable_payroll: ss.taxable_payroll,
        };

        let mut years = Vec::with_capacity(rate_ratios.len());
        for (idx, &rate_ratio) in rate_ratios.iter().enumerate() {
            let t = idx as u32 + 1;
            let year = self.start_year + idx as u32;

            let wage_noise = noise_factor(rng, ss.wage_noise_sd);
            let cola = sample_normal(rng, ss.cola_rate, ss.cola_noise_sd).max(0.0);

            state.taxable_payroll *= (1.0 + wage_growth) * wage_noise;
            state.oasi_average_benefit *= 1.0 + cola;
            state.di_average_benefit *= 1.0 + cola;
            let (oasi_count, di_count) =
                trend.advance(state.oasi_beneficiaries, state.di_beneficiaries);
            state.oasi_beneficiaries = oasi_count;
            state.di_beneficiaries = di_count;

            // millions of beneficiaries x dollars -> $ billions
            let oasi_benefits =
                state.oasi_beneficiaries * state.oasi_average_benefit * benefit_factor / 1_000.0;
            let di_benefits =
                state.di_beneficiaries * state.di_average_benefit * benefit_factor / 1_000.0;

            let taxable = state.taxable_payroll * ss.taxable_coverage(t) * cap_multiplier;
            let oasi_tax =
                taxable * ss.oasi_tax_rate * rate_ratio + ss.benefit_taxation_rate * oasi_benefits;
            let di_tax =
                taxable * ss.di_tax_rate * rate_ratio + ss.benefit_taxation_rate * di_benefits;

            let oasi = state.oasi.step(
                year,
                oasi_tax,
                oasi_benefits,
                ss.oasi_admin_rate * oasi_benefits,
                ss.trust_fund_interest_rate,
            );
            let di = state.di.step(
                year,
                di_tax,
                di_benefits,
                ss.di_admin_rate * di_benefits,
                ss.trust_fund_interest_rate,
            );

            years.push(TrustFundYear {
                year,
                oasi,
                di,
                oasi_beneficiaries: state.oasi_beneficiaries,
                di_beneficiaries: state.di_beneficiaries,
            });
        }

        TrustFundPath {
            iteration,
            demographic_shock: shock,
            years,
        }
    }

    /// Simulate a single iteration of the stream a full run with `seed` uses
    ///
    /// Not bound by the iteration minimum; used for single-path
    /// reconciliation against external actuarial estimates.
    pub fn simulate_path(
        &self,
        years: u32,
        scenario: SocialSecurityScenario,
        seed: u64,
        iteration: u32,
    ) -> TrustFundPath {
        let runner = MonteCarloRunner::for_component(seed, ComponentKind::SocialSecurity, false);
        let ratios = self.rate_ratio_schedule(years, scenario);
        self.simulate_with_rng(iteration, scenario, &ratios, &mut runner.iteration_rng(iteration))
    }

    /// Run every iteration and keep the full per-iteration table
    pub fn simulate(
        &self,
        request: &ProjectionRequest<SocialSecurityScenario>,
        mode: ExecutionMode,
    ) -> TrustFundRun {
        let scenario = request.scenario();
        info!(
            "simulating trust funds: {} years x {} iterations, scenario {}",
            request.years(),
            request.iterations(),
            scenario.name()
        );

        let ratios = self.rate_ratio_schedule(request.years(), scenario);
        let paths = self
            .runner(request, mode)
            .map_iterations(request.iterations(), |i, rng| {
                self.simulate_with_rng(i, scenario, &ratios, rng)
            });

        info!("trust fund simulation complete: {} paths kept", paths.len());

        TrustFundRun {
            scenario,
            start_year: self.start_year,
            paths,
        }
    }

    /// Run every iteration, keeping only per-year statistics and depletion years
    ///
    /// Each iteration's ledger table is reduced as soon as it is simulated,
    /// so the run never holds the full table next to its statistics.
    pub fn project_with_solvency(
        &self,
        request: &ProjectionRequest<SocialSecurityScenario>,
        mode: ExecutionMode,
    ) -> (ComponentProjection, SolvencyReport) {
        let scenario = request.scenario();
        info!(
            "projecting trust funds: {} years x {} iterations, scenario {}",
            request.years(),
            request.iterations(),
            scenario.name()
        );

        let ratios = self.rate_ratio_schedule(request.years(), scenario);
        let paths = self
            .runner(request, mode)
            .map_iterations(request.iterations(), |i, rng| {
                self.simulate_with_rng(i, scenario, &ratios, rng).series()
            });

        let depletions: Vec<[Option<u32>; 3]> = paths.iter().map(|p| p.depletion).collect();
        let solvency = SolvencyReport::from_depletion_years(
            scenario.name(),
            self.start_year,
            request.years(),
            &depletions,
        );
        let projection = fold_series(scenario, self.start_year, paths, request.keep_raw());

        info!(
            "trust fund projection complete: OASI depletes in {:.1}% of iterations",
            solvency
                .fund(TrustFund::Oasi)
                .map(|e| e.probability_depleted * 100.0)
                .unwrap_or(0.0)
        );
        (projection, solvency)
    }
}

impl StochasticComponent for TrustFundSimulator {
    type Scenario = SocialSecurityScenario;

    fn kind(&self) -> ComponentKind {
        ComponentKind::SocialSecurity
    }

    fn parameters(&self) -> Vec<(String, String)> {
        let mut params = parameter_pairs("social_security", &self.assumptions);
        params.push(("social_security.start_year".to_string(), self.start_year.to_string()));
        params
    }

    fn project(
        &self,
        request: &ProjectionRequest<SocialSecurityScenario>,
        mode: ExecutionMode,
    ) -> ComponentProjection {
        self.project_with_solvency(request, mode).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn simulator() -> TrustFundSimulator {
        TrustFundSimulator::new(&Assumptions::default_baseline())
    }

    #[test]
    fn test_baseline_reconciliation() {
        let path = simulator().simulate_path(30, SocialSecurityScenario::Baseline, 42, 0);
        let balances = path.balances(TrustFund::Oasi);
        assert_eq!(balances.len(), 30);

        for pair in balances.windows(2) {
            assert!(pair[1] <= pair[0], "balance rose: {:?}", pair);
        }

        let depletion = path.depletion_year(TrustFund::Oasi).expect("OASI should deplete");
        let years_out = depletion - 2025;
        assert!(
            (6..=12).contains(&years_out),
            "depleted {} years after base year",
            years_out
        );
        assert_eq!(balances[balances.len() - 1], 0.0);
    }

    #[test]
    fn test_payroll_increase_does_not_accelerate_depletion() {
        let baseline = simulator();
        let mut reformed_ss = SocialSecurityAssumptions::default();
        reformed_ss.payroll_tax_rate += 0.02;
        let reformed = TrustFundSimulator::from_parts(reformed_ss, 2026);

        let base_year = baseline
            .simulate_path(30, SocialSecurityScenario::Baseline, 42, 0)
            .depletion_year(TrustFund::Oasi)
            .unwrap_or(u32::MAX);
        let reform_year = reformed
            .simulate_path(30, SocialSecurityScenario::Baseline, 42, 0)
            .depletion_year(TrustFund::Oasi)
            .unwrap_or(u32::MAX);
        assert!(reform_year > base_year);
    }

    #[test]
    fn test_full_run_matches_single_path() {
        let sim = simulator();
        let request = ProjectionRequest::new(20, 100, SocialSecurityScenario::Baseline)
            .unwrap()
            .with_seed(7);
        let run = sim.simulate(&request, ExecutionMode::Parallel);
        assert_eq!(run.paths.len(), 100);
        let single = sim.simulate_path(20, SocialSecurityScenario::Baseline, 7, 37);
        assert_eq!(run.paths[37], single);
    }

    #[test]
    fn test_deterministic_statistics() {
        let sim = simulator();
        let request = ProjectionRequest::new(25, 200, SocialSecurityScenario::Pessimistic).unwrap();
        let a = sim.project(&request, ExecutionMode::Parallel);
        let b = sim.project(&request, ExecutionMode::Sequential);
        assert_eq!(a, b);
    }

    #[test]
    fn test_reduced_projection_matches_full_run() {
        let sim = simulator();
        let request = ProjectionRequest::new(30, 150, SocialSecurityScenario::Baseline)
            .unwrap()
            .with_seed(11)
            .with_raw();
        let run = sim.simulate(&request, ExecutionMode::Sequential);
        let (projection, solvency) = sim.project_with_solvency(&request, ExecutionMode::Parallel);

        assert_eq!(projection, run.to_projection(true));
        assert_eq!(solvency, SolvencyReport::from_run(&run));
        assert_eq!(
            projection.raw_series("oasi_balance").map(|m| m.paths.clone()),
            Some(run.balance_trajectories(TrustFund::Oasi))
        );
        assert!(projection.raw_series("tax_income").is_none());
    }

    #[test]
    fn test_projection_series() {
        let sim = simulator();
        let request = ProjectionRequest::new(10, 100, SocialSecurityScenario::Baseline)
            .unwrap()
            .with_raw();
        let proj = sim.project(&request, ExecutionMode::Parallel);
        for name in SERIES {
            assert_eq!(proj.series(name).map(|s| s.len()), Some(10), "{}", name);
        }
        assert_eq!(proj.raw_series("oasi_balance").map(|m| m.iterations()), Some(100));
        assert_eq!(proj.start_year, 2026);
    }

    #[test]
    fn test_reform_package_extends_solvency() {
        let sim = simulator();
        let base = sim.simulate_path(30, SocialSecurityScenario::Baseline, 42, 3);
        let reform = sim.simulate_path(30, SocialSecurityScenario::ReformPackage, 42, 3);
        let base_year = base.depletion_year(TrustFund::Oasi).unwrap_or(u32::MAX);
        let reform_year = reform.depletion_year(TrustFund::Oasi).unwrap_or(u32::MAX);
        assert!(reform_year >= base_year);
    }

    #[test]
    fn test_higher_retirement_age_lowers_outlays() {
        let mut ss = SocialSecurityAssumptions::default();
        let base = TrustFundSimulator::from_parts(ss.clone(), 2026)
            .simulate_path(5, SocialSecurityScenario::Baseline, 1, 0);
        ss.full_retirement_age += 2.0;
        let raised = TrustFundSimulator::from_parts(ss, 2026)
            .simulate_path(5, SocialSecurityScenario::Baseline, 1, 0);
        assert!(raised.years[0].oasi.benefit_outlay < base.years[0].oasi.benefit_outlay);
    }

    #[test]
    fn test_zero_calibration_rate_degrades_gracefully() {
        let mut ss = SocialSecurityAssumptions::default();
        ss.baseline_payroll_rate = 0.0;
        let path = TrustFundSimulator::from_parts(ss, 2026)
            .simulate_path(10, SocialSecurityScenario::ReformPackage, 1, 0);
        assert!(path.years.iter().all(|y| y.oasi.tax_income.is_finite()));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_balances_never_negative(
            seed in any::<u64>(),
            iteration in 0u32..1000,
            oasi_balance in 0.0f64..5_000.0,
            payroll_tax_rate in 0.0f64..0.3,
            benefit in 5_000.0f64..60_000.0,
        ) {
            let mut ss = SocialSecurityAssumptions::default();
            ss.oasi_balance = oasi_balance;
            ss.payroll_tax_rate = payroll_tax_rate;
            ss.oasi_average_benefit = benefit;
            let path = TrustFundSimulator::from_parts(ss, 2026)
                .simulate_path(40, SocialSecurityScenario::Baseline, seed, iteration);
            for year in &path.years {
                prop_assert!(year.oasi.balance >= 0.0);
                prop_assert!(year.di.balance >= 0.0);
            }
        }
    }
}
