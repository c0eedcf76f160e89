//! Generic stochastic projection contract shared by every fiscal component
//!
//! A component validates nothing itself: it receives a [`ProjectionRequest`]
//! that could only be built from in-range values. It then runs independent
//! iterations year by year through [`MonteCarloRunner`] and folds them into
//! per-year statistics.

mod engine;
mod request;
mod stats;
mod table;

pub use engine::{component_seed, noise_factor, sample_normal, MonteCarloRunner};
pub use request::{
    validate_bounds, ProjectionRequest, ScenarioSet, DEFAULT_SEED, MAX_ITERATIONS, MAX_YEARS,
    MIN_ITERATIONS, MIN_YEARS,
};
pub use stats::{guarded_div, mean, percentile, percentile_sorted, std_dev, YearStatistics};
pub use table::{ComponentProjection, ComponentSummary, IterationMatrix};

use serde::{Deserialize, Serialize};

/// Fiscal components known to the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Revenue,
    SocialSecurity,
    Medicare,
    Medicaid,
    Discretionary,
    Interest,
}

impl ComponentKind {
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Revenue => "revenue",
            ComponentKind::SocialSecurity => "social_security",
            ComponentKind::Medicare => "medicare",
            ComponentKind::Medicaid => "medicaid",
            ComponentKind::Discretionary => "discretionary",
            ComponentKind::Interest => "interest",
        }
    }
}

/// Whether iterations run on the rayon pool or on the calling thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Sequential,
    #[default]
    Parallel,
}

impl ExecutionMode {
    pub fn is_parallel(&self) -> bool {
        matches!(self, ExecutionMode::Parallel)
    }
}

/// A fiscal component that can be projected under uncertainty
///
/// Implement this trait to add a component. `project` must be a pure
/// function of the component's assumptions and the request, so results can
/// be cached by [`StochasticComponent::fingerprint_params`].
pub trait StochasticComponent {
    /// Scenarios this component understands
    type Scenario: ScenarioSet;

    fn kind(&self) -> ComponentKind;

    /// Every assumption value that can influence the projection
    fn parameters(&self) -> Vec<(String, String)>;

    /// Run the Monte Carlo projection
    fn project(
        &self,
        request: &ProjectionRequest<Self::Scenario>,
        mode: ExecutionMode,
    ) -> ComponentProjection;

    /// Sorted name/value pairs identifying a (component, request) combination
    fn fingerprint_params(
        &self,
        request: &ProjectionRequest<Self::Scenario>,
    ) -> Vec<(String, String)> {
        let mut params = self.parameters();
        params.extend(request.fingerprint_params());
        params.sort();
        params
    }

    /// Runner seeded for this component and request
    fn runner(
        &self,
        request: &ProjectionRequest<Self::Scenario>,
        mode: ExecutionMode,
    ) -> MonteCarloRunner {
        MonteCarloRunner::for_component(request.seed(), self.kind(), mode.is_parallel())
    }
}
