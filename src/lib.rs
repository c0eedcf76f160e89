//! Fiscal Projection - Monte Carlo projection engine for federal budget components
//!
//! This library provides:
//! - A generic stochastic projection contract shared by every fiscal component
//! - Social Security trust fund simulation with a depletion floor
//! - Depletion-year (solvency) statistics
//! - A combined budget model with fingerprint caching and policy overrides
//! - Reform comparisons over independent assumption sets

pub mod assumptions;
pub mod budget;
pub mod components;
pub mod error;
pub mod projection;
pub mod scenario;
pub mod solvency;
pub mod trust_fund;

// Re-export commonly used types
pub use assumptions::Assumptions;
pub use budget::{
    BudgetRequest, FiscalModel, FiscalSummary, ModelConfig, PolicyMechanics, UnifiedBudget,
    UnifiedBudgetRow,
};
pub use error::{AssumptionLoadError, OverrideError, ProjectionError, ScenarioError};
pub use projection::{ComponentProjection, ExecutionMode, ProjectionRequest, StochasticComponent};
pub use scenario::{ReformComparison, ScenarioRunner};
pub use solvency::{SolvencyEstimate, SolvencyReport};
pub use trust_fund::{SocialSecurityScenario, TrustFund, TrustFundSimulator};
