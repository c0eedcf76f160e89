//! Validated projection requests and enumerated scenario sets

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::ProjectionError;

/// Smallest projection horizon in years
pub const MIN_YEARS: u32 = 1;
/// Largest projection horizon in years
pub const MAX_YEARS: u32 = 75;
/// Fewest Monte Carlo iterations accepted
pub const MIN_ITERATIONS: u32 = 100;
/// Most Monte Carlo iterations accepted
pub const MAX_ITERATIONS: u32 = 50_000;

/// Seed used when a request does not carry its own
pub const DEFAULT_SEED: u64 = 42;

/// Closed set of scenarios a component understands
///
/// Implementors are plain fieldless enums. `ALL` drives both parsing and
/// error messages, so adding a variant there is all a new scenario needs.
pub trait ScenarioSet: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Component label used in error messages and fingerprints
    const COMPONENT: &'static str;

    /// Every scenario in declaration order
    const ALL: &'static [Self];

    /// Stable snake_case name
    fn name(&self) -> &'static str;

    /// Parse a scenario from its snake_case name
    fn parse(name: &str) -> Result<Self, ProjectionError> {
        let wanted = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ProjectionError::UnknownScenario {
                component: Self::COMPONENT,
                name: name.to_string(),
                expected: Self::ALL
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Check `years` and `iterations` against the documented bounds
pub fn validate_bounds(years: u32, iterations: u32) -> Result<(), ProjectionError> {
    if !(MIN_YEARS..=MAX_YEARS).contains(&years) {
        return Err(ProjectionError::Range {
            field: "years",
            value: years as u64,
            min: MIN_YEARS as u64,
            max: MAX_YEARS as u64,
        });
    }
    if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&iterations) {
        return Err(ProjectionError::Range {
            field: "iterations",
            value: iterations as u64,
            min: MIN_ITERATIONS as u64,
            max: MAX_ITERATIONS as u64,
        });
    }
    Ok(())
}

/// A projection request that has already passed validation
///
/// There is no way to build one with out-of-range values, so components can
/// start sampling without re-checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectionRequest<S> {
    years: u32,
    iterations: u32,
    scenario: S,
    seed: u64,
    keep_raw: bool,
}

impl<S: ScenarioSet> ProjectionRequest<S> {
    /// Validate and build a request
    pub fn new(years: u32, iterations: u32, scenario: S) -> Result<Self, ProjectionError> {
        validate_bounds(years, iterations)?;
        Ok(Self {
            years,
            iterations,
            scenario,
            seed: DEFAULT_SEED,
            keep_raw: false,
        })
    }

    /// Validate and build a request from a scenario name
    ///
    /// Bounds are checked before the name is looked up.
    pub fn parse(years: u32, iterations: u32, scenario: &str) -> Result<Self, ProjectionError> {
        validate_bounds(years, iterations)?;
        Ok(Self {
            years,
            iterations,
            scenario: S::parse(scenario)?,
            seed: DEFAULT_SEED,
            keep_raw: false,
        })
    }

    /// Use a specific base seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Keep per-iteration trajectories in the result
    pub fn with_raw(mut self) -> Self {
        self.keep_raw = true;
        self
    }

    pub fn years(&self) -> u32 {
        self.years
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn scenario(&self) -> S {
        self.scenario
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn keep_raw(&self) -> bool {
        self.keep_raw
    }

    /// Name/value pairs identifying this request inside a cache fingerprint
    pub fn fingerprint_params(&self) -> Vec<(String, String)> {
        vec![
            ("request.iterations".to_string(), self.iterations.to_string()),
            ("request.keep_raw".to_string(), self.keep_raw.to_string()),
            ("request.scenario".to_string(), self.scenario.name().to_string()),
            ("request.seed".to_string(), self.seed.to_string()),
            ("request.years".to_string(), self.years.to_string()),
        ]
    }
}
