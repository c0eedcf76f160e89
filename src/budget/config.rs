//! Model-wide run configuration

use serde::{Deserialize, Serialize};

use crate::projection::{ExecutionMode, DEFAULT_SEED};

/// Share of a national healthcare-spending target attributed to federal
/// Medicare and Medicaid outlays
pub const DEFAULT_HEALTHCARE_TARGET_RATIO: f64 = 0.35;

/// Relative growth of the healthcare share after the target year
pub const DEFAULT_POST_TARGET_SHARE_GROWTH: f64 = 0.005;

/// Settings shared by every projection a [`FiscalModel`](super::FiscalModel) runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Base seed; each component mixes in its own salt
    pub seed: u64,

    /// Run iterations on the rayon pool
    pub parallel: bool,

    /// Maps a total healthcare share-of-GDP target onto federal
    /// Medicare plus Medicaid spending. Not an authoritative figure.
    pub healthcare_target_ratio: f64,

    /// Yearly relative growth of the federal healthcare share once the target
    /// year has passed
    pub post_target_share_growth: f64,

    pub cache_enabled: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            parallel: true,
            healthcare_target_ratio: DEFAULT_HEALTHCARE_TARGET_RATIO,
            post_target_share_growth: DEFAULT_POST_TARGET_SHARE_GROWTH,
            cache_enabled: true,
        }
    }
}

impl ModelConfig {
    pub fn execution_mode(&self) -> ExecutionMode {
        if self.parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
