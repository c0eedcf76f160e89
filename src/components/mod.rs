//! Peer fiscal components
//!
//! Revenue, Medicare, Medicaid, discretionary spending and net interest all
//! follow the [`StochasticComponent`](crate::projection::StochasticComponent)
//! contract. Each one owns a copy of its slice of the assumptions, so a model
//! built before an override keeps projecting the old values.

pub mod discretionary;
pub mod interest;
pub mod medicaid;
pub mod medicare;
pub mod revenue;

pub use discretionary::DiscretionaryModel;
pub use interest::InterestModel;
pub use medicaid::MedicaidModel;
pub use medicare::MedicareModel;
pub use revenue::RevenueModel;

use serde::{Deserialize, Serialize};

use crate::projection::ScenarioSet;

/// Economic scenarios for receipts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueScenario {
    Baseline,
    /// Two weak years followed by a partial catch-up
    Recession,
    StrongGrowth,
}

impl RevenueScenario {
    /// Change to nominal growth in projection year `t` (1-indexed)
    pub fn growth_adjustment(&self, t: u32) -> f64 {
        match (self, t) {
            (RevenueScenario::Recession, 1 | 2) => -0.03,
            (RevenueScenario::Recession, 3) => 0.02,
            (RevenueScenario::StrongGrowth, _) => 0.0075,
            _ => 0.0,
        }
    }
}

impl ScenarioSet for RevenueScenario {
    const COMPONENT: &'static str = "revenue";
    const ALL: &'static [Self] = &[
        RevenueScenario::Baseline,
        RevenueScenario::Recession,
        RevenueScenario::StrongGrowth,
    ];

    fn name(&self) -> &'static str {
        match self {
            RevenueScenario::Baseline => "baseline",
            RevenueScenario::Recession => "recession",
            RevenueScenario::StrongGrowth => "strong_growth",
        }
    }
}

/// Cost-growth scenarios shared by Medicare and Medicaid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthcareScenario {
    Baseline,
    HighCost,
    CostControl,
}

impl HealthcareScenario {
    pub fn cost_growth_adjustment(&self) -> f64 {
        match self {
            HealthcareScenario::Baseline => 0.0,
            HealthcareScenario::HighCost => 0.015,
            HealthcareScenario::CostControl => -0.01,
        }
    }
}

impl ScenarioSet for HealthcareScenario {
    const COMPONENT: &'static str = "healthcare";
    const ALL: &'static [Self] = &[
        HealthcareScenario::Baseline,
        HealthcareScenario::HighCost,
        HealthcareScenario::CostControl,
    ];

    fn name(&self) -> &'static str {
        match self {
            HealthcareScenario::Baseline => "baseline",
            HealthcareScenario::HighCost => "high_cost",
            HealthcareScenario::CostControl => "cost_control",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscretionaryScenario {
    Baseline,
    /// Nominal freeze for the configured number of years
    Freeze,
    /// Growth two points above baseline
    Expansion,
}

impl ScenarioSet for DiscretionaryScenario {
    const COMPONENT: &'static str = "discretionary";
    const ALL: &'static [Self] = &[
        DiscretionaryScenario::Baseline,
        DiscretionaryScenario::Freeze,
        DiscretionaryScenario::Expansion,
    ];

    fn name(&self) -> &'static str {
        match self {
            DiscretionaryScenario::Baseline => "baseline",
            DiscretionaryScenario::Freeze => "freeze",
            DiscretionaryScenario::Expansion => "expansion",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestScenario {
    Baseline,
    HighRates,
    LowRates,
}

impl InterestScenario {
    /// Shift applied to the long-run rate
    pub fn rate_adjustment(&self) -> f64 {
        match self {
            InterestScenario::Baseline => 0.0,
            InterestScenario::HighRates => 0.01,
            InterestScenario::LowRates => -0.0075,
        }
    }
}

impl ScenarioSet for InterestScenario {
    const COMPONENT: &'static str = "interest";
    const ALL: &'static [Self] = &[
        InterestScenario::Baseline,
        InterestScenario::HighRates,
        InterestScenario::LowRates,
    ];

    fn name(&self) -> &'static str {
        match self {
            InterestScenario::Baseline => "baseline",
            InterestScenario::HighRates => "high_rates",
            InterestScenario::LowRates => "low_rates",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use log::{Level, LevelFilter, Log, Metadata, Record};

    use crate::assumptions::Assumptions;
    use crate::error::ProjectionError;
    use crate::projection::{ExecutionMode, ProjectionRequest, StochasticComponent};
    use crate::trust_fund::{SocialSecurityScenario, TrustFundSimulator};

    /// Collects formatted info-level messages from every test in this binary
    struct CaptureLogger {
        lines: Mutex<Vec<String>>,
    }

    impl Log for CaptureLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Info
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                if let Ok(mut lines) = self.lines.lock() {
                    lines.push(record.args().to_string());
                }
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: CaptureLogger = CaptureLogger {
        lines: Mutex::new(Vec::new()),
    };

    #[test]
    fn test_projections_log_start_and_completion() {
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(LevelFilter::Info);

        let a = Assumptions::default_baseline();
        let mode = ExecutionMode::Sequential;
        RevenueModel::new(&a).project(
            &ProjectionRequest::new(2, 100, RevenueScenario::Baseline).unwrap(),
            mode,
        );
        MedicareModel::new(&a).project(
            &ProjectionRequest::new(2, 100, HealthcareScenario::Baseline).unwrap(),
            mode,
        );
        MedicaidModel::new(&a).project(
            &ProjectionRequest::new(2, 100, HealthcareScenario::Baseline).unwrap(),
            mode,
        );
        DiscretionaryModel::new(&a).project(
            &ProjectionRequest::new(2, 100, DiscretionaryScenario::Baseline).unwrap(),
            mode,
        );
        InterestModel::new(&a).project(
            &ProjectionRequest::new(2, 100, InterestScenario::Baseline).unwrap(),
            mode,
        );
        TrustFundSimulator::new(&a).project(
            &ProjectionRequest::new(2, 100, SocialSecurityScenario::Baseline).unwrap(),
            mode,
        );

        let lines = CAPTURE.lines.lock().unwrap();
        for (name, done) in [
            ("revenue", "revenue projection complete"),
            ("medicare", "medicare projection complete"),
            ("medicaid", "medicaid projection complete"),
            ("discretionary", "discretionary projection complete"),
            ("interest", "interest projection complete"),
            ("trust funds", "trust fund projection complete"),
        ] {
            let start = format!("projecting {}:", name);
            assert!(lines.iter().any(|l| l.starts_with(&start)), "no start line for {}", name);
            assert!(lines.iter().any(|l| l.starts_with(done)), "no completion line for {}", name);
        }
    }

    #[test]
    fn test_recession_profile() {
        let r = RevenueScenario::Recession;
        assert_eq!(r.growth_adjustment(1), -0.03);
        assert_eq!(r.growth_adjustment(2), -0.03);
        assert_eq!(r.growth_adjustment(3), 0.02);
        assert_eq!(r.growth_adjustment(4), 0.0);
    }

    #[test]
    fn test_scenario_names_round_trip() {
        for s in HealthcareScenario::ALL {
            assert_eq!(HealthcareScenario::parse(s.name()).unwrap(), *s);
        }
        for s in InterestScenario::ALL {
            assert_eq!(InterestScenario::parse(s.name()).unwrap(), *s);
        }
        assert_eq!(
            DiscretionaryScenario::parse("FREEZE").unwrap(),
            DiscretionaryScenario::Freeze
        );
    }

    #[test]
    fn test_unknown_scenario_names_component() {
        match RevenueScenario::parse("boom") {
            Err(ProjectionError::UnknownScenario { component, .. }) => {
                assert_eq!(component, "revenue")
            }
            other => panic!("expected unknown scenario, got {:?}", other),
        }
    }
}
