//! Fiscal assumptions: one assumption set per component plus the shared
//! economic baseline

mod discretionary;
mod economy;
mod healthcare;
mod interest;
mod revenue;
mod social_security;
pub mod loader;

pub use discretionary::DiscretionaryAssumptions;
pub use economy::{EconomicAssumptions, BASE_YEAR_RANGE};
pub use healthcare::{MedicaidAssumptions, MedicareAssumptions};
pub use interest::InterestAssumptions;
pub use revenue::RevenueAssumptions;
pub use social_security::SocialSecurityAssumptions;

use std::fmt::Debug;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AssumptionLoadError;

/// Container for all projection assumptions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Assumptions {
    pub economy: EconomicAssumptions,
    pub social_security: SocialSecurityAssumptions,
    pub revenue: RevenueAssumptions,
    pub medicare: MedicareAssumptions,
    pub medicaid: MedicaidAssumptions,
    pub discretionary: DiscretionaryAssumptions,
    pub interest: InterestAssumptions,
}

impl Assumptions {
    /// Baseline (current-law) assumptions
    pub fn default_baseline() -> Self {
        Self::default()
    }

    /// Baseline assumptions with overrides from a `parameter,value` CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self, AssumptionLoadError> {
        let mut assumptions = Self::default_baseline();
        let overrides = loader::load_parameter_overrides(path)?;
        assumptions.apply_overrides(&overrides)?;
        info!(
            "loaded {} assumption overrides from {}",
            overrides.len(),
            path.display()
        );
        Ok(assumptions)
    }

    /// Apply `section.field = value` overrides
    ///
    /// All overrides are checked before any is applied, so a bad row leaves
    /// `self` unchanged.
    pub fn apply_overrides(&mut self, overrides: &[(String, String)]) -> Result<(), AssumptionLoadError> {
        let mut tree = serde_json::to_value(&*self)
            .map_err(|_| AssumptionLoadError::UnknownParameter("<assumptions>".to_string()))?;
        for (key, raw) in overrides {
            loader::set_leaf(&mut tree, key, raw)?;
        }
        let updated: Assumptions =
            serde_json::from_value(tree).map_err(|_| AssumptionLoadError::InvalidValue {
                parameter: "<assumptions>".to_string(),
                value: format!("{} overrides", overrides.len()),
            })?;
        if !BASE_YEAR_RANGE.contains(&updated.economy.base_year) {
            return Err(AssumptionLoadError::InvalidValue {
                parameter: "economy.base_year".to_string(),
                value: updated.economy.base_year.to_string(),
            });
        }
        *self = updated;
        Ok(())
    }

    /// Set a single parameter by `section.field` key
    pub fn set_parameter(&mut self, key: &str, value: &str) -> Result<(), AssumptionLoadError> {
        self.apply_overrides(&[(key.to_string(), value.to_string())])
    }
}

/// Flatten an assumption set into sorted `prefix.field = value` pairs
///
/// Used for cache fingerprints. Floats are rendered with `{:?}` so every
/// bit of precision takes part in the fingerprint.
pub fn parameter_pairs<T: Serialize + Debug>(prefix: &str, set: &T) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    match serde_json::to_value(set) {
        Ok(Value::Object(map)) => {
            for (field, value) in map {
                let rendered = match value {
                    Value::Number(n) if !n.is_u64() => match n.as_f64() {
                        Some(f) => format!("{:?}", f),
                        None => n.to_string(),
                    },
                    other => other.to_string(),
                };
                pairs.push((format!("{}.{}", prefix, field), rendered));
            }
        }
        _ => {
            warn!("assumption set '{}' did not serialize to an object; using debug form", prefix);
            pairs.push((prefix.to_string(), format!("{:?}", set)));
        }
    }
    pairs.sort();
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_parameter() {
        let mut a = Assumptions::default_baseline();
        a.set_parameter("social_security.payroll_tax_rate", "0.134").unwrap();
        a.set_parameter("medicaid.expansion_enabled", "true").unwrap();
        a.set_parameter("economy.base_year", "2030").unwrap();
        assert_eq!(a.social_security.payroll_tax_rate, 0.134);
        assert!(a.medicaid.expansion_enabled);
        assert_eq!(a.economy.base_year, 2030);
    }

    #[test]
    fn test_base_year_out_of_range_rejected() {
        let mut a = Assumptions::default_baseline();
        for raw in ["4294967295", "1899", "2201"] {
            let err = a.set_parameter("economy.base_year", raw).unwrap_err();
            assert!(
                matches!(err, AssumptionLoadError::InvalidValue { ref parameter, .. } if parameter == "economy.base_year"),
                "{raw}: {err:?}"
            );
        }
        assert_eq!(a, Assumptions::default_baseline());
        a.set_parameter("economy.base_year", "2200").unwrap();
        assert_eq!(a.economy.start_year(), 2201);
    }

    #[test]
    fn test_apply_overrides_all_or_nothing() {
        let mut a = Assumptions::default_baseline();
        let overrides = vec![
            ("revenue.corporate_rate".to_string(), "0.28".to_string()),
            ("revenue.no_such_field".to_string(), "1".to_string()),
        ];
        assert!(a.apply_overrides(&overrides).is_err());
        assert_eq!(a, Assumptions::default_baseline());
    }

    #[test]
    fn test_parameter_pairs_sorted_and_prefixed() {
        let pairs = parameter_pairs("interest", &InterestAssumptions::default());
        assert!(!pairs.is_empty());
        assert!(pairs.iter().all(|(k, _)| k.starts_with("interest.")));
        let mut sorted = pairs.clone();
        sorted.sort();
        assert_eq!(pairs, sorted);
        assert!(pairs.contains(&("interest.long_run_rate".to_string(), "0.038".to_string())));
    }

    #[test]
    fn test_parameter_pairs_change_with_values() {
        let base = parameter_pairs("ss", &SocialSecurityAssumptions::default());
        let mut changed = SocialSecurityAssumptions::default();
        changed.payroll_tax_rate += 1e-12;
        assert_ne!(base, parameter_pairs("ss", &changed));
    }
}
