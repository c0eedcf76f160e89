//! CSV-based assumption overrides
//!
//! Reads `parameter,value` rows such as
//!
//! ```text
//! parameter,value
//! social_security.payroll_tax_rate,0.134
//! economy.base_year,2026
//! medicaid.expansion_enabled,true
//! ```
//!
//! Keys are `<section>.<field>` where the section is one of the fields of
//! [`Assumptions`](super::Assumptions).

use std::fs::File;
use std::path::Path;

use serde_json::Value;

use crate::error::AssumptionLoadError;

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct OverrideRow {
    parameter: String,
    value: String,
}

/// Load parameter overrides in file order
pub fn load_parameter_overrides(path: &Path) -> Result<Vec<(String, String)>, AssumptionLoadError> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let mut overrides = Vec::new();
    for result in reader.deserialize() {
        let row: OverrideRow = result?;
        overrides.push((row.parameter, row.value));
    }

    Ok(overrides)
}

/// Replace one leaf of a serialized assumption tree, keeping its JSON type
pub(super) fn set_leaf(tree: &mut Value, key: &str, raw: &str) -> Result<(), AssumptionLoadError> {
    let unknown = || AssumptionLoadError::UnknownParameter(key.to_string());
    let invalid = || AssumptionLoadError::InvalidValue {
        parameter: key.to_string(),
        value: raw.to_string(),
    };

    let (section, field) = key.split_once('.').ok_or_else(unknown)?;
    let slot = tree
        .get_mut(section)
        .and_then(|s| s.get_mut(field))
        .ok_or_else(unknown)?;

    let raw = raw.trim();
    let replacement = match &*slot {
        Value::Bool(_) => Value::Bool(raw.parse().map_err(|_| invalid())?),
        Value::Number(n) if n.is_u64() => Value::from(raw.parse::<u64>().map_err(|_| invalid())?),
        Value::Number(_) => {
            let v: f64 = raw.parse().map_err(|_| invalid())?;
            if !v.is_finite() {
                return Err(invalid());
            }
            Value::from(v)
        }
        _ => return Err(invalid()),
    };
    *slot = replacement;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_set_leaf_types() {
        let mut tree = serde_json::json!({
            "a": { "rate": 0.5, "year": 2025, "flag": false }
        });
        set_leaf(&mut tree, "a.rate", "0.75").unwrap();
        set_leaf(&mut tree, "a.year", " 2030 ").unwrap();
        set_leaf(&mut tree, "a.flag", "true").unwrap();
        assert_eq!(tree["a"]["rate"], 0.75);
        assert_eq!(tree["a"]["year"], 2030);
        assert_eq!(tree["a"]["flag"], true);
    }

    #[test]
    fn test_set_leaf_errors() {
        let mut tree = serde_json::json!({ "a": { "rate": 0.5, "year": 2025 } });
        assert!(matches!(
            set_leaf(&mut tree, "a.missing", "1"),
            Err(AssumptionLoadError::UnknownParameter(_))
        ));
        assert!(matches!(
            set_leaf(&mut tree, "norate", "1"),
            Err(AssumptionLoadError::UnknownParameter(_))
        ));
        assert!(matches!(
            set_leaf(&mut tree, "a.rate", "abc"),
            Err(AssumptionLoadError::InvalidValue { .. })
        ));
        assert!(matches!(
            set_leaf(&mut tree, "a.year", "-3"),
            Err(AssumptionLoadError::InvalidValue { .. })
        ));
        assert!(matches!(
            set_leaf(&mut tree, "a.rate", "inf"),
            Err(AssumptionLoadError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_parameter_overrides() {
        let path = std::env::temp_dir().join(format!(
            "fiscal_projection_overrides_{}.csv",
            std::process::id()
        ));
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "parameter,value").unwrap();
            writeln!(file, "social_security.payroll_tax_rate, 0.134").unwrap();
            writeln!(file, "medicaid.expansion_enabled,true").unwrap();
        }

        let rows = load_parameter_overrides(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            rows,
            vec![
                ("social_security.payroll_tax_rate".to_string(), "0.134".to_string()),
                ("medicaid.expansion_enabled".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_file() {
        let err = load_parameter_overrides(Path::new("/nonexistent/overrides.csv")).unwrap_err();
        assert!(matches!(err, AssumptionLoadError::Io(_)));
    }
}
