//! Output structures for component projections

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::stats::YearStatistics;
use super::ComponentKind;

/// Per-iteration values for one series: `paths[iteration][year]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationMatrix {
    /// Calendar year of the first column
    pub start_year: u32,

    /// One trajectory per iteration, each `years` long
    pub paths: Vec<Vec<f64>>,
}

impl IterationMatrix {
    pub fn new(start_year: u32, paths: Vec<Vec<f64>>) -> Self {
        Self { start_year, paths }
    }

    /// Number of iterations (rows)
    pub fn iterations(&self) -> usize {
        self.paths.len()
    }

    /// Number of projection years (columns)
    pub fn years(&self) -> usize {
        self.paths.first().map(|p| p.len()).unwrap_or(0)
    }

    /// Values across all iterations for one year index
    pub fn column(&self, year_index: usize) -> Vec<f64> {
        self.paths
            .iter()
            .filter_map(|p| p.get(year_index).copied())
            .collect()
    }

    /// Cross-iteration statistics for every year
    pub fn statistics(&self) -> Vec<YearStatistics> {
        (0..self.years())
            .map(|y| YearStatistics::from_samples(&mut self.column(y)))
            .collect()
    }

    /// Mean trajectory across iterations
    pub fn mean_path(&self) -> Vec<f64> {
        self.statistics().iter().map(|s| s.mean).collect()
    }
}

/// Result of one component projection: per-year statistics for each series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentProjection {
    pub component: ComponentKind,

    /// Scenario name the projection ran under
    pub scenario: String,

    /// Calendar year of the first row
    pub start_year: u32,

    /// Number of Monte Carlo iterations behind the statistics
    pub iterations: u32,

    /// Per-year statistics keyed by series name
    pub series: BTreeMap<String, Vec<YearStatistics>>,

    /// Per-iteration trajectories, only populated when requested
    pub raw: BTreeMap<String, IterationMatrix>,
}

impl ComponentProjection {
    /// Fold per-iteration matrices into per-year statistics
    pub fn from_matrices(
        component: ComponentKind,
        scenario: &str,
        start_year: u32,
        iterations: u32,
        matrices: Vec<(&str, IterationMatrix)>,
        keep_raw: bool,
    ) -> Self {
        let mut series = BTreeMap::new();
        let mut raw = BTreeMap::new();

        for (name, matrix) in matrices {
            series.insert(name.to_string(), matrix.statistics());
            if keep_raw {
                raw.insert(name.to_string(), matrix);
            }
        }

        Self {
            component,
            scenario: scenario.to_string(),
            start_year,
            iterations,
            series,
            raw,
        }
    }

    /// Number of projected years (length of the longest series)
    pub fn years(&self) -> usize {
        self.series.values().map(|s| s.len()).max().unwrap_or(0)
    }

    /// Calendar years covered by the projection
    pub fn calendar_years(&self) -> Vec<u32> {
        (0..self.years() as u32).map(|i| self.start_year + i).collect()
    }

    pub fn series(&self, name: &str) -> Option<&[YearStatistics]> {
        self.series.get(name).map(|s| s.as_slice())
    }

    /// Mean path of a series, empty if the series does not exist
    pub fn mean_series(&self, name: &str) -> Vec<f64> {
        self.series(name)
            .map(|s| s.iter().map(|y| y.mean).collect())
            .unwrap_or_default()
    }

    /// Raw trajectories of a series, if they were kept
    pub fn raw_series(&self, name: &str) -> Option<&IterationMatrix> {
        self.raw.get(name)
    }

    /// Horizon totals and final-year means for every series
    pub fn summary(&self) -> ComponentSummary {
        let mut totals = BTreeMap::new();
        let mut finals = BTreeMap::new();
        for (name, stats) in &self.series {
            totals.insert(name.clone(), stats.iter().map(|s| s.mean).sum());
            finals.insert(name.clone(), stats.last().map(|s| s.mean).unwrap_or(0.0));
        }

        ComponentSummary {
            component: self.component,
            years: self.years() as u32,
            totals,
            finals,
        }
    }
}

/// Summary statistics for a component projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub component: ComponentKind,
    pub years: u32,

    /// Sum of the mean path over the horizon
    pub totals: BTreeMap<String, f64>,

    /// Mean value in the final projected year
    pub finals: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn matrix() -> IterationMatrix {
        IterationMatrix::new(2026, vec![vec![1.0, 10.0], vec![3.0, 20.0], vec![2.0, 30.0]])
    }

    #[test]
    fn test_matrix_shape() {
        let m = matrix();
        assert_eq!(m.iterations(), 3);
        assert_eq!(m.years(), 2);
        assert_eq!(m.column(1), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_mean_path() {
        let m = matrix();
        let mean = m.mean_path();
        assert_relative_eq!(mean[0], 2.0);
        assert_relative_eq!(mean[1], 20.0);
    }

    #[test]
    fn test_from_matrices_raw_only_when_requested() {
        let without = ComponentProjection::from_matrices(
            ComponentKind::Revenue,
            "baseline",
            2026,
            3,
            vec![("total_revenue", matrix())],
            false,
        );
        assert!(without.raw.is_empty());
        assert_eq!(without.years(), 2);
        assert_eq!(without.calendar_years(), vec![2026, 2027]);

        let with = ComponentProjection::from_matrices(
            ComponentKind::Revenue,
            "baseline",
            2026,
            3,
            vec![("total_revenue", matrix())],
            true,
        );
        assert_eq!(with.raw_series("total_revenue"), Some(&matrix()));
    }

    #[test]
    fn test_summary_totals() {
        let proj = ComponentProjection::from_matrices(
            ComponentKind::Revenue,
            "baseline",
            2026,
            3,
            vec![("total_revenue", matrix())],
            false,
        );
        let summary = proj.summary();
        assert_relative_eq!(summary.totals["total_revenue"], 22.0);
        assert_relative_eq!(summary.finals["total_revenue"], 20.0);
        assert!(proj.mean_series("missing").is_empty());
    }
}
