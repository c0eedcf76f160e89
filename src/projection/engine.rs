//! Monte Carlo iteration runner shared by every stochastic component
//!
//! Each iteration owns an RNG seeded from the component seed and its own
//! iteration index. Iterations therefore never share random state, and the
//! parallel and sequential loops produce bit-identical results: rayon's
//! indexed `collect` keeps iteration order.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;

use super::table::IterationMatrix;
use super::ComponentKind;

/// Odd constant from the golden ratio, used to spread iteration indices
const SEED_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// Runs independent Monte Carlo iterations
#[derive(Debug, Clone, Copy)]
pub struct MonteCarloRunner {
    seed: u64,
    parallel: bool,
}

impl MonteCarloRunner {
    /// Create a runner for one component projection
    pub fn new(seed: u64, parallel: bool) -> Self {
        Self { seed, parallel }
    }

    /// Runner whose seed is the base seed mixed with a per-component salt
    pub fn for_component(base_seed: u64, component: ComponentKind, parallel: bool) -> Self {
        Self::new(component_seed(base_seed, component), parallel)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Deterministic RNG for one iteration
    pub fn iteration_rng(&self, iteration: u32) -> ChaCha20Rng {
        let mixed = self.seed ^ (iteration as u64 + 1).wrapping_mul(SEED_SPREAD);
        ChaCha20Rng::seed_from_u64(mixed)
    }

    /// Run `f` once per iteration, collecting results in iteration order
    pub fn map_iterations<T, F>(&self, iterations: u32, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(u32, &mut ChaCha20Rng) -> T + Sync,
    {
        if self.parallel {
            (0..iterations)
                .into_par_iter()
                .map(|i| f(i, &mut self.iteration_rng(i)))
                .collect()
        } else {
            (0..iterations)
                .map(|i| f(i, &mut self.iteration_rng(i)))
                .collect()
        }
    }

    /// Run iterations that each produce one trajectory per named series
    ///
    /// `path` returns `values[series][year]` with series in the same order as
    /// `series`. The output pairs each series name with its iteration matrix.
    pub fn run_series<'a, F>(
        &self,
        iterations: u32,
        start_year: u32,
        series: &[&'a str],
        path: F,
    ) -> Vec<(&'a str, IterationMatrix)>
    where
        F: Fn(u32, &mut ChaCha20Rng) -> Vec<Vec<f64>> + Sync,
    {
        let per_iteration = self.map_iterations(iterations, path);

        let mut columns: Vec<Vec<Vec<f64>>> = series
            .iter()
            .map(|_| Vec::with_capacity(iterations as usize))
            .collect();
        for trajectories in per_iteration {
            for (slot, values) in columns.iter_mut().zip(trajectories) {
                slot.push(values);
            }
        }

        series
            .iter()
            .copied()
            .zip(columns)
            .map(|(name, paths)| (name, IterationMatrix::new(start_year, paths)))
            .collect()
    }
}

/// Mix the model seed with a stable per-component salt
pub fn component_seed(base_seed: u64, component: ComponentKind) -> u64 {
    let salt = component
        .name()
        .bytes()
        .fold(0xCBF2_9CE4_8422_2325u64, |acc, b| {
            (acc ^ b as u64).wrapping_mul(0x0100_0000_01B3)
        });
    base_seed ^ salt
}

/// Draw from N(mean, std_dev)
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + std_dev * z
}

/// Multiplicative noise factor centred on 1.0, floored so it stays positive
pub fn noise_factor<R: Rng + ?Sized>(rng: &mut R, std_dev: f64) -> f64 {
    sample_normal(rng, 1.0, std_dev).max(0.01)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_rng_deterministic() {
        let runner = MonteCarloRunner::new(42, false);
        let a: f64 = runner.iteration_rng(3).random();
        let b: f64 = runner.iteration_rng(3).random();
        let c: f64 = runner.iteration_rng(4).random();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let draw = |_i: u32, rng: &mut ChaCha20Rng| -> Vec<f64> {
            (0..5).map(|_| sample_normal(rng, 0.0, 1.0)).collect()
        };
        let seq = MonteCarloRunner::new(9, false).map_iterations(250, draw);
        let par = MonteCarloRunner::new(9, true).map_iterations(250, draw);
        assert_eq!(seq, par);
    }

    #[test]
    fn test_run_series_shapes() {
        let runner = MonteCarloRunner::new(1, true);
        let out = runner.run_series(10, 2026, &["a", "b"], |i, _rng| {
            vec![vec![i as f64; 3], vec![-(i as f64); 3]]
        });
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].0, "a");
        assert_eq!(out[0].1.iterations(), 10);
        assert_eq!(out[0].1.years(), 3);
        assert_eq!(out[1].1.paths[7], vec![-7.0; 3]);
    }

    #[test]
    fn test_component_seeds_differ() {
        let a = component_seed(42, ComponentKind::Revenue);
        let b = component_seed(42, ComponentKind::Medicare);
        assert_ne!(a, b);
        assert_eq!(a, component_seed(42, ComponentKind::Revenue));
    }

    #[test]
    fn test_noise_factor_positive() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        for _ in 0..1000 {
            assert!(noise_factor(&mut rng, 5.0) > 0.0);
        }
    }
}
