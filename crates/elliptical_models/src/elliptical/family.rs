//! Capabilities a concrete elliptical family supplies to the generic engine.
//!
//! A family is described entirely by its density generator `phi` and the
//! distribution of the standardized radius `‖U‖`. The engine never branches
//! on which family it is running; it only calls these traits.
//!
//! ## Monotonicity precondition
//!
//! The minimum-volume level set is only an ellipsoid when `phi` is
//! non-increasing on `[0, ∞)`. The level-set solver samples `phi` on the
//! solved range and reports `NumericalError::NonMonotoneGenerator` when the
//! precondition is visibly broken.

use super::level_set::LevelSetSolver;
use super::radial::RadialCdf;
use elliptical_core::types::EllipticalResult;
use rand::Rng;
use rand_distr::{Open01, StandardNormal};
use std::fmt::Debug;

/// Density generator `phi` of an elliptical family.
///
/// The density of a standardized deviate `u ∈ Rⁿ` is
/// `exp(log_normalization_constant(n)) · phi(‖u‖²)`.
pub trait DensityGenerator {
    /// `phi(t)` for `t = β² ≥ 0`.
    fn density_generator(&self, beta_squared: f64, dimension: usize) -> f64;

    /// `ln phi(t)`, accurate where `phi(t)` underflows.
    fn log_density_generator(&self, beta_squared: f64, dimension: usize) -> f64 {
        self.density_generator(beta_squared, dimension).ln()
    }

    /// `phi'(t)`.
    fn density_generator_derivative(&self, beta_squared: f64, dimension: usize) -> f64;

    /// `phi''(t)`.
    fn density_generator_second_derivative(&self, beta_squared: f64, dimension: usize) -> f64;

    /// Logarithm of the constant making `phi(‖u‖²)` a density on `Rⁿ`.
    fn log_normalization_constant(&self, dimension: usize) -> f64;
}

/// Distribution of the standardized radius `‖U‖`.
pub trait RadialDistribution {
    /// `P(‖U‖ ≤ radius)`, non-decreasing in `radius`.
    fn radial_cdf(&self, radius: f64, dimension: usize) -> f64;

    /// `P(‖U‖ > radius)`; override when the complement loses precision.
    fn radial_survival(&self, radius: f64, dimension: usize) -> f64 {
        1.0 - self.radial_cdf(radius, dimension)
    }
}

/// A complete elliptical family as consumed by
/// [`EllipticalDistribution`](super::EllipticalDistribution).
pub trait EllipticalFamily: DensityGenerator + RadialDistribution + Clone + Debug {
    /// Family name used in logs.
    fn name(&self) -> &'static str;

    /// Whether `E‖X‖^order` is finite.
    fn has_finite_moment(&self, _order: u32) -> bool {
        true
    }

    /// Draws a standardized deviate `u` (zero location, unit scale, identity correlation).
    ///
    /// The default draws a uniform direction and inverts the radial CDF with
    /// `solver`, which carries the owning distribution's quantile budgets.
    /// Families with a direct sampler override it and ignore `solver`.
    fn sample_standard<R: Rng + ?Sized>(
        &self,
        dimension: usize,
        solver: &LevelSetSolver,
        rng: &mut R,
    ) -> EllipticalResult<Vec<f64>> {
        let direction = uniform_direction(dimension, rng);
        let level: f64 = rng.sample(Open01);
        let radial = RadialCdf::new(self, dimension);
        let radius = solver.solve_radius(&radial, level)?;
        Ok(direction.into_iter().map(|d| d * radius).collect())
    }
}

/// Uniformly distributed point on the unit sphere of `Rⁿ`.
pub fn uniform_direction<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Vec<f64> {
    loop {
        let z: Vec<f64> = (0..dimension).map(|_| rng.sample(StandardNormal)).collect();
        let norm = z.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            return z.into_iter().map(|v| v / norm).collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_direction_has_unit_norm() {
        let mut rng = StdRng::seed_from_u64(3);
        for dim in 1..5 {
            let d = uniform_direction(dim, &mut rng);
            let norm: f64 = d.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert_eq!(d.len(), dim);
            assert!((norm - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_uniform_direction_is_centered() {
        let mut rng = StdRng::seed_from_u64(5);
        let n = 20_000;
        let mut mean = [0.0; 3];
        for _ in 0..n {
            for (m, v) in mean.iter_mut().zip(uniform_direction(3, &mut rng)) {
                *m += v / n as f64;
            }
        }
        assert!(mean.iter().all(|m| m.abs() < 0.02), "mean = {:?}", mean);
    }
}
