//! Multivariate normal family.
//!
//! ```text
//! phi(t) = exp(−t/2)
//! c_n    = (2π)^{−n/2}
//! F_R(r) = P(χ²_n ≤ r²)
//! ```

use crate::elliptical::{
    DensityGenerator, EllipticalDistribution, EllipticalFamily, LevelSetSolver, RadialDistribution,
};
use elliptical_core::math::linalg::CorrelationMatrix;
use elliptical_core::types::EllipticalResult;
use rand::Rng;
use rand_distr::StandardNormal;
use statrs::function::gamma::{gamma_lr, gamma_ur};
use std::f64::consts::PI;

/// Gaussian density generator. Covariance equals the shape matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Normal;

impl Normal {
    /// Normal distribution with location `mu`, scales `sigma` and correlation `R`.
    pub fn distribution(
        mu: Vec<f64>,
        sigma: Vec<f64>,
        correlation: CorrelationMatrix<f64>,
    ) -> EllipticalResult<EllipticalDistribution<Normal>> {
        EllipticalDistribution::from_parts(Normal, mu, sigma, correlation, 1.0)
    }

    /// Standard normal distribution on `Rⁿ`.
    pub fn standard(dimension: usize) -> EllipticalResult<EllipticalDistribution<Normal>> {
        Self::distribution(
            vec![0.0; dimension],
            vec![1.0; dimension],
            CorrelationMatrix::identity(dimension),
        )
    }
}

impl DensityGenerator for Normal {
    fn density_generator(&self, beta_squared: f64, _dimension: usize) -> f64 {
        (-0.5 * beta_squared).exp()
    }

    fn log_density_generator(&self, beta_squared: f64, _dimension: usize) -> f64 {
        -0.5 * beta_squared
    }

    fn density_generator_derivative(&self, beta_squared: f64, _dimension: usize) -> f64 {
        -0.5 * (-0.5 * beta_squared).exp()
    }

    fn density_generator_second_derivative(&self, beta_squared: f64, _dimension: usize) -> f64 {
        0.25 * (-0.5 * beta_squared).exp()
    }

    fn log_normalization_constant(&self, dimension: usize) -> f64 {
        -0.5 * dimension as f64 * (2.0 * PI).ln()
    }
}

impl RadialDistribution for Normal {
    fn radial_cdf(&self, radius: f64, dimension: usize) -> f64 {
        if radius <= 0.0 {
            return 0.0;
        }
        if radius == f64::INFINITY {
            return 1.0;
        }
        gamma_lr(0.5 * dimension as f64, 0.5 * radius * radius)
    }

    fn radial_survival(&self, radius: f64, dimension: usize) -> f64 {
        if radius <= 0.0 {
            return 1.0;
        }
        if radius == f64::INFINITY {
            return 0.0;
        }
        gamma_ur(0.5 * dimension as f64, 0.5 * radius * radius)
    }
}

impl EllipticalFamily for Normal {
    fn name(&self) -> &'static str {
        "Normal"
    }

    fn sample_standard<R: Rng + ?Sized>(
        &self,
        dimension: usize,
        _solver: &LevelSetSolver,
        rng: &mut R,
    ) -> EllipticalResult<Vec<f64>> {
        Ok((0..dimension).map(|_| rng.sample(StandardNormal)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_generator_derivatives() {
        let t = 1.7;
        let h = 1e-6;
        let fd = (Normal.density_generator(t + h, 1) - Normal.density_generator(t - h, 1)) / (2.0 * h);
        assert_relative_eq!(Normal.density_generator_derivative(t, 1), fd, max_relative = 1e-8);
        let fd2 = (Normal.density_generator_derivative(t + h, 1)
            - Normal.density_generator_derivative(t - h, 1))
            / (2.0 * h);
        assert_relative_eq!(
            Normal.density_generator_second_derivative(t, 1),
            fd2,
            max_relative = 1e-8
        );
    }

    #[test]
    fn test_radial_cdf_two_dimensions() {
        // ‖U‖² ~ χ²_2 has survival exp(−r²/2)
        for &r in &[0.3_f64, 1.0, 2.5, 4.0] {
            let survival = (-0.5 * r * r).exp();
            assert_relative_eq!(Normal.radial_survival(r, 2), survival, max_relative = 1e-10);
            assert_relative_eq!(Normal.radial_cdf(r, 2), 1.0 - survival, max_relative = 1e-10);
        }
        assert_eq!(Normal.radial_cdf(0.0, 3), 0.0);
        assert_eq!(Normal.radial_cdf(f64::INFINITY, 3), 1.0);
    }

    #[test]
    fn test_normalization_constant() {
        assert_relative_eq!(
            Normal.log_normalization_constant(2).exp(),
            1.0 / (2.0 * PI),
            max_relative = 1e-15
        );
    }

    #[test]
    fn test_distribution_constructors() {
        let d = Normal::standard(3).unwrap();
        assert_eq!(d.dimension(), 3);
        assert_eq!(d.parameters().covariance_scaling_factor(), 1.0);
        assert!(Normal::standard(0).is_err());
    }
}
