//! Multivariate Student family with `nu` degrees of freedom.
//!
//! ```text
//! phi(t) = (1 + t/ν)^{−(ν+n)/2}
//! c_n    = Γ((ν+n)/2) / (Γ(ν/2) · (νπ)^{n/2})
//! F_R(r) = I_{r²/(r²+ν)}(n/2, ν/2)
//! ```
//!
//! The covariance is `ν/(ν−2)` times the shape matrix and exists only for
//! `ν > 2`; the mean exists only for `ν > 1`.

use crate::elliptical::{
    DensityGenerator, EllipticalDistribution, EllipticalFamily, EllipticalParameters,
    LevelSetSolver, RadialDistribution,
};
use elliptical_core::math::linalg::CorrelationMatrix;
use elliptical_core::types::{ConfigurationError, EllipticalResult};
use rand::Rng;
use rand_distr::{ChiSquared, Distribution, StandardNormal};
use statrs::function::beta::beta_reg;
use statrs::function::gamma::ln_gamma;
use std::f64::consts::PI;

/// Student-t density generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Student {
    nu: f64,
}

impl Student {
    /// Validates `nu > 0`.
    pub fn new(nu: f64) -> Result<Self, ConfigurationError> {
        if !(nu > 0.0 && nu.is_finite()) {
            return Err(ConfigurationError::InvalidFamilyParameter(format!(
                "degrees of freedom must be positive and finite, got {}",
                nu
            )));
        }
        Ok(Self { nu })
    }

    /// Degrees of freedom `ν`.
    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// `ν/(ν−2)` when the covariance exists, 1 otherwise.
    pub fn covariance_scaling_factor(&self) -> f64 {
        if self.nu > 2.0 {
            self.nu / (self.nu - 2.0)
        } else {
            1.0
        }
    }

    /// Student distribution with location `mu`, scales `sigma` and correlation `R`.
    pub fn distribution(
        nu: f64,
        mu: Vec<f64>,
        sigma: Vec<f64>,
        correlation: CorrelationMatrix<f64>,
    ) -> EllipticalResult<EllipticalDistribution<Student>> {
        let family = Self::new(nu)?;
        let parameters = EllipticalParameters::new(
            mu,
            sigma,
            correlation,
            family.covariance_scaling_factor(),
        )?;
        Ok(EllipticalDistribution::new(family, parameters))
    }

    /// Standard Student distribution on `Rⁿ`.
    pub fn standard(nu: f64, dimension: usize) -> EllipticalResult<EllipticalDistribution<Student>> {
        Self::distribution(
            nu,
            vec![0.0; dimension],
            vec![1.0; dimension],
            CorrelationMatrix::identity(dimension),
        )
    }

    fn exponent(&self, dimension: usize) -> f64 {
        0.5 * (self.nu + dimension as f64)
    }
}

impl DensityGenerator for Student {
    fn density_generator(&self, beta_squared: f64, dimension: usize) -> f64 {
        self.log_density_generator(beta_squared, dimension).exp()
    }

    fn log_density_generator(&self, beta_squared: f64, dimension: usize) -> f64 {
        -self.exponent(dimension) * (beta_squared / self.nu).ln_1p()
    }

    fn density_generator_derivative(&self, beta_squared: f64, dimension: usize) -> f64 {
        let k = self.exponent(dimension);
        let w = 1.0 + beta_squared / self.nu;
        -(k / self.nu) * w.powf(-k - 1.0)
    }

    fn density_generator_second_derivative(&self, beta_squared: f64, dimension: usize) -> f64 {
        let k = self.exponent(dimension);
        let w = 1.0 + beta_squared / self.nu;
        k * (k + 1.0) / (self.nu * self.nu) * w.powf(-k - 2.0)
    }

    fn log_normalization_constant(&self, dimension: usize) -> f64 {
        let n = dimension as f64;
        ln_gamma(self.exponent(dimension)) - ln_gamma(0.5 * self.nu) - 0.5 * n * (self.nu * PI).ln()
    }
}

impl RadialDistribution for Student {
    fn radial_cdf(&self, radius: f64, dimension: usize) -> f64 {
        if radius <= 0.0 {
            return 0.0;
        }
        if radius == f64::INFINITY {
            return 1.0;
        }
        let r2 = radius * radius;
        beta_reg(0.5 * dimension as f64, 0.5 * self.nu, r2 / (r2 + self.nu))
    }

    fn radial_survival(&self, radius: f64, dimension: usize) -> f64 {
        if radius <= 0.0 {
            return 1.0;
        }
        if radius == f64::INFINITY {
            return 0.0;
        }
        let r2 = radius * radius;
        beta_reg(0.5 * self.nu, 0.5 * dimension as f64, self.nu / (r2 + self.nu))
    }
}

impl EllipticalFamily for Student {
    fn name(&self) -> &'static str {
        "Student"
    }

    fn has_finite_moment(&self, order: u32) -> bool {
        self.nu > order as f64
    }

    /// `u = z · sqrt(ν / W)` with `z` standard normal and `W ~ χ²_ν`.
    fn sample_standard<R: Rng + ?Sized>(
        &self,
        dimension: usize,
        _solver: &LevelSetSolver,
        rng: &mut R,
    ) -> EllipticalResult<Vec<f64>> {
        let chi_squared = ChiSquared::new(self.nu)
            .map_err(|e| ConfigurationError::InvalidFamilyParameter(e.to_string()))?;
        let w: f64 = chi_squared.sample(rng);
        let scale = (self.nu / w).sqrt();
        Ok((0..dimension)
            .map(|_| scale * rng.sample::<f64, _>(StandardNormal))
            .collect())
    }
}
