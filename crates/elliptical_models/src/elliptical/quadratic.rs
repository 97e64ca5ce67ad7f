//! Squared Mahalanobis radius `β² = ‖L⁻¹ D⁻¹ (x − mu)‖²` and its derivatives.

use super::standardizer::Standardizer;
use elliptical_core::types::EllipticalResult;

/// Quadratic form `β²(x) = (x − mu)ᵀ Σ⁻¹ (x − mu)` with `Σ = D R D`.
#[derive(Clone, Copy, Debug)]
pub struct QuadraticForm<'a> {
    standardizer: &'a Standardizer,
}

impl<'a> QuadraticForm<'a> {
    /// Wraps a standardizer.
    pub fn new(standardizer: &'a Standardizer) -> Self {
        Self { standardizer }
    }

    /// `β²(x)`.
    pub fn beta_squared(&self, x: &[f64]) -> EllipticalResult<f64> {
        let u = self.standardizer.normalize(x)?;
        Ok(squared_norm(&u))
    }

    /// `β²(x)` together with `∇β²(x) = 2 Σ⁻¹ (x − mu)`.
    pub fn beta_squared_with_gradient(&self, x: &[f64]) -> EllipticalResult<(f64, Vec<f64>)> {
        let u = self.standardizer.normalize(x)?;
        let gradient = self
            .standardizer
            .pull_back(&u)?
            .into_iter()
            .map(|v| 2.0 * v)
            .collect();
        Ok((squared_norm(&u), gradient))
    }

    /// `Σ⁻¹ = Mᵀ M` with `M = L⁻¹ D⁻¹`, row-major.
    pub fn shape_inverse(&self) -> Vec<f64> {
        let n = self.standardizer.dimension();
        let m = self.standardizer.normalize_jacobian();
        let mut inverse = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..=i {
                // M is lower triangular: rows k < max(i, j) vanish
                let value: f64 = (i..n).map(|k| m[k * n + i] * m[k * n + j]).sum();
                inverse[i * n + j] = value;
                inverse[j * n + i] = value;
            }
        }
        inverse
    }
}

pub(crate) fn squared_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}
