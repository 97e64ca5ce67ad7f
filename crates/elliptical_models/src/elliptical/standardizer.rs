//! Linear map between physical and standardized coordinates.
//!
//! ```text
//! u = L⁻¹ · diag(1/sigma) · (x − mu)
//! x = mu + diag(sigma) · L · u
//! ```
//!
//! where `L` is the Cholesky factor of the correlation matrix.

use super::parameters::EllipticalParameters;
use elliptical_core::math::linalg::LowerTriangular;
use elliptical_core::types::{DomainError, EllipticalResult, NumericalError};

/// Cholesky-based standardizer.
///
/// Owns copies of `mu` and `sigma` together with `L` and `L⁻¹`, so that it
/// can be handed out to transformation and level-set objects independently
/// of the distribution that built it.
#[derive(Clone, Debug, PartialEq)]
pub struct Standardizer {
    mu: Vec<f64>,
    sigma: Vec<f64>,
    cholesky: LowerTriangular<f64>,
    inverse_cholesky: LowerTriangular<f64>,
}

impl Standardizer {
    /// Factorises `R` and inverts the factor.
    ///
    /// # Errors
    ///
    /// `NumericalError::Factorization` when the Cholesky factorisation or the
    /// triangular inversion fails, `NumericalError::NonFinite` when the
    /// inverse overflows.
    pub fn new(parameters: &EllipticalParameters) -> EllipticalResult<Self> {
        let cholesky = parameters
            .correlation()
            .cholesky()
            .map_err(NumericalError::Factorization)?;
        let inverse_cholesky = cholesky.inverse().map_err(NumericalError::Factorization)?;
        if !inverse_cholesky.is_finite() {
            return Err(NumericalError::NonFinite {
                quantity: "inverse Cholesky factor",
                value: f64::INFINITY,
            }
            .into());
        }

        Ok(Self {
            mu: parameters.mu().to_vec(),
            sigma: parameters.sigma().to_vec(),
            cholesky,
            inverse_cholesky,
        })
    }

    /// Dimension `n`.
    pub fn dimension(&self) -> usize {
        self.mu.len()
    }

    /// Location vector.
    pub fn mu(&self) -> &[f64] {
        &self.mu
    }

    /// Scale vector.
    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }

    /// Cholesky factor `L` of the correlation matrix.
    pub fn cholesky(&self) -> &LowerTriangular<f64> {
        &self.cholesky
    }

    /// Inverse factor `L⁻¹`.
    pub fn inverse_cholesky(&self) -> &LowerTriangular<f64> {
        &self.inverse_cholesky
    }

    /// `u = L⁻¹ · diag(1/sigma) · (x − mu)`.
    pub fn normalize(&self, x: &[f64]) -> EllipticalResult<Vec<f64>> {
        self.check_dimension(x)?;
        let scaled: Vec<f64> = x
            .iter()
            .zip(&self.mu)
            .zip(&self.sigma)
            .map(|((xi, mi), si)| (xi - mi) / si)
            .collect();
        Ok(self.inverse_cholesky.mul_vec(&scaled))
    }

    /// `x = mu + diag(sigma) · L · u`.
    pub fn denormalize(&self, u: &[f64]) -> EllipticalResult<Vec<f64>> {
        self.check_dimension(u)?;
        Ok(self
            .cholesky
            .mul_vec(u)
            .into_iter()
            .zip(&self.mu)
            .zip(&self.sigma)
            .map(|((v, mi), si)| mi + si * v)
            .collect())
    }

    /// `diag(1/sigma) · L⁻ᵀ · u`, i.e. `Σ⁻¹ (x − mu)` when `u = normalize(x)`.
    pub fn pull_back(&self, u: &[f64]) -> EllipticalResult<Vec<f64>> {
        self.check_dimension(u)?;
        Ok(self
            .inverse_cholesky
            .transpose_mul_vec(u)
            .into_iter()
            .zip(&self.sigma)
            .map(|(v, si)| v / si)
            .collect())
    }

    /// Jacobian of [`normalize`](Self::normalize): `L⁻¹ · diag(1/sigma)`, row-major.
    pub fn normalize_jacobian(&self) -> Vec<f64> {
        let n = self.dimension();
        let mut jacobian = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..=i {
                jacobian[i * n + j] = self.inverse_cholesky.get(i, j) / self.sigma[j];
            }
        }
        jacobian
    }

    /// Jacobian of [`denormalize`](Self::denormalize): `diag(sigma) · L`, row-major.
    pub fn denormalize_jacobian(&self) -> Vec<f64> {
        let n = self.dimension();
        let mut jacobian = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..=i {
                jacobian[i * n + j] = self.sigma[i] * self.cholesky.get(i, j);
            }
        }
        jacobian
    }

    /// `ln det(diag(sigma) · L) = Σ ln sigma_i + Σ ln L_ii`.
    pub fn log_determinant(&self) -> f64 {
        self.sigma.iter().map(|s| s.ln()).sum::<f64>() + self.cholesky.log_abs_determinant()
    }

    pub(crate) fn check_dimension(&self, point: &[f64]) -> Result<(), DomainError> {
        if point.len() != self.dimension() {
            return Err(DomainError::PointDimension {
                expected: self.dimension(),
                got: point.len(),
            });
        }
        Ok(())
    }
}
