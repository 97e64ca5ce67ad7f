//! Lazily derived quantities of a distribution.
//!
//! The factorisation (`L`, `L⁻¹`, normalisation factor) and the moments are
//! computed on first use and dropped whenever a parameter changes. Both are
//! pure functions of the parameters, so a stale entry is simply recomputed.

use super::family::EllipticalFamily;
use super::parameters::EllipticalParameters;
use super::standardizer::Standardizer;
use elliptical_core::types::{EllipticalResult, NumericalError};
use std::cell::OnceCell;
use tracing::debug;

/// Cholesky factors and density normalisation of one parameter set.
#[derive(Clone, Debug, PartialEq)]
pub struct Factorization {
    standardizer: Standardizer,
    log_normalization_factor: f64,
    normalization_factor: f64,
}

impl Factorization {
    /// Factorises `R` and combines the family constant with `det(D L)`.
    ///
    /// `nf = exp(ln c_n − Σ ln sigma_i − Σ ln L_ii)`.
    pub fn compute<F: EllipticalFamily>(
        parameters: &EllipticalParameters,
        family: &F,
    ) -> EllipticalResult<Self> {
        let standardizer = Standardizer::new(parameters)?;
        let dimension = standardizer.dimension();
        let log_normalization_factor =
            family.log_normalization_constant(dimension) - standardizer.log_determinant();
        let normalization_factor = log_normalization_factor.exp();

        if !normalization_factor.is_finite() || log_normalization_factor.is_nan() {
            return Err(NumericalError::NonFinite {
                quantity: "normalization factor",
                value: normalization_factor,
            }
            .into());
        }

        debug!(
            family = family.name(),
            dimension,
            log_normalization_factor,
            "factorised elliptical parameters"
        );

        Ok(Self {
            standardizer,
            log_normalization_factor,
            normalization_factor,
        })
    }

    /// Standardizer built from the factorisation.
    pub fn standardizer(&self) -> &Standardizer {
        &self.standardizer
    }

    /// `nf`.
    pub fn normalization_factor(&self) -> f64 {
        self.normalization_factor
    }

    /// `ln nf`.
    pub fn log_normalization_factor(&self) -> f64 {
        self.log_normalization_factor
    }
}

/// Second-order moment data, `Cov = c · D R D`.
#[derive(Clone, Debug, PartialEq)]
pub struct Moments {
    covariance: Vec<f64>,
    standard_deviation: Vec<f64>,
}

impl Moments {
    /// Moments implied by `parameters`; existence is checked by the caller.
    pub fn compute(parameters: &EllipticalParameters) -> Self {
        let c = parameters.covariance_scaling_factor();
        let covariance = parameters.shape().into_iter().map(|v| c * v).collect();
        let root_c = c.sqrt();
        let standard_deviation = parameters.sigma().iter().map(|s| s * root_c).collect();
        Self {
            covariance,
            standard_deviation,
        }
    }

    /// Row-major covariance matrix.
    pub fn covariance(&self) -> &[f64] {
        &self.covariance
    }

    /// `sigma · sqrt(c)`.
    pub fn standard_deviation(&self) -> &[f64] {
        &self.standard_deviation
    }
}

/// Per-instance cache. `Send` but not `Sync`.
#[derive(Clone, Debug, Default)]
pub struct EllipticalCache {
    factorization: OnceCell<Factorization>,
    moments: OnceCell<Moments>,
}

impl EllipticalCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached factorisation, computing it with `init` when absent.
    ///
    /// A failed `init` leaves the cache empty.
    pub fn factorization<I>(&self, init: I) -> EllipticalResult<&Factorization>
    where
        I: FnOnce() -> EllipticalResult<Factorization>,
    {
        if let Some(factorization) = self.factorization.get() {
            return Ok(factorization);
        }
        let factorization = init()?;
        Ok(self.factorization.get_or_init(|| factorization))
    }

    /// Cached moments, computing them with `init` when absent.
    pub fn moments<I>(&self, init: I) -> &Moments
    where
        I: FnOnce() -> Moments,
    {
        self.moments.get_or_init(init)
    }

    /// Drops every derived quantity.
    pub fn invalidate(&mut self) {
        self.factorization.take();
        self.moments.take();
    }

    /// True when the factorisation must be recomputed before use.
    pub fn is_stale(&self) -> bool {
        self.factorization.get().is_none()
    }
}
