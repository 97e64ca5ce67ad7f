//! Generic elliptical distribution engine.
//!
//! Every density, CDF and level-set query goes through the same pipeline:
//!
//! ```text
//! x ──normalize──▶ u ──‖u‖²──▶ β² ──phi──▶ nf · phi(β²)
//! ```
//!
//! The family only supplies `phi`, its derivatives, the normalisation
//! constant and the radial CDF. The factorisation of the correlation matrix
//! and the normalisation factor are cached until the next parameter change.

use super::cache::{EllipticalCache, Factorization, Moments};
use super::family::EllipticalFamily;
use super::level_set::{EllipsoidLevelSet, LevelSetSolver};
use super::parameters::EllipticalParameters;
use super::quadratic::{squared_norm, QuadraticForm};
use super::radial::RadialCdf;
use super::transform::{InverseIsoProbabilisticTransformation, IsoProbabilisticTransformation};
use elliptical_core::config::EngineConfig;
use elliptical_core::math::linalg::{CorrelationMatrix, LowerTriangular};
use elliptical_core::types::{DomainError, EllipticalResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Elliptical distribution of family `F`.
///
/// Instances are `Send` but not `Sync`: the lazy cache is filled through a
/// shared reference, so concurrent queries on one instance need external
/// serialisation.
///
/// # Example
///
/// ```
/// use elliptical_models::families::Normal;
///
/// let normal = Normal::standard(2).unwrap();
/// let pdf = normal.compute_pdf(&[0.0, 0.0]).unwrap();
/// assert!((pdf - 1.0 / (2.0 * std::f64::consts::PI)).abs() < 1e-15);
///
/// let (level_set, threshold) = normal
///     .compute_minimum_volume_level_set_with_threshold(0.95)
///     .unwrap();
/// assert!((level_set.radius() - 2.447746830680816).abs() < 1e-8);
/// assert!((threshold - 0.05 / (2.0 * std::f64::consts::PI)).abs() < 1e-10);
/// ```
#[derive(Clone, Debug)]
pub struct EllipticalDistribution<F: EllipticalFamily> {
    family: F,
    parameters: EllipticalParameters,
    config: EngineConfig,
    cache: EllipticalCache,
}

impl<F: EllipticalFamily> EllipticalDistribution<F> {
    /// Distribution with default engine budgets.
    pub fn new(family: F, parameters: EllipticalParameters) -> Self {
        Self::with_config(family, parameters, EngineConfig::default())
    }

    /// Distribution with explicit engine budgets.
    pub fn with_config(family: F, parameters: EllipticalParameters, config: EngineConfig) -> Self {
        Self {
            family,
            parameters,
            config,
            cache: EllipticalCache::new(),
        }
    }

    /// Validates `(mu, sigma, R, c)` and builds the distribution.
    pub fn from_parts(
        family: F,
        mu: Vec<f64>,
        sigma: Vec<f64>,
        correlation: CorrelationMatrix<f64>,
        covariance_scaling_factor: f64,
    ) -> EllipticalResult<Self> {
        let parameters = EllipticalParameters::new(mu, sigma, correlation, covariance_scaling_factor)?;
        Ok(Self::new(family, parameters))
    }

    /// Family capability.
    pub fn family(&self) -> &F {
        &self.family
    }

    /// Current parameters.
    pub fn parameters(&self) -> &EllipticalParameters {
        &self.parameters
    }

    /// Engine budgets.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replaces the engine budgets. Cached values do not depend on them.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// Dimension `n`.
    pub fn dimension(&self) -> usize {
        self.parameters.dimension()
    }

    /// True when the next query will recompute the factorisation.
    pub fn is_cache_stale(&self) -> bool {
        self.cache.is_stale()
    }

    // ------------------------------------------------------------------
    // Parameter access
    // ------------------------------------------------------------------

    /// Replaces `mu`.
    pub fn set_mu(&mut self, mu: Vec<f64>) -> EllipticalResult<()> {
        self.parameters.set_mu(mu)?;
        self.cache.invalidate();
        Ok(())
    }

    /// Replaces `sigma`.
    pub fn set_sigma(&mut self, sigma: Vec<f64>) -> EllipticalResult<()> {
        self.parameters.set_sigma(sigma)?;
        self.cache.invalidate();
        Ok(())
    }

    /// Replaces `R`.
    pub fn set_correlation(&mut self, correlation: CorrelationMatrix<f64>) -> EllipticalResult<()> {
        self.parameters.set_correlation(correlation)?;
        self.cache.invalidate();
        Ok(())
    }

    /// Flattened parameters `[mu_0, sigma_0, …, R_i_j (j < i)]`.
    pub fn parameter(&self) -> Vec<f64> {
        self.parameters.parameter()
    }

    /// Sets all parameters from the flattened layout of [`parameter`](Self::parameter).
    pub fn set_parameter(&mut self, values: &[f64]) -> EllipticalResult<()> {
        self.parameters = self.parameters.with_parameter(values)?;
        self.cache.invalidate();
        Ok(())
    }

    /// Names matching [`parameter`](Self::parameter).
    pub fn parameter_description(&self) -> Vec<String> {
        self.parameters.parameter_description()
    }

    // ------------------------------------------------------------------
    // Cached factorisation
    // ------------------------------------------------------------------

    fn factorization(&self) -> EllipticalResult<&Factorization> {
        self.cache
            .factorization(|| Factorization::compute(&self.parameters, &self.family))
    }

    fn moments(&self) -> &Moments {
        self.cache.moments(|| Moments::compute(&self.parameters))
    }

    /// Cholesky factor `L` of `R`.
    pub fn cholesky(&self) -> EllipticalResult<&LowerTriangular<f64>> {
        Ok(self.factorization()?.standardizer().cholesky())
    }

    /// Inverse Cholesky factor `L⁻¹`.
    pub fn inverse_cholesky(&self) -> EllipticalResult<&LowerTriangular<f64>> {
        Ok(self.factorization()?.standardizer().inverse_cholesky())
    }

    /// `nf = c_n / (Π sigma_i · Π L_ii)`.
    pub fn normalization_factor(&self) -> EllipticalResult<f64> {
        Ok(self.factorization()?.normalization_factor())
    }

    /// `u = L⁻¹ · diag(1/sigma) · (x − mu)`.
    pub fn normalize(&self, x: &[f64]) -> EllipticalResult<Vec<f64>> {
        self.factorization()?.standardizer().normalize(x)
    }

    /// `x = mu + diag(sigma) · L · u`.
    pub fn denormalize(&self, u: &[f64]) -> EllipticalResult<Vec<f64>> {
        self.factorization()?.standardizer().denormalize(u)
    }

    /// `β²(x) = ‖normalize(x)‖²`.
    pub fn beta_squared(&self, x: &[f64]) -> EllipticalResult<f64> {
        QuadraticForm::new(self.factorization()?.standardizer()).beta_squared(x)
    }

    // ------------------------------------------------------------------
    // Density
    // ------------------------------------------------------------------

    /// `nf · phi(β²(x))`.
    pub fn compute_pdf(&self, x: &[f64]) -> EllipticalResult<f64> {
        pdf_with(self.factorization()?, &self.family, x)
    }

    /// `ln nf + ln phi(β²(x))`.
    pub fn compute_log_pdf(&self, x: &[f64]) -> EllipticalResult<f64> {
        let factorization = self.factorization()?;
        let beta_squared = QuadraticForm::new(factorization.standardizer()).beta_squared(x)?;
        Ok(factorization.log_normalization_factor()
            + self
                .family
                .log_density_generator(beta_squared, self.dimension()))
    }

    /// Spatial gradient `nf · phi'(β²) · 2 Σ⁻¹ (x − mu)`.
    pub fn compute_ddf(&self, x: &[f64]) -> EllipticalResult<Vec<f64>> {
        let factorization = self.factorization()?;
        let (beta_squared, gradient) =
            QuadraticForm::new(factorization.standardizer()).beta_squared_with_gradient(x)?;
        let scale = factorization.normalization_factor()
            * self
                .family
                .density_generator_derivative(beta_squared, self.dimension());
        Ok(gradient.into_iter().map(|g| scale * g).collect())
    }

    /// Spatial Hessian `nf · (phi''(β²) · g gᵀ + phi'(β²) · 2 Σ⁻¹)`, row-major,
    /// with `g = ∇β²`.
    pub fn compute_pdf_hessian(&self, x: &[f64]) -> EllipticalResult<Vec<f64>> {
        let factorization = self.factorization()?;
        let quadratic = QuadraticForm::new(factorization.standardizer());
        let (beta_squared, g) = quadratic.beta_squared_with_gradient(x)?;
        let n = self.dimension();
        let nf = factorization.normalization_factor();
        let first = self.family.density_generator_derivative(beta_squared, n);
        let second = self
            .family
            .density_generator_second_derivative(beta_squared, n);

        let shape_inverse = quadratic.shape_inverse();
        let mut hessian = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                hessian[i * n + j] =
                    nf * (second * g[i] * g[j] + 2.0 * first * shape_inverse[i * n + j]);
            }
        }
        Ok(hessian)
    }

    /// Gradient of the PDF at `x` with respect to [`parameter`](Self::parameter).
    ///
    /// Central differences with step `pdf_gradient_epsilon · max(1, |θ_k|)`.
    /// Each perturbed parameter set is refactorised from scratch. When one
    /// side of the stencil leaves the valid parameter domain (e.g. a
    /// correlation pushed past ±1) the other side is used alone.
    pub fn compute_pdf_gradient(&self, x: &[f64]) -> EllipticalResult<Vec<f64>> {
        let base = self.compute_pdf(x)?;
        let theta = self.parameters.parameter();
        let epsilon = self.config.pdf_gradient_epsilon;

        let mut gradient = Vec::with_capacity(theta.len());
        for k in 0..theta.len() {
            let h = epsilon * theta[k].abs().max(1.0);
            let up = self.perturbed_pdf(&theta, k, h, x);
            let down = self.perturbed_pdf(&theta, k, -h, x);
            let derivative = match (up, down) {
                (Ok(up), Ok(down)) => (up - down) / (2.0 * h),
                (Ok(up), Err(_)) => (up - base) / h,
                (Err(_), Ok(down)) => (base - down) / h,
                (Err(err), Err(_)) => return Err(err),
            };
            gradient.push(derivative);
        }
        Ok(gradient)
    }

    fn perturbed_pdf(&self, theta: &[f64], k: usize, h: f64, x: &[f64]) -> EllipticalResult<f64> {
        let mut shifted = theta.to_vec();
        shifted[k] += h;
        let parameters = self.parameters.with_parameter(&shifted)?;
        let factorization = Factorization::compute(&parameters, &self.family)?;
        pdf_with(&factorization, &self.family, x)
    }

    // ------------------------------------------------------------------
    // Distribution functions
    // ------------------------------------------------------------------

    /// `P(X ≤ x)` componentwise.
    ///
    /// Exact through the radial CDF in one dimension. In higher dimensions
    /// it is a Monte Carlo estimate with `sampling_size` draws seeded by
    /// `sampling_seed`, so repeated calls return the same value.
    pub fn compute_cdf(&self, x: &[f64]) -> EllipticalResult<f64> {
        if self.dimension() == 1 {
            let (u, tail) = self.univariate_tail(x)?;
            return Ok(if u < 0.0 { tail } else { 1.0 - tail });
        }
        self.monte_carlo_cdf(x)
    }

    /// `1 − P(X ≤ x)`.
    pub fn compute_complementary_cdf(&self, x: &[f64]) -> EllipticalResult<f64> {
        if self.dimension() == 1 {
            let (u, tail) = self.univariate_tail(x)?;
            return Ok(if u < 0.0 { 1.0 - tail } else { tail });
        }
        Ok(1.0 - self.monte_carlo_cdf(x)?)
    }

    /// `P(X > x)` componentwise.
    ///
    /// In one dimension this is the complementary CDF. Otherwise it uses
    /// central symmetry about `mu`: `P(X > x) = P(X ≤ 2 mu − x)`.
    pub fn compute_survival_function(&self, x: &[f64]) -> EllipticalResult<f64> {
        if self.dimension() == 1 {
            return self.compute_complementary_cdf(x);
        }
        self.factorization()?.standardizer().check_dimension(x)?;
        let reflected: Vec<f64> = x
            .iter()
            .zip(self.parameters.mu())
            .map(|(xi, mi)| 2.0 * mi - xi)
            .collect();
        self.monte_carlo_cdf(&reflected)
    }

    /// Standardized point `u` and the one-sided tail mass `P(U > |u|)`.
    fn univariate_tail(&self, x: &[f64]) -> EllipticalResult<(f64, f64)> {
        let u = self.normalize(x)?[0];
        let survival = RadialCdf::new(&self.family, 1).survival(u.abs());
        Ok((u, 0.5 * survival))
    }

    fn monte_carlo_cdf(&self, x: &[f64]) -> EllipticalResult<f64> {
        let standardizer = self.factorization()?.standardizer();
        standardizer.check_dimension(x)?;

        let solver = LevelSetSolver::new(&self.config);
        let mut rng = StdRng::seed_from_u64(self.config.sampling_seed);
        let size = self.config.sampling_size;
        let mut inside = 0usize;
        for _ in 0..size {
            let u = self
                .family
                .sample_standard(self.dimension(), &solver, &mut rng)?;
            let point = standardizer.denormalize(&u)?;
            if point.iter().zip(x).all(|(p, xi)| p <= xi) {
                inside += 1;
            }
        }
        Ok(inside as f64 / size as f64)
    }

    // ------------------------------------------------------------------
    // Level sets
    // ------------------------------------------------------------------

    /// Radius `r` with `P(‖U‖ ≤ r) = probability`.
    pub fn compute_radial_quantile(&self, probability: f64) -> EllipticalResult<f64> {
        LevelSetSolver::new(&self.config)
            .solve_radius(&RadialCdf::new(&self.family, self.dimension()), probability)
    }

    /// Minimum-volume region of mass `probability` and the density on its
    /// boundary.
    ///
    /// # Errors
    ///
    /// - `DomainError::ProbabilityOutOfRange` unless `0 < probability < 1`
    /// - `NumericalError::NonMonotoneGenerator` when `phi` increases on
    ///   `[0, β²]`, in which case the region would not be an ellipsoid
    /// - `NumericalError` when the radial quantile cannot be solved
    pub fn compute_minimum_volume_level_set_with_threshold(
        &self,
        probability: f64,
    ) -> EllipticalResult<(EllipsoidLevelSet, f64)> {
        let n = self.dimension();
        let solver = LevelSetSolver::new(&self.config);
        let radius = solver.solve_radius(&RadialCdf::new(&self.family, n), probability)?;
        let beta_squared = radius * radius;
        solver.check_monotone(&self.family, n, beta_squared)?;

        let factorization = self.factorization()?;
        let threshold =
            factorization.normalization_factor() * self.family.density_generator(beta_squared, n);
        debug!(
            family = self.family.name(),
            probability,
            radius,
            threshold,
            "minimum volume level set"
        );

        Ok((
            EllipsoidLevelSet::new(factorization.standardizer().clone(), radius),
            threshold,
        ))
    }

    /// Minimum-volume region of mass `probability`.
    pub fn compute_minimum_volume_level_set(
        &self,
        probability: f64,
    ) -> EllipticalResult<EllipsoidLevelSet> {
        Ok(self
            .compute_minimum_volume_level_set_with_threshold(probability)?
            .0)
    }

    // ------------------------------------------------------------------
    // Moments
    // ------------------------------------------------------------------

    /// `E[X] = mu`.
    pub fn mean(&self) -> EllipticalResult<Vec<f64>> {
        self.require_moment(1)?;
        Ok(self.parameters.mu().to_vec())
    }

    /// `Cov[X] = c · diag(sigma) · R · diag(sigma)`, row-major.
    pub fn covariance(&self) -> EllipticalResult<&[f64]> {
        self.require_moment(2)?;
        Ok(self.moments().covariance())
    }

    /// Shape matrix `diag(sigma) · R · diag(sigma)`, row-major. Defined even
    /// when the covariance is not.
    pub fn shape(&self) -> Vec<f64> {
        self.parameters.shape()
    }

    /// `sigma · sqrt(c)`.
    pub fn standard_deviation(&self) -> EllipticalResult<&[f64]> {
        self.require_moment(2)?;
        Ok(self.moments().standard_deviation())
    }

    fn require_moment(&self, order: u32) -> Result<(), DomainError> {
        if self.family.has_finite_moment(order) {
            Ok(())
        } else {
            Err(DomainError::UndefinedMoment { order })
        }
    }

    // ------------------------------------------------------------------
    // Standard space
    // ------------------------------------------------------------------

    /// `x ↦ u` as a composable transformation.
    pub fn iso_probabilistic_transformation(
        &self,
    ) -> EllipticalResult<IsoProbabilisticTransformation> {
        Ok(IsoProbabilisticTransformation::new(
            self.factorization()?.standardizer().clone(),
        ))
    }

    /// `u ↦ x` as a composable transformation.
    pub fn inverse_iso_probabilistic_transformation(
        &self,
    ) -> EllipticalResult<InverseIsoProbabilisticTransformation> {
        Ok(InverseIsoProbabilisticTransformation::new(
            self.factorization()?.standardizer().clone(),
        ))
    }

    /// Same family with `mu = 0`, `sigma = 1`, `R = I`.
    pub fn standard_distribution(&self) -> EllipticalResult<Self> {
        let parameters = EllipticalParameters::standard(
            self.dimension(),
            self.parameters.covariance_scaling_factor(),
        )?;
        Ok(Self::with_config(
            self.family.clone(),
            parameters,
            self.config,
        ))
    }

    // ------------------------------------------------------------------
    // Sampling
    // ------------------------------------------------------------------

    /// One draw `x = denormalize(u)` with `u` from the family's standard law.
    pub fn realization<R: Rng + ?Sized>(&self, rng: &mut R) -> EllipticalResult<Vec<f64>> {
        self.draw(&LevelSetSolver::new(&self.config), rng)
    }

    /// `size` independent draws.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        size: usize,
        rng: &mut R,
    ) -> EllipticalResult<Vec<Vec<f64>>> {
        if size == 0 {
            return Err(DomainError::EmptySample.into());
        }
        let solver = LevelSetSolver::new(&self.config);
        (0..size).map(|_| self.draw(&solver, rng)).collect()
    }

    fn draw<R: Rng + ?Sized>(&self, solver: &LevelSetSolver, rng: &mut R) -> EllipticalResult<Vec<f64>> {
        let u = self.family.sample_standard(self.dimension(), solver, rng)?;
        self.denormalize(&u)
    }
}

fn pdf_with<F: EllipticalFamily>(
    factorization: &Factorization,
    family: &F,
    x: &[f64],
) -> EllipticalResult<f64> {
    let u = factorization.standardizer().normalize(x)?;
    let beta_squared = squared_norm(&u);
    Ok(factorization.normalization_factor() * family.density_generator(beta_squared, u.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::{Normal, Student};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use elliptical_core::types::{EllipticalError, NumericalError};
    use std::f64::consts::PI;

    fn correlated_normal() -> EllipticalDistribution<Normal> {
        let r = CorrelationMatrix::new(&[1.0, 0.6, 0.6, 1.0], 2).unwrap();
        EllipticalDistribution::from_parts(Normal, vec![1.0, -1.0], vec![2.0, 0.5], r, 1.0)
            .unwrap()
    }

    fn univariate_normal() -> EllipticalDistribution<Normal> {
        EllipticalDistribution::from_parts(
            Normal,
            vec![1.0],
            vec![2.0],
            CorrelationMatrix::identity(1),
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn test_pdf_matches_closed_form() {
        let d = correlated_normal();
        let x = [2.0, -0.5];
        // Σ = [[4, 0.6], [0.6, 0.25]], det = 0.64
        let (dx, dy): (f64, f64) = (1.0, 0.5);
        let beta_squared = (0.25 * dx * dx - 1.2 * dx * dy + 4.0 * dy * dy) / 0.64;
        let expected = (-0.5 * beta_squared).exp() / (2.0 * PI * 0.8);
        assert_relative_eq!(d.compute_pdf(&x).unwrap(), expected, max_relative = 1e-12);
        assert_relative_eq!(
            d.compute_log_pdf(&x).unwrap(),
            expected.ln(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_ddf_matches_finite_difference() {
        let d = correlated_normal();
        let x = [0.4, -0.7];
        let ddf = d.compute_ddf(&x).unwrap();
        let h = 1e-6;
        for i in 0..2 {
            let mut up = x;
            let mut down = x;
            up[i] += h;
            down[i] -= h;
            let fd = (d.compute_pdf(&up).unwrap() - d.compute_pdf(&down).unwrap()) / (2.0 * h);
            assert_relative_eq!(ddf[i], fd, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_hessian_matches_finite_difference() {
        let d = correlated_normal();
        let x = [1.5, -1.2];
        let hessian = d.compute_pdf_hessian(&x).unwrap();
        let h = 1e-5;
        for j in 0..2 {
            let mut up = x;
            let mut down = x;
            up[j] += h;
            down[j] -= h;
            let g_up = d.compute_ddf(&up).unwrap();
            let g_down = d.compute_ddf(&down).unwrap();
            for i in 0..2 {
                let fd = (g_up[i] - g_down[i]) / (2.0 * h);
                assert_abs_diff_eq!(hessian[i * 2 + j], fd, epsilon = 1e-6);
            }
        }
        assert_relative_eq!(hessian[1], hessian[2], max_relative = 1e-12);
    }

    #[test]
    fn test_pdf_gradient_on_mu_and_sigma() {
        let d = univariate_normal();
        let x = [2.0];
        let gradient = d.compute_pdf_gradient(&x).unwrap();
        let pdf = d.compute_pdf(&x).unwrap();
        let z = 0.5;
        // ∂/∂mu = pdf · z / sigma, ∂/∂sigma = pdf · (z² − 1) / sigma
        assert_relative_eq!(gradient[0], pdf * z / 2.0, max_relative = 1e-6);
        assert_relative_eq!(gradient[1], pdf * (z * z - 1.0) / 2.0, max_relative = 1e-6);
    }

    #[test]
    fn test_pdf_gradient_one_sided_at_boundary() {
        let r = CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap();
        let mut d =
            EllipticalDistribution::from_parts(Normal, vec![0.0, 0.0], vec![1.0, 1.0], r, 1.0)
                .unwrap();
        d.set_config(EngineConfig {
            pdf_gradient_epsilon: 0.6,
            ..Default::default()
        });
        // ρ + h = 1.1 is invalid, only the backward difference survives
        let gradient = d.compute_pdf_gradient(&[0.3, 0.2]).unwrap();
        assert_eq!(gradient.len(), 5);
        assert!(gradient.iter().all(|g| g.is_finite()));
    }

    #[test]
    fn test_univariate_cdf() {
        let d = univariate_normal();
        assert_relative_eq!(d.compute_cdf(&[1.0]).unwrap(), 0.5, max_relative = 1e-14);
        // Φ(1) for x = mu + sigma
        assert_relative_eq!(
            d.compute_cdf(&[3.0]).unwrap(),
            0.841_344_746_068_542_9,
            max_relative = 1e-10
        );
        assert_relative_eq!(
            d.compute_survival_function(&[3.0]).unwrap(),
            0.158_655_253_931_457_05,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            d.compute_complementary_cdf(&[-1.0]).unwrap(),
            0.841_344_746_068_542_9,
            max_relative = 1e-10
        );
    }

    #[test]
    fn test_multivariate_cdf_is_deterministic() {
        let mut d = correlated_normal();
        d.set_config(EngineConfig {
            sampling_size: 20_000,
            ..Default::default()
        });
        let x = [1.0, -1.0];
        let first = d.compute_cdf(&x).unwrap();
        assert_eq!(first, d.compute_cdf(&x).unwrap());
        // P(X ≤ mu) = 1/4 + asin(ρ)/(2π) for a bivariate normal
        let expected = 0.25 + 0.6_f64.asin() / (2.0 * PI);
        assert_abs_diff_eq!(first, expected, epsilon = 0.015);
        assert_abs_diff_eq!(
            d.compute_complementary_cdf(&x).unwrap(),
            1.0 - first,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(d.compute_survival_function(&x).unwrap(), first, epsilon = 1e-15);
    }

    #[test]
    fn test_level_set_threshold_matches_pdf_on_boundary() {
        let d = correlated_normal();
        let (set, threshold) = d
            .compute_minimum_volume_level_set_with_threshold(0.9)
            .unwrap();
        let boundary = d.denormalize(&[set.radius(), 0.0]).unwrap();
        assert_relative_eq!(d.compute_pdf(&boundary).unwrap(), threshold, max_relative = 1e-8);
        assert!(set.contains(&[1.0, -1.0]).unwrap());
        assert_eq!(set.center(), &[1.0, -1.0]);
        assert_relative_eq!(
            d.compute_radial_quantile(0.9).unwrap(),
            set.radius(),
            max_relative = 1e-15
        );
    }

    #[test]
    fn test_level_set_domain_errors() {
        let d = correlated_normal();
        for &p in &[0.0, 1.0, 2.0] {
            assert!(matches!(
                d.compute_minimum_volume_level_set(p),
                Err(EllipticalError::Domain(DomainError::ProbabilityOutOfRange(_)))
            ));
        }
    }

    #[test]
    fn test_moments() {
        let r = CorrelationMatrix::new(&[1.0, 0.2, 0.2, 1.0], 2).unwrap();
        let student = Student::distribution(5.0, vec![1.0, 2.0], vec![1.0, 3.0], r).unwrap();
        assert_eq!(student.mean().unwrap(), vec![1.0, 2.0]);
        let c = 5.0 / 3.0;
        assert_relative_eq!(student.covariance().unwrap()[3], 9.0 * c, max_relative = 1e-12);
        assert_relative_eq!(
            student.standard_deviation().unwrap()[1],
            3.0 * c.sqrt(),
            max_relative = 1e-12
        );

        let cauchy = Student::standard(1.0, 2).unwrap();
        assert!(matches!(
            cauchy.mean(),
            Err(EllipticalError::Domain(DomainError::UndefinedMoment { order: 1 }))
        ));
        let heavy = Student::standard(1.5, 2).unwrap();
        assert!(heavy.mean().is_ok());
        assert!(heavy.covariance().is_err());
    }

    #[test]
    fn test_shape_is_covariance_without_scaling() {
        let r = CorrelationMatrix::new(&[1.0, 0.2, 0.2, 1.0], 2).unwrap();
        let student = Student::distribution(5.0, vec![1.0, 2.0], vec![1.0, 3.0], r).unwrap();
        let c = 5.0 / 3.0;
        let shape = student.shape();
        for (s, cov) in shape.iter().zip(student.covariance().unwrap()) {
            assert_relative_eq!(s * c, *cov, max_relative = 1e-12);
        }
        assert_relative_eq!(shape[1], 0.6, max_relative = 1e-12);

        // Cauchy has no covariance but still has a shape
        let cauchy = Student::standard(1.0, 2).unwrap();
        assert!(cauchy.covariance().is_err());
        assert_eq!(cauchy.shape(), vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_setters_invalidate_cache() {
        let mut d = correlated_normal();
        let before = d.compute_pdf(&[1.0, -1.0]).unwrap();
        assert!(!d.is_cache_stale());

        d.set_sigma(vec![4.0, 0.5]).unwrap();
        assert!(d.is_cache_stale());
        assert_relative_eq!(d.compute_pdf(&[1.0, -1.0]).unwrap(), before / 2.0, max_relative = 1e-12);

        d.compute_pdf(&[1.0, -1.0]).unwrap();
        assert!(d.set_mu(vec![0.0]).is_err());
        assert!(!d.is_cache_stale());
    }

    #[test]
    fn test_set_parameter_round_trip() {
        let mut d = correlated_normal();
        let mut theta = d.parameter();
        assert_eq!(
            d.parameter_description(),
            vec!["mu_0", "sigma_0", "mu_1", "sigma_1", "R_1_0"]
        );
        theta[4] = -0.3;
        d.set_parameter(&theta).unwrap();
        assert_eq!(d.parameters().correlation().get(0, 1), -0.3);
        assert_eq!(d.parameter(), theta);
    }

    #[test]
    fn test_standard_distribution() {
        let d = correlated_normal();
        let standard = d.standard_distribution().unwrap();
        assert_eq!(standard.parameters().mu(), &[0.0, 0.0]);
        assert!(standard.parameters().correlation().is_identity());
        assert_relative_eq!(
            standard.compute_pdf(&[0.0, 0.0]).unwrap(),
            1.0 / (2.0 * PI),
            max_relative = 1e-15
        );
    }

    #[test]
    fn test_cholesky_accessors() {
        let d = correlated_normal();
        let l = d.cholesky().unwrap();
        assert_relative_eq!(l.get(1, 0), 0.6, max_relative = 1e-15);
        assert_relative_eq!(l.get(1, 1), 0.8, max_relative = 1e-15);
        let inverse = d.inverse_cholesky().unwrap();
        assert_relative_eq!(inverse.get(1, 0), -0.75, max_relative = 1e-12);
    }

    #[test]
    fn test_sample_rejects_empty() {
        let d = correlated_normal();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            d.sample(0, &mut rng),
            Err(EllipticalError::Domain(DomainError::EmptySample))
        ));
        let sample = d.sample(3, &mut rng).unwrap();
        assert_eq!(sample.len(), 3);
        assert!(sample.iter().all(|x| x.len() == 2));
    }

    #[test]
    fn test_dimension_mismatch_is_domain_error() {
        let d = correlated_normal();
        assert!(matches!(
            d.compute_pdf(&[1.0]),
            Err(EllipticalError::Domain(DomainError::PointDimension { expected: 2, got: 1 }))
        ));
        assert!(d.compute_cdf(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_non_finite_normalization_is_numerical() {
        let err = EllipticalError::from(NumericalError::NonFinite {
            quantity: "normalization factor",
            value: f64::INFINITY,
        });
        assert!(err.is_numerical());
    }
}
