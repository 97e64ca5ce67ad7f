//! Defining parameters of an elliptical distribution.

use elliptical_core::math::linalg::CorrelationMatrix;
use elliptical_core::types::ConfigurationError;

/// Pivot threshold below which a correlation matrix is treated as singular.
pub const POSITIVE_DEFINITE_TOLERANCE: f64 = 1e-14;

/// Location `mu`, scale `sigma`, correlation `R` and covariance scaling `c`.
///
/// The covariance of the distribution is `c · diag(sigma) · R · diag(sigma)`.
/// Every constructor and setter re-checks:
/// - `mu`, `sigma` and `R` share one dimension `n ≥ 1`
/// - `mu` is finite, `sigma` strictly positive and finite
/// - `R` symmetric with unit diagonal and positive definite
/// - `c` strictly positive and finite
///
/// # Example
///
/// ```
/// use elliptical_core::math::linalg::CorrelationMatrix;
/// use elliptical_models::elliptical::EllipticalParameters;
///
/// let r = CorrelationMatrix::new(&[1.0, 0.4, 0.4, 1.0], 2).unwrap();
/// let params = EllipticalParameters::new(vec![1.0, -1.0], vec![2.0, 0.5], r, 1.0).unwrap();
///
/// assert_eq!(params.dimension(), 2);
/// assert_eq!(params.parameter(), vec![1.0, 2.0, -1.0, 0.5, 0.4]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EllipticalParameters {
    mu: Vec<f64>,
    sigma: Vec<f64>,
    correlation: CorrelationMatrix<f64>,
    covariance_scaling_factor: f64,
}

impl EllipticalParameters {
    /// Validated constructor.
    pub fn new(
        mu: Vec<f64>,
        sigma: Vec<f64>,
        correlation: CorrelationMatrix<f64>,
        covariance_scaling_factor: f64,
    ) -> Result<Self, ConfigurationError> {
        let n = correlation.dim();
        if n == 0 {
            return Err(ConfigurationError::EmptyDimension);
        }
        if mu.len() != n || sigma.len() != n {
            return Err(ConfigurationError::DimensionMismatch {
                mu: mu.len(),
                sigma: sigma.len(),
                correlation: n,
            });
        }
        validate_mu(&mu)?;
        validate_sigma(&sigma)?;
        correlation.validate_positive_definite(POSITIVE_DEFINITE_TOLERANCE)?;
        if !(covariance_scaling_factor > 0.0 && covariance_scaling_factor.is_finite()) {
            return Err(ConfigurationError::InvalidScalingFactor(
                covariance_scaling_factor,
            ));
        }

        Ok(Self {
            mu,
            sigma,
            correlation,
            covariance_scaling_factor,
        })
    }

    /// Zero location, unit scale, identity correlation.
    pub fn standard(dimension: usize, covariance_scaling_factor: f64) -> Result<Self, ConfigurationError> {
        Self::new(
            vec![0.0; dimension],
            vec![1.0; dimension],
            CorrelationMatrix::identity(dimension),
            covariance_scaling_factor,
        )
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

    /// Correlation matrix.
    pub fn correlation(&self) -> &CorrelationMatrix<f64> {
        &self.correlation
    }

    /// Covariance scaling factor `c`.
    pub fn covariance_scaling_factor(&self) -> f64 {
        self.covariance_scaling_factor
    }

    /// Replaces `mu`, keeping the dimension.
    pub fn set_mu(&mut self, mu: Vec<f64>) -> Result<(), ConfigurationError> {
        self.check_length(mu.len(), self.sigma.len())?;
        validate_mu(&mu)?;
        self.mu = mu;
        Ok(())
    }

    /// Replaces `sigma`, keeping the dimension.
    pub fn set_sigma(&mut self, sigma: Vec<f64>) -> Result<(), ConfigurationError> {
        self.check_length(self.mu.len(), sigma.len())?;
        validate_sigma(&sigma)?;
        self.sigma = sigma;
        Ok(())
    }

    /// Replaces `R`, keeping the dimension.
    pub fn set_correlation(
        &mut self,
        correlation: CorrelationMatrix<f64>,
    ) -> Result<(), ConfigurationError> {
        if correlation.dim() != self.dimension() {
            return Err(ConfigurationError::DimensionMismatch {
                mu: self.mu.len(),
                sigma: self.sigma.len(),
                correlation: correlation.dim(),
            });
        }
        correlation.validate_positive_definite(POSITIVE_DEFINITE_TOLERANCE)?;
        self.correlation = correlation;
        Ok(())
    }

    /// Shape matrix `diag(sigma) · R · diag(sigma)`, row-major.
    pub fn shape(&self) -> Vec<f64> {
        let n = self.dimension();
        let mut shape = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                shape.push(self.sigma[i] * self.correlation.get(i, j) * self.sigma[j]);
            }
        }
        shape
    }

    /// Number of free parameters: `2n + n(n-1)/2`.
    pub fn parameter_count(&self) -> usize {
        let n = self.dimension();
        2 * n + n * (n - 1) / 2
    }

    /// Flattened parameters `[mu_0, sigma_0, …, mu_{n-1}, sigma_{n-1}, R_1_0, R_2_0, R_2_1, …]`.
    pub fn parameter(&self) -> Vec<f64> {
        let n = self.dimension();
        let mut values = Vec::with_capacity(self.parameter_count());
        for i in 0..n {
            values.push(self.mu[i]);
            values.push(self.sigma[i]);
        }
        for i in 1..n {
            for j in 0..i {
                values.push(self.correlation.get(i, j));
            }
        }
        values
    }

    /// Names matching [`parameter`](Self::parameter).
    pub fn parameter_description(&self) -> Vec<String> {
        let n = self.dimension();
        let mut names = Vec::with_capacity(self.parameter_count());
        for i in 0..n {
            names.push(format!("mu_{}", i));
            names.push(format!("sigma_{}", i));
        }
        for i in 1..n {
            for j in 0..i {
                names.push(format!("R_{}_{}", i, j));
            }
        }
        names
    }

    /// Rebuilds validated parameters from a flattened vector, keeping `c`.
    pub fn with_parameter(&self, values: &[f64]) -> Result<Self, ConfigurationError> {
        let expected = self.parameter_count();
        if values.len() != expected {
            return Err(ConfigurationError::InvalidParameterCount {
                expected,
                got: values.len(),
            });
        }

        let n = self.dimension();
        let mu = (0..n).map(|i| values[2 * i]).collect();
        let sigma = (0..n).map(|i| values[2 * i + 1]).collect();

        let mut matrix = vec![0.0; n * n];
        let mut index = 2 * n;
        for i in 0..n {
            matrix[i * n + i] = 1.0;
            for j in 0..i {
                matrix[i * n + j] = values[index];
                matrix[j * n + i] = values[index];
                index += 1;
            }
        }
        let correlation = CorrelationMatrix::new(&matrix, n)?;

        Self::new(mu, sigma, correlation, self.covariance_scaling_factor)
    }

    fn check_length(&self, mu: usize, sigma: usize) -> Result<(), ConfigurationError> {
        let n = self.dimension();
        if mu != n || sigma != n {
            return Err(ConfigurationError::DimensionMismatch {
                mu,
                sigma,
                correlation: n,
            });
        }
        Ok(())
    }
}

fn validate_mu(mu: &[f64]) -> Result<(), ConfigurationError> {
    match mu.iter().position(|m| !m.is_finite()) {
        Some(index) => Err(ConfigurationError::NonFiniteLocation {
            index,
            value: mu[index],
        }),
        None => Ok(()),
    }
}

fn validate_sigma(sigma: &[f64]) -> Result<(), ConfigurationError> {
    match sigma.iter().position(|s| !(*s > 0.0 && s.is_finite())) {
        Some(index) => Err(ConfigurationError::NonPositiveScale {
            index,
            value: sigma[index],
        }),
        None => Ok(()),
    }
}
