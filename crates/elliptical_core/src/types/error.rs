//! Error types for structured error handling.
//!
//! This module provides:
//! - `ConfigurationError`: Invalid parameters, raised eagerly at construction or setter time
//! - `NumericalError`: Factorisation or root-finding failures
//! - `DomainError`: Query arguments outside the domain of an operation
//! - `EllipticalError`: Umbrella error returned by the distribution engine
//! - `SolverError`: Errors from root-finding solvers
//! - `CorrelationError`: Errors from correlation matrix validation and factorisation

use thiserror::Error;

/// Root-finding solver errors.
///
/// # Variants
/// - `MaxIterationsExceeded`: Solver failed to converge within iteration limit
/// - `NoBracket`: Function values at bracket endpoints have same sign
/// - `NumericalInstability`: Function produced a non-finite value
///
/// # Examples
/// ```
/// use elliptical_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// No valid bracket (function values at endpoints have same sign).
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// The function returned a non-finite value.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

/// Correlation matrix errors.
///
/// # Examples
/// ```
/// use elliptical_core::types::CorrelationError;
///
/// let err = CorrelationError::InvalidDiagonal { index: 1, value: 0.5 };
/// assert_eq!(format!("{}", err), "Diagonal element at index 1 is 0.5, expected 1.0");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelationError {
    /// Matrix is not positive definite
    #[error("Correlation matrix is not positive definite (pivot {index})")]
    NotPositiveDefinite {
        /// Row at which the Cholesky pivot became non-positive
        index: usize,
    },

    /// Matrix dimensions are invalid
    #[error("Invalid matrix dimensions: expected {expected} elements, got {got}")]
    InvalidDimensions {
        /// Number of elements required
        expected: usize,
        /// Number of elements supplied
        got: usize,
    },

    /// Diagonal elements are not 1.0
    #[error("Diagonal element at index {index} is {value}, expected 1.0")]
    InvalidDiagonal {
        /// Diagonal index
        index: usize,
        /// Offending value
        value: f64,
    },

    /// Matrix is not symmetric
    #[error("Matrix is not symmetric at ({i}, {j})")]
    NotSymmetric {
        /// Row index
        i: usize,
        /// Column index
        j: usize,
    },

    /// Correlation value out of range [-1, 1]
    #[error("Correlation at ({i}, {j}) is {value}, must be in [-1, 1]")]
    OutOfRange {
        /// Row index
        i: usize,
        /// Column index
        j: usize,
        /// Offending value
        value: f64,
    },
}

/// Invalid distribution parameters.
///
/// Raised eagerly by constructors and setters, never deferred to a density query.
///
/// # Examples
/// ```
/// use elliptical_core::types::ConfigurationError;
///
/// let err = ConfigurationError::NonPositiveScale { index: 0, value: -1.0 };
/// assert!(format!("{}", err).contains("sigma[0]"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Distribution must have at least one component.
    #[error("Distribution dimension must be at least 1")]
    EmptyDimension,

    /// Location, scale and correlation sizes disagree.
    #[error("Dimension mismatch: mu has {mu} components, sigma has {sigma}, R is {correlation}x{correlation}")]
    DimensionMismatch {
        /// Length of `mu`
        mu: usize,
        /// Length of `sigma`
        sigma: usize,
        /// Dimension of `R`
        correlation: usize,
    },

    /// A scale component is not strictly positive.
    #[error("sigma[{index}] = {value} must be strictly positive")]
    NonPositiveScale {
        /// Component index
        index: usize,
        /// Offending value
        value: f64,
    },

    /// A location component is not finite.
    #[error("mu[{index}] = {value} must be finite")]
    NonFiniteLocation {
        /// Component index
        index: usize,
        /// Offending value
        value: f64,
    },

    /// Covariance scaling factor is not strictly positive and finite.
    #[error("Covariance scaling factor {0} must be positive and finite")]
    InvalidScalingFactor(f64),

    /// Flattened parameter vector has the wrong length.
    #[error("Invalid parameter count: expected {expected}, got {got}")]
    InvalidParameterCount {
        /// Number of parameters required
        expected: usize,
        /// Number of parameters supplied
        got: usize,
    },

    /// Family-specific parameter is invalid (e.g. Student degrees of freedom).
    #[error("Invalid family parameter: {0}")]
    InvalidFamilyParameter(String),

    /// Correlation matrix failed validation.
    #[error(transparent)]
    Correlation(#[from] CorrelationError),
}

/// Numerical failures that survive parameter validation.
///
/// # Examples
/// ```
/// use elliptical_core::types::{NumericalError, SolverError};
///
/// let err: NumericalError = SolverError::MaxIterationsExceeded { iterations: 3 }.into();
/// assert!(format!("{}", err).contains("3 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericalError {
    /// Cholesky factorisation failed on an ill-conditioned matrix.
    #[error("Cholesky factorisation failed: {0}")]
    Factorization(CorrelationError),

    /// Derived quantity is NaN or infinite.
    #[error("Non-finite {quantity}: {value}")]
    NonFinite {
        /// Name of the quantity
        quantity: &'static str,
        /// Offending value
        value: f64,
    },

    /// Root finder failed.
    #[error("Root finder failed: {0}")]
    Solver(#[from] SolverError),

    /// No bracket could be found within the expansion budget.
    #[error("Could not bracket radial probability {target} below radius {upper}")]
    BracketNotFound {
        /// Target radial probability
        target: f64,
        /// Last radius tried
        upper: f64,
    },

    /// The density generator increases somewhere on the checked range.
    #[error("Density generator is not non-increasing: phi({t_low}) = {phi_low} < phi({t_high}) = {phi_high}")]
    NonMonotoneGenerator {
        /// Smaller squared radius
        t_low: f64,
        /// Larger squared radius
        t_high: f64,
        /// Generator value at `t_low`
        phi_low: f64,
        /// Generator value at `t_high`
        phi_high: f64,
    },
}

/// Query arguments outside the domain of an operation.
///
/// # Examples
/// ```
/// use elliptical_core::types::DomainError;
///
/// let err = DomainError::ProbabilityOutOfRange(1.5);
/// assert_eq!(format!("{}", err), "Probability 1.5 must lie in (0, 1)");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Probability argument outside the open unit interval.
    #[error("Probability {0} must lie in (0, 1)")]
    ProbabilityOutOfRange(f64),

    /// Point has the wrong number of components.
    #[error("Point dimension {got} does not match distribution dimension {expected}")]
    PointDimension {
        /// Distribution dimension
        expected: usize,
        /// Point dimension
        got: usize,
    },

    /// The family has no finite moment of this order.
    #[error("Moment of order {order} is not defined for this distribution")]
    UndefinedMoment {
        /// Moment order
        order: u32,
    },

    /// Sample size must be positive.
    #[error("Sample size must be positive")]
    EmptySample,
}

/// Umbrella error for the elliptical distribution engine.
///
/// Each tier is surfaced to the caller immediately; nothing is recovered
/// silently.
///
/// # Examples
/// ```
/// use elliptical_core::types::{DomainError, EllipticalError};
///
/// let err: EllipticalError = DomainError::ProbabilityOutOfRange(0.0).into();
/// assert!(err.is_domain());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EllipticalError {
    /// Invalid parameters.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Factorisation or solver failure.
    #[error("Numerical error: {0}")]
    Numerical(#[from] NumericalError),

    /// Argument outside the operation's domain.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl EllipticalError {
    /// True for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, EllipticalError::Configuration(_))
    }

    /// True for numerical errors.
    pub fn is_numerical(&self) -> bool {
        matches!(self, EllipticalError::Numerical(_))
    }

    /// True for domain errors.
    pub fn is_domain(&self) -> bool {
        matches!(self, EllipticalError::Domain(_))
    }
}

impl From<CorrelationError> for EllipticalError {
    fn from(err: CorrelationError) -> Self {
        EllipticalError::Configuration(ConfigurationError::Correlation(err))
    }
}

impl From<SolverError> for EllipticalError {
    fn from(err: SolverError) -> Self {
        EllipticalError::Numerical(NumericalError::Solver(err))
    }
}

/// Convenience result alias for engine operations.
pub type EllipticalResult<T> = Result<T, EllipticalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_error_display() {
        let err = SolverError::NoBracket { a: 0.0, b: 1.0 };
        assert_eq!(format!("{}", err), "No bracket: f(0) and f(1) have same sign");
    }

    #[test]
    fn test_correlation_error_converts_to_configuration() {
        let err: EllipticalError = CorrelationError::NotSymmetric { i: 0, j: 1 }.into();
        assert!(err.is_configuration());
        assert!(format!("{}", err).contains("not symmetric at (0, 1)"));
    }

    #[test]
    fn test_solver_error_converts_to_numerical() {
        let err: EllipticalError = SolverError::MaxIterationsExceeded { iterations: 7 }.into();
        assert!(err.is_numerical());
        assert!(!err.is_domain());
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = ConfigurationError::DimensionMismatch {
            mu: 2,
            sigma: 3,
            correlation: 2,
        };
        assert_eq!(
            format!("{}", err),
            "Dimension mismatch: mu has 2 components, sigma has 3, R is 2x2"
        );
    }

    #[test]
    fn test_non_monotone_display() {
        let err = NumericalError::NonMonotoneGenerator {
            t_low: 0.0,
            t_high: 1.0,
            phi_low: 0.5,
            phi_high: 0.7,
        };
        assert!(format!("{}", err).contains("not non-increasing"));
    }

    #[test]
    fn test_domain_error_display() {
        let err = DomainError::PointDimension {
            expected: 2,
            got: 3,
        };
        assert!(format!("{}", err).contains("dimension 3"));
        assert_eq!(
            format!("{}", DomainError::UndefinedMoment { order: 2 }),
            "Moment of order 2 is not defined for this distribution"
        );
    }
}
