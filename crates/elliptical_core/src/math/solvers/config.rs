//! Root-finder budgets.

use num_traits::Float;

/// Tolerance and iteration budget of a bracketing root finder.
///
/// The defaults match the quantile budget of
/// [`EngineConfig`](crate::config::EngineConfig), which is how the level-set
/// solver builds its finder. Values are not checked here; `EngineConfig`
/// validates them when it is loaded.
///
/// ```
/// use elliptical_core::math::solvers::SolverConfig;
///
/// let quantile: SolverConfig<f64> = SolverConfig::default();
/// assert_eq!(quantile.max_iterations, 200);
///
/// let coarse = SolverConfig::new(1e-6, 40);
/// assert!(coarse.tolerance > quantile.tolerance);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Stop once `|f(x)|` or the bracket half-width falls below this.
    pub tolerance: T,

    /// Iterations allowed before `SolverError::MaxIterationsExceeded`.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-12).unwrap_or_else(T::epsilon),
            max_iterations: 200,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Budget with the given tolerance and iteration cap.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }
}
