//! Brent's method root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Brent's method root finder.
///
/// Combines bisection, secant, and inverse quadratic interpolation for
/// robust root finding without requiring derivatives. Guaranteed to
/// converge for continuous functions with a valid bracket.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`)
///
/// # Example
///
/// ```
/// use elliptical_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
///
/// // Solve x³ - x - 2 = 0 in bracket [1, 2]
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let root = solver.find_root(f, 1.0, 2.0).unwrap();
/// assert!((f(root)).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    /// Solver configuration
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Create a new Brent solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Find a root of `f` in the bracket [a, b].
    ///
    /// Requires that `f(a)` and `f(b)` have opposite signs (a valid bracket).
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - Root where `|f(x)| < tolerance` or the bracket has collapsed
    /// * `Err(SolverError::NoBracket)` - `f(a)` and `f(b)` have same sign
    /// * `Err(SolverError::NumericalInstability)` - `f` returned NaN
    /// * `Err(SolverError::MaxIterationsExceeded)` - Failed to converge
    ///
    /// # Example
    ///
    /// ```
    /// use elliptical_core::math::solvers::{BrentSolver, SolverConfig};
    ///
    /// let solver = BrentSolver::new(SolverConfig::default());
    /// let f = |x: f64| x * x - 2.0;
    ///
    /// let root = solver.find_root(f, 0.0, 2.0).unwrap();
    /// assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
    /// ```
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let mut a = a;
        let mut b = b;
        let mut fa = evaluate(&f, a)?;
        let mut fb = evaluate(&f, b)?;

        if fa == T::zero() {
            return Ok(a);
        }
        if fb == T::zero() {
            return Ok(b);
        }
        if (fa > T::zero()) == (fb > T::zero()) {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        let two = T::one() + T::one();
        let three = two + T::one();
        let half = T::one() / two;

        let mut c = b;
        let mut fc = fb;
        let mut d = b - a;
        let mut e = d;

        for _iteration in 0..self.config.max_iterations {
            // Keep the root between b and c
            if (fb > T::zero()) == (fc > T::zero()) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }

            // b is always the best estimate
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol = two * T::epsilon() * b.abs() + half * self.config.tolerance;
            let m = half * (c - b);

            if fb.abs() < self.config.tolerance || m.abs() <= tol {
                return Ok(b);
            }

            if e.abs() >= tol && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (p, q) = if a == c {
                    // Secant step
                    (two * m * s, T::one() - s)
                } else {
                    // Inverse quadratic interpolation
                    let r = fb / fc;
                    let t = fa / fc;
                    (
                        s * (two * m * t * (t - r) - (b - a) * (r - T::one())),
                        (t - T::one()) * (r - T::one()) * (s - T::one()),
                    )
                };
                let (p, q) = if p > T::zero() { (p, -q) } else { (-p, q) };

                let min1 = three * m * q - (tol * q).abs();
                let min2 = (e * q).abs();

                if two * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = m;
                    e = m;
                }
            } else {
                d = m;
                e = m;
            }

            a = b;
            fa = fb;

            b = if d.abs() > tol {
                b + d
            } else if m > T::zero() {
                b + tol
            } else {
                b - tol
            };

            fb = evaluate(&f, b)?;
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Find `x` in [a, b] such that `f(x) = target`.
    pub fn find_root_for_target<F>(&self, f: F, target: T, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        self.find_root(|x| f(x) - target, a, b)
    }

    /// Bracket a root of a non-decreasing function on `[lower, ∞)`.
    ///
    /// Starting from `[lower, upper]`, the interval is shifted and doubled
    /// until `f(upper) >= 0`, at most `max_expansions` times.
    ///
    /// # Returns
    ///
    /// * `Ok((a, b))` - `f(a) <= 0 <= f(b)`
    /// * `Err(SolverError::NoBracket)` - Budget exhausted, holds the last interval
    ///
    /// # Example
    ///
    /// ```
    /// use elliptical_core::math::solvers::BrentSolver;
    ///
    /// let solver: BrentSolver<f64> = BrentSolver::with_defaults();
    /// let (a, b) = solver.bracket_upward(|x| x - 10.0, 0.0, 1.0, 8).unwrap();
    /// assert!(a <= 10.0 && 10.0 <= b);
    /// ```
    pub fn bracket_upward<F>(
        &self,
        f: F,
        lower: T,
        upper: T,
        max_expansions: usize,
    ) -> Result<(T, T), SolverError>
    where
        F: Fn(T) -> T,
    {
        let two = T::one() + T::one();
        let mut a = lower;
        let mut b = upper;

        for _expansion in 0..=max_expansions {
            if evaluate(&f, b)? >= T::zero() {
                return Ok((a, b));
            }
            a = b;
            b = b * two;
        }

        Err(SolverError::NoBracket {
            a: a.to_f64().unwrap_or(f64::NAN),
            b: b.to_f64().unwrap_or(f64::NAN),
        })
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}

fn evaluate<T: Float, F: Fn(T) -> T>(f: &F, x: T) -> Result<T, SolverError> {
    let value = f(x);
    if value.is_nan() {
        return Err(SolverError::NumericalInstability(format!(
            "function returned NaN at x = {}",
            x.to_f64().unwrap_or(f64::NAN)
        )));
    }
    Ok(value)
}
