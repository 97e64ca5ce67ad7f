//! Radial quantiles and minimum-volume level sets.
//!
//! For a non-increasing density generator the minimum-volume region holding
//! probability `p` is the ellipsoid `{x : β²(x) ≤ r_p²}` where `r_p` solves
//! `F_R(r_p) = p`. Beyond the median the equation is rewritten on the
//! survival side, `1 − p = S_R(r_p)`, which keeps resolution when `p` is
//! close to one. Both forms are solved relative to the target mass, so a
//! probability of `1e-13` is resolved as finely as one of `0.5`.
//!
//! ## Usage
//!
//! ```
//! use elliptical_core::config::EngineConfig;
//! use elliptical_models::elliptical::{LevelSetSolver, RadialCdf};
//! use elliptical_models::families::Normal;
//!
//! let solver = LevelSetSolver::new(&EngineConfig::default());
//! let radius = solver.solve_radius(&RadialCdf::new(&Normal, 2), 0.95).unwrap();
//! assert!((radius - 2.447746830680816).abs() < 1e-8);
//! ```

use super::family::DensityGenerator;
use super::family::RadialDistribution;
use super::quadratic::QuadraticForm;
use super::radial::RadialCdf;
use super::standardizer::Standardizer;
use elliptical_core::config::EngineConfig;
use elliptical_core::math::solvers::BrentSolver;
use elliptical_core::types::{DomainError, EllipticalResult, NumericalError, SolverError};
use statrs::function::gamma::ln_gamma;
use std::f64::consts::PI;
use tracing::{trace, warn};

/// Inverts radial CDFs with a bracketed Brent search.
#[derive(Clone, Debug)]
pub struct LevelSetSolver {
    solver: BrentSolver<f64>,
    max_bracket_expansions: usize,
    monotonicity_checks: usize,
}

impl LevelSetSolver {
    /// Solver with the quantile budgets of `config`.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            solver: BrentSolver::new(config.solver_config()),
            max_bracket_expansions: config.max_bracket_expansions,
            monotonicity_checks: config.monotonicity_checks,
        }
    }

    /// Radius `r` with `P(‖U‖ ≤ r) = probability`.
    ///
    /// # Errors
    ///
    /// - `DomainError::ProbabilityOutOfRange` unless `0 < probability < 1`
    /// - `NumericalError::BracketNotFound` when doubling the radius never
    ///   reaches the target
    /// - `NumericalError::Solver` when Brent fails to converge
    pub fn solve_radius<F>(&self, radial: &RadialCdf<'_, F>, probability: f64) -> EllipticalResult<f64>
    where
        F: RadialDistribution + ?Sized,
    {
        check_probability(probability)?;

        let dimension = radial.dimension();
        let initial = (dimension as f64).sqrt().max(1.0);
        let tail = 1.0 - probability;
        let use_survival = probability > 0.5;

        // Increasing in r, negative at r = 0. Relative to the target mass so
        // that the solver's |f| stop means relative accuracy for tiny p or 1 − p.
        let objective = |r: f64| {
            if use_survival {
                1.0 - radial.survival(r) / tail
            } else {
                (radial.cdf(r) - probability) / probability
            }
        };

        let (lower, upper) = self
            .solver
            .bracket_upward(&objective, 0.0, initial, self.max_bracket_expansions)
            .map_err(|err| match err {
                SolverError::NoBracket { b, .. } => NumericalError::BracketNotFound {
                    target: probability,
                    upper: b,
                },
                other => NumericalError::Solver(other),
            })?;

        let radius = self.solver.find_root(&objective, lower, upper)?;
        trace!(
            probability,
            dimension,
            lower,
            upper,
            radius,
            survival_form = use_survival,
            "solved radial quantile"
        );
        Ok(radius)
    }

    /// Samples `phi` on `[0, beta_squared]` and fails on the first increase.
    pub fn check_monotone<G>(
        &self,
        generator: &G,
        dimension: usize,
        beta_squared: f64,
    ) -> Result<(), NumericalError>
    where
        G: DensityGenerator + ?Sized,
    {
        let steps = self.monotonicity_checks.max(2) - 1;
        let mut t_low = 0.0;
        let mut phi_low = generator.density_generator(t_low, dimension);

        for k in 1..=steps {
            let t_high = beta_squared * k as f64 / steps as f64;
            let phi_high = generator.density_generator(t_high, dimension);
            if phi_high > phi_low {
                warn!(t_low, t_high, phi_low, phi_high, "density generator increases");
                return Err(NumericalError::NonMonotoneGenerator {
                    t_low,
                    t_high,
                    phi_low,
                    phi_high,
                });
            }
            t_low = t_high;
            phi_low = phi_high;
        }
        Ok(())
    }
}

pub(crate) fn check_probability(probability: f64) -> Result<(), DomainError> {
    if probability > 0.0 && probability < 1.0 {
        Ok(())
    } else {
        Err(DomainError::ProbabilityOutOfRange(probability))
    }
}

/// Ellipsoid `{x : β²(x) ≤ radius²}` returned by minimum-volume level-set queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EllipsoidLevelSet {
    standardizer: Standardizer,
    radius: f64,
}

impl EllipsoidLevelSet {
    pub(crate) fn new(standardizer: Standardizer, radius: f64) -> Self {
        Self {
            standardizer,
            radius,
        }
    }

    /// Standardized radius `β`.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// `β²`.
    pub fn radius_squared(&self) -> f64 {
        self.radius * self.radius
    }

    /// Center `mu`.
    pub fn center(&self) -> &[f64] {
        self.standardizer.mu()
    }

    /// Dimension `n`.
    pub fn dimension(&self) -> usize {
        self.standardizer.dimension()
    }

    /// Whether `x` lies in the closed ellipsoid.
    pub fn contains(&self, x: &[f64]) -> EllipticalResult<bool> {
        let beta_squared = QuadraticForm::new(&self.standardizer).beta_squared(x)?;
        Ok(beta_squared <= self.radius_squared())
    }

    /// Lebesgue volume `π^{n/2} / Γ(n/2 + 1) · βⁿ · det(D L)`.
    pub fn volume(&self) -> f64 {
        let n = self.dimension() as f64;
        let log_unit_ball = 0.5 * n * PI.ln() - ln_gamma(0.5 * n + 1.0);
        (log_unit_ball + n * self.radius.ln() + self.standardizer.log_determinant()).exp()
    }
}
