//! One-dimensional root finding.
//!
//! The level-set solver inverts monotone radial distribution functions, so
//! only a bracketing method is needed:
//!
//! - [`BrentSolver`]: bisection / secant / inverse quadratic interpolation,
//!   plus a bounded upward bracket search for functions on `[0, ∞)`.
//!
//! ## Configuration
//!
//! [`SolverConfig`] carries the convergence tolerance and iteration budget.
//! Exceeding the budget is reported as an error, never as an approximate root.
//!
//! ## Example
//!
//! ```
//! use elliptical_core::math::solvers::{BrentSolver, SolverConfig};
//!
//! // Radius r such that 1 - exp(-r²/2) = 0.95
//! let solver = BrentSolver::new(SolverConfig::default());
//! let cdf = |r: f64| 1.0 - (-0.5 * r * r).exp();
//!
//! let root = solver.find_root_for_target(cdf, 0.95, 0.0, 10.0).unwrap();
//! assert!((root - 2.447_746_830_680_816).abs() < 1e-8);
//! ```

mod brent;
mod config;

pub use brent::BrentSolver;
pub use config::SolverConfig;
