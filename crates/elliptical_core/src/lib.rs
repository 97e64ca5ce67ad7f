//! # elliptical_core: Numerical Foundation for Elliptical Distributions
//!
//! ## Layer 1 (Foundation) Role
//!
//! elliptical_core is the bottom layer of the workspace, providing:
//! - Error taxonomy: `ConfigurationError`, `NumericalError`, `DomainError` (`types::error`)
//! - Correlation matrices and Cholesky factors (`math::linalg`)
//! - Bracketing root finder (`math::solvers`)
//! - Numerical budgets loaded from environment or TOML (`config`)
//!
//! ## Usage Examples
//!
//! ```rust
//! use elliptical_core::math::linalg::CorrelationMatrix;
//! use elliptical_core::math::solvers::{BrentSolver, SolverConfig};
//!
//! let corr = CorrelationMatrix::new(&[1.0_f64, 0.3, 0.3, 1.0], 2).unwrap();
//! let l = corr.cholesky().unwrap();
//! assert!(l.diagonal().iter().all(|&d| d > 0.0));
//!
//! let solver = BrentSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x * x - 4.0, 0.0, 5.0).unwrap();
//! assert!((root - 2.0).abs() < 1e-10);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod config;
pub mod math;
pub mod traits;
pub mod types;
