//! Numerical building blocks: linear algebra on correlation matrices and
//! one-dimensional root finding.

pub mod linalg;
pub mod solvers;
