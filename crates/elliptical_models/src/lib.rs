//! # Elliptical Models (L2: Distribution Engine)
//!
//! Probability engine for elliptical distributions
//! `X = mu + diag(sigma) · L · U`, where `L` is the Cholesky factor of a
//! correlation matrix and `U` is spherically symmetric.
//!
//! This crate provides:
//! - Parameter validation and flattened parameter access
//! - Density, log-density, spatial gradient and Hessian
//! - Parameter gradient of the density by finite differences
//! - CDF, complementary CDF and survival function
//! - Radial quantiles and minimum-volume level sets with their density threshold
//! - Moments, sampling and iso-probabilistic transforms
//! - Reference families: [`families::Normal`], [`families::Student`]
//!
//! ## Design Principles
//!
//! - **Capability traits** for families: the engine never branches on which
//!   family it runs
//! - **Lazy cache** of the factorisation, dropped by every setter
//! - **Typed errors**: configuration, numerical and domain failures are distinct
//!
//! ## Example
//!
//! ```rust
//! use elliptical_core::math::linalg::CorrelationMatrix;
//! use elliptical_models::families::Student;
//!
//! let r = CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap();
//! let t = Student::distribution(4.0, vec![0.0, 0.0], vec![1.0, 2.0], r).unwrap();
//!
//! let level_set = t.compute_minimum_volume_level_set(0.9).unwrap();
//! assert!(level_set.contains(&[0.5, 0.5]).unwrap());
//! assert!(t.compute_pdf(&[0.0, 0.0]).unwrap() > t.compute_pdf(&[1.0, 1.0]).unwrap());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod elliptical;
pub mod families;
