//! Generic elliptical distribution engine.
//!
//! This module provides:
//! - [`EllipticalParameters`]: validated `(mu, sigma, R, c)`
//! - [`Standardizer`] and [`QuadraticForm`]: the map to standard space and `β²`
//! - [`DensityGenerator`], [`RadialDistribution`], [`EllipticalFamily`]:
//!   the capabilities a family supplies
//! - [`RadialCdf`] and [`LevelSetSolver`]: radial quantiles and minimum-volume sets
//! - [`EllipticalDistribution`]: the facade tying everything together
//! - [`Transformation`]: composable standard-space transforms

mod cache;
mod distribution;
mod family;
mod level_set;
mod parameters;
mod quadratic;
mod radial;
mod standardizer;
mod transform;

pub use cache::{EllipticalCache, Factorization, Moments};
pub use distribution::EllipticalDistribution;
pub use family::{uniform_direction, DensityGenerator, EllipticalFamily, RadialDistribution};
pub use level_set::{EllipsoidLevelSet, LevelSetSolver};
pub use parameters::{EllipticalParameters, POSITIVE_DEFINITE_TOLERANCE};
pub use quadratic::QuadraticForm;
pub use radial::RadialCdf;
pub use standardizer::Standardizer;
pub use transform::{
    Composed, InverseIsoProbabilisticTransformation, IsoProbabilisticTransformation,
    Transformation,
};
