//! Core types for the elliptical distribution engine.
//!
//! This module provides:
//! - Error types: `ConfigurationError`, `NumericalError`, `DomainError`,
//!   `EllipticalError`, `SolverError`, `CorrelationError` (`error`)

pub mod error;

pub use error::{
    ConfigurationError, CorrelationError, DomainError, EllipticalError, EllipticalResult,
    NumericalError, SolverError,
};
