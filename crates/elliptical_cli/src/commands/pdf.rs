//! Density command implementation

use elliptical_models::elliptical::{EllipticalDistribution, EllipticalFamily};
use tracing::info;

use super::format_vector;
use crate::Result;

/// Print density, log-density and spatial gradient at `point`.
pub fn run<F: EllipticalFamily>(distribution: &EllipticalDistribution<F>, point: &[f64]) -> Result<()> {
    info!(family = distribution.family().name(), "evaluating density");

    println!("pdf: {}", distribution.compute_pdf(point)?);
    println!("log_pdf: {}", distribution.compute_log_pdf(point)?);
    println!("ddf: {}", format_vector(&distribution.compute_ddf(point)?));
    Ok(())
}
