//! Minimum-volume level set command implementation

use elliptical_models::elliptical::{EllipticalDistribution, EllipticalFamily};
use tracing::info;

use super::format_vector;
use crate::Result;

/// Print the ellipsoid holding `probability` and its density threshold.
pub fn run<F: EllipticalFamily>(distribution: &EllipticalDistribution<F>, probability: f64) -> Result<()> {
    info!(probability, "solving minimum volume level set");

    let (level_set, threshold) =
        distribution.compute_minimum_volume_level_set_with_threshold(probability)?;
    println!("center: {}", format_vector(level_set.center()));
    println!("radius: {}", level_set.radius());
    println!("threshold: {}", threshold);
    println!("volume: {}", level_set.volume());
    Ok(())
}
