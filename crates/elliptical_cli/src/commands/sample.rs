//! Sampling command implementation

use elliptical_models::elliptical::{EllipticalDistribution, EllipticalFamily};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use super::format_vector;
use crate::Result;

/// Print `size` realizations, one comma-separated row each.
pub fn run<F: EllipticalFamily>(
    distribution: &EllipticalDistribution<F>,
    size: usize,
    seed: Option<u64>,
) -> Result<()> {
    let seed = seed.unwrap_or(distribution.config().sampling_seed);
    info!(size, seed, "sampling");

    let mut rng = StdRng::seed_from_u64(seed);
    for row in distribution.sample(size, &mut rng)? {
        println!("{}", format_vector(&row));
    }
    Ok(())
}
