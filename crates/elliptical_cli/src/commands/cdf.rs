//! Distribution function command implementation

use elliptical_models::elliptical::{EllipticalDistribution, EllipticalFamily};
use tracing::info;

use crate::Result;

/// Print CDF, complementary CDF and survival function at `point`.
pub fn run<F: EllipticalFamily>(distribution: &EllipticalDistribution<F>, point: &[f64]) -> Result<()> {
    if distribution.dimension() > 1 {
        info!(
            samples = distribution.config().sampling_size,
            seed = distribution.config().sampling_seed,
            "multivariate CDF is estimated by Monte Carlo"
        );
    }

    let cdf = distribution.compute_cdf(point)?;
    println!("cdf: {}", cdf);
    println!("complementary_cdf: {}", distribution.compute_complementary_cdf(point)?);
    println!("survival: {}", distribution.compute_survival_function(point)?);
    Ok(())
}
