//! Clamped view of a family's radial distribution at a fixed dimension.

use super::family::RadialDistribution;

/// Radial CDF `F_R(r) = P(‖U‖ ≤ r)` of a family in `Rⁿ`.
///
/// Values are clamped to `[0, 1]`; non-positive radii have zero mass.
pub struct RadialCdf<'a, F: RadialDistribution + ?Sized> {
    family: &'a F,
    dimension: usize,
}

impl<'a, F: RadialDistribution + ?Sized> RadialCdf<'a, F> {
    /// Binds `family` to `dimension`.
    pub fn new(family: &'a F, dimension: usize) -> Self {
        Self { family, dimension }
    }

    /// Dimension `n`.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// `P(‖U‖ ≤ radius)`.
    pub fn cdf(&self, radius: f64) -> f64 {
        if radius <= 0.0 {
            return 0.0;
        }
        clamp_probability(self.family.radial_cdf(radius, self.dimension))
    }

    /// `P(‖U‖ > radius)`.
    pub fn survival(&self, radius: f64) -> f64 {
        if radius <= 0.0 {
            return 1.0;
        }
        clamp_probability(self.family.radial_survival(radius, self.dimension))
    }
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        p
    } else {
        p.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Overshooting;

    impl RadialDistribution for Overshooting {
        fn radial_cdf(&self, radius: f64, _dimension: usize) -> f64 {
            radius - 0.5
        }
    }

    #[test]
    fn test_clamps_to_unit_interval() {
        let radial = RadialCdf::new(&Overshooting, 2);
        assert_eq!(radial.cdf(0.25), 0.0);
        assert_eq!(radial.cdf(3.0), 1.0);
        assert_eq!(radial.survival(3.0), 0.0);
        assert_eq!(radial.cdf(1.0), 0.5);
    }

    #[test]
    fn test_non_positive_radius() {
        let radial = RadialCdf::new(&Overshooting, 2);
        assert_eq!(radial.cdf(-1.0), 0.0);
        assert_eq!(radial.survival(0.0), 1.0);
        assert_eq!(radial.dimension(), 2);
    }

    #[test]
    fn test_nan_propagates() {
        let radial = RadialCdf::new(&Overshooting, 2);
        assert!(radial.cdf(f64::NAN).is_nan());
    }
}
