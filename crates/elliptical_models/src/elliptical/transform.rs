//! Composable point transformations between physical and standard space.

use super::standardizer::Standardizer;
use elliptical_core::types::{DomainError, EllipticalResult};

/// Differentiable map `Rⁿ → Rᵐ`.
pub trait Transformation {
    /// Input dimension `n`.
    fn input_dimension(&self) -> usize;

    /// Output dimension `m`.
    fn output_dimension(&self) -> usize;

    /// Image of `x`.
    fn apply(&self, x: &[f64]) -> EllipticalResult<Vec<f64>>;

    /// Row-major `m × n` Jacobian at `x`.
    fn jacobian(&self, x: &[f64]) -> EllipticalResult<Vec<f64>>;

    /// `self ∘ inner`: applies `inner` first.
    fn compose<T>(self, inner: T) -> EllipticalResult<Composed<Self, T>>
    where
        Self: Sized,
        T: Transformation,
    {
        if inner.output_dimension() != self.input_dimension() {
            return Err(DomainError::PointDimension {
                expected: self.input_dimension(),
                got: inner.output_dimension(),
            }
            .into());
        }
        Ok(Composed { outer: self, inner })
    }
}

/// Composition `outer ∘ inner`.
#[derive(Clone, Debug)]
pub struct Composed<A, B> {
    outer: A,
    inner: B,
}

impl<A: Transformation, B: Transformation> Transformation for Composed<A, B> {
    fn input_dimension(&self) -> usize {
        self.inner.input_dimension()
    }

    fn output_dimension(&self) -> usize {
        self.outer.output_dimension()
    }

    fn apply(&self, x: &[f64]) -> EllipticalResult<Vec<f64>> {
        self.outer.apply(&self.inner.apply(x)?)
    }

    fn jacobian(&self, x: &[f64]) -> EllipticalResult<Vec<f64>> {
        let y = self.inner.apply(x)?;
        let outer = self.outer.jacobian(&y)?;
        let inner = self.inner.jacobian(x)?;

        let (m, k, n) = (
            self.outer.output_dimension(),
            self.outer.input_dimension(),
            self.inner.input_dimension(),
        );
        let mut product = vec![0.0; m * n];
        for i in 0..m {
            for j in 0..n {
                product[i * n + j] = (0..k).map(|l| outer[i * k + l] * inner[l * n + j]).sum();
            }
        }
        Ok(product)
    }
}

/// `x ↦ L⁻¹ · diag(1/sigma) · (x − mu)`.
#[derive(Clone, Debug, PartialEq)]
pub struct IsoProbabilisticTransformation {
    standardizer: Standardizer,
}

impl IsoProbabilisticTransformation {
    pub(crate) fn new(standardizer: Standardizer) -> Self {
        Self { standardizer }
    }

    /// The map back to physical space.
    pub fn inverse(&self) -> InverseIsoProbabilisticTransformation {
        InverseIsoProbabilisticTransformation::new(self.standardizer.clone())
    }
}

impl Transformation for IsoProbabilisticTransformation {
    fn input_dimension(&self) -> usize {
        self.standardizer.dimension()
    }

    fn output_dimension(&self) -> usize {
        self.standardizer.dimension()
    }

    fn apply(&self, x: &[f64]) -> EllipticalResult<Vec<f64>> {
        self.standardizer.normalize(x)
    }

    fn jacobian(&self, x: &[f64]) -> EllipticalResult<Vec<f64>> {
        self.standardizer.check_dimension(x)?;
        Ok(self.standardizer.normalize_jacobian())
    }
}

/// `u ↦ mu + diag(sigma) · L · u`.
#[derive(Clone, Debug, PartialEq)]
pub struct InverseIsoProbabilisticTransformation {
    standardizer: Standardizer,
}

impl InverseIsoProbabilisticTransformation {
    pub(crate) fn new(standardizer: Standardizer) -> Self {
        Self { standardizer }
    }

    /// The map to standard space.
    pub fn inverse(&self) -> IsoProbabilisticTransformation {
        IsoProbabilisticTransformation::new(self.standardizer.clone())
    }
}

impl Transformation for InverseIsoProbabilisticTransformation {
    fn input_dimension(&self) -> usize {
        self.standardizer.dimension()
    }

    fn output_dimension(&self) -> usize {
        self.standardizer.dimension()
    }

    fn apply(&self, u: &[f64]) -> EllipticalResult<Vec<f64>> {
        self.standardizer.denormalize(u)
    }

    fn jacobian(&self, u: &[f64]) -> EllipticalResult<Vec<f64>> {
        self.standardizer.check_dimension(u)?;
        Ok(self.standardizer.denormalize_jacobian())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elliptical::EllipticalParameters;
    use approx::assert_abs_diff_eq;
    use elliptical_core::math::linalg::CorrelationMatrix;

    fn standardizer(dimension: usize) -> Standardizer {
        let r = if dimension == 2 {
            CorrelationMatrix::new(&[1.0, -0.4, -0.4, 1.0], 2).unwrap()
        } else {
            CorrelationMatrix::identity(dimension)
        };
        let params = EllipticalParameters::new(
            vec![0.5; dimension],
            vec![1.5; dimension],
            r,
            1.0,
        )
        .unwrap();
        Standardizer::new(&params).unwrap()
    }

    #[test]
    fn test_inverse_composition_is_identity() {
        let forward = IsoProbabilisticTransformation::new(standardizer(2));
        let backward = forward.inverse();
        let round_trip = backward.compose(forward).unwrap();

        let x = [2.0, -3.0];
        let y = round_trip.apply(&x).unwrap();
        assert_abs_diff_eq!(y[0], x[0], epsilon = 1e-12);
        assert_abs_diff_eq!(y[1], x[1], epsilon = 1e-12);

        let jacobian = round_trip.jacobian(&x).unwrap();
        for (a, e) in jacobian.iter().zip([1.0, 0.0, 0.0, 1.0].iter()) {
            assert_abs_diff_eq!(*a, *e, epsilon = 1e-12);
        }
        assert_eq!(round_trip.input_dimension(), 2);
        assert_eq!(round_trip.output_dimension(), 2);
    }

    #[test]
    fn test_jacobian_matches_finite_difference() {
        let forward = IsoProbabilisticTransformation::new(standardizer(2));
        let x = [0.1, 0.7];
        let jacobian = forward.jacobian(&x).unwrap();
        let h = 1e-6;
        for j in 0..2 {
            let mut shifted = x;
            shifted[j] += h;
            let up = forward.apply(&shifted).unwrap();
            let base = forward.apply(&x).unwrap();
            for i in 0..2 {
                assert_abs_diff_eq!(jacobian[i * 2 + j], (up[i] - base[i]) / h, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_compose_rejects_dimension_mismatch() {
        let outer = IsoProbabilisticTransformation::new(standardizer(2));
        let inner = InverseIsoProbabilisticTransformation::new(standardizer(3));
        assert!(outer.compose(inner).is_err());
    }
}
