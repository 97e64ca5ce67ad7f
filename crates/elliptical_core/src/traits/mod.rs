//! Core numeric traits.
//!
//! The linear algebra and solver layers are generic over [`Float`] so that
//! they work for both `f64` and `f32`.

/// Generic floating-point trait for numeric computations.
///
/// # Examples
/// ```
/// use elliptical_core::traits::Float;
///
/// fn squared_norm<T: Float>(u: &[T]) -> T {
///     u.iter().fold(T::zero(), |acc, &v| acc + v * v)
/// }
///
/// assert_eq!(squared_norm(&[3.0_f64, 4.0]), 25.0);
/// ```
pub use num_traits::Float;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_trait_with_f64() {
        fn generic_sqrt<T: Float>(x: T) -> T {
            x.sqrt()
        }

        assert_eq!(generic_sqrt(4.0_f64), 2.0);
    }

    #[test]
    fn test_float_trait_with_f32() {
        fn generic_ln_1p<T: Float>(x: T) -> T {
            x.ln_1p()
        }

        assert!((generic_ln_1p(0.0_f32)).abs() < 1e-7);
    }
}
