//! Correlation matrices with validation and Cholesky decomposition.
//!
//! ## Mathematical Background
//!
//! A correlation matrix `R` is symmetric with unit diagonal and, for the
//! elliptical engine, strictly positive definite. Its lower triangular
//! Cholesky factor `L` satisfies:
//!
//! ```text
//! R = L * L^T
//! ```
//!
//! `L` maps independent standard deviates to correlated ones, `L⁻¹` maps back.
//!
//! ## Usage
//!
//! ```
//! use elliptical_core::math::linalg::CorrelationMatrix;
//!
//! let corr = CorrelationMatrix::new(&[
//!     1.0_f64, 0.5,
//!     0.5, 1.0,
//! ], 2).unwrap();
//!
//! let l = corr.cholesky().unwrap();
//! assert!((l.get(1, 0) - 0.5).abs() < 1e-15);
//! assert!((l.get(1, 1) - 0.75_f64.sqrt()).abs() < 1e-15);
//! ```

use super::LowerTriangular;
use crate::traits::Float;
use crate::types::CorrelationError;

/// Correlation matrix with validation and Cholesky decomposition.
///
/// A correlation matrix must satisfy:
/// - Square and symmetric
/// - Diagonal elements equal to 1.0
/// - Off-diagonal elements in [-1, 1]
/// - Positive definite (checked by [`CorrelationMatrix::validate_positive_definite`])
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationMatrix<T: Float> {
    /// Matrix elements in row-major order
    data: Vec<T>,
    /// Matrix dimension (n x n)
    dim: usize,
}

impl<T: Float> CorrelationMatrix<T> {
    /// Create a new correlation matrix from flat array (row-major).
    ///
    /// # Validation
    ///
    /// - Must have exactly dim*dim elements
    /// - Diagonal elements must be 1.0
    /// - Must be symmetric
    /// - Off-diagonal elements must be in [-1, 1]
    ///
    /// Positive definiteness is not checked here.
    pub fn new(data: &[T], dim: usize) -> Result<Self, CorrelationError> {
        let expected = dim * dim;
        if data.len() != expected {
            return Err(CorrelationError::InvalidDimensions {
                expected,
                got: data.len(),
            });
        }

        let one = T::one();
        let epsilon = T::from(1e-10).unwrap_or_else(T::epsilon);

        for i in 0..dim {
            let diag = data[i * dim + i];
            if !((diag - one).abs() <= epsilon) {
                return Err(CorrelationError::InvalidDiagonal {
                    index: i,
                    value: diag.to_f64().unwrap_or(f64::NAN),
                });
            }
        }

        for i in 0..dim {
            for j in (i + 1)..dim {
                let val_ij = data[i * dim + j];
                let val_ji = data[j * dim + i];

                if !((val_ij - val_ji).abs() <= epsilon) {
                    return Err(CorrelationError::NotSymmetric { i, j });
                }

                if !(val_ij.abs() <= one) {
                    return Err(CorrelationError::OutOfRange {
                        i,
                        j,
                        value: val_ij.to_f64().unwrap_or(f64::NAN),
                    });
                }
            }
        }

        // Store exact unit diagonal and exact symmetry
        let mut stored = data.to_vec();
        for i in 0..dim {
            stored[i * dim + i] = one;
            for j in 0..i {
                stored[i * dim + j] = stored[j * dim + i];
            }
        }

        Ok(Self { data: stored, dim })
    }

    /// Create from rows, e.g. `&[vec![1.0, 0.3], vec![0.3, 1.0]]`.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self, CorrelationError> {
        let dim = rows.len();
        let mut data = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(CorrelationError::InvalidDimensions {
                    expected: dim * dim,
                    got: dim * (dim - 1) + row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::new(&data, dim)
    }

    /// Create an identity correlation matrix (no correlation).
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![T::zero(); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = T::one();
        }
        Self { data, dim }
    }

    /// Get matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Get element at (i, j).
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.dim + j]
    }

    /// Row-major elements.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns a copy with `R_ij = R_ji = value`.
    ///
    /// Diagonal entries cannot be changed.
    pub fn with_entry(&self, i: usize, j: usize, value: T) -> Result<Self, CorrelationError> {
        if i >= self.dim || j >= self.dim {
            return Err(CorrelationError::InvalidDimensions {
                expected: self.dim,
                got: i.max(j) + 1,
            });
        }
        let mut data = self.data.clone();
        data[i * self.dim + j] = value;
        data[j * self.dim + i] = value;
        Self::new(&data, self.dim)
    }

    /// Compute Cholesky decomposition (lower triangular L where R = L * L^T).
    ///
    /// # Returns
    ///
    /// `Err(CorrelationError::NotPositiveDefinite)` if a pivot is not
    /// strictly positive.
    pub fn cholesky(&self) -> Result<LowerTriangular<T>, CorrelationError> {
        let n = self.dim;
        let mut lower = vec![T::zero(); n * n];

        for i in 0..n {
            for j in 0..=i {
                let mut sum = T::zero();

                if j == i {
                    for k in 0..j {
                        let l_jk = lower[j * n + k];
                        sum = sum + l_jk * l_jk;
                    }
                    let diag = self.get(j, j) - sum;
                    if !(diag > T::zero()) {
                        return Err(CorrelationError::NotPositiveDefinite { index: j });
                    }
                    lower[j * n + j] = diag.sqrt();
                } else {
                    for k in 0..j {
                        sum = sum + lower[i * n + k] * lower[j * n + k];
                    }
                    let l_jj = lower[j * n + j];
                    lower[i * n + j] = (self.get(i, j) - sum) / l_jj;
                }
            }
        }

        Ok(LowerTriangular::from_raw(lower, n))
    }

    /// Checks positive definiteness by attempting a Cholesky factorisation
    /// whose pivots must exceed `tolerance`.
    pub fn validate_positive_definite(&self, tolerance: T) -> Result<(), CorrelationError> {
        let factor = self.cholesky()?;
        match factor
            .diagonal()
            .iter()
            .position(|&pivot| pivot * pivot <= tolerance)
        {
            Some(index) => Err(CorrelationError::NotPositiveDefinite { index }),
            None => Ok(()),
        }
    }

    /// True if all off-diagonal entries are zero.
    pub fn is_identity(&self) -> bool {
        (0..self.dim).all(|i| (0..self.dim).all(|j| i == j || self.get(i, j) == T::zero()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn three_by_three() -> CorrelationMatrix<f64> {
        CorrelationMatrix::new(&[1.0, 0.5, 0.3, 0.5, 1.0, -0.2, 0.3, -0.2, 1.0], 3).unwrap()
    }

    #[test]
    fn test_correlation_matrix_valid() {
        let m = three_by_three();
        assert_eq!(m.dim(), 3);
        assert_eq!(m.get(0, 1), 0.5);
        assert!(!m.is_identity());
    }

    #[test]
    fn test_invalid_dimensions() {
        let result = CorrelationMatrix::new(&[1.0_f64, 0.5, 0.5], 2);
        assert_eq!(
            result,
            Err(CorrelationError::InvalidDimensions {
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn test_invalid_diagonal() {
        let result = CorrelationMatrix::new(&[1.0_f64, 0.5, 0.5, 0.9], 2);
        assert!(matches!(
            result,
            Err(CorrelationError::InvalidDiagonal { index: 1, .. })
        ));
    }

    #[test]
    fn test_nan_diagonal_rejected() {
        let result = CorrelationMatrix::new(&[f64::NAN, 0.0, 0.0, 1.0], 2);
        assert!(matches!(
            result,
            Err(CorrelationError::InvalidDiagonal { index: 0, .. })
        ));
    }

    #[test]
    fn test_not_symmetric() {
        let result = CorrelationMatrix::new(&[1.0_f64, 0.5, 0.4, 1.0], 2);
        assert_eq!(result, Err(CorrelationError::NotSymmetric { i: 0, j: 1 }));
    }

    #[test]
    fn test_out_of_range() {
        let result = CorrelationMatrix::new(&[1.0_f64, 1.5, 1.5, 1.0], 2);
        assert!(matches!(
            result,
            Err(CorrelationError::OutOfRange { i: 0, j: 1, .. })
        ));
    }

    #[test]
    fn test_from_rows() {
        let m = CorrelationMatrix::from_rows(&[vec![1.0_f64, 0.2], vec![0.2, 1.0]]).unwrap();
        assert_eq!(m.get(1, 0), 0.2);
        assert!(CorrelationMatrix::from_rows(&[vec![1.0_f64, 0.2], vec![0.2]]).is_err());
    }

    #[test]
    fn test_identity_cholesky_is_identity() {
        let m: CorrelationMatrix<f64> = CorrelationMatrix::identity(3);
        assert!(m.is_identity());
        let l = m.cholesky().unwrap();
        assert_eq!(l, LowerTriangular::identity(3));
    }

    #[test]
    fn test_cholesky_reconstructs() {
        let m = three_by_three();
        let l = m.cholesky().unwrap();
        let rebuilt = l.gram();
        for (a, b) in rebuilt.iter().zip(m.as_slice()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
        assert!(l.diagonal().iter().all(|&d| d > 0.0));
    }

    #[test]
    fn test_not_positive_definite() {
        // Pairwise valid correlations that are jointly inconsistent
        let m = CorrelationMatrix::new(
            &[1.0_f64, 0.9, -0.9, 0.9, 1.0, 0.9, -0.9, 0.9, 1.0],
            3,
        )
        .unwrap();
        assert!(matches!(
            m.cholesky(),
            Err(CorrelationError::NotPositiveDefinite { index: 2 })
        ));
        assert!(m.validate_positive_definite(1e-12).is_err());
    }

    #[test]
    fn test_perfect_correlation_is_singular() {
        let m = CorrelationMatrix::new(&[1.0_f64, 1.0, 1.0, 1.0], 2).unwrap();
        assert!(m.validate_positive_definite(1e-12).is_err());
    }

    #[test]
    fn test_with_entry_keeps_symmetry() {
        let m = three_by_three().with_entry(2, 0, 0.1).unwrap();
        assert_eq!(m.get(0, 2), 0.1);
        assert_eq!(m.get(2, 0), 0.1);
        assert!(three_by_three().with_entry(0, 0, 0.5).is_err());
    }
}
