//! Lower triangular matrices produced by Cholesky factorisation.

use crate::traits::Float;
use crate::types::CorrelationError;

/// Dense lower triangular matrix stored row-major.
///
/// Holds both the Cholesky factor `L` of a correlation matrix and its
/// inverse `L⁻¹`, which is again lower triangular.
///
/// # Example
///
/// ```
/// use elliptical_core::math::linalg::CorrelationMatrix;
///
/// let corr = CorrelationMatrix::new(&[1.0_f64, 0.6, 0.6, 1.0], 2).unwrap();
/// let l = corr.cholesky().unwrap();
/// let l_inv = l.inverse().unwrap();
///
/// let u = l_inv.mul_vec(&l.mul_vec(&[0.3, -1.2]));
/// assert!((u[0] - 0.3).abs() < 1e-14);
/// assert!((u[1] + 1.2).abs() < 1e-14);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LowerTriangular<T: Float> {
    /// Matrix elements in row-major order, upper part is zero
    data: Vec<T>,
    /// Matrix dimension
    dim: usize,
}

impl<T: Float> LowerTriangular<T> {
    /// Identity matrix of the given dimension.
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![T::zero(); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = T::one();
        }
        Self { data, dim }
    }

    pub(crate) fn from_raw(data: Vec<T>, dim: usize) -> Self {
        debug_assert_eq!(data.len(), dim * dim);
        Self { data, dim }
    }

    /// Get matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Get element at (i, j).
    ///
    /// Returns zero for upper triangular elements (j > i).
    pub fn get(&self, i: usize, j: usize) -> T {
        if j > i {
            T::zero()
        } else {
            self.data[i * self.dim + j]
        }
    }

    /// Diagonal entries.
    pub fn diagonal(&self) -> Vec<T> {
        (0..self.dim).map(|i| self.data[i * self.dim + i]).collect()
    }

    /// `ln |det L| = Σ ln L_ii`.
    pub fn log_abs_determinant(&self) -> T {
        (0..self.dim).fold(T::zero(), |acc, i| {
            acc + self.data[i * self.dim + i].abs().ln()
        })
    }

    /// Computes `L · v`.
    ///
    /// # Panics
    ///
    /// Panics if `v.len() != self.dim()`.
    pub fn mul_vec(&self, v: &[T]) -> Vec<T> {
        assert_eq!(
            v.len(),
            self.dim,
            "Input vector length {} does not match matrix dimension {}",
            v.len(),
            self.dim
        );

        (0..self.dim)
            .map(|i| {
                (0..=i).fold(T::zero(), |sum, j| sum + self.data[i * self.dim + j] * v[j])
            })
            .collect()
    }

    /// Computes `Lᵗ · v`.
    ///
    /// # Panics
    ///
    /// Panics if `v.len() != self.dim()`.
    pub fn transpose_mul_vec(&self, v: &[T]) -> Vec<T> {
        assert_eq!(
            v.len(),
            self.dim,
            "Input vector length {} does not match matrix dimension {}",
            v.len(),
            self.dim
        );

        (0..self.dim)
            .map(|j| {
                (j..self.dim).fold(T::zero(), |sum, i| sum + self.data[i * self.dim + j] * v[i])
            })
            .collect()
    }

    /// Solves `L · x = b` by forward substitution.
    pub fn solve(&self, b: &[T]) -> Result<Vec<T>, CorrelationError> {
        if b.len() != self.dim {
            return Err(CorrelationError::InvalidDimensions {
                expected: self.dim,
                got: b.len(),
            });
        }

        let n = self.dim;
        let mut x = vec![T::zero(); n];
        for i in 0..n {
            let pivot = self.data[i * n + i];
            if pivot == T::zero() {
                return Err(CorrelationError::NotPositiveDefinite { index: i });
            }
            let sum = (0..i).fold(T::zero(), |acc, k| acc + self.data[i * n + k] * x[k]);
            x[i] = (b[i] - sum) / pivot;
        }
        Ok(x)
    }

    /// Inverse matrix, lower triangular, built column by column.
    pub fn inverse(&self) -> Result<Self, CorrelationError> {
        let n = self.dim;
        let mut data = vec![T::zero(); n * n];
        let mut unit = vec![T::zero(); n];

        for j in 0..n {
            unit.iter_mut().for_each(|v| *v = T::zero());
            unit[j] = T::one();
            let column = self.solve(&unit)?;
            for (i, value) in column.into_iter().enumerate().skip(j) {
                data[i * n + j] = value;
            }
        }

        Ok(Self { data, dim: n })
    }

    /// Computes `L · Lᵗ` as a row-major dense matrix.
    pub fn gram(&self) -> Vec<T> {
        let n = self.dim;
        let mut out = vec![T::zero(); n * n];
        for i in 0..n {
            for j in 0..=i {
                let value = (0..=j).fold(T::zero(), |acc, k| {
                    acc + self.data[i * n + k] * self.data[j * n + k]
                });
                out[i * n + j] = value;
                out[j * n + i] = value;
            }
        }
        out
    }

    /// True if every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}
