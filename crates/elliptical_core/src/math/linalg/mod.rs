//! Dense linear algebra for small correlation matrices.
//!
//! - [`CorrelationMatrix`]: validated symmetric unit-diagonal matrix
//! - [`LowerTriangular`]: Cholesky factor and its inverse, with the
//!   products and substitutions the standardizer needs

mod correlation;
mod triangular;

pub use correlation::CorrelationMatrix;
pub use triangular::LowerTriangular;
