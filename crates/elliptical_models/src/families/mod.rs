//! Reference elliptical families.
//!
//! - [`Normal`]: Gaussian generator, light tails, all moments finite
//! - [`Student`]: heavy tails, moments of order `< ν`

mod normal;
mod student;

pub use normal::Normal;
pub use student::Student;
