//! Distribution selection shared by every command.

use clap::{Args, ValueEnum};
use elliptical_core::config::EngineConfig;
use elliptical_core::math::linalg::CorrelationMatrix;
use elliptical_core::types::EllipticalError;
use elliptical_models::elliptical::EllipticalDistribution;
use elliptical_models::families::{Normal, Student};
use tracing::debug;

use crate::{CliError, Result};

/// Supported families
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FamilyKind {
    /// Multivariate normal
    Normal,
    /// Multivariate Student-t
    Student,
}

/// Distribution parameters given on the command line
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Elliptical family
    #[arg(short, long, value_enum, default_value_t = FamilyKind::Normal)]
    pub family: FamilyKind,

    /// Degrees of freedom (student only)
    #[arg(long, default_value_t = 5.0)]
    pub nu: f64,

    /// Location vector, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub mu: Vec<f64>,

    /// Scale vector, comma separated (default: all ones)
    #[arg(long, value_delimiter = ',')]
    pub sigma: Option<Vec<f64>>,

    /// Correlation matrix in row-major order, comma separated (default: identity)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub correlation: Option<Vec<f64>>,
}

/// A distribution of one of the supported families
pub enum Model {
    /// Normal family
    Normal(EllipticalDistribution<Normal>),
    /// Student family
    Student(EllipticalDistribution<Student>),
}

/// Runs `$body` with `$d` bound to the concrete distribution.
macro_rules! with_distribution {
    ($model:expr, $d:ident => $body:expr) => {
        match $model {
            $crate::model::Model::Normal($d) => $body,
            $crate::model::Model::Student($d) => $body,
        }
    };
}
pub(crate) use with_distribution;

impl ModelArgs {
    /// Validates the arguments and builds the distribution.
    pub fn build(&self, config: EngineConfig) -> Result<Model> {
        let n = self.mu.len();
        let sigma = self.sigma.clone().unwrap_or_else(|| vec![1.0; n]);
        let correlation = match &self.correlation {
            Some(values) => {
                if values.len() != n * n {
                    return Err(CliError::InvalidArgument(format!(
                        "correlation needs {} entries for dimension {}, got {}",
                        n * n,
                        n,
                        values.len()
                    )));
                }
                CorrelationMatrix::new(values, n).map_err(EllipticalError::from)?
            }
            None => CorrelationMatrix::identity(n),
        };

        debug!(family = ?self.family, dimension = n, "building distribution");

        let model = match self.family {
            FamilyKind::Normal => {
                let mut d = Normal::distribution(self.mu.clone(), sigma, correlation)?;
                d.set_config(config);
                Model::Normal(d)
            }
            FamilyKind::Student => {
                let mut d = Student::distribution(self.nu, self.mu.clone(), sigma, correlation)?;
                d.set_config(config);
                Model::Student(d)
            }
        };
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(family: FamilyKind) -> ModelArgs {
        ModelArgs {
            family,
            nu: 4.0,
            mu: vec![0.0, 1.0],
            sigma: None,
            correlation: Some(vec![1.0, 0.5, 0.5, 1.0]),
        }
    }

    #[test]
    fn test_build_normal() {
        let model = args(FamilyKind::Normal).build(EngineConfig::default()).unwrap();
        let dimension = with_distribution!(model, d => d.dimension());
        assert_eq!(dimension, 2);
    }

    #[test]
    fn test_build_student_uses_nu() {
        let model = args(FamilyKind::Student).build(EngineConfig::default()).unwrap();
        match model {
            Model::Student(d) => assert_eq!(d.family().nu(), 4.0),
            Model::Normal(_) => panic!("expected student"),
        }
    }

    #[test]
    fn test_correlation_size_checked() {
        let mut a = args(FamilyKind::Normal);
        a.correlation = Some(vec![1.0, 0.5, 0.5]);
        assert!(matches!(
            a.build(EngineConfig::default()),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_invalid_sigma_rejected() {
        let mut a = args(FamilyKind::Normal);
        a.sigma = Some(vec![1.0, -1.0]);
        assert!(matches!(
            a.build(EngineConfig::default()),
            Err(CliError::Elliptical(e)) if e.is_configuration()
        ));
    }
}
