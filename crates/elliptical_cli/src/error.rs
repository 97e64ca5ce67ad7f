//! CLI error types

use elliptical_core::config::ConfigError;
use elliptical_core::types::EllipticalError;
use thiserror::Error;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument combination that clap cannot reject on its own
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Engine configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Distribution construction or query failed
    #[error(transparent)]
    Elliptical(#[from] EllipticalError),
}

/// CLI result alias
pub type Result<T> = std::result::Result<T, CliError>;
