//! Elliptical CLI - Command Line Queries for Elliptical Distributions
//!
//! # Commands
//!
//! - `elliptical pdf --mu 0,0 --point 1,1` - Density, log-density and gradient
//! - `elliptical cdf --mu 0,0 --point 1,1` - CDF, complementary CDF and survival
//! - `elliptical level-set --mu 0,0 --probability 0.95` - Minimum-volume ellipsoid
//! - `elliptical sample --mu 0,0 --size 10` - Realizations
//!
//! Engine budgets come from `--config <FILE>` (TOML) when given, otherwise
//! from `ELLIPTICAL_*` environment variables. Logging is controlled by
//! `RUST_LOG`, falling back to `--log-level`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use elliptical_core::config::EngineConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod model;

pub use error::{CliError, Result};
use model::{with_distribution, ModelArgs};

/// Elliptical distribution CLI
#[derive(Parser, Debug)]
#[command(name = "elliptical")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the density at a point
    Pdf {
        #[command(flatten)]
        model: ModelArgs,

        /// Evaluation point, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        point: Vec<f64>,
    },

    /// Evaluate the distribution function at a point
    Cdf {
        #[command(flatten)]
        model: ModelArgs,

        /// Evaluation point, comma separated
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        point: Vec<f64>,
    },

    /// Solve the minimum-volume level set of a given probability
    LevelSet {
        #[command(flatten)]
        model: ModelArgs,

        /// Probability mass in (0, 1)
        #[arg(short, long)]
        probability: f64,
    },

    /// Draw realizations
    Sample {
        #[command(flatten)]
        model: ModelArgs,

        /// Number of realizations
        #[arg(short = 'n', long, default_value = "10")]
        size: usize,

        /// Seed (default: sampling_seed from the engine configuration)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::from_env()?,
    };
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = load_config(cli.config.as_ref()).with_context(|| match &cli.config {
        Some(path) => format!("loading {}", path.display()),
        None => "reading ELLIPTICAL_* environment".to_string(),
    })?;
    info!(?config, "engine configuration");

    match cli.command {
        Commands::Pdf { model, point } => {
            with_distribution!(model.build(config)?, d => commands::pdf::run(&d, &point))?
        }
        Commands::Cdf { model, point } => {
            with_distribution!(model.build(config)?, d => commands::cdf::run(&d, &point))?
        }
        Commands::LevelSet { model, probability } => {
            with_distribution!(model.build(config)?, d => commands::level_set::run(&d, probability))?
        }
        Commands::Sample { model, size, seed } => {
            with_distribution!(model.build(config)?, d => commands::sample::run(&d, size, seed))?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use elliptical_core::config::ConfigError;

    #[test]
    fn test_parse_level_set() {
        let cli = Cli::try_parse_from([
            "elliptical",
            "level-set",
            "--family",
            "student",
            "--nu",
            "3",
            "--mu",
            "-1,2",
            "--correlation",
            "1,-0.5,-0.5,1",
            "-p",
            "0.9",
        ])
        .unwrap();

        match cli.command {
            Commands::LevelSet { model, probability } => {
                assert_eq!(model.mu, vec![-1.0, 2.0]);
                assert_eq!(model.correlation, Some(vec![1.0, -0.5, -0.5, 1.0]));
                assert_eq!(probability, 0.9);
                assert!(model.build(EngineConfig::default()).is_ok());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_requires_mu() {
        assert!(Cli::try_parse_from(["elliptical", "pdf", "--point", "0"]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let err = load_config(Some(&PathBuf::from("/nonexistent/elliptical.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::FileError(_))));
        assert!(err.to_string().contains("/nonexistent/elliptical.toml"));
    }

    #[test]
    fn test_invalid_config_file_is_a_config_error() {
        let path = std::env::temp_dir().join("elliptical_cli_invalid_config.toml");
        std::fs::write(&path, "quantile_iterations = 0\n").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, CliError::Config(_)));
    }
}
