//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands are generic
//! over the family and print plain `key: value` lines to stdout.

pub mod cdf;
pub mod level_set;
pub mod pdf;
pub mod sample;

fn format_vector(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
