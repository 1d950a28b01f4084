//! Projection of oil palm yields under Ganoderma basal stem rot, with and without treatment.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod census;
pub mod cli;
pub mod error;
pub mod factor;
pub mod finance;
pub mod input;
pub mod log;
pub mod output;
pub mod parameters;
pub mod projection;
pub mod scenario;
pub mod settings;
pub mod soil;
pub mod units;
pub mod year;

#[cfg(test)]
mod fixture;

/// Get the path to the GUANO config directory
pub fn get_guano_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config directory on this platform, so use the working directory
        return PathBuf::from(".");
    };
    config_dir.push("guano");

    config_dir
}
