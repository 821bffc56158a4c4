//! Tabulates the levelised cost of electricity (LCOE) of extending the grid and of off-grid
//! technologies, across countries, population densities and distances from the existing grid.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cheapest;
pub mod cli;
pub mod cost;
pub mod country;
pub mod error;
pub mod evaluator;
pub mod finance;
pub mod id;
pub mod input;
pub mod log;
pub mod network;
pub mod observer;
pub mod output;
pub mod run;
pub mod sampling;
pub mod scenario;
pub mod settings;
pub mod tables;
pub mod technology;
pub mod units;
pub mod viability;

#[cfg(test)]
mod fixture;

/// Get the config dir for the program.
///
/// This is where the settings file is read from.
pub fn get_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // Only happens on unusual systems where the home directory can't be determined
        return PathBuf::from("lcoe-tables");
    };
    config_dir.push("lcoe-tables");
    config_dir
}
